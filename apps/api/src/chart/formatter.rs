//! Context Formatter: renders a SubjectChart into the canonical labelled text block
//! embedded in every chapter prompt.
//!
//! `format_chart` is total over `SubjectChart`. Structural problems can only occur
//! while decoding the raw payload; `prepare_subject` turns those into a tagged
//! `ContextBlock::Degraded` instead of an error, so one bad field never blocks a chapter.

use std::fmt::Write;

use serde_json::Value;
use tracing::warn;

use crate::chart::models::{span, Element, PillarPosition, SubjectChart, MISSING};

/// The formatted chart text, tagged with whether formatting succeeded.
#[derive(Debug, Clone, PartialEq)]
pub enum ContextBlock {
    Formatted(String),
    /// The payload could not be decoded; `diagnostic` is a single line.
    Degraded { diagnostic: String },
}

impl ContextBlock {
    pub fn text(&self) -> &str {
        match self {
            ContextBlock::Formatted(text) => text,
            ContextBlock::Degraded { diagnostic } => diagnostic,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, ContextBlock::Degraded { .. })
    }
}

/// A decoded chart plus its rendered context block.
#[derive(Debug, Clone)]
pub struct PreparedSubject {
    pub chart: SubjectChart,
    pub context: ContextBlock,
}

/// Decodes a raw chart payload and formats it. Never fails: an undecodable payload
/// yields an empty chart (every accessor reads `N/A`) and a degraded context block.
pub fn prepare_subject(raw: &Value) -> PreparedSubject {
    match serde_json::from_value::<SubjectChart>(raw.clone()) {
        Ok(chart) => {
            let context = ContextBlock::Formatted(format_chart(&chart));
            PreparedSubject { chart, context }
        }
        Err(e) => {
            let detail = e.to_string().replace(['\n', '\r'], " ");
            warn!("Chart payload could not be decoded, continuing with placeholder context: {detail}");
            PreparedSubject {
                chart: SubjectChart::default(),
                context: ContextBlock::Degraded {
                    diagnostic: format!("[Chart data unavailable: {detail}]"),
                },
            }
        }
    }
}

/// Renders the canonical block. Section order is fixed.
pub fn format_chart(chart: &SubjectChart) -> String {
    let mut out = String::with_capacity(2048);

    // Writing into a String cannot fail.
    let _ = writeln!(out, "[Identity]");
    let _ = writeln!(out, "- Name: {}", chart.name());
    let _ = writeln!(out, "- Gender identity: {}", chart.identity.gender);

    let _ = writeln!(out, "\n[Day Master]");
    let strength = chart.strength.clone().unwrap_or_default();
    let _ = writeln!(
        out,
        "- Day Master (日元): {} | Status: {} | Support tally: same {} vs opposing {}",
        chart.day_master(),
        chart.day_master_status.as_deref().unwrap_or(MISSING),
        strength.same.unwrap_or(0.0),
        strength.diff.unwrap_or(0.0),
    );

    let _ = writeln!(out, "\n[Four Pillars]");
    for position in PillarPosition::ALL {
        let pillar = chart.pillar(position).cloned().unwrap_or_default();
        let _ = writeln!(
            out,
            "- {}: {} | Element: {} | NaYin: {} | Ten God: {} | Hidden Stems: {} | Life Stage: {} | Void: {}",
            position.label(),
            pillar.gan_zhi(),
            pillar.element.as_deref().unwrap_or(MISSING),
            pillar.nayin.as_deref().unwrap_or(MISSING),
            pillar.ten_god.as_deref().unwrap_or(MISSING),
            pillar
                .hidden_stems
                .as_ref()
                .map(|h| h.render())
                .unwrap_or_else(|| MISSING.to_string()),
            pillar.life_stage.as_deref().unwrap_or(MISSING),
            match pillar.is_void {
                Some(true) => "yes",
                Some(false) => "no",
                None => MISSING,
            },
        );
    }

    let _ = writeln!(out, "\n[Five Elements]");
    let counts = chart.five_elements.clone().unwrap_or_default();
    let distribution = Element::CANONICAL
        .iter()
        .map(|e| format!("{} {}", e.label(), counts.count(*e)))
        .collect::<Vec<_>>()
        .join(" | ");
    let _ = writeln!(out, "- Distribution: {distribution}");
    let (strong, strong_count) = counts.strongest();
    let (weak, weak_count) = counts.weakest();
    let _ = writeln!(
        out,
        "- Strongest: {} ({strong_count}) | Weakest: {} ({weak_count})",
        strong.label(),
        weak.label()
    );

    let _ = writeln!(out, "\n[Special Palaces]");
    let palaces = chart.palaces.clone().unwrap_or_default();
    let _ = writeln!(
        out,
        "- Life Palace (命宫): {} | Body Palace (身宫): {} | Conception Palace (胎元): {}",
        palaces.life_palace.as_deref().unwrap_or(MISSING),
        palaces.body_palace.as_deref().unwrap_or(MISSING),
        palaces.conception_palace.as_deref().unwrap_or(MISSING),
    );

    let _ = writeln!(out, "\n[Zodiac]");
    let _ = writeln!(out, "- Animals: {}", join_or_missing(&chart.zodiac_animals));

    let _ = writeln!(out, "\n[Luck Cycles (大运)]");
    if chart.luck_cycles.is_empty() {
        match chart.current_luck_cycle.as_ref() {
            Some(cycle) => {
                let _ = writeln!(out, "- Current: {} (CURRENT)", cycle.describe());
            }
            None => {
                let _ = writeln!(out, "- {MISSING}");
            }
        }
    } else {
        for (i, cycle) in chart.luck_cycles.iter().enumerate() {
            let index = cycle.index.unwrap_or(i as u32 + 1);
            let _ = writeln!(
                out,
                "- #{index} {} | Ages {} | Years {}{}",
                cycle.gan_zhi.as_deref().unwrap_or(MISSING),
                span(cycle.start_age, cycle.end_age),
                span(cycle.start_year, cycle.end_year),
                if cycle.is_current { " (CURRENT)" } else { "" },
            );
        }
    }

    let _ = writeln!(out, "\n[Current Annual Cycle (流年)]");
    let annual = chart.annual_cycle.clone().unwrap_or_default();
    let _ = writeln!(
        out,
        "- {} {}",
        annual
            .year
            .map(|y| y.to_string())
            .unwrap_or_else(|| MISSING.to_string()),
        annual.gan_zhi.as_deref().unwrap_or(MISSING),
    );

    let _ = writeln!(out, "\n[Stars (神煞)]");
    let _ = writeln!(out, "- Auspicious: {}", join_or_missing(&chart.stars.auspicious));
    let _ = writeln!(out, "- Inauspicious: {}", join_or_missing(&chart.stars.inauspicious));
    let _ = write!(out, "- Other: {}", join_or_missing(&chart.shen_sha));

    out
}

fn join_or_missing(items: &[String]) -> String {
    if items.is_empty() {
        MISSING.to_string()
    } else {
        items.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::fixtures::sample_chart_value;
    use serde_json::json;

    #[test]
    fn test_empty_record_formats_with_placeholders() {
        let prepared = prepare_subject(&json!({}));
        assert!(!prepared.context.is_degraded());
        let text = prepared.context.text();
        assert!(text.contains("- Name: N/A"));
        assert!(text.contains("Day Master (日元): N/A"));
        assert!(text.contains("Wood (木) 0"));
        assert!(text.contains("Strongest: Wood (木) (0) | Weakest: Wood (木) (0)"));
    }

    #[test]
    fn test_sections_appear_in_fixed_order() {
        let text = format_chart(&SubjectChart::default());
        let order = [
            "[Identity]",
            "[Day Master]",
            "[Four Pillars]",
            "[Five Elements]",
            "[Special Palaces]",
            "[Zodiac]",
            "[Luck Cycles",
            "[Current Annual Cycle",
            "[Stars",
        ];
        let positions: Vec<usize> = order.iter().map(|s| text.find(s).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_full_chart_reproduces_pillar_attributes() {
        let prepared = prepare_subject(&sample_chart_value("male"));
        let text = prepared.context.text();
        assert!(text.contains("甲子"));
        assert!(text.contains("NaYin: 海中金"));
        assert!(text.contains("Ten God: 正财"));
        assert!(text.contains("Hidden Stems: 癸"));
        assert!(text.contains("Void: no"));
        assert!(text.contains("Strongest: Water (水) (3)"));
        assert!(text.contains("乙亥 | Ages 18-27 | Years 2016-2025 (CURRENT)"));
        assert!(text.contains("Auspicious: 天乙贵人"));
    }

    #[test]
    fn test_partial_pillars_do_not_fail() {
        let prepared = prepare_subject(&json!({
            "day": {"stem": "丙"},
            "luckCycles": [{"ganZhi": "戊辰"}]
        }));
        let text = prepared.context.text();
        assert!(text.contains("丙?"));
        assert!(text.contains("- #1 戊辰 | Ages N/A | Years N/A"));
        assert_eq!(prepared.chart.day_master(), "丙");
    }

    #[test]
    fn test_structural_anomaly_degrades_to_single_line_diagnostic() {
        let prepared = prepare_subject(&json!({"year": 42, "luckCycles": "oops"}));
        assert!(prepared.context.is_degraded());
        assert!(!prepared.context.text().contains('\n'));
        assert!(prepared.context.text().starts_with("[Chart data unavailable"));
        assert_eq!(prepared.chart.day_master(), MISSING);
    }

    #[test]
    fn test_non_object_payload_degrades() {
        assert!(prepare_subject(&json!("just a string")).context.is_degraded());
        assert!(prepare_subject(&json!([1, 2, 3])).context.is_degraded());
    }
}
