//! Compatibility Score Interpreter: narrates precomputed pairing scores.
//!
//! Scores come from the upstream chart calculator and are an immutable fact table.
//! Numbers are kept as `serde_json::Number` so they render exactly as received.

use std::fmt::Write;

use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::chart::PreparedSubject;

/// One scored dimension of a pairing, e.g. day-master harmony.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreDimension {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(alias = "name")]
    pub label: String,
    pub score: Number,
    #[serde(alias = "maxScore")]
    pub max: Number,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatibilityScoreBreakdown {
    pub dimensions: Vec<ScoreDimension>,
    #[serde(alias = "totalScore")]
    pub total: Number,
    #[serde(default)]
    pub max_total: Option<Number>,
    pub level: String,
}

/// The number of dimensions the upstream scorer produces.
pub const EXPECTED_DIMENSIONS: usize = 6;

/// Renders the breakdown as an instruction fragment. Pure: the breakdown is only read.
pub fn narrate(
    breakdown: &CompatibilityScoreBreakdown,
    a: &PreparedSubject,
    b: &PreparedSubject,
) -> String {
    let mut out = String::with_capacity(1024);

    let _ = writeln!(
        out,
        "COMPATIBILITY SCORES for {} and {} (computed upstream, treat as fixed facts):",
        a.chart.name(),
        b.chart.name()
    );
    for (i, dim) in breakdown.dimensions.iter().enumerate() {
        let _ = write!(out, "{}. {}: {} / {}", i + 1, dim.label, dim.score, dim.max);
        if !dim.description.trim().is_empty() {
            let _ = write!(out, " | {}", dim.description.trim());
        }
        out.push('\n');
    }
    match &breakdown.max_total {
        Some(max) => {
            let _ = writeln!(out, "Total: {} / {}", breakdown.total, max);
        }
        None => {
            let _ = writeln!(out, "Total: {}", breakdown.total);
        }
    }
    let _ = writeln!(out, "Level: {}", breakdown.level);
    let _ = write!(
        out,
        "Explain what each score means for this pairing and which chart features produce it. \
         Quote every number exactly as listed. Do NOT recompute, round, rescale or question \
         any score, and do NOT invent additional dimensions."
    );

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::fixtures::{partner_subject, sample_scores_value, sample_subject};
    use serde_json::json;

    fn sample_breakdown() -> CompatibilityScoreBreakdown {
        serde_json::from_value(sample_scores_value()).unwrap()
    }

    #[test]
    fn test_every_number_is_reproduced_verbatim() {
        let breakdown = sample_breakdown();
        let text = narrate(&breakdown, &sample_subject("male"), &partner_subject("female"));
        for dim in &breakdown.dimensions {
            assert!(text.contains(&format!("{}: {} / {}", dim.label, dim.score, dim.max)));
        }
        assert!(text.contains("12.5 / 20"));
        assert!(text.contains("7.25 / 15"));
        assert!(text.contains("Total: 66.75 / 100"));
        assert!(text.contains("Level: Good Match"));
    }

    #[test]
    fn test_float_formatting_is_preserved() {
        let breakdown: CompatibilityScoreBreakdown = serde_json::from_value(json!({
            "dimensions": [{"label": "Harmony", "score": 18.0, "max": 20}],
            "total": 18.0,
            "level": "Fair"
        }))
        .unwrap();
        let text = narrate(&breakdown, &sample_subject("male"), &partner_subject("male"));
        assert!(text.contains("Harmony: 18.0 / 20"));
        assert!(text.contains("Total: 18.0\n"));
    }

    #[test]
    fn test_narrate_does_not_alter_breakdown() {
        let breakdown = sample_breakdown();
        let before = breakdown.clone();
        let _ = narrate(&breakdown, &sample_subject("male"), &partner_subject("female"));
        assert_eq!(breakdown, before);
    }

    #[test]
    fn test_instructs_explain_not_recompute() {
        let text = narrate(&sample_breakdown(), &sample_subject("male"), &partner_subject("female"));
        assert!(text.contains("Do NOT recompute"));
        assert!(text.contains("Alex Chen and Sam Lee"));
    }
}
