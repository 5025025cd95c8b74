//! Prompt Composer: builds the (system, user) prompt pair for one chapter.
//!
//! The system prompt is assembled from fixed layers in a stable order:
//! persona, formatting contract, tone, neutral mandate (dual path only), relational
//! rules, language and addressing, structural mandate. The user prompt comes from
//! one of ten chapter templates and quotes concrete chart values.

use thiserror::Error;

use crate::chart::calendar::{
    branch_relations, describe_relations, ten_god_of, YearPillar, VAULT_BRANCHES,
};
use crate::chart::models::{PillarPosition, SubjectChart, MISSING};
use crate::chart::PreparedSubject;
use crate::instructions::gender::GenderPath;
use crate::instructions::InstructionBundle;
use crate::llm_client::prompts::DATA_ANCHOR_INSTRUCTION;
use crate::report::chapter::{Chapter, ChapterLookup};
use crate::report::compatibility::{narrate, CompatibilityScoreBreakdown};
use crate::report::prompts::{
    CORE_TEMPLATE, FORECAST_TEMPLATE, FORMAT_CONTRACT, LOVE_TEMPLATE, NEUTRAL_MANDATE,
    PAIR_COMMUNICATION_TEMPLATE, PAIR_COMPATIBILITY_TEMPLATE, PAIR_FORECAST_TEMPLATE,
    PAIR_LOVE_MARRIAGE_TEMPLATE, PAIR_NEUTRAL_REMINDER, PAIR_OVERVIEW_TEMPLATE,
    PAIR_WEALTH_CAREER_TEMPLATE, PERSONA, STRUCTURAL_MANDATE_TEMPLATE, WEALTH_TEMPLATE,
};

const WEALTH_STAR_LABELS: &[&str] = &["正财", "偏财", "正財", "偏財", "Direct Wealth", "Indirect Wealth"];
const OFFICER_STAR_LABELS: &[&str] = &["正官", "七杀", "七殺", "偏官", "Direct Officer", "Seven Killings"];
const OUTPUT_STAR_LABELS: &[&str] = &["食神", "伤官", "傷官", "Eating God", "Hurting Officer"];
/// Looked up in the chart's star lists; each entry lists the accepted spellings.
const ROMANCE_STARS: &[(&str, &[&str])] = &[
    ("桃花", &["桃花", "Peach Blossom"]),
    ("红艳", &["红艳", "紅艷", "紅豔", "Red Romance"]),
    ("孤辰", &["孤辰", "Solitary"]),
    ("寡宿", &["寡宿", "Lonesome"]),
];

/// Input errors. All of them are detected before any generation call is made.
#[derive(Debug, Error, PartialEq)]
pub enum ComposeError {
    #[error("unknown chapter '{0}'")]
    UnknownChapter(String),

    #[error("chapter '{chapter}' needs {expected} subject(s)")]
    SubjectMismatch { chapter: String, expected: usize },

    #[error("chapter '{0}' needs a compatibility score breakdown")]
    MissingScores(String),
}

/// The chart(s) a chapter is written about.
#[derive(Debug, Clone, Copy)]
pub enum Subjects<'a> {
    Single(&'a PreparedSubject),
    Pair(&'a PreparedSubject, &'a PreparedSubject),
}

impl Subjects<'_> {
    pub fn is_pair(&self) -> bool {
        matches!(self, Subjects::Pair(..))
    }
}

/// Everything a chapter template can draw on besides the instruction bundle.
#[derive(Debug, Clone, Copy)]
pub struct ChapterInput<'a> {
    pub subjects: Subjects<'a>,
    pub scores: Option<&'a CompatibilityScoreBreakdown>,
    pub forecast_year: YearPillar,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PromptPair {
    pub chapter: Chapter,
    pub system: String,
    pub user: String,
}

/// Resolves the chapter and composes both prompts. Pure.
pub fn compose(
    chapter_id: &str,
    bundle: &InstructionBundle,
    input: &ChapterInput<'_>,
) -> Result<PromptPair, ComposeError> {
    let chapter = Chapter::resolve(chapter_id, input.subjects.is_pair()).map_err(|e| match e {
        ChapterLookup::Unknown => ComposeError::UnknownChapter(chapter_id.to_string()),
        ChapterLookup::WrongArity { expects_pair } => ComposeError::SubjectMismatch {
            chapter: chapter_id.trim().to_string(),
            expected: if expects_pair { 2 } else { 1 },
        },
    })?;

    let user = match input.subjects {
        Subjects::Single(subject) => single_user_prompt(chapter, subject, bundle, input),
        Subjects::Pair(a, b) => pair_user_prompt(chapter, a, b, bundle, input)?,
    };

    Ok(PromptPair {
        chapter,
        system: system_prompt(chapter, bundle),
        user,
    })
}

fn system_prompt(chapter: Chapter, bundle: &InstructionBundle) -> String {
    let mut layers: Vec<String> = vec![
        PERSONA.to_string(),
        FORMAT_CONTRACT.to_string(),
        format!("{}\n\n{}", bundle.ethics_block, bundle.style_rule),
    ];
    if bundle.gender_path == GenderPath::DualInterpretation {
        layers.push(NEUTRAL_MANDATE.to_string());
        if bundle.pair_neutral_reminder {
            layers.push(PAIR_NEUTRAL_REMINDER.to_string());
        }
    }
    layers.push(bundle.gender_rule.clone());
    layers.push(format!(
        "LANGUAGE AND ADDRESSING:\n{}\n{}",
        bundle.language_rule, bundle.addressing_rule
    ));
    layers.push(fill(
        STRUCTURAL_MANDATE_TEMPLATE,
        &[
            ("{opening}", bundle.opening.clone()),
            ("{closing}", bundle.closing.clone()),
            ("{min_length}", chapter.min_length().to_string()),
            ("{unit}", bundle.length_unit.label().to_string()),
            ("{language}", bundle.language_name.clone()),
        ],
    ));
    layers.join("\n\n")
}

fn single_user_prompt(
    chapter: Chapter,
    subject: &PreparedSubject,
    bundle: &InstructionBundle,
    input: &ChapterInput<'_>,
) -> String {
    let chart = &subject.chart;
    let counts = chart.five_elements.clone().unwrap_or_default();
    let mut values = vec![
        ("{title}", chapter.title().to_string()),
        ("{name}", display_name(chart, bundle)),
        ("{anchor}", DATA_ANCHOR_INSTRUCTION.to_string()),
        ("{day_master}", chart.day_master().to_string()),
        (
            "{day_master_status}",
            chart.day_master_status.as_deref().unwrap_or(MISSING).to_string(),
        ),
        ("{month_branch}", chart.branch(PillarPosition::Month).to_string()),
        ("{day_branch}", chart.branch(PillarPosition::Day).to_string()),
        ("{hour_branch}", chart.branch(PillarPosition::Hour).to_string()),
        (
            "{day_month_relation}",
            describe_relations(
                chart.branch(PillarPosition::Day),
                chart.branch(PillarPosition::Month),
            ),
        ),
        (
            "{day_hour_relation}",
            describe_relations(
                chart.branch(PillarPosition::Day),
                chart.branch(PillarPosition::Hour),
            ),
        ),
        ("{month_ten_god}", chart.ten_god(PillarPosition::Month).to_string()),
        ("{hidden_stems}", hidden_stems_line(chart)),
        ("{year_nayin}", chart.nayin(PillarPosition::Year).to_string()),
        ("{month_nayin}", chart.nayin(PillarPosition::Month).to_string()),
        ("{strongest}", counts.strongest().0.label().to_string()),
        ("{weakest}", counts.weakest().0.label().to_string()),
        ("{wealth_stars}", star_positions(chart, WEALTH_STAR_LABELS)),
        ("{output_stars}", star_positions(chart, OUTPUT_STAR_LABELS)),
        ("{officer_stars}", star_positions(chart, OFFICER_STAR_LABELS)),
        ("{vaults}", vault_positions(chart)),
        ("{romance_stars}", romance_stars(chart)),
        ("{current_cycle}", chart.current_cycle_label()),
        ("{relational_hint}", relational_hint(&[subject], bundle)),
        ("{year_ten_god}", year_ten_god(chart, &input.forecast_year)),
        ("{natal_hits}", natal_hits(chart, &input.forecast_year)),
        ("{context}", subject.context.text().to_string()),
    ];
    values.extend(forecast_values(&input.forecast_year));

    let template = match chapter {
        Chapter::Core => CORE_TEMPLATE,
        Chapter::Wealth => WEALTH_TEMPLATE,
        Chapter::Love => LOVE_TEMPLATE,
        _ => FORECAST_TEMPLATE,
    };
    fill(template, &values)
}

fn pair_user_prompt(
    chapter: Chapter,
    a: &PreparedSubject,
    b: &PreparedSubject,
    bundle: &InstructionBundle,
    input: &ChapterInput<'_>,
) -> Result<String, ComposeError> {
    let scores = match (chapter, input.scores) {
        (Chapter::PairCompatibility, None) => {
            return Err(ComposeError::MissingScores(chapter.id().to_string()))
        }
        (_, Some(breakdown)) => narrate(breakdown, a, b),
        (_, None) => String::new(),
    };

    let mut values: Vec<(String, String)> = vec![
        ("{title}".into(), chapter.title().to_string()),
        ("{anchor}".into(), DATA_ANCHOR_INSTRUCTION.to_string()),
        ("{scores}".into(), scores),
        ("{relational_hint}".into(), relational_hint(&[a, b], bundle)),
        (
            "{day_branch_relation}".into(),
            describe_relations(
                a.chart.branch(PillarPosition::Day),
                b.chart.branch(PillarPosition::Day),
            ),
        ),
    ];
    for (subject, suffix) in [(a, "a"), (b, "b")] {
        let chart = &subject.chart;
        let counts = chart.five_elements.clone().unwrap_or_default();
        let zodiac = if chart.zodiac_animals.is_empty() {
            MISSING.to_string()
        } else {
            chart.zodiac_animals.join(", ")
        };
        for (key, value) in [
            ("name", display_name(chart, bundle)),
            ("day_master", chart.day_master().to_string()),
            ("day_branch", chart.branch(PillarPosition::Day).to_string()),
            ("month_ten_god", chart.ten_god(PillarPosition::Month).to_string()),
            ("strongest", counts.strongest().0.label().to_string()),
            ("wealth_stars", star_positions(chart, WEALTH_STAR_LABELS)),
            ("current_cycle", chart.current_cycle_label()),
            ("zodiac", zodiac),
            ("year_ten_god", year_ten_god(chart, &input.forecast_year)),
            ("natal_hits", natal_hits(chart, &input.forecast_year)),
        ] {
            values.push((format!("{{{key}_{suffix}}}"), value));
        }
    }
    values.extend(
        forecast_values(&input.forecast_year)
            .into_iter()
            .map(|(k, v)| (k.to_string(), v)),
    );
    values.push((
        "{context}".into(),
        format!(
            "PERSON A ({}) CHART DATA:\n{}\n\nPERSON B ({}) CHART DATA:\n{}",
            display_name(&a.chart, bundle),
            a.context.text(),
            display_name(&b.chart, bundle),
            b.context.text()
        ),
    ));

    let template = match chapter {
        Chapter::PairOverview => PAIR_OVERVIEW_TEMPLATE,
        Chapter::PairCompatibility => PAIR_COMPATIBILITY_TEMPLATE,
        Chapter::PairCommunication => PAIR_COMMUNICATION_TEMPLATE,
        Chapter::PairWealthCareer => PAIR_WEALTH_CAREER_TEMPLATE,
        Chapter::PairLoveMarriage => PAIR_LOVE_MARRIAGE_TEMPLATE,
        _ => PAIR_FORECAST_TEMPLATE,
    };
    Ok(fill(template, &values))
}

fn forecast_values(year: &YearPillar) -> Vec<(&'static str, String)> {
    let branch = year.branch();
    let self_punishment = if year.is_self_punishing() {
        format!("{branch} punishes itself; a natal {branch} forms {branch}{branch} self-punishment (自刑)")
    } else {
        format!("{branch} does not punish itself")
    };
    let [first, second] = year.triad_partners();
    vec![
        ("{forecast_year}", year.year.to_string()),
        ("{year_gan_zhi}", year.gan_zhi()),
        ("{year_stem}", year.stem().to_string()),
        ("{clash_branch}", year.clash_branch().to_string()),
        ("{harmony_branch}", year.harmony_branch().to_string()),
        ("{harm_branch}", year.harm_branch().to_string()),
        ("{self_punishment}", self_punishment),
        (
            "{triad}",
            format!("{branch} with {first} and {second} forms the {} frame", year.triad_element()),
        ),
    ]
}

/// Substitutes `{key}` placeholders in one pass. Substituted values are never rescanned,
/// so chart text containing braces is copied as-is.
pub fn fill<K: AsRef<str>>(template: &str, values: &[(K, String)]) -> String {
    let mut out = String::with_capacity(template.len() * 2);
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        let matched = tail.find('}').and_then(|close| {
            let key = &tail[..=close];
            values
                .iter()
                .find(|(k, _)| k.as_ref() == key)
                .map(|(_, value)| (close, value))
        });
        match matched {
            Some((close, value)) => {
                out.push_str(value);
                rest = &tail[close + 1..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn display_name(chart: &SubjectChart, bundle: &InstructionBundle) -> String {
    let name = chart.name();
    if name == MISSING {
        bundle.generic_name().to_string()
    } else {
        name.to_string()
    }
}

/// Pillars whose ten god is one of `labels`, e.g. `正财 (Year)`.
fn star_positions(chart: &SubjectChart, labels: &[&str]) -> String {
    let found: Vec<String> = PillarPosition::ALL
        .into_iter()
        .filter_map(|p| {
            let god = chart.pillar(p)?.ten_god.as_deref()?;
            labels
                .contains(&god)
                .then(|| format!("{god} ({})", p.short_label()))
        })
        .collect();
    or_none(found)
}

fn vault_positions(chart: &SubjectChart) -> String {
    let found: Vec<String> = PillarPosition::ALL
        .into_iter()
        .filter_map(|p| {
            let branch = chart.branch(p);
            VAULT_BRANCHES
                .contains(&branch)
                .then(|| format!("{branch} ({})", p.short_label()))
        })
        .collect();
    or_none(found)
}

fn or_none(found: Vec<String>) -> String {
    if found.is_empty() {
        "none on the visible pillars".to_string()
    } else {
        found.join(", ")
    }
}

/// e.g. `Year 癸 | Month 甲, 丙, 戊 | Day 丁, 己 | Hour N/A`
fn hidden_stems_line(chart: &SubjectChart) -> String {
    PillarPosition::ALL
        .into_iter()
        .map(|p| format!("{} {}", p.short_label(), chart.hidden_stems(p)))
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Presence of each relationship star, e.g. `桃花 present; 红艳 absent; ...`
fn romance_stars(chart: &SubjectChart) -> String {
    ROMANCE_STARS
        .iter()
        .map(|(label, spellings)| {
            let present = chart
                .star_names()
                .any(|star| spellings.iter().any(|s| star.contains(s)));
            format!("{label} {}", if present { "present" } else { "absent" })
        })
        .collect::<Vec<_>>()
        .join("; ")
}

fn year_ten_god(chart: &SubjectChart, year: &YearPillar) -> String {
    ten_god_of(chart.day_master(), year.stem())
        .unwrap_or(MISSING)
        .to_string()
}

/// Natal branches the year branch clashes, combines, harms or punishes.
fn natal_hits(chart: &SubjectChart, year: &YearPillar) -> String {
    let hits: Vec<String> = PillarPosition::ALL
        .into_iter()
        .filter_map(|p| {
            let branch = chart.branch(p);
            let relations = branch_relations(year.branch(), branch);
            if relations.is_empty() {
                return None;
            }
            let labels = relations.iter().map(|r| r.label()).collect::<Vec<_>>().join(", ");
            Some(format!("{} {branch}: {labels}", p.short_label()))
        })
        .collect();
    if hits.is_empty() {
        "none".to_string()
    } else {
        hits.join("; ")
    }
}

/// Deterministic Wealth-Star and Officer-Star counts over the four pillars.
pub fn relational_star_counts(chart: &SubjectChart) -> (usize, usize) {
    chart.ten_gods().fold((0, 0), |(wealth, officer), god| {
        (
            wealth + usize::from(WEALTH_STAR_LABELS.contains(&god)),
            officer + usize::from(OFFICER_STAR_LABELS.contains(&god)),
        )
    })
}

/// Counts quoted as data for the dual-interpretation passes. Empty on the binary path.
fn relational_hint(subjects: &[&PreparedSubject], bundle: &InstructionBundle) -> String {
    if bundle.gender_path != GenderPath::DualInterpretation {
        return String::new();
    }
    subjects
        .iter()
        .map(|s| {
            let (wealth, officer) = relational_star_counts(&s.chart);
            format!(
                "- Relational star counts for {}: Wealth Stars {wealth}, Officer Stars {officer} \
                 (use these when deciding which lens the chart supports more strongly)\n",
                display_name(&s.chart, bundle)
            )
        })
        .collect()
}
