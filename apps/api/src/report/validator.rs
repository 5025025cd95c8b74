//! Response Validator: a second-pass consistency check over generated report text.
//!
//! Two sources of findings are merged into one verdict:
//! - deterministic contract checks run locally (literals, dividers, blank lines, neutral terms)
//! - a JSON verdict from a second generation call over a truncated excerpt
//!
//! Nothing here returns an error. Parse failures and generation failures degrade to
//! fallback verdicts so the secondary check never blocks delivery of the report.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::chart::models::{PillarPosition, MISSING};
use crate::chart::PreparedSubject;
use crate::instructions::gender::GenderPath;
use crate::instructions::terms::{
    find_dividers, find_prohibited_terms_outside_names, max_blank_run,
};
use crate::instructions::InstructionBundle;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{strip_json_fences, GenerationError, TextGenerator};
use crate::report::composer::fill;
use crate::report::prompts::{VALIDATION_PROMPT_TEMPLATE, VALIDATION_SYSTEM};

/// Characters of report text sent to the validator call.
pub const EXCERPT_CHAR_BUDGET: usize = 6000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerdictStatus {
    Pass,
    NeedsReview,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub description: String,
}

impl ValidationIssue {
    fn new(severity: Severity, description: impl Into<String>) -> Self {
        Self {
            severity,
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationVerdict {
    pub status: VerdictStatus,
    /// 0..=100
    pub confidence: u8,
    pub summary: String,
    pub issues: Vec<ValidationIssue>,
    pub recommendation: String,
}

impl ValidationVerdict {
    /// Used when the validator answered but its answer could not be read.
    pub fn unparseable() -> Self {
        Self {
            status: VerdictStatus::Pass,
            confidence: 50,
            summary: "Automated validation could not be completed: the reviewer's answer was \
                not valid JSON."
                .to_string(),
            issues: vec![ValidationIssue::new(
                Severity::Low,
                "Validator response could not be parsed",
            )],
            recommendation: "Spot-check the report before delivery.".to_string(),
        }
    }

    /// Used when the validator call itself failed.
    pub fn unavailable(reason: &str) -> Self {
        Self {
            status: VerdictStatus::Unknown,
            confidence: 0,
            summary: "Automated validation did not run.".to_string(),
            issues: vec![ValidationIssue::new(
                Severity::High,
                format!("Validation could not run: {reason}"),
            )],
            recommendation: "Review the report manually before delivery.".to_string(),
        }
    }
}

/// Validates `report_text` against the subjects it was written for.
pub async fn validate(
    generator: &dyn TextGenerator,
    report_text: &str,
    subjects: &[&PreparedSubject],
    bundle: &InstructionBundle,
) -> ValidationVerdict {
    let names: Vec<&str> = subjects
        .iter()
        .map(|s| s.chart.name())
        .filter(|n| *n != MISSING)
        .collect();
    let findings = contract_findings(report_text, bundle, &names);

    let (excerpt, truncated) = excerpt(report_text, EXCERPT_CHAR_BUDGET);
    let excerpt_note = if truncated {
        format!(" (first {EXCERPT_CHAR_BUDGET} characters)")
    } else {
        String::new()
    };
    let user = fill(
        VALIDATION_PROMPT_TEMPLATE,
        &[
            ("{facts}", key_facts(subjects)),
            ("{language}", bundle.language_name.clone()),
            ("{tone}", bundle.tone.as_str().to_string()),
            ("{excerpt_note}", excerpt_note),
            ("{excerpt}", excerpt.to_string()),
        ],
    );
    let system = format!("{VALIDATION_SYSTEM} {JSON_ONLY_SYSTEM}");

    let verdict = match generator.generate(&system, &user).await {
        Ok(raw) => parse_verdict(&raw).unwrap_or_else(|| {
            warn!("Validator returned unparseable output, using fallback verdict");
            ValidationVerdict::unparseable()
        }),
        Err(e) => {
            warn!("Validator call failed: {e}");
            ValidationVerdict::unavailable(&describe(&e))
        }
    };

    let verdict = merge(verdict, findings);
    info!(
        status = ?verdict.status,
        issues = verdict.issues.len(),
        "Report validation finished"
    );
    verdict
}

fn describe(e: &GenerationError) -> String {
    match e {
        GenerationError::UpstreamHttp { status, .. } => format!("upstream returned HTTP {status}"),
        other => other.to_string(),
    }
}

/// Deterministic checks against the writing contract. `names` are the subjects' own names,
/// which never count as gendered terms.
pub fn contract_findings(
    text: &str,
    bundle: &InstructionBundle,
    names: &[&str],
) -> Vec<ValidationIssue> {
    let mut findings = Vec::new();

    if !text.contains(bundle.opening.as_str()) {
        findings.push(ValidationIssue::new(
            Severity::Medium,
            format!("Opening line is missing: \"{}\"", bundle.opening),
        ));
    }
    if !text.contains(bundle.closing.as_str()) {
        findings.push(ValidationIssue::new(
            Severity::Medium,
            format!("Closing line is missing: \"{}\"", bundle.closing),
        ));
    }

    let dividers = find_dividers(text);
    if !dividers.is_empty() {
        findings.push(ValidationIssue::new(
            Severity::Medium,
            format!("Forbidden divider lines present: {}", dividers.join(" ")),
        ));
    }

    let blank_run = max_blank_run(text);
    if blank_run > 2 {
        findings.push(ValidationIssue::new(
            Severity::Low,
            format!("{blank_run} consecutive blank lines (at most 2 allowed)"),
        ));
    }

    if bundle.gender_path == GenderPath::DualInterpretation {
        let found = find_prohibited_terms_outside_names(text, &bundle.prohibited_terms, names);
        if !found.is_empty() {
            findings.push(ValidationIssue::new(
                Severity::High,
                format!("Gendered terms used on the neutral path: {}", found.join(", ")),
            ));
        }
    }

    findings
}

/// A high-severity local finding means the report cannot pass as-is.
fn merge(mut verdict: ValidationVerdict, findings: Vec<ValidationIssue>) -> ValidationVerdict {
    let has_high = findings.iter().any(|f| f.severity == Severity::High);
    if has_high && verdict.status == VerdictStatus::Pass {
        verdict.status = VerdictStatus::NeedsReview;
    }
    verdict.issues.extend(findings);
    verdict
}

/// Tolerant parse of the validator's answer. `None` when no JSON object can be read.
pub fn parse_verdict(raw: &str) -> Option<ValidationVerdict> {
    let cleaned = strip_json_fences(raw);
    let parsed = serde_json::from_str::<RawVerdict>(cleaned).ok().or_else(|| {
        let start = cleaned.find('{')?;
        let end = cleaned.rfind('}')?;
        if end <= start {
            return None;
        }
        serde_json::from_str::<RawVerdict>(&cleaned[start..=end]).ok()
    })?;
    Some(parsed.into_verdict())
}

#[derive(Debug, Deserialize)]
struct RawVerdict {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    confidence: Option<Value>,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    issues: Vec<RawIssue>,
    #[serde(default)]
    recommendation: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawIssue {
    #[serde(default)]
    severity: Option<String>,
    #[serde(default, alias = "issue", alias = "message", alias = "detail")]
    description: Option<String>,
}

impl RawVerdict {
    /// Without a readable status the answer counts as unparseable; any issues it listed
    /// are kept alongside the fallback note.
    fn into_verdict(self) -> ValidationVerdict {
        let issues: Vec<ValidationIssue> = self
            .issues
            .into_iter()
            .filter_map(|i| {
                let description = i.description?.trim().to_string();
                if description.is_empty() {
                    return None;
                }
                Some(ValidationIssue {
                    severity: i.severity.as_deref().map(parse_severity).unwrap_or(Severity::Medium),
                    description,
                })
            })
            .collect();

        let Some(status) = self.status.as_deref().and_then(parse_status) else {
            let mut fallback = ValidationVerdict::unparseable();
            fallback.issues.extend(issues);
            return fallback;
        };
        ValidationVerdict {
            status,
            confidence: self.confidence.as_ref().map(parse_confidence).unwrap_or(50),
            summary: self.summary.unwrap_or_default(),
            issues,
            recommendation: self.recommendation.unwrap_or_default(),
        }
    }
}

/// UNKNOWN is reserved for a validator call that never completed, so it is not accepted here.
fn parse_status(raw: &str) -> Option<VerdictStatus> {
    match raw.trim().to_uppercase().replace([' ', '-'], "_").as_str() {
        "PASS" | "PASSED" | "OK" => Some(VerdictStatus::Pass),
        "NEEDS_REVIEW" | "REVIEW" | "FAIL" | "FAILED" => Some(VerdictStatus::NeedsReview),
        _ => None,
    }
}

fn parse_severity(raw: &str) -> Severity {
    match raw.trim().to_lowercase().as_str() {
        "high" | "critical" | "major" => Severity::High,
        "low" | "minor" => Severity::Low,
        _ => Severity::Medium,
    }
}

fn parse_confidence(raw: &Value) -> u8 {
    let value = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    };
    value
        .filter(|v| v.is_finite())
        .map(|v| v.clamp(0.0, 100.0).round() as u8)
        .unwrap_or(50)
}

/// The first `budget` characters of `text`, and whether anything was cut.
pub fn excerpt(text: &str, budget: usize) -> (&str, bool) {
    match text.char_indices().nth(budget) {
        Some((byte_index, _)) => (&text[..byte_index], true),
        None => (text, false),
    }
}

fn key_facts(subjects: &[&PreparedSubject]) -> String {
    subjects
        .iter()
        .map(|s| {
            let chart = &s.chart;
            let pillars = PillarPosition::ALL
                .into_iter()
                .map(|p| chart.pillar(p).map(|x| x.gan_zhi()).unwrap_or_else(|| "N/A".into()))
                .collect::<Vec<_>>()
                .join(" ");
            format!(
                "- {}: Day Master {}; pillars (year month day hour) {}; current luck cycle {}; \
                 gender identity {}",
                chart.name(),
                chart.day_master(),
                pillars,
                chart.current_cycle_label(),
                chart.identity.gender
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
