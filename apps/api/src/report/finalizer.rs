//! Report Finalizer: best-effort aggregation of validation and the customer message.
//!
//! The two steps are independent: each one falls back to a deterministic value on
//! failure, so one failing step never hides the other's result.

use serde::Serialize;
use tracing::warn;

use crate::chart::PreparedSubject;
use crate::instructions::gender::GenderPath;
use crate::instructions::terms::find_dividers;
use crate::instructions::InstructionBundle;
use crate::llm_client::TextGenerator;
use crate::report::composer::fill;
use crate::report::prompts::{NEUTRAL_MANDATE, SUMMARY_PROMPT_TEMPLATE, SUMMARY_SYSTEM};
use crate::report::validator::{excerpt, validate, ValidationVerdict, EXCERPT_CHAR_BUDGET};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizedReport {
    pub validation: ValidationVerdict,
    pub customer_message: String,
}

/// Runs validation, then the customer summary. Never fails.
pub async fn finalize(
    generator: &dyn TextGenerator,
    report_text: &str,
    subjects: &[&PreparedSubject],
    bundle: &InstructionBundle,
) -> FinalizedReport {
    let validation = validate(generator, report_text, subjects, bundle).await;
    let customer_message = customer_message(generator, report_text, subjects, bundle).await;

    FinalizedReport {
        validation,
        customer_message,
    }
}

async fn customer_message(
    generator: &dyn TextGenerator,
    report_text: &str,
    subjects: &[&PreparedSubject],
    bundle: &InstructionBundle,
) -> String {
    let names = reader_names(subjects, bundle);
    let (excerpt, _) = excerpt(report_text, EXCERPT_CHAR_BUDGET);

    let mut system = SUMMARY_SYSTEM.to_string();
    if bundle.gender_path == GenderPath::DualInterpretation {
        system.push_str("\n\n");
        system.push_str(NEUTRAL_MANDATE);
    }
    let user = fill(
        SUMMARY_PROMPT_TEMPLATE,
        &[
            ("{language}", bundle.language_name.clone()),
            ("{names}", names),
            ("{addressing_rule}", bundle.addressing_rule.clone()),
            ("{excerpt}", excerpt.to_string()),
        ],
    );

    match generator.generate(&system, &user).await {
        Ok(text) => {
            let text = text.trim();
            if text.is_empty() || !find_dividers(text).is_empty() {
                warn!("Customer message broke the plain-text contract, using fallback");
                fallback_message(subjects, bundle)
            } else {
                text.to_string()
            }
        }
        Err(e) => {
            warn!("Customer message generation failed, using fallback: {e}");
            fallback_message(subjects, bundle)
        }
    }
}

fn reader_names(subjects: &[&PreparedSubject], bundle: &InstructionBundle) -> String {
    let names: Vec<&str> = subjects
        .iter()
        .map(|s| s.chart.name())
        .filter(|n| *n != crate::chart::models::MISSING)
        .collect();
    if names.is_empty() {
        bundle.generic_name().to_string()
    } else {
        names.join(" & ")
    }
}

fn fallback_message(subjects: &[&PreparedSubject], bundle: &InstructionBundle) -> String {
    let names = reader_names(subjects, bundle);
    bundle.fallback_message(Some(&names))
}
