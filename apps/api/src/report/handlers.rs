//! Axum route handlers for the Report API.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info_span, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::instructions::ReportOptions;
use crate::report::finalizer::finalize;
use crate::report::generator::{generate_section, prepare_subjects, resolve_bundle, SectionRequest};
use crate::report::validator::ValidationVerdict;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionResponse {
    pub request_id: Uuid,
    pub chapter: String,
    pub content: String,
    pub context_degraded: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FinalizeRequest {
    #[serde(alias = "fullReportText", alias = "report")]
    pub report_text: Option<String>,
    #[serde(alias = "bazi_data")]
    pub subject: Option<Value>,
    pub subjects: Option<Vec<Value>>,
    pub options: ReportOptions,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizeResponse {
    pub request_id: Uuid,
    pub validation: ValidationVerdict,
    pub customer_message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/reports/section
///
/// Generates one chapter. Input errors are rejected before the generation call;
/// generation failures come back as typed upstream errors.
pub async fn handle_generate_section(
    State(state): State<AppState>,
    payload: Result<Json<SectionRequest>, JsonRejection>,
) -> Result<Json<SectionResponse>, AppError> {
    let Json(request) = payload?;
    let request_id = Uuid::new_v4();

    let output = generate_section(state.generator.as_ref(), &state.resolver, request)
        .instrument(info_span!("generate_section", %request_id))
        .await?;

    Ok(Json(SectionResponse {
        request_id,
        chapter: output.chapter.id().to_string(),
        content: output.content,
        context_degraded: output.context_degraded,
    }))
}

/// POST /api/v1/reports/finalize
///
/// Validates an assembled report and writes the customer message. Always 200 once
/// the input is valid: both steps fall back independently.
pub async fn handle_finalize(
    State(state): State<AppState>,
    payload: Result<Json<FinalizeRequest>, JsonRejection>,
) -> Result<Json<FinalizeResponse>, AppError> {
    let Json(request) = payload?;
    let request_id = Uuid::new_v4();

    let report_text = request
        .report_text
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::Validation("reportText cannot be empty".to_string()))?;
    let prepared = prepare_subjects(request.subject, request.subjects)?;
    let bundle = resolve_bundle(&state.resolver, &request.options, &prepared)?;
    let subjects: Vec<_> = prepared.iter().collect();

    let finalized = finalize(state.generator.as_ref(), &report_text, &subjects, &bundle)
        .instrument(info_span!("finalize", %request_id))
        .await;

    Ok(Json(FinalizeResponse {
        request_id,
        validation: finalized.validation,
        customer_message: finalized.customer_message,
    }))
}
