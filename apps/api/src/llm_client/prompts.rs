// Shared prompt fragments used by more than one report stage.
// Stage-specific prompt text lives in report/prompts.rs.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Appended to every prompt that embeds chart data, so the model stays anchored to it.
pub const DATA_ANCHOR_INSTRUCTION: &str = "\
    CRITICAL: Every judgement must be derived from the chart data supplied below. \
    Quote the concrete stems, branches, stars and cycles you rely on. \
    If the data does not support a claim, leave the claim out.";
