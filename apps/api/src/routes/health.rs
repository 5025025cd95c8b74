use axum::Json;
use serde_json::{json, Value};

use crate::instructions::language::LanguageCode;
use crate::instructions::tone::Tone;
use crate::report::chapter::Chapter;

/// GET /health
/// Service version plus the closed request vocabulary (chapters, languages, tones).
pub async fn health_handler() -> Json<Value> {
    let ids = |chapters: &[Chapter]| chapters.iter().map(|c| c.id()).collect::<Vec<_>>();
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "mingli-api",
        "chapters": {
            "single": ids(&Chapter::SINGLE[..]),
            "pair": ids(&Chapter::PAIR[..]),
        },
        "languages": LanguageCode::ALL.iter().map(|c| c.code()).collect::<Vec<_>>(),
        "tones": Tone::ALL.iter().map(|t| t.as_str()).collect::<Vec<_>>(),
    }))
}
