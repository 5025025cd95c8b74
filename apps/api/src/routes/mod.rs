pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::errors::AppError;
use crate::report::handlers;
use crate::state::AppState;

async fn not_found() -> AppError {
    AppError::NotFound("no such route".to_string())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/reports/section",
            post(handlers::handle_generate_section),
        )
        .route("/api/v1/reports/finalize", post(handlers::handle_finalize))
        .fallback(not_found)
        .with_state(state)
}
