pub mod health;

use axum::{
    http::Uri,
    routing::{get, post},
    Router,
};

use crate::ats::handlers as analysis;
use crate::compare::handlers as resumes;
use crate::errors::AppError;
use crate::state::AppState;

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {uri}"))
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Analysis API
        .route(
            "/api/v1/analysis/keywords",
            post(analysis::handle_extract_keywords),
        )
        .route("/api/v1/analysis/score", post(analysis::handle_score))
        // Resume comparison API
        .route("/api/v1/resumes/normalize", post(resumes::handle_normalize))
        .route("/api/v1/resumes/compare", post(resumes::handle_compare))
        .route("/api/v1/resumes/merge", post(resumes::handle_merge))
        .fallback(not_found)
        .with_state(state)
}
