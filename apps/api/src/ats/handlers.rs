//! Axum route handlers for the Analysis API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::ats::scoring::Analysis;
use crate::errors::AppError;
use crate::models::resume::{JobApplication, ResumeRecord};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct KeywordsRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct KeywordsResponse {
    pub keywords: Vec<String>,
    pub technical_skills: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    /// Resume JSON as kept by the client; read leniently.
    pub resume: Value,
    /// Target job. Falls back to the resume's own `jobApplication`.
    #[serde(default)]
    pub job: Option<JobApplication>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analysis/keywords
pub async fn handle_extract_keywords(
    State(state): State<AppState>,
    Json(request): Json<KeywordsRequest>,
) -> Result<Json<KeywordsResponse>, AppError> {
    check_text_size(&request.text, "text", state.config.max_text_chars)?;

    let keywords = state.keywords.extract_keywords(&request.text);
    let technical_skills = state
        .keywords
        .extract_technical_skills(&request.text)
        .into_iter()
        .collect();

    Ok(Json(KeywordsResponse {
        keywords,
        technical_skills,
    }))
}

/// POST /api/v1/analysis/score
///
/// Scores the resume against the job description. Always yields an
/// analysis; an absent description just zeroes the matching sections.
pub async fn handle_score(
    State(state): State<AppState>,
    Json(request): Json<ScoreRequest>,
) -> Result<Json<Analysis>, AppError> {
    let resume = ResumeRecord::from_value(&request.resume);
    let job = request
        .job
        .unwrap_or_else(|| resume.job_application.clone());
    check_text_size(&job.job_description, "job_description", state.config.max_text_chars)?;

    let analysis = state.scorer.analyze(&resume, &job);
    info!(
        "Scored resume against '{}': {}/100",
        job.job_title, analysis.overall_score
    );

    Ok(Json(analysis))
}

fn check_text_size(text: &str, field: &str, max_chars: usize) -> Result<(), AppError> {
    let len = text.chars().count();
    if len > max_chars {
        warn!("Rejected {field} of {len} characters (limit {max_chars})");
        return Err(AppError::Validation(format!(
            "{field} exceeds the {max_chars} character limit"
        )));
    }
    Ok(())
}
