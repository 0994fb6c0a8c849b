//! Axum route handlers for the Resume comparison API.

use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::compare::diff::{diff, ChangeSet};
use crate::compare::merge::{merge, MergeOptions};
use crate::compare::summary::{summarize, ChangeSummary};
use crate::errors::AppError;
use crate::models::identity::{KeySource, SequentialKeys, UuidKeys};
use crate::models::resume::assign_missing_ids;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CompareRequest {
    pub base: Value,
    pub incoming: Value,
}

#[derive(Debug, Serialize)]
pub struct CompareResponse {
    pub changes: ChangeSet,
    pub summary: ChangeSummary,
}

#[derive(Debug, Deserialize)]
pub struct MergeRequest {
    pub base: Value,
    pub incoming: Value,
    #[serde(default)]
    pub options: MergeOptions,
}

#[derive(Debug, Serialize)]
pub struct MergeResponse {
    pub merged: Value,
}

#[derive(Debug, Deserialize)]
pub struct NormalizeRequest {
    pub resume: Value,
    /// When set, new ids are `<prefix>-<n>` instead of random UUIDs.
    #[serde(default)]
    pub id_prefix: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct NormalizeResponse {
    pub resume: Value,
    pub assigned_ids: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resumes/compare
pub async fn handle_compare(
    Json(request): Json<CompareRequest>,
) -> Result<Json<CompareResponse>, AppError> {
    require_object("base", &request.base)?;
    require_object("incoming", &request.incoming)?;

    let changes = diff(&request.base, &request.incoming);
    let summary = summarize(&changes);
    info!("Compared resume versions: {} changes", summary.total_changes);

    Ok(Json(CompareResponse { changes, summary }))
}

/// POST /api/v1/resumes/merge
pub async fn handle_merge(
    Json(request): Json<MergeRequest>,
) -> Result<Json<MergeResponse>, AppError> {
    require_object("base", &request.base)?;
    require_object("incoming", &request.incoming)?;

    let merged = merge(&request.base, &request.incoming, &request.options);
    info!(
        "Merged resume versions (prefer_new={}, arrays={:?})",
        request.options.prefer_new, request.options.merge_arrays
    );

    Ok(Json(MergeResponse { merged }))
}

/// POST /api/v1/resumes/normalize
///
/// Gives every id-less list entry a fresh id, so later compares and merges
/// can match entries by identity. Everything else in the resume is returned
/// untouched.
pub async fn handle_normalize(
    Json(request): Json<NormalizeRequest>,
) -> Result<Json<NormalizeResponse>, AppError> {
    require_object("resume", &request.resume)?;

    let mut keys: Box<dyn KeySource> = match request.id_prefix {
        Some(prefix) if !prefix.trim().is_empty() => Box::new(SequentialKeys::new(prefix.trim())),
        _ => Box::new(UuidKeys),
    };
    let mut resume = request.resume;
    let assigned_ids = assign_missing_ids(&mut resume, keys.as_mut());
    info!("Normalized resume: {assigned_ids} ids assigned");

    Ok(Json(NormalizeResponse {
        resume,
        assigned_ids,
    }))
}

fn require_object(field: &str, value: &Value) -> Result<(), AppError> {
    if value.is_object() {
        Ok(())
    } else {
        warn!("Rejected non-object {field} payload");
        Err(AppError::UnprocessableEntity(format!(
            "{field} must be a JSON object"
        )))
    }
}
