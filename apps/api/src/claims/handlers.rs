//! Axum route handlers for the claims portal API.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::claims::admin::{apply_admin_action, AdminActionRequest, AdminActionResult};
use crate::claims::ids::ClaimId;
use crate::claims::intake::{submit_claim, NewClaimRequest};
use crate::claims::projection::{project, project_newest_first, ClaimView};
use crate::claims::work_log::{log_application, JobSummary};
use crate::claims::ClaimError;
use crate::errors::AppError;
use crate::models::claim::{ClaimPatch, WorkLogEntry};
use crate::state::AppState;

const SUBMITTED_MESSAGE: &str =
    "Application successfully saved to the unemployment insurance database";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub success: bool,
    pub id: ClaimId,
    pub message: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkLogRequest {
    pub user_id: String,
    pub job: JobSummary,
}

#[derive(Debug, Serialize)]
pub struct WorkLogResponse {
    pub success: bool,
    pub log: WorkLogEntry,
}

fn parse_claim_id(raw: &str) -> Result<ClaimId, AppError> {
    raw.trim().parse::<ClaimId>().map_err(AppError::from)
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /status
///
/// Returns the claim named by `?id=`, or the configured default claim,
/// falling back to the most recently submitted one.
pub async fn handle_get_status(
    State(state): State<AppState>,
    Query(params): Query<StatusQuery>,
) -> Result<Json<ClaimView>, AppError> {
    if let Some(raw) = params.id.as_deref() {
        let id = parse_claim_id(raw)?;
        let record = state
            .store
            .get(&id)
            .await?
            .ok_or(ClaimError::NotFound(id))?;
        return Ok(Json(project(&record)));
    }

    if let Some(record) = state.store.get(&state.config.default_claim_id).await? {
        return Ok(Json(project(&record)));
    }

    let records = state.store.list().await?;
    project_newest_first(&records)
        .into_iter()
        .next()
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No application found".to_string()))
}

/// POST /status
pub async fn handle_submit(
    State(state): State<AppState>,
    Json(request): Json<NewClaimRequest>,
) -> Result<Json<SubmitResponse>, AppError> {
    let record = submit_claim(
        state.store.as_ref(),
        &state.config.claim_id_prefix,
        &request,
    )
    .await?;

    Ok(Json(SubmitResponse {
        success: true,
        id: record.id,
        message: SUBMITTED_MESSAGE,
    }))
}

/// GET /admin
///
/// Every claim, most recently submitted first.
pub async fn handle_list_claims(
    State(state): State<AppState>,
) -> Result<Json<Vec<ClaimView>>, AppError> {
    let records = state.store.list().await?;
    Ok(Json(project_newest_first(&records)))
}

/// PATCH /admin
pub async fn handle_admin_action(
    State(state): State<AppState>,
    Json(request): Json<AdminActionRequest>,
) -> Result<Json<AdminActionResult>, AppError> {
    let (claim, outcome) = apply_admin_action(state.store.as_ref(), &request).await?;
    Ok(Json(AdminActionResult {
        outcome: outcome.label(),
        claim,
    }))
}

/// POST /work-log
pub async fn handle_log_application(
    State(state): State<AppState>,
    Json(request): Json<WorkLogRequest>,
) -> Result<Json<WorkLogResponse>, AppError> {
    let id = parse_claim_id(&request.user_id)?;
    let log = log_application(state.store.as_ref(), &id, &request.job).await?;
    Ok(Json(WorkLogResponse { success: true, log }))
}

/// PATCH /claims/:id
///
/// Merges free-text fields over an existing claim. Never creates one.
/// An unknown id is 404 even when the patch is empty.
pub async fn handle_update_claim(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Json(patch): Json<ClaimPatch>,
) -> Result<Json<ClaimView>, AppError> {
    let id = parse_claim_id(&raw_id)?;
    if patch.is_empty() {
        if state.store.get(&id).await?.is_none() {
            return Err(ClaimError::NotFound(id).into());
        }
        return Err(AppError::Validation(
            "Provide estimatedCompletion and/or week".to_string(),
        ));
    }

    let record = state
        .store
        .update(&id, patch)
        .await?
        .ok_or(ClaimError::NotFound(id))?;
    Ok(Json(project(&record)))
}
