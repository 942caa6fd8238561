//! Handlers for the event approval workflow.
//!
//! One endpoint per transition in the workflow table. Each validates its
//! payload, then delegates to [`workflow::apply_action`] and returns the
//! updated workflow fields so clients can render progress without a
//! second fetch.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use campus_core::error::CoreError;
use campus_core::types::DbId;
use campus_core::workflow::ApprovalAction;
use campus_db::models::event::WorkflowState;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::workflow;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Body for revision-request and reject actions.
#[derive(Debug, Deserialize)]
pub struct ReasonRequest {
    pub reason: String,
}

/// Body for creator responses to a revision request.
#[derive(Debug, Deserialize)]
pub struct RespondRequest {
    pub response: String,
}

/// Reject blank reason/response text before any event state is read.
fn require_text<'a>(text: &'a str, label: &str) -> AppResult<&'a str> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "{label} must not be empty"
        ))));
    }
    Ok(trimmed)
}

async fn run(
    state: &AppState,
    auth: AuthUser,
    event_id: DbId,
    action: ApprovalAction<'_>,
) -> AppResult<Json<DataResponse<WorkflowState>>> {
    let updated = workflow::apply_action(state, auth, event_id, action).await?;
    Ok(Json(DataResponse {
        data: updated.workflow_state(),
    }))
}

// ---------------------------------------------------------------------------
// Faculty stage
// ---------------------------------------------------------------------------

/// POST /api/v1/events/{event_id}/faculty/approve
pub async fn faculty_approve(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
) -> AppResult<Json<DataResponse<WorkflowState>>> {
    run(&state, auth, event_id, ApprovalAction::Approve).await
}

// ---------------------------------------------------------------------------
// Dean-of-faculty stage
// ---------------------------------------------------------------------------

/// POST /api/v1/events/{event_id}/dean/approve
pub async fn dean_approve(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
) -> AppResult<Json<DataResponse<WorkflowState>>> {
    run(&state, auth, event_id, ApprovalAction::Approve).await
}

/// POST /api/v1/events/{event_id}/dean/request-revision
pub async fn dean_request_revision(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
    Json(input): Json<ReasonRequest>,
) -> AppResult<Json<DataResponse<WorkflowState>>> {
    let reason = require_text(&input.reason, "Revision reason")?;
    run(&state, auth, event_id, ApprovalAction::RequestRevision { reason }).await
}

/// POST /api/v1/events/{event_id}/dean/reject
pub async fn dean_reject(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
    Json(input): Json<ReasonRequest>,
) -> AppResult<Json<DataResponse<WorkflowState>>> {
    let reason = require_text(&input.reason, "Rejection reason")?;
    run(&state, auth, event_id, ApprovalAction::Reject { reason }).await
}

/// POST /api/v1/events/{event_id}/dean/respond
///
/// Creator's answer to a dean revision request; returns the event to the
/// dean stage without re-running the faculty stage.
pub async fn dean_respond(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
    Json(input): Json<RespondRequest>,
) -> AppResult<Json<DataResponse<WorkflowState>>> {
    let response = require_text(&input.response, "Revision response")?;
    run(&state, auth, event_id, ApprovalAction::Respond { response }).await
}

// ---------------------------------------------------------------------------
// Deanship stage
// ---------------------------------------------------------------------------

/// POST /api/v1/events/{event_id}/deanship/approve
pub async fn deanship_approve(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
) -> AppResult<Json<DataResponse<WorkflowState>>> {
    run(&state, auth, event_id, ApprovalAction::Approve).await
}

/// POST /api/v1/events/{event_id}/deanship/request-revision
pub async fn deanship_request_revision(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
    Json(input): Json<ReasonRequest>,
) -> AppResult<Json<DataResponse<WorkflowState>>> {
    let reason = require_text(&input.reason, "Revision reason")?;
    run(&state, auth, event_id, ApprovalAction::RequestRevision { reason }).await
}

/// POST /api/v1/events/{event_id}/deanship/reject
pub async fn deanship_reject(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
    Json(input): Json<ReasonRequest>,
) -> AppResult<Json<DataResponse<WorkflowState>>> {
    let reason = require_text(&input.reason, "Rejection reason")?;
    run(&state, auth, event_id, ApprovalAction::Reject { reason }).await
}

/// POST /api/v1/events/{event_id}/deanship/respond
pub async fn deanship_respond(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
    Json(input): Json<RespondRequest>,
) -> AppResult<Json<DataResponse<WorkflowState>>> {
    let response = require_text(&input.response, "Revision response")?;
    run(&state, auth, event_id, ApprovalAction::Respond { response }).await
}
