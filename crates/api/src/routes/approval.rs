//! Route definitions for the event approval workflow.
//!
//! One POST route per transition in the workflow table, merged into the
//! `/events` route group.

use axum::routing::post;
use axum::Router;

use crate::handlers::approval;
use crate::state::AppState;

/// Event-scoped approval routes, merged into `/events`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{event_id}/faculty/approve",
            post(approval::faculty_approve),
        )
        .route("/{event_id}/dean/approve", post(approval::dean_approve))
        .route(
            "/{event_id}/dean/request-revision",
            post(approval::dean_request_revision),
        )
        .route("/{event_id}/dean/reject", post(approval::dean_reject))
        .route("/{event_id}/dean/respond", post(approval::dean_respond))
        .route(
            "/{event_id}/deanship/approve",
            post(approval::deanship_approve),
        )
        .route(
            "/{event_id}/deanship/request-revision",
            post(approval::deanship_request_revision),
        )
        .route(
            "/{event_id}/deanship/reject",
            post(approval::deanship_reject),
        )
        .route(
            "/{event_id}/deanship/respond",
            post(approval::deanship_respond),
        )
}
