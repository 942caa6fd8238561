//! Approval action orchestration.
//!
//! [`apply_action`] is the single write path for event workflow state:
//! it loads the event, resolves the office-holder context, asks the pure
//! state machine for the transition, persists it with a compare-and-swap
//! on the observed status, and only then fans out the computed
//! notifications. A CAS loss maps to a conflict error so clients can
//! prompt a refresh instead of retrying blindly.

use campus_core::error::CoreError;
use campus_core::roles::Role;
use campus_core::types::DbId;
use campus_core::workflow::{transition, Actor, ApprovalAction, EventStatus};
use campus_db::models::event::Event;
use campus_db::repositories::{CommunityRepo, EventRepo, UserRepo};
use campus_notify::{is_transient, DedupWindow};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Execute one approval action against an event.
///
/// The read-compute-CAS sequence is retried once as a whole on transient
/// storage failures; every other error is surfaced to the caller
/// unchanged. Fan-out failures after the commit are logged, not
/// surfaced: the event is correctly advanced and the missing
/// notification is recoverable.
pub async fn apply_action(
    state: &AppState,
    auth: AuthUser,
    event_id: DbId,
    action: ApprovalAction<'_>,
) -> AppResult<Event> {
    let mut attempt = 0;
    let updated = loop {
        attempt += 1;
        match apply_once(state, auth, event_id, &action).await {
            Ok(event) => break event,
            Err(AppError::Database(e)) if attempt < 2 && is_transient(&e) => {
                tracing::warn!(
                    event_id,
                    error = %e,
                    "Transient failure applying approval action, retrying"
                );
            }
            Err(e) => return Err(e),
        }
    };

    tracing::info!(
        user_id = auth.user_id,
        role = %auth.role,
        event_id,
        action = action.name(),
        status = %updated.status,
        "Approval action applied"
    );

    Ok(updated)
}

/// One read-compute-CAS-fanout pass.
async fn apply_once(
    state: &AppState,
    auth: AuthUser,
    event_id: DbId,
    action: &ApprovalAction<'_>,
) -> AppResult<Event> {
    let event = EventRepo::find_by_id(&state.pool, event_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Event",
            id: event_id,
        }))?;

    let status = EventStatus::parse(&event.status).ok_or_else(|| {
        AppError::Core(CoreError::Internal(format!(
            "Event {event_id} has unrecognized status '{}'",
            event.status
        )))
    })?;

    let ctx = resolve_context(state, &event).await?;

    let actor = Actor {
        user_id: auth.user_id,
        role: auth.role,
    };
    let computed = transition(status, &actor, action, &ctx, &event.title)?;

    let updated = EventRepo::apply_transition(&state.pool, event_id, status.as_str(), &computed)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "The event's state changed while processing this action, please refresh".into(),
            ))
        })?;

    // The new state is committed; notifications follow. The dedup window
    // opens at the status_changed_at the CAS just wrote, so a retry of a
    // failed emit completes the batch instead of duplicating it.
    for effect in &computed.effects {
        if let Err(e) = state
            .notifier
            .emit(
                &updated,
                effect.kind,
                effect.audience,
                &effect.message,
                DedupWindow::SinceLastTransition,
            )
            .await
        {
            tracing::error!(
                event_id,
                kind = %effect.kind,
                error = %e,
                "Fan-out failed after committed transition"
            );
        }
    }

    Ok(updated)
}

/// Resolve the office-holders responsible for this event.
async fn resolve_context(
    state: &AppState,
    event: &Event,
) -> AppResult<campus_core::workflow::ApprovalContext> {
    let offices = CommunityRepo::offices(&state.pool, event.community_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Internal(format!(
                "Event {} references missing community {}",
                event.id, event.community_id
            )))
        })?;

    let deanship_ids =
        UserRepo::active_ids_with_role(&state.pool, Role::Deanship.as_str()).await?;

    Ok(campus_core::workflow::ApprovalContext {
        creator_id: event.created_by,
        faculty_leader_id: offices.faculty_leader_id,
        dean_of_faculty_id: offices.dean_of_faculty_id,
        deanship_ids,
    })
}
