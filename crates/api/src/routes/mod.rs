pub mod approval;
pub mod health;
pub mod notification;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /events/{id}/faculty/approve              faculty leader approval
/// /events/{id}/dean/approve                 dean approval
/// /events/{id}/dean/request-revision        dean revision request
/// /events/{id}/dean/reject                  dean rejection
/// /events/{id}/dean/respond                 creator response (dean loop)
/// /events/{id}/deanship/approve             deanship approval (final)
/// /events/{id}/deanship/request-revision    deanship revision request
/// /events/{id}/deanship/reject              deanship rejection
/// /events/{id}/deanship/respond             creator response (deanship loop)
///
/// /notifications                            list (GET)
/// /notifications/unread-count               unread count (GET)
/// /notifications/{id}/read                  mark one read (POST)
/// /notifications/read-all                   mark all read (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/events", approval::router())
        .nest("/notifications", notification::router())
}
