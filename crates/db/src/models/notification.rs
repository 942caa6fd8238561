//! Notification entity model.

use campus_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `notifications` table.
///
/// `event_title` and `event_status` are denormalized at creation time so
/// clients can render the row without fetching the related event.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub user_id: DbId,
    pub event_id: Option<DbId>,
    pub kind: String,
    pub message: String,
    pub event_title: Option<String>,
    pub event_status: Option<String>,
    pub is_read: bool,
    pub read_at: Option<Timestamp>,
    pub created_at: Timestamp,
}
