//! Event entity model and workflow DTOs.

use campus_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Event {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub location: String,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
    pub capacity: i32,
    pub community_id: DbId,
    pub created_by: DbId,
    pub status: String,
    pub faculty_leader_approval: String,
    pub dean_of_faculty_approval: String,
    pub deanship_approval: String,
    pub dean_revision_message: Option<String>,
    pub dean_revision_response: Option<String>,
    pub deanship_revision_message: Option<String>,
    pub deanship_revision_response: Option<String>,
    pub status_changed_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// The workflow-facing slice of an event, returned by every approval
/// action so clients can render progress without a second fetch.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowState {
    pub event_id: DbId,
    pub status: String,
    pub faculty_leader_approval: String,
    pub dean_of_faculty_approval: String,
    pub deanship_approval: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dean_revision_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dean_revision_response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deanship_revision_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deanship_revision_response: Option<String>,
}

impl Event {
    /// Project the row onto its workflow fields.
    pub fn workflow_state(&self) -> WorkflowState {
        WorkflowState {
            event_id: self.id,
            status: self.status.clone(),
            faculty_leader_approval: self.faculty_leader_approval.clone(),
            dean_of_faculty_approval: self.dean_of_faculty_approval.clone(),
            deanship_approval: self.deanship_approval.clone(),
            dean_revision_message: self.dean_revision_message.clone(),
            dean_revision_response: self.dean_revision_response.clone(),
            deanship_revision_message: self.deanship_revision_message.clone(),
            deanship_revision_response: self.deanship_revision_response.clone(),
        }
    }
}
