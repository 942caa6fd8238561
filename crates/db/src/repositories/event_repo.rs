//! Repository for the `events` table.
//!
//! [`EventRepo::apply_transition`] is the only writer of the `status`
//! column. It performs a compare-and-swap on the previously observed
//! status so two racing transitions on the same event cannot both
//! succeed; the loser sees `Ok(None)` and surfaces a conflict.

use sqlx::PgPool;

use campus_core::types::DbId;
use campus_core::workflow::{ApprovalStage, RevisionField, Transition};

use crate::models::event::Event;

/// Column list for `events` queries.
const COLUMNS: &str = "\
    id, title, description, location, starts_at, ends_at, capacity, \
    community_id, created_by, status, \
    faculty_leader_approval, dean_of_faculty_approval, deanship_approval, \
    dean_revision_message, dean_revision_response, \
    deanship_revision_message, deanship_revision_response, \
    status_changed_at, created_at, updated_at";

/// Provides read/write operations for events.
pub struct EventRepo;

impl EventRepo {
    /// Fetch an event by id.
    pub async fn find_by_id(pool: &PgPool, event_id: DbId) -> Result<Option<Event>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM events WHERE id = $1");
        sqlx::query_as::<_, Event>(&query)
            .bind(event_id)
            .fetch_optional(pool)
            .await
    }

    /// Persist a computed workflow transition.
    ///
    /// The status write is guarded by `AND status = $expected`; if another
    /// transition committed in between, zero rows match and `Ok(None)` is
    /// returned without changing anything. On success the marker and
    /// revision columns from the transition are written in the same
    /// database transaction and the updated row is returned.
    pub async fn apply_transition(
        pool: &PgPool,
        event_id: DbId,
        expected_status: &str,
        transition: &Transition,
    ) -> Result<Option<Event>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let updated = sqlx::query(
            "UPDATE events \
             SET status = $1, status_changed_at = NOW(), updated_at = NOW() \
             WHERE id = $2 AND status = $3",
        )
        .bind(transition.next_status.as_str())
        .bind(event_id)
        .bind(expected_status)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        if let Some((stage, value)) = transition.marker {
            let query = format!(
                "UPDATE events SET {} = $1 WHERE id = $2",
                marker_column(stage)
            );
            sqlx::query(&query)
                .bind(value.as_str())
                .bind(event_id)
                .execute(&mut *tx)
                .await?;
        }

        if let Some((field, text)) = &transition.revision {
            let query = format!(
                "UPDATE events SET {} = $1 WHERE id = $2",
                revision_column(*field)
            );
            sqlx::query(&query)
                .bind(text)
                .bind(event_id)
                .execute(&mut *tx)
                .await?;
        }

        let query = format!("SELECT {COLUMNS} FROM events WHERE id = $1");
        let event = sqlx::query_as::<_, Event>(&query)
            .bind(event_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(event))
    }

    /// List approved events whose start time falls inside
    /// `[now, now + window_hours)`, ordered soonest-first.
    pub async fn list_approved_starting_within(
        pool: &PgPool,
        window_hours: i64,
    ) -> Result<Vec<Event>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM events \
             WHERE status = 'approved' \
               AND starts_at >= NOW() \
               AND starts_at < NOW() + ($1 * INTERVAL '1 hour') \
             ORDER BY starts_at ASC"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(window_hours)
            .fetch_all(pool)
            .await
    }
}

fn marker_column(stage: ApprovalStage) -> &'static str {
    match stage {
        ApprovalStage::FacultyLeader => "faculty_leader_approval",
        ApprovalStage::DeanOfFaculty => "dean_of_faculty_approval",
        ApprovalStage::Deanship => "deanship_approval",
    }
}

fn revision_column(field: RevisionField) -> &'static str {
    match field {
        RevisionField::DeanMessage => "dean_revision_message",
        RevisionField::DeanResponse => "dean_revision_response",
        RevisionField::DeanshipMessage => "deanship_revision_message",
        RevisionField::DeanshipResponse => "deanship_revision_response",
    }
}
