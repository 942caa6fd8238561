//! Repository for event participation lookups.

use sqlx::PgPool;

use campus_core::types::DbId;

/// Provides participant lookups for events.
pub struct RegistrationRepo;

impl RegistrationRepo {
    /// Everyone with an active registration or a saved bookmark on the
    /// event. The UNION deduplicates users who did both.
    pub async fn participant_ids(
        pool: &PgPool,
        event_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT user_id FROM event_registrations \
             WHERE event_id = $1 AND status = 'registered' \
             UNION \
             SELECT user_id FROM saved_events WHERE event_id = $1",
        )
        .bind(event_id)
        .fetch_all(pool)
        .await
    }
}
