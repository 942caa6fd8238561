//! Repository for the `reservations` table.

use sqlx::PgPool;

use crate::models::reservation::{RESERVATION_ACTIVE, RESERVATION_COMPLETED};

/// Provides the stale-reservation reconciliation used by the cleanup job.
pub struct ReservationRepo;

impl ReservationRepo {
    /// Transition every ACTIVE reservation dated strictly before `today`
    /// to COMPLETED in one bulk update. Idempotent: a second run matches
    /// nothing. Returns the number of rows changed.
    pub async fn complete_past(
        pool: &PgPool,
        today: chrono::NaiveDate,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE reservations \
             SET status = $1, updated_at = NOW() \
             WHERE status = $2 AND reservation_date < $3",
        )
        .bind(RESERVATION_COMPLETED)
        .bind(RESERVATION_ACTIVE)
        .bind(today)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
