//! Repository for the `users` table.

use sqlx::PgPool;

use campus_core::types::DbId;

/// Provides user lookups needed by the workflow and fan-out.
pub struct UserRepo;

impl UserRepo {
    /// Ids of all active users holding the given role.
    pub async fn active_ids_with_role(
        pool: &PgPool,
        role: &str,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT id FROM users WHERE role = $1 AND is_active = true ORDER BY id",
        )
        .bind(role)
        .fetch_all(pool)
        .await
    }
}
