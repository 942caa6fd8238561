//! Repository for the `notifications` table.
//!
//! Rows are append-only: they are created by the fan-out service and only
//! ever mutated by marking them read.

use sqlx::PgPool;

use campus_core::types::{DbId, Timestamp};

use crate::models::notification::Notification;

/// Column list for `notifications` queries.
const COLUMNS: &str = "\
    id, user_id, event_id, kind, message, event_title, event_status, \
    is_read, read_at, created_at";

/// Provides operations for notifications.
pub struct NotificationRepo;

impl NotificationRepo {
    /// Insert one notification per recipient in a single batched statement.
    ///
    /// All rows share the same event, kind, and message; only the
    /// recipient varies. Returns the number of rows written.
    pub async fn insert_batch(
        pool: &PgPool,
        recipients: &[DbId],
        event_id: Option<DbId>,
        kind: &str,
        message: &str,
        event_title: Option<&str>,
        event_status: Option<&str>,
    ) -> Result<u64, sqlx::Error> {
        if recipients.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query(
            "INSERT INTO notifications \
                (user_id, event_id, kind, message, event_title, event_status) \
             SELECT unnest($1::bigint[]), $2, $3, $4, $5, $6",
        )
        .bind(recipients)
        .bind(event_id)
        .bind(kind)
        .bind(message)
        .bind(event_title)
        .bind(event_status)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Recipients who already hold a notification of `kind` for `event_id`
    /// created at or after `since` (or ever, when `since` is `None`).
    ///
    /// This is the persisted half of the dedup check: bounding the window
    /// to the event's last state transition lets a second legitimate
    /// approval cycle notify again, while double emits within one cycle
    /// are suppressed.
    pub async fn recipients_notified_since(
        pool: &PgPool,
        event_id: DbId,
        kind: &str,
        since: Option<Timestamp>,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT DISTINCT user_id FROM notifications \
             WHERE event_id = $1 AND kind = $2 \
               AND ($3::timestamptz IS NULL OR created_at >= $3)",
        )
        .bind(event_id)
        .bind(kind)
        .bind(since)
        .fetch_all(pool)
        .await
    }

    /// List notifications for a user, newest first.
    ///
    /// When `unread_only` is `true`, only notifications with
    /// `is_read = false` are returned.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        unread_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        let filter = if unread_only {
            "AND is_read = false"
        } else {
            ""
        };
        let query = format!(
            "SELECT {COLUMNS} FROM notifications \
             WHERE user_id = $1 {filter} \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Mark a single notification as read.
    ///
    /// Returns `true` if the notification belongs to the given user and
    /// was still unread, `false` otherwise. Safe to call repeatedly.
    pub async fn mark_read(
        pool: &PgPool,
        notification_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications \
             SET is_read = true, read_at = NOW() \
             WHERE id = $1 AND user_id = $2 AND is_read = false",
        )
        .bind(notification_id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Whether a notification with this id exists for the user at all,
    /// read or not. Distinguishes "not yours" from "already read".
    pub async fn exists_for_user(
        pool: &PgPool,
        notification_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let count: Option<i64> = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE id = $1 AND user_id = $2",
        )
        .bind(notification_id)
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(count.unwrap_or(0) > 0)
    }

    /// Mark all unread notifications as read for a user.
    ///
    /// Returns the number of notifications that were marked.
    pub async fn mark_all_read(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications \
             SET is_read = true, read_at = NOW() \
             WHERE user_id = $1 AND is_read = false",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Number of unread notifications for a user.
    pub async fn unread_count(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        let count: Option<i64> = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND is_read = false",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok(count.unwrap_or(0))
    }
}
