//! Notification fan-out with at-most-once delivery per occurrence.
//!
//! [`Notifier::emit`] resolves an audience to concrete user ids, subtracts
//! recipients already notified within the dedup window, and writes the
//! remainder in one batched insert. Callers must commit the event's state
//! change BEFORE invoking `emit`: a crash between the two leaves the event
//! correctly advanced with a recoverable missing notification, never a
//! notification for a state that was not committed.

use std::collections::HashSet;

use campus_core::notification::{Audience, NotificationKind};
use campus_core::roles::Role;
use campus_core::types::{DbId, Timestamp};
use campus_db::models::event::Event;
use campus_db::repositories::{CommunityRepo, NotificationRepo, RegistrationRepo, UserRepo};
use campus_db::DbPool;

use crate::is_transient;

/// How far back the duplicate check looks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupWindow {
    /// Only notifications created since the event's last state transition
    /// count as duplicates. Used for workflow kinds, which legitimately
    /// recur across revision cycles.
    SinceLastTransition,
    /// Any prior notification of the same kind counts. Used for
    /// reminders, which fire at most once per event and kind.
    Lifetime,
}

/// Creates notification rows for an event's audience.
#[derive(Clone)]
pub struct Notifier {
    pool: DbPool,
}

impl Notifier {
    /// Create a new notifier with the given database pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Fan a notification out to `audience`, skipping recipients already
    /// notified within `window`. Returns the number of rows written.
    ///
    /// Transient storage failures are retried once; the dedup check
    /// re-runs on retry, so a partially applied batch is completed rather
    /// than duplicated.
    pub async fn emit(
        &self,
        event: &Event,
        kind: NotificationKind,
        audience: Audience,
        message: &str,
        window: DedupWindow,
    ) -> Result<u64, sqlx::Error> {
        let recipients = self.resolve_audience(event, audience).await?;
        if recipients.is_empty() {
            tracing::debug!(
                event_id = event.id,
                kind = %kind,
                "No recipients resolved for notification"
            );
            return Ok(0);
        }

        let since = match window {
            DedupWindow::SinceLastTransition => Some(event.status_changed_at),
            DedupWindow::Lifetime => None,
        };

        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.emit_once(event, kind, &recipients, message, since).await {
                Ok(written) => {
                    if written > 0 {
                        tracing::info!(
                            event_id = event.id,
                            kind = %kind,
                            written,
                            "Notifications created"
                        );
                    }
                    return Ok(written);
                }
                Err(e) if attempt < 2 && is_transient(&e) => {
                    tracing::warn!(
                        event_id = event.id,
                        kind = %kind,
                        error = %e,
                        "Transient failure during fan-out, retrying"
                    );
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// One dedup-then-insert pass.
    async fn emit_once(
        &self,
        event: &Event,
        kind: NotificationKind,
        recipients: &[DbId],
        message: &str,
        since: Option<Timestamp>,
    ) -> Result<u64, sqlx::Error> {
        let already: HashSet<DbId> =
            NotificationRepo::recipients_notified_since(&self.pool, event.id, kind.as_str(), since)
                .await?
                .into_iter()
                .collect();

        let fresh: Vec<DbId> = recipients
            .iter()
            .copied()
            .filter(|id| !already.contains(id))
            .collect();

        NotificationRepo::insert_batch(
            &self.pool,
            &fresh,
            Some(event.id),
            kind.as_str(),
            message,
            Some(event.title.as_str()),
            Some(event.status.as_str()),
        )
        .await
    }

    /// Resolve an audience to concrete user ids. Read-only.
    async fn resolve_audience(
        &self,
        event: &Event,
        audience: Audience,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        match audience {
            Audience::Creator => Ok(vec![event.created_by]),
            Audience::DeanOfFaculty => {
                let offices = CommunityRepo::offices(&self.pool, event.community_id).await?;
                Ok(offices
                    .and_then(|o| o.dean_of_faculty_id)
                    .into_iter()
                    .collect())
            }
            Audience::DeanshipHolders => {
                UserRepo::active_ids_with_role(&self.pool, Role::Deanship.as_str()).await
            }
            Audience::Participants => {
                RegistrationRepo::participant_ids(&self.pool, event.id).await
            }
        }
    }
}
