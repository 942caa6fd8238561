//! Event reminder scheduler.
//!
//! Runs once at process start and then on a fixed period. Each sweep
//! loads approved events starting within the lookahead window, decides
//! whether each sits inside the 24-hour or 1-hour reminder window, and
//! hands matches to the fan-out service addressed to the event's
//! participants.
//!
//! Duplicate suppression is layered: a per-instance [`SentGuard`] stops
//! adjacent sweeps from re-attempting an event that was just handled,
//! and the fan-out's persisted dedup (lifetime window for reminder
//! kinds) remains the authority across restarts and multiple workers.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use campus_core::notification::{Audience, NotificationKind};
use campus_core::types::DbId;
use campus_core::workflow::reminder_message;
use campus_db::models::event::Event;
use campus_db::repositories::EventRepo;
use campus_db::DbPool;

use crate::fanout::{DedupWindow, Notifier};

/// Default sweep period: 10 minutes. Override with `REMINDER_INTERVAL_SECS`.
const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(600);

/// How far ahead the sweep looks for approved events. Slightly more than
/// 24 hours so the upper half of the 1-day tolerance window is visible.
const LOOKAHEAD_HOURS: i64 = 25;

/// Half-width of the tolerance window around each reminder mark.
const TOLERANCE_HOURS: f64 = 0.5;

/// Upper bound on one event's reminder processing so a pathological row
/// cannot stall the whole sweep.
const PER_EVENT_TIMEOUT: Duration = Duration::from_secs(10);

/// How long a guard entry suppresses re-attempts. Longer than a tolerance
/// window, shorter than the gap between the 24h and 1h marks.
const GUARD_TTL: Duration = Duration::from_secs(2 * 3600);

/// Which reminder, if any, applies at `hours_until_start` before the event.
pub fn reminder_kind(hours_until_start: f64) -> Option<NotificationKind> {
    if (hours_until_start - 24.0).abs() <= TOLERANCE_HOURS {
        Some(NotificationKind::ReminderOneDay)
    } else if (hours_until_start - 1.0).abs() <= TOLERANCE_HOURS {
        Some(NotificationKind::ReminderOneHour)
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// SentGuard
// ---------------------------------------------------------------------------

/// Bounded in-process "already attempted" set, keyed by event and kind.
///
/// Owned by one scheduler instance, never shared, so parallel schedulers
/// in tests or multi-worker deployments cannot interfere with each other.
/// Best-effort only: the persisted dedup is the real guarantee.
struct SentGuard {
    ttl: Duration,
    entries: Mutex<HashMap<(DbId, NotificationKind), Instant>>,
}

impl SentGuard {
    fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Record the key if it is not already fresh. Returns `false` when a
    /// fresh entry exists, meaning the caller should skip the event.
    fn try_claim(&self, event_id: DbId, kind: NotificationKind) -> bool {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let now = Instant::now();
        entries.retain(|_, at| now.duration_since(*at) < self.ttl);
        match entries.get(&(event_id, kind)) {
            Some(_) => false,
            None => {
                entries.insert((event_id, kind), now);
                true
            }
        }
    }

    /// Drop a claim so a failed emit can be retried on the next sweep.
    fn release(&self, event_id: DbId, kind: NotificationKind) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.remove(&(event_id, kind));
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}

// ---------------------------------------------------------------------------
// ReminderScheduler
// ---------------------------------------------------------------------------

/// Background service that delivers "starts soon" reminders.
pub struct ReminderScheduler {
    pool: DbPool,
    notifier: Notifier,
    guard: SentGuard,
    sweep_interval: Duration,
}

impl ReminderScheduler {
    /// Create a new scheduler with the given database pool.
    pub fn new(pool: DbPool) -> Self {
        let sweep_interval = std::env::var("REMINDER_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_SWEEP_INTERVAL);
        let notifier = Notifier::new(pool.clone());
        Self {
            pool,
            notifier,
            guard: SentGuard::new(GUARD_TTL),
            sweep_interval,
        }
    }

    /// Run the scheduler loop.
    ///
    /// The first tick fires immediately, so reminders are reconciled at
    /// process start. The loop exits when `cancel` is triggered. Sweeps
    /// run sequentially on one task and can never overlap themselves.
    pub async fn run(&self, cancel: CancellationToken) {
        tracing::info!(
            interval_secs = self.sweep_interval.as_secs(),
            "Reminder scheduler started"
        );
        let mut interval = tokio::time::interval(self.sweep_interval);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Reminder scheduler stopping");
                    break;
                }
                _ = interval.tick() => {
                    if let Err(e) = self.sweep().await {
                        tracing::error!(error = %e, "Reminder sweep failed");
                    }
                }
            }
        }
    }

    /// One reminder sweep over upcoming approved events.
    ///
    /// A failure on one event is logged and does not abort the batch.
    pub async fn sweep(&self) -> Result<(), sqlx::Error> {
        let now = chrono::Utc::now();
        let events = EventRepo::list_approved_starting_within(&self.pool, LOOKAHEAD_HOURS).await?;

        let mut sent = 0u64;
        for event in &events {
            let hours_until = (event.starts_at - now).num_seconds() as f64 / 3600.0;
            let Some(kind) = reminder_kind(hours_until) else {
                continue;
            };

            if !self.guard.try_claim(event.id, kind) {
                continue;
            }

            match tokio::time::timeout(PER_EVENT_TIMEOUT, self.send_reminder(event, kind)).await {
                Ok(Ok(written)) => sent += written,
                Ok(Err(e)) => {
                    self.guard.release(event.id, kind);
                    tracing::error!(
                        event_id = event.id,
                        kind = %kind,
                        error = %e,
                        "Failed to send reminder"
                    );
                }
                Err(_) => {
                    self.guard.release(event.id, kind);
                    tracing::error!(
                        event_id = event.id,
                        kind = %kind,
                        "Reminder processing timed out"
                    );
                }
            }
        }

        tracing::info!(
            scanned = events.len(),
            sent,
            "Reminder sweep complete"
        );
        Ok(())
    }

    async fn send_reminder(
        &self,
        event: &Event,
        kind: NotificationKind,
    ) -> Result<u64, sqlx::Error> {
        let message = reminder_message(kind, &event.title);
        self.notifier
            .emit(
                event,
                kind,
                Audience::Participants,
                &message,
                DedupWindow::Lifetime,
            )
            .await
    }
}
