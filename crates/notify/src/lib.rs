//! Notification services: fan-out with deduplication, and the periodic
//! reminder scheduler.
//!
//! The fan-out [`Notifier`] is invoked by the approval handlers after an
//! event's state change has committed; the [`ReminderScheduler`] runs as
//! a background task and feeds approved upcoming events back into the
//! same fan-out path.

pub mod fanout;
pub mod reminder;

pub use fanout::{DedupWindow, Notifier};
pub use reminder::ReminderScheduler;

/// Whether a storage error is worth one retry.
///
/// Fan-out is idempotent by construction (the dedup check re-runs), and
/// the event-state write is a single CAS statement, so both paths can be
/// safely re-attempted on connection-level failures.
pub fn is_transient(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed
    )
}
