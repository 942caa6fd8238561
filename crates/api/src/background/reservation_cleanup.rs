//! Stale study-space reservation cleanup.
//!
//! Reconciles reservations left in ACTIVE past their date into the
//! terminal COMPLETED state. Runs once at process start, then daily at a
//! fixed wall-clock time. "Past" is decided against the UTC calendar
//! date, so the boundary does not drift with server locale. The bulk
//! update is idempotent: a second run in a row changes nothing.

use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

use campus_db::repositories::ReservationRepo;

/// Daily run hour: 03:00 UTC.
const RUN_AT_HOUR: u32 = 3;

/// Run the reservation cleanup loop.
///
/// Executes immediately at startup, then sleeps until the next daily run
/// time. Exits when `cancel` is triggered.
pub async fn run(pool: PgPool, cancel: CancellationToken) {
    tracing::info!("Reservation cleanup job started");
    run_once(&pool).await;

    loop {
        let wait = duration_until_next_run(Utc::now());
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Reservation cleanup job stopping");
                break;
            }
            _ = tokio::time::sleep(wait) => {
                run_once(&pool).await;
            }
        }
    }
}

/// One cleanup pass. Failures are logged; the next scheduled run retries.
async fn run_once(pool: &PgPool) {
    let today = Utc::now().date_naive();
    match ReservationRepo::complete_past(pool, today).await {
        Ok(completed) => {
            if completed > 0 {
                tracing::info!(completed, "Reservation cleanup: reconciled stale reservations");
            } else {
                tracing::debug!("Reservation cleanup: nothing to reconcile");
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "Reservation cleanup failed");
        }
    }
}

/// Time until the next daily run at [`RUN_AT_HOUR`] UTC, always in the future.
fn duration_until_next_run(now: DateTime<Utc>) -> Duration {
    let today_run = now
        .date_naive()
        .and_hms_opt(RUN_AT_HOUR, 0, 0)
        .expect("valid wall-clock time")
        .and_utc();
    let next = if today_run > now {
        today_run
    } else {
        today_run + chrono::Duration::days(1)
    };
    (next - now).to_std().unwrap_or(Duration::from_secs(60))
}
