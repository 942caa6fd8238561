//! Background jobs spawned from `main.rs`.
//!
//! Each job runs on its own task with a [`CancellationToken`](tokio_util::sync::CancellationToken)
//! for graceful shutdown and never blocks the request-handling path.

pub mod reservation_cleanup;
