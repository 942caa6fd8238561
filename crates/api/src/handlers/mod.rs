//! Request handlers.
//!
//! Handlers validate input, delegate to the workflow orchestration or the
//! repositories in `campus_db`, and map errors via [`AppError`](crate::error::AppError).

pub mod approval;
pub mod notification;
