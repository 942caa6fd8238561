//! Pure domain logic for the campus events platform.
//!
//! This crate has zero internal dependencies and performs no I/O, so it
//! can be used by the repository layer, the API server, and any future
//! worker or CLI tooling.

pub mod error;
pub mod notification;
pub mod roles;
pub mod types;
pub mod workflow;
