//! Domain model structs and DTOs.
//!
//! Each submodule contains a `FromRow` + `Serialize` entity struct matching
//! the database row, plus any DTOs the handlers need.

pub mod community;
pub mod event;
pub mod notification;
pub mod reservation;
