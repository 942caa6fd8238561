//! Study-space reservation entity model.

use campus_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `reservations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Reservation {
    pub id: DbId,
    pub space_name: String,
    pub user_id: DbId,
    pub reservation_date: chrono::NaiveDate,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Reservation status values (text column with a CHECK constraint).
pub const RESERVATION_ACTIVE: &str = "active";
pub const RESERVATION_COMPLETED: &str = "completed";
pub const RESERVATION_CANCELLED: &str = "cancelled";
