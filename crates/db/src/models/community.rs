//! Community and college lookups used by the approval workflow.

use campus_core::types::DbId;
use sqlx::FromRow;

/// The office-holders responsible for a community's events, resolved by
/// joining the community to its college.
#[derive(Debug, Clone, FromRow)]
pub struct CommunityOffices {
    pub leader_id: DbId,
    pub faculty_leader_id: Option<DbId>,
    pub dean_of_faculty_id: Option<DbId>,
}
