//! Repository for community/college office-holder lookups.
//!
//! Read-only from the workflow's perspective: role assignments are
//! managed by the admin CRUD surface.

use sqlx::PgPool;

use campus_core::types::DbId;

use crate::models::community::CommunityOffices;

/// Provides office-holder lookups for communities.
pub struct CommunityRepo;

impl CommunityRepo {
    /// Resolve the office-holders for a community: its leader, and the
    /// faculty leader and dean of faculty of its college.
    pub async fn offices(
        pool: &PgPool,
        community_id: DbId,
    ) -> Result<Option<CommunityOffices>, sqlx::Error> {
        sqlx::query_as::<_, CommunityOffices>(
            "SELECT c.leader_id, col.faculty_leader_id, col.dean_of_faculty_id \
             FROM communities c \
             JOIN colleges col ON col.id = c.college_id \
             WHERE c.id = $1",
        )
        .bind(community_id)
        .fetch_optional(pool)
        .await
    }
}
