//! Shared fixtures for repository tests.
//!
//! Seeds the minimal identity graph the workflow needs: one college with
//! both offices filled, one community, its leader (the event creator),
//! one deanship holder, and one event sitting at the faculty stage.

use campus_core::types::DbId;
use sqlx::PgPool;

pub struct WorkflowFixture {
    pub community_id: DbId,
    pub creator_id: DbId,
    pub faculty_leader_id: DbId,
    pub dean_id: DbId,
    pub deanship_id: DbId,
    pub event_id: DbId,
}

/// Insert a user and return its id.
pub async fn insert_user(pool: &PgPool, name: &str, role: &str) -> DbId {
    sqlx::query_scalar(
        "INSERT INTO users (full_name, email, role) \
         VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(name)
    .bind(format!("{}@campus.test", name.replace(' ', ".").to_lowercase()))
    .bind(role)
    .fetch_one(pool)
    .await
    .unwrap()
}

/// Insert an event for the fixture community, starting `starts_in_hours`
/// from now, with the given status.
pub async fn insert_event(
    pool: &PgPool,
    community_id: DbId,
    created_by: DbId,
    title: &str,
    status: &str,
    starts_in_hours: f64,
) -> DbId {
    sqlx::query_scalar(
        "INSERT INTO events \
            (title, starts_at, ends_at, community_id, created_by, status) \
         VALUES ($1, NOW() + ($2 * INTERVAL '1 hour'), \
                 NOW() + (($2 + 2) * INTERVAL '1 hour'), $3, $4, $5) \
         RETURNING id",
    )
    .bind(title)
    .bind(starts_in_hours)
    .bind(community_id)
    .bind(created_by)
    .bind(status)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn seed_workflow(pool: &PgPool) -> WorkflowFixture {
    let creator_id = insert_user(pool, "Club Leader", "club_leader").await;
    let faculty_leader_id = insert_user(pool, "Faculty Leader", "faculty_leader").await;
    let dean_id = insert_user(pool, "Dean Of Faculty", "dean_of_faculty").await;
    let deanship_id = insert_user(pool, "Deanship Holder", "deanship").await;

    let college_id: DbId = sqlx::query_scalar(
        "INSERT INTO colleges (name, faculty_leader_id, dean_of_faculty_id) \
         VALUES ('Engineering', $1, $2) RETURNING id",
    )
    .bind(faculty_leader_id)
    .bind(dean_id)
    .fetch_one(pool)
    .await
    .unwrap();

    let community_id: DbId = sqlx::query_scalar(
        "INSERT INTO communities (name, college_id, leader_id) \
         VALUES ('Robotics Club', $1, $2) RETURNING id",
    )
    .bind(college_id)
    .bind(creator_id)
    .fetch_one(pool)
    .await
    .unwrap();

    let event_id = insert_event(
        pool,
        community_id,
        creator_id,
        "Career Fair",
        "pending_faculty_approval",
        48.0,
    )
    .await;

    WorkflowFixture {
        community_id,
        creator_id,
        faculty_leader_id,
        dean_id,
        deanship_id,
        event_id,
    }
}
