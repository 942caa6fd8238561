//! Shared fixtures for fan-out tests.

use campus_core::types::DbId;
use sqlx::PgPool;

pub struct Fixture {
    pub creator_id: DbId,
    pub dean_id: DbId,
    pub deanship_id: DbId,
    pub event_id: DbId,
}

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

pub async fn register(pool: &PgPool, event_id: DbId, user_id: DbId) {
    sqlx::query(
        "INSERT INTO event_registrations (event_id, user_id) VALUES ($1, $2)",
    )
    .bind(event_id)
    .bind(user_id)
    .execute(pool)
    .await
    .unwrap();
}

pub async fn save_event(pool: &PgPool, event_id: DbId, user_id: DbId) {
    sqlx::query("INSERT INTO saved_events (event_id, user_id) VALUES ($1, $2)")
        .bind(event_id)
        .bind(user_id)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn seed(pool: &PgPool) -> Fixture {
    let creator_id = insert_user(pool, "Club Leader", "club_leader").await;
    let faculty_id = insert_user(pool, "Faculty Leader", "faculty_leader").await;
    let dean_id = insert_user(pool, "Dean Of Faculty", "dean_of_faculty").await;
    let deanship_id = insert_user(pool, "Deanship Holder", "deanship").await;

    let college_id: DbId = sqlx::query_scalar(
        "INSERT INTO colleges (name, faculty_leader_id, dean_of_faculty_id) \
         VALUES ('Engineering', $1, $2) RETURNING id",
    )
    .bind(faculty_id)
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

    let event_id: DbId = sqlx::query_scalar(
        "INSERT INTO events \
            (title, starts_at, ends_at, community_id, created_by, status) \
         VALUES ('Career Fair', NOW() + INTERVAL '24 hours 10 minutes', \
                 NOW() + INTERVAL '26 hours', $1, $2, 'approved') \
         RETURNING id",
    )
    .bind(community_id)
    .bind(creator_id)
    .fetch_one(pool)
    .await
    .unwrap();

    Fixture {
        creator_id,
        dean_id,
        deanship_id,
        event_id,
    }
}
