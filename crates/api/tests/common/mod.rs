//! Shared harness for API integration tests.
//!
//! Builds the real application router (same middleware stack as
//! production via [`build_app_router`]), mints JWTs with the test
//! secret, and seeds the identity graph the workflow needs.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use campus_api::auth::jwt::{Claims, JwtConfig};
use campus_api::config::ServerConfig;
use campus_api::router::build_app_router;
use campus_api::state::AppState;
use campus_core::types::DbId;
use campus_notify::Notifier;

const TEST_JWT_SECRET: &str = "test-secret-not-for-production";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
        },
    }
}

/// Build the full application router with all middleware layers, using
/// the given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool: pool.clone(),
        config: Arc::new(config.clone()),
        notifier: Notifier::new(pool),
    };
    build_app_router(state, &config)
}

/// Mint a valid access token for the given user and role.
pub fn token_for(user_id: DbId, role: &str) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        role: role.to_string(),
        exp: now + 3600,
        iat: now,
    };
    jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .unwrap()
}

/// Issue a request and return the status plus parsed JSON body (or Null
/// for empty bodies).
pub async fn request(
    app: &Router,
    method: &str,
    path: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub struct Fixture {
    pub creator_id: DbId,
    pub faculty_leader_id: DbId,
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

pub async fn seed(pool: &PgPool) -> Fixture {
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

    let event_id: DbId = sqlx::query_scalar(
        "INSERT INTO events \
            (title, starts_at, ends_at, community_id, created_by) \
         VALUES ('Career Fair', NOW() + INTERVAL '48 hours', \
                 NOW() + INTERVAL '50 hours', $1, $2) \
         RETURNING id",
    )
    .bind(community_id)
    .bind(creator_id)
    .fetch_one(pool)
    .await
    .unwrap();

    Fixture {
        creator_id,
        faculty_leader_id,
        dean_id,
        deanship_id,
        event_id,
    }
}
