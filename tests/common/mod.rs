#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use http_body_util::BodyExt;
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use shoky::modules::profiles::service::ProfileService;
use shoky::router::init_router;
use shoky::state::AppState;
use shoky_config::{CorsConfig, JwtConfig, SessionConfig};
use shoky_core::hash_password;
use shoky_models::Role;

pub struct TestMember {
    pub id: Uuid,
    pub email: String,
    pub password: String,
    pub role: Role,
}

pub fn test_state(pool: PgPool) -> AppState {
    dotenvy::dotenv().ok();
    AppState {
        db: pool,
        jwt_config: JwtConfig {
            secret: "test-secret-key-for-shoky".to_string(),
            access_token_expiry: 3600,
        },
        cors_config: CorsConfig::from_env(),
        session_config: SessionConfig::new(1, std::time::Duration::from_millis(0)),
    }
}

pub fn setup_test_app(pool: PgPool) -> axum::Router {
    init_router(test_state(pool))
}

pub fn generate_unique_email() -> String {
    format!("test-{}@shoky.test", Uuid::new_v4())
}

/// Inserts credentials and a profile with the given role.
pub async fn create_test_member(pool: &PgPool, role: Role) -> TestMember {
    let email = generate_unique_email();
    let password = "testpass123".to_string();
    let hashed = hash_password(&password).unwrap();

    let profile = ProfileService::insert_member(pool, "Test Member", &email, &hashed, role)
        .await
        .unwrap();

    TestMember {
        id: profile.id,
        email,
        password,
        role,
    }
}

/// Inserts credentials without a profile row.
pub async fn create_user_without_profile(pool: &PgPool) -> TestMember {
    let email = generate_unique_email();
    let password = "testpass123".to_string();
    let hashed = hash_password(&password).unwrap();

    let id = sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO users (email, password) VALUES ($1, $2) RETURNING id",
    )
    .bind(&email)
    .bind(&hashed)
    .fetch_one(pool)
    .await
    .unwrap();

    TestMember {
        id,
        email,
        password,
        role: Role::Developer,
    }
}

pub async fn login(app: &axum::Router, email: &str, password: &str) -> Response<Body> {
    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({ "email": email, "password": password })).unwrap(),
        ))
        .unwrap();

    app.clone().oneshot(request).await.unwrap()
}

/// Logs in and returns the bearer token.
pub async fn login_token(app: &axum::Router, member: &TestMember) -> String {
    let response = login(app, &member.email, &member.password).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    body["access_token"].as_str().unwrap().to_string()
}

pub async fn get(app: &axum::Router, uri: &str, token: Option<&str>) -> Response<Body> {
    send(app, "GET", uri, token).await
}

pub async fn send(app: &axum::Router, method: &str, uri: &str, token: Option<&str>) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    app.clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}
