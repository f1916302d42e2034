//! Integration tests for the login endpoint.

mod common;

use axum::http::StatusCode;
use common::{assert_error_code, body_json, post_json};
use serde_json::json;
use sqlx::SqlitePool;

use presswork_api::auth::password::hash_password;
use presswork_db::models::user::CreateUser;
use presswork_db::repositories::UserRepo;

async fn seed_admin(pool: &SqlitePool, username: &str, password: &str) {
    let password_hash = hash_password(password).expect("hashing should succeed");
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            password_hash,
        },
    )
    .await
    .expect("seed user insert should succeed");
}

// ---------------------------------------------------------------------------
// Test: valid credentials return 200
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn login_with_valid_credentials_succeeds(pool: SqlitePool) {
    seed_admin(&pool, "admin", "hunter2hunter2").await;
    let app = common::build_test_app(pool);

    let response = post_json(
        app.router,
        "/api/v1/auth/login",
        json!({"username": "admin", "password": "hunter2hunter2"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Login succeeded");
}

// ---------------------------------------------------------------------------
// Test: wrong password returns 401
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn login_with_wrong_password_is_unauthorized(pool: SqlitePool) {
    seed_admin(&pool, "admin", "hunter2hunter2").await;
    let app = common::build_test_app(pool);

    let response = post_json(
        app.router,
        "/api/v1/auth/login",
        json!({"username": "admin", "password": "wrong"}),
    )
    .await;

    assert_error_code(response, StatusCode::UNAUTHORIZED, "UNAUTHORIZED").await;
}

// ---------------------------------------------------------------------------
// Test: unknown username gets the same 401 as a wrong password
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn login_with_unknown_username_is_indistinguishable(pool: SqlitePool) {
    seed_admin(&pool, "admin", "hunter2hunter2").await;
    let app = common::build_test_app(pool);

    let wrong_password = post_json(
        app.router.clone(),
        "/api/v1/auth/login",
        json!({"username": "admin", "password": "wrong"}),
    )
    .await;
    let unknown_user = post_json(
        app.router,
        "/api/v1/auth/login",
        json!({"username": "nobody", "password": "wrong"}),
    )
    .await;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);

    // Identical bodies, so the endpoint leaks nothing about which usernames exist.
    let a = body_json(wrong_password).await;
    let b = body_json(unknown_user).await;
    assert_eq!(a, b);
}

// ---------------------------------------------------------------------------
// Test: malformed request body is a client error
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn login_with_missing_fields_is_a_client_error(pool: SqlitePool) {
    let app = common::build_test_app(pool);

    let response = post_json(app.router, "/api/v1/auth/login", json!({"username": "admin"})).await;

    assert!(
        response.status().is_client_error(),
        "expected 4xx, got {}",
        response.status()
    );
}
