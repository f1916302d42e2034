//! Route registration.

pub mod health;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /posts               GET  list all posts
/// /posts/{slug}        GET  fetch one rendered post
/// /posts/{slug}        POST create a post from JSON (409 on duplicate slug)
///
/// /pages/{name}        GET  rendered static page (about, contact)
///
/// /uploads             POST multipart file upload through the worker pool
///
/// /auth/login          POST credential check
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/posts",
            get(handlers::posts::list_posts),
        )
        .route(
            "/posts/{slug}",
            get(handlers::posts::get_post).post(handlers::posts::create_post),
        )
        .route("/pages/{name}", get(handlers::pages::get_page))
        .route("/uploads", post(handlers::uploads::upload_files))
        .route("/auth/login", post(handlers::auth::login))
}
