//! Handlers for the markdown post store.
//!
//! Posts live as `.md` files under the configured posts directory. The
//! slug is the file name without its extension; creation timestamps come
//! from file mtime, so there is no post table in the database.

use std::path::Path;

use axum::extract::{Path as UrlPath, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use presswork_core::error::CoreError;
use presswork_core::post::{
    compose_post, derive_title, parse_front_matter, render_markdown, DEFAULT_AUTHOR,
};
use presswork_core::upload::validate_file_name;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// A rendered post as exposed over the API.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Slug, i.e. the file name without the `.md` extension.
    pub id: String,
    pub title: String,
    pub content_html: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
    pub file_name: String,
}

/// Request body for `POST /posts/{slug}`.
#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    /// Defaults to [`DEFAULT_AUTHOR`] when absent.
    pub author: Option<String>,
}

/// Response body for a created post.
#[derive(Debug, Serialize)]
pub struct CreatedPost {
    pub message: &'static str,
    pub id: String,
    pub url: String,
}

/// Read and render one post file.
///
/// `NotFound` is returned for missing files; other I/O failures bubble up
/// as internal errors.
async fn load_rendered(posts_dir: &Path, slug: &str) -> AppResult<Post> {
    let file_name = format!("{slug}.md");
    let path = posts_dir.join(&file_name);

    let content = match tokio::fs::read_to_string(&path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::Core(CoreError::NotFound {
                entity: "Post",
                id: slug.to_string(),
            }));
        }
        Err(e) => {
            return Err(AppError::InternalError(format!(
                "Failed to read post {file_name}: {e}"
            )));
        }
    };

    let created_at = tokio::fs::metadata(&path)
        .await
        .and_then(|m| m.modified())
        .map(DateTime::<Utc>::from)
        .unwrap_or_else(|_| Utc::now());

    let parsed = parse_front_matter(&content);
    let title = derive_title(&parsed.body, slug);

    Ok(Post {
        id: slug.to_string(),
        title,
        content_html: render_markdown(&parsed.body),
        author: parsed.author,
        created_at,
        file_name,
    })
}

/// Slugs come straight from the URL; anything that would not be a plain
/// file name (separators, `..`, control characters) is treated as a
/// missing post rather than an error worth distinguishing.
fn checked_slug(slug: &str) -> AppResult<&str> {
    validate_file_name(slug).map_err(|_| {
        AppError::Core(CoreError::NotFound {
            entity: "Post",
            id: slug.to_string(),
        })
    })?;
    Ok(slug)
}

/// GET /api/v1/posts -- all posts, newest first.
pub async fn list_posts(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Post>>>> {
    let posts_dir = &state.config.posts_dir;
    let mut entries = tokio::fs::read_dir(posts_dir)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to read posts directory: {e}")))?;

    let mut posts = Vec::new();
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to read posts directory: {e}")))?
    {
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("md") {
            continue;
        }
        let Some(slug) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        match load_rendered(posts_dir, slug).await {
            Ok(post) => posts.push(post),
            Err(e) => {
                // A single unreadable file should not take down the list.
                tracing::warn!(slug, error = %e, "Skipping unreadable post");
            }
        }
    }

    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(Json(DataResponse { data: posts }))
}

/// GET /api/v1/posts/{slug}
pub async fn get_post(
    State(state): State<AppState>,
    UrlPath(slug): UrlPath<String>,
) -> AppResult<Json<DataResponse<Post>>> {
    let slug = checked_slug(&slug)?;
    let post = load_rendered(&state.config.posts_dir, slug).await?;
    Ok(Json(DataResponse { data: post }))
}

/// POST /api/v1/posts/{slug}
///
/// Writes a new markdown file with author front matter. An existing slug
/// is a 409; `create_new` makes the existence check and the write one
/// atomic step.
pub async fn create_post(
    State(state): State<AppState>,
    UrlPath(slug): UrlPath<String>,
    Json(input): Json<CreatePostRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<CreatedPost>>)> {
    validate_file_name(&slug)
        .map_err(|e| AppError::Core(CoreError::Validation(format!("Invalid slug: {e}"))))?;

    if input.title.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Title must not be empty".into(),
        )));
    }
    if input.content.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Content must not be empty".into(),
        )));
    }

    let author = input
        .author
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .unwrap_or(DEFAULT_AUTHOR);

    let file_name = format!("{slug}.md");
    let path = state.config.posts_dir.join(&file_name);
    let content = compose_post(author, input.title.trim(), &input.content);

    let mut file = match tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .await
    {
        Ok(file) => file,
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            return Err(AppError::Core(CoreError::Conflict(format!(
                "A post with slug \"{slug}\" already exists"
            ))));
        }
        Err(e) => {
            return Err(AppError::InternalError(format!(
                "Failed to create post file: {e}"
            )));
        }
    };

    tokio::io::AsyncWriteExt::write_all(&mut file, content.as_bytes())
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to write post file: {e}")))?;

    tracing::info!(slug, author, "Post created");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: CreatedPost {
                message: "Post created",
                id: slug.clone(),
                url: format!("{}/api/v1/posts/{slug}", state.config.public_base_url),
            },
        }),
    ))
}
