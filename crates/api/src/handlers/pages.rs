//! Handlers for the fixed site pages.
//!
//! Pages share the posts directory and the markdown pipeline but are
//! addressed by a small allow list rather than enumerated.

use axum::extract::{Path as UrlPath, State};
use axum::Json;
use serde::Serialize;

use presswork_core::error::CoreError;
use presswork_core::post::{derive_title, parse_front_matter, render_markdown};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Page names that may be requested. Anything else is a 404, which also
/// keeps arbitrary file names out of the path join below.
const ALLOWED_PAGES: &[&str] = &["about", "contact"];

/// A rendered static page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: String,
    pub title: String,
    pub content_html: String,
}

/// GET /api/v1/pages/{name}
pub async fn get_page(
    State(state): State<AppState>,
    UrlPath(name): UrlPath<String>,
) -> AppResult<Json<DataResponse<Page>>> {
    if !ALLOWED_PAGES.contains(&name.as_str()) {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Page",
            id: name,
        }));
    }

    let path = state.config.posts_dir.join(format!("{name}.md"));
    let content = match tokio::fs::read_to_string(&path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::Core(CoreError::NotFound {
                entity: "Page",
                id: name,
            }));
        }
        Err(e) => {
            return Err(AppError::InternalError(format!(
                "Failed to read page {name}: {e}"
            )));
        }
    };

    let parsed = parse_front_matter(&content);
    let title = derive_title(&parsed.body, &name);

    Ok(Json(DataResponse {
        data: Page {
            id: name,
            title,
            content_html: render_markdown(&parsed.body),
        },
    }))
}
