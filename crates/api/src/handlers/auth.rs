//! Handler for the `/auth` resource.
//!
//! A single credential check against the lone admin row. No sessions, no
//! tokens: the frontend only needs a yes/no before showing its editor UI.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use presswork_core::error::CoreError;
use presswork_db::repositories::UserRepo;

use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response body for a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
}

/// POST /api/v1/auth/login
///
/// Unknown usernames and wrong passwords produce the same 401 so the
/// endpoint doesn't leak which usernames exist.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let user = UserRepo::find_by_username(&state.pool, &input.username)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid username or password".into(),
            ))
        })?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;

    if !password_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid username or password".into(),
        )));
    }

    tracing::info!(username = %user.username, "Login succeeded");
    Ok(Json(LoginResponse {
        message: "Login succeeded",
    }))
}
