use std::sync::Arc;

use presswork_uploads::UploadPool;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: presswork_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Bounded upload-processing pool.
    pub uploads: Arc<UploadPool>,
}
