use std::path::PathBuf;
use std::time::Duration;

use presswork_uploads::UploadPoolConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8080`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Directory holding the markdown posts.
    pub posts_dir: PathBuf,
    /// Directory uploads are persisted into (also served under `/assets`).
    pub upload_dir: PathBuf,
    /// Base URL used to build public asset links in upload responses.
    pub public_base_url: String,
    /// Number of upload workers (default: `5`).
    pub upload_workers: usize,
    /// Bounded upload queue capacity (default: `48`).
    pub upload_queue_capacity: usize,
    /// Deadline for awaiting an upload result, in seconds (default: `30`).
    pub upload_reply_timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                  |
    /// |-----------------------------|--------------------------|
    /// | `HOST`                      | `0.0.0.0`                |
    /// | `PORT`                      | `8080`                   |
    /// | `CORS_ORIGINS`              | `http://localhost:3000`  |
    /// | `REQUEST_TIMEOUT_SECS`      | `30`                     |
    /// | `POSTS_DIR`                 | `./posts`                |
    /// | `UPLOAD_DIR`                | `./posts/assets`         |
    /// | `PUBLIC_BASE_URL`           | `http://localhost:8080`  |
    /// | `UPLOAD_WORKERS`            | `5`                      |
    /// | `UPLOAD_QUEUE_CAPACITY`     | `48`                     |
    /// | `UPLOAD_REPLY_TIMEOUT_SECS` | `30`                     |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8080".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let posts_dir = PathBuf::from(std::env::var("POSTS_DIR").unwrap_or_else(|_| "./posts".into()));

        let upload_dir = PathBuf::from(
            std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "./posts/assets".into()),
        );

        let public_base_url = std::env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8080".into())
            .trim_end_matches('/')
            .to_string();

        let upload_workers: usize = std::env::var("UPLOAD_WORKERS")
            .unwrap_or_else(|_| "5".into())
            .parse()
            .expect("UPLOAD_WORKERS must be a valid usize");

        let upload_queue_capacity: usize = std::env::var("UPLOAD_QUEUE_CAPACITY")
            .unwrap_or_else(|_| "48".into())
            .parse()
            .expect("UPLOAD_QUEUE_CAPACITY must be a valid usize");

        let upload_reply_timeout_secs: u64 = std::env::var("UPLOAD_REPLY_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("UPLOAD_REPLY_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            posts_dir,
            upload_dir,
            public_base_url,
            upload_workers,
            upload_queue_capacity,
            upload_reply_timeout_secs,
        }
    }

    /// Upload pool sizing derived from this configuration.
    pub fn upload_pool_config(&self) -> UploadPoolConfig {
        UploadPoolConfig {
            worker_count: self.upload_workers,
            queue_capacity: self.upload_queue_capacity,
            reply_timeout: Duration::from_secs(self.upload_reply_timeout_secs),
        }
    }
}
