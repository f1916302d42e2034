use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use presswork_api::auth::password::hash_password;
use presswork_api::config::ServerConfig;
use presswork_api::router::build_app_router;
use presswork_api::state::AppState;
use presswork_db::models::user::CreateUser;
use presswork_db::repositories::UserRepo;
use presswork_uploads::UploadPool;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "presswork_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url =
        std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://blog.db".into());

    let pool = presswork_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    presswork_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    presswork_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Content directories ---
    tokio::fs::create_dir_all(&config.posts_dir)
        .await
        .expect("Failed to create posts directory");
    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .expect("Failed to create upload directory");

    // --- Admin bootstrap ---
    bootstrap_admin(&pool).await;

    // --- Upload pool ---
    let uploads = UploadPool::start(config.upload_pool_config());

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        uploads: Arc::clone(&uploads),
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    // Drain queued uploads before exit so accepted files are not lost.
    uploads.shutdown().await;

    tracing::info!("Graceful shutdown complete");
}

/// Create the initial admin account when the users table is empty.
///
/// Credentials come from `ADMIN_USERNAME` / `ADMIN_PASSWORD`. With no
/// credentials configured and no existing user, the server still starts
/// but logins cannot succeed; a warning says so.
async fn bootstrap_admin(pool: &presswork_db::DbPool) {
    let existing = UserRepo::count(pool)
        .await
        .expect("Failed to count users");
    if existing > 0 {
        return;
    }

    let (Ok(username), Ok(password)) = (
        std::env::var("ADMIN_USERNAME"),
        std::env::var("ADMIN_PASSWORD"),
    ) else {
        tracing::warn!(
            "No users exist and ADMIN_USERNAME/ADMIN_PASSWORD are unset; logins will fail"
        );
        return;
    };

    let password_hash = hash_password(&password).expect("Failed to hash admin password");
    let user = UserRepo::create(
        pool,
        &CreateUser {
            username,
            password_hash,
        },
    )
    .await
    .expect("Failed to create admin user");

    tracing::info!(username = %user.username, "Created initial admin user");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
