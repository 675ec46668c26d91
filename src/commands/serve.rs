//! Serve command - Starts the HTTP server.

use std::sync::Arc;

use crate::cli::args::ServeArgs;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::{connect_session_store, Database};
use crate::web::{create_router, AppState};

/// Execute the serve command
pub async fn execute(args: ServeArgs, config: Config) -> AppResult<()> {
    tracing::info!("Starting server...");

    // Pending migrations run on connect
    let db = Arc::new(Database::connect(&config).await?);
    tracing::info!("Database connected");

    let sessions = connect_session_store(&config).await?;
    tracing::info!(backend = ?config.session_backend, "Session store ready");

    let app_state = AppState::from_config(db, sessions, &config);
    let app = create_router(app_state);

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", addr, e)))?;

    tracing::info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    Ok(())
}
