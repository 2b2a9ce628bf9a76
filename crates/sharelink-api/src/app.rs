//! Application builder: wires router, middleware and state into an Axum app
//! and runs the server.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware as axum_middleware;
use chrono::TimeDelta;
use tokio::sync::watch;
use tower_http::trace::TraceLayer;

use sharelink_auth::{JwtDecoder, PasswordHasher};
use sharelink_core::config::AppConfig;
use sharelink_core::config::share::ShareConfig;
use sharelink_core::error::AppError;
use sharelink_core::traits::StorageProvider;
use sharelink_database::{DatabasePool, ShareRepository, UserRepository};
use sharelink_service::{AccessService, LinkService, ShareCleanup, ShareService};
use sharelink_storage::LocalStorageProvider;

use crate::middleware::cors::build_cors_layer;
use crate::middleware::logging::request_logging;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let max_body = state.config.server.max_body_bytes;
    let cors = build_cors_layer(&state.config.server.cors);

    build_router(state)
        .layer(DefaultBodyLimit::max(max_body))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(request_logging))
}

/// Wires repositories, storage and services into an [`AppState`].
///
/// The database must already be migrated.
pub async fn build_state(config: AppConfig, db: DatabasePool) -> Result<AppState, AppError> {
    tracing::info!(root = %config.storage.root_path, "Initializing local storage");
    let storage: Arc<dyn StorageProvider> =
        Arc::new(LocalStorageProvider::new(&config.storage.root_path).await?);

    let user_repo = Arc::new(UserRepository::new(db.pool().clone()));
    let share_repo = Arc::new(ShareRepository::new(db.pool().clone()));

    let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));
    let hasher = Arc::new(PasswordHasher::new());
    let link_service = Arc::new(LinkService::new(
        config.server.base_url.clone(),
        config.share.link_prefix.clone(),
    ));
    let hidden = config.storage.hidden_paths.clone();

    let share_service = Arc::new(ShareService::new(
        Arc::clone(&share_repo),
        Arc::clone(&storage),
        link_service,
        Arc::clone(&hasher),
        hidden.clone(),
    ));
    let access_service = Arc::new(AccessService::new(
        Arc::clone(&share_repo),
        Arc::clone(&storage),
        hasher,
        hidden,
    ));

    Ok(AppState {
        config: Arc::new(config),
        db,
        storage,
        jwt_decoder,
        user_repo,
        share_repo,
        share_service,
        access_service,
    })
}

/// Runs the ShareLink server until a shutdown signal arrives.
pub async fn run_server(config: AppConfig, db: DatabasePool) -> Result<(), AppError> {
    tracing::info!("Starting ShareLink server...");

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let schedule = cleanup_schedule(&config.share)?;

    let state = build_state(config, db.clone()).await?;
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let cleanup_handle = match schedule {
        Some((interval, retention)) => {
            let cleanup = ShareCleanup::new(Arc::clone(&state.share_repo), interval, retention);
            Some(tokio::spawn(cleanup.run(shutdown_rx)))
        }
        None => {
            tracing::info!("Share cleanup disabled");
            None
        }
    };

    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("ShareLink server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = shutdown_tx.send(true);
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    if let Some(handle) = cleanup_handle {
        let _ = handle.await;
    }
    db.close().await;

    tracing::info!("ShareLink server stopped");
    Ok(())
}

/// Cleanup interval and expired-share retention, or `None` when cleanup is disabled.
fn cleanup_schedule(config: &ShareConfig) -> Result<Option<(Duration, TimeDelta)>, AppError> {
    if config.cleanup_interval_minutes == 0 {
        return Ok(None);
    }

    let interval = config
        .cleanup_interval_minutes
        .checked_mul(60)
        .map(Duration::from_secs)
        .ok_or_else(|| AppError::configuration("share.cleanup_interval_minutes is out of range"))?;
    let retention = i64::try_from(config.expired_retention_hours)
        .ok()
        .and_then(TimeDelta::try_hours)
        .ok_or_else(|| AppError::configuration("share.expired_retention_hours is out of range"))?;

    Ok(Some((interval, retention)))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
