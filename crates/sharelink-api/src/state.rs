//! Application state shared across all handlers and extractors.

use std::sync::Arc;

use sharelink_auth::JwtDecoder;
use sharelink_core::config::AppConfig;
use sharelink_core::traits::StorageProvider;
use sharelink_database::{DatabasePool, ShareRepository, UserRepository};
use sharelink_service::{AccessService, ShareService};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are cheap to clone across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// SQLite connection pool
    pub db: DatabasePool,
    /// Storage provider holding the shared tree
    pub storage: Arc<dyn StorageProvider>,

    // ── Auth ─────────────────────────────────────────────────
    /// JWT token decoder and validator
    pub jwt_decoder: Arc<JwtDecoder>,

    // ── Repositories ─────────────────────────────────────────
    /// User repository
    pub user_repo: Arc<UserRepository>,
    /// Share repository
    pub share_repo: Arc<ShareRepository>,

    // ── Services ─────────────────────────────────────────────
    /// Owner-facing share service
    pub share_service: Arc<ShareService>,
    /// Public share access service
    pub access_service: Arc<AccessService>,
}
