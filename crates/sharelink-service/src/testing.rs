//! Shared fixtures for service tests.

use std::sync::Arc;

use tempfile::TempDir;

use sharelink_auth::PasswordHasher;
use sharelink_core::config::database::DatabaseConfig;
use sharelink_core::traits::StorageProvider;
use sharelink_database::migration::run_migrations;
use sharelink_database::{DatabasePool, ShareRepository, UserRepository};
use sharelink_entity::user::CreateUser;
use sharelink_storage::LocalStorageProvider;

use crate::context::RequestContext;
use crate::share::{AccessService, LinkService, ShareService};

pub(crate) const REPORT_BYTES: &[u8] = b"%PDF-1.4 quarterly report";

pub(crate) struct Fixture {
    pub dir: TempDir,
    pub db: DatabasePool,
    pub share_repo: Arc<ShareRepository>,
    pub shares: ShareService,
    pub access: AccessService,
    pub alice: RequestContext,
    pub bob: RequestContext,
}

/// Fixture on a private in-memory database (one connection).
pub(crate) async fn fixture() -> Fixture {
    let db = DatabasePool::in_memory().await.unwrap();
    fixture_on(db).await
}

/// Fixture on a file-backed database with the default connection pool, so
/// concurrent tasks run on separate SQLite connections.
pub(crate) async fn pooled_fixture() -> (TempDir, Fixture) {
    let db_dir = tempfile::tempdir().unwrap();
    let config = DatabaseConfig {
        url: format!("sqlite://{}", db_dir.path().join("shares.db").display()),
        ..Default::default()
    };
    let db = DatabasePool::connect(&config).await.unwrap();
    run_migrations(db.pool()).await.unwrap();
    (db_dir, fixture_on(db).await)
}

async fn fixture_on(db: DatabasePool) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("docs/sub")).unwrap();
    std::fs::create_dir_all(dir.path().join(".avatars")).unwrap();
    std::fs::write(dir.path().join("docs/report.pdf"), REPORT_BYTES).unwrap();
    std::fs::write(dir.path().join("docs/notes.txt"), b"notes").unwrap();
    std::fs::write(dir.path().join(".avatars/me.png"), b"png").unwrap();

    let storage: Arc<dyn StorageProvider> = Arc::new(
        LocalStorageProvider::new(dir.path().to_str().unwrap())
            .await
            .unwrap(),
    );

    let users = UserRepository::new(db.pool().clone());
    let mut contexts = Vec::new();
    for name in ["alice", "bob"] {
        let user = users
            .create(&CreateUser {
                username: name.to_string(),
                display_name: None,
            })
            .await
            .unwrap();
        contexts.push(RequestContext::new(user.id, user.username));
    }
    let bob = contexts.pop().unwrap();
    let alice = contexts.pop().unwrap();

    let share_repo = Arc::new(ShareRepository::new(db.pool().clone()));
    let hasher = Arc::new(PasswordHasher::new());
    let hidden = vec![".avatars".to_string()];

    let shares = ShareService::new(
        share_repo.clone(),
        storage.clone(),
        Arc::new(LinkService::new("http://localhost:8080", "/s/")),
        hasher.clone(),
        hidden.clone(),
    );
    let access = AccessService::new(share_repo.clone(), storage, hasher, hidden);

    Fixture {
        dir,
        db,
        share_repo,
        shares,
        access,
        alice,
        bob,
    }
}
