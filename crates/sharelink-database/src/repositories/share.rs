//! Share repository implementation.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use sharelink_core::error::{AppError, ErrorKind, GoneReason};
use sharelink_core::result::AppResult;
use sharelink_entity::share::{NewShare, Share};

/// Outcome of a conditional download-counter increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadSlot {
    /// The download was counted; carries the new counter value.
    Granted {
        /// Counter value after the increment.
        downloads: i64,
    },
    /// The share could not take another download.
    Rejected(GoneReason),
}

/// Repository for share CRUD, token lookup and download accounting.
#[derive(Debug, Clone)]
pub struct ShareRepository {
    pool: SqlitePool,
}

impl ShareRepository {
    /// Create a new share repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find a share by ID.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Share>> {
        sqlx::query_as::<_, Share>("SELECT * FROM shares WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find share", e))
    }

    /// Find a share by token, whatever its state.
    pub async fn find_by_token(&self, token: &str) -> AppResult<Option<Share>> {
        sqlx::query_as::<_, Share>("SELECT * FROM shares WHERE token = ?")
            .bind(token)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find share by token", e)
            })
    }

    /// List shares created by a user, newest first.
    pub async fn find_by_creator(&self, user_id: Uuid) -> AppResult<Vec<Share>> {
        sqlx::query_as::<_, Share>(
            "SELECT * FROM shares WHERE created_by = ? ORDER BY created_at DESC, rowid DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list shares", e))
    }

    /// List shares targeting a path, newest first.
    pub async fn find_by_path(&self, path: &str) -> AppResult<Vec<Share>> {
        sqlx::query_as::<_, Share>(
            "SELECT * FROM shares WHERE path = ? ORDER BY created_at DESC, rowid DESC",
        )
        .bind(path)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list shares by path", e)
        })
    }

    /// Insert a new share.
    ///
    /// A duplicate token or id surfaces as [`ErrorKind::Conflict`].
    pub async fn create(&self, data: &NewShare) -> AppResult<Share> {
        sqlx::query_as::<_, Share>(
            "INSERT INTO shares (id, token, path, created_by, share_type, password_hash, \
             permission, expires_at, max_downloads, downloads, is_active, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 0, 1, ?) RETURNING *",
        )
        .bind(data.id)
        .bind(&data.token)
        .bind(&data.path)
        .bind(data.created_by)
        .bind(data.share_type)
        .bind(&data.password_hash)
        .bind(data.permission)
        .bind(data.expires_at)
        .bind(data.max_downloads)
        .bind(data.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if e.as_database_error()
                .is_some_and(|db| db.is_unique_violation())
            {
                AppError::with_source(ErrorKind::Conflict, "Share token already exists", e)
            } else {
                AppError::with_source(ErrorKind::Database, "Failed to create share", e)
            }
        })
    }

    /// Persist the mutable fields of a share.
    ///
    /// The new cap is checked against the stored `downloads` in the same
    /// statement, so a cap below the downloads already served is refused
    /// even when they were counted after `share` was read.
    pub async fn update(&self, share: &Share) -> AppResult<Share> {
        let updated = sqlx::query_as::<_, Share>(
            "UPDATE shares SET share_type = ?, password_hash = ?, permission = ?, \
             expires_at = ?, max_downloads = ?, is_active = ? \
             WHERE id = ? AND (? IS NULL OR downloads <= ?) RETURNING *",
        )
        .bind(share.share_type)
        .bind(&share.password_hash)
        .bind(share.permission)
        .bind(share.expires_at)
        .bind(share.max_downloads)
        .bind(share.is_active)
        .bind(share.id)
        .bind(share.max_downloads)
        .bind(share.max_downloads)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update share", e))?;

        if let Some(updated) = updated {
            return Ok(updated);
        }

        match self.find_by_id(share.id).await? {
            Some(_) => Err(AppError::validation(
                "maxDownloads cannot be lower than the downloads already served",
            )),
            None => Err(AppError::not_found(format!("Share {} not found", share.id))),
        }
    }

    /// Delete a share.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM shares WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete share", e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Share {id} not found")));
        }
        Ok(())
    }

    /// Count one download if the share can still take it at `now`.
    ///
    /// The liveness conditions and the increment run as a single statement,
    /// so concurrent callers can never push `downloads` past `max_downloads`.
    pub async fn increment_downloads(&self, id: Uuid, now: DateTime<Utc>) -> AppResult<DownloadSlot> {
        let downloads: Option<i64> = sqlx::query_scalar(
            "UPDATE shares SET downloads = downloads + 1 \
             WHERE id = ? AND is_active = 1 \
             AND (expires_at IS NULL OR expires_at >= ?) \
             AND (max_downloads IS NULL OR downloads < max_downloads) \
             RETURNING downloads",
        )
        .bind(id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to increment downloads", e)
        })?;

        if let Some(downloads) = downloads {
            return Ok(DownloadSlot::Granted { downloads });
        }

        let share = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Share {id} not found")))?;
        let reason = share
            .liveness_at(now)
            .err()
            .unwrap_or(GoneReason::DownloadLimitReached);
        Ok(DownloadSlot::Rejected(reason))
    }

    /// Delete shares whose expiry is older than `cutoff`. Returns the number removed.
    pub async fn delete_expired_before(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let result =
            sqlx::query("DELETE FROM shares WHERE expires_at IS NOT NULL AND expires_at < ?")
                .bind(cutoff)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to purge expired shares", e)
                })?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use sharelink_entity::share::{SharePermission, ShareType};
    use sharelink_entity::user::CreateUser;

    use crate::DatabasePool;
    use crate::repositories::user::UserRepository;

    async fn setup() -> (ShareRepository, Uuid) {
        let db = DatabasePool::in_memory().await.unwrap();
        let user = UserRepository::new(db.pool().clone())
            .create(&CreateUser {
                username: "owner".to_string(),
                display_name: None,
            })
            .await
            .unwrap();
        (ShareRepository::new(db.pool().clone()), user.id)
    }

    fn new_share(owner: Uuid, token: &str) -> NewShare {
        NewShare {
            id: Uuid::new_v4(),
            token: token.to_string(),
            path: "docs/report.pdf".to_string(),
            created_by: owner,
            share_type: ShareType::Public,
            password_hash: None,
            permission: SharePermission::Download,
            expires_at: None,
            max_downloads: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_and_lookup() {
        let (repo, owner) = setup().await;
        let created = repo.create(&new_share(owner, "tok-1")).await.unwrap();
        assert_eq!(created.downloads, 0);
        assert!(created.is_active);

        let by_token = repo.find_by_token("tok-1").await.unwrap().unwrap();
        assert_eq!(by_token.id, created.id);
        assert_eq!(by_token.share_type, ShareType::Public);

        let by_id = repo.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(by_id.token, "tok-1");
        assert!(repo.find_by_token("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_token_is_conflict() {
        let (repo, owner) = setup().await;
        repo.create(&new_share(owner, "dup")).await.unwrap();
        let err = repo.create(&new_share(owner, "dup")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_find_by_creator_newest_first() {
        let (repo, owner) = setup().await;
        let now = Utc::now();
        for (i, token) in ["a", "b", "c"].iter().enumerate() {
            let mut data = new_share(owner, token);
            data.created_at = now + Duration::seconds(i as i64);
            repo.create(&data).await.unwrap();
        }

        let tokens: Vec<String> = repo
            .find_by_creator(owner)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.token)
            .collect();
        assert_eq!(tokens, vec!["c", "b", "a"]);
        assert!(repo.find_by_creator(Uuid::new_v4()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_by_path() {
        let (repo, owner) = setup().await;
        repo.create(&new_share(owner, "p1")).await.unwrap();
        let mut other = new_share(owner, "p2");
        other.path = "docs".to_string();
        repo.create(&other).await.unwrap();

        let shares = repo.find_by_path("docs").await.unwrap();
        assert_eq!(shares.len(), 1);
        assert_eq!(shares[0].token, "p2");
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let (repo, owner) = setup().await;
        let mut share = repo.create(&new_share(owner, "upd")).await.unwrap();

        share.is_active = false;
        share.max_downloads = Some(10);
        share.permission = SharePermission::View;
        let updated = repo.update(&share).await.unwrap();
        assert!(!updated.is_active);
        assert_eq!(updated.max_downloads, Some(10));
        assert_eq!(updated.permission, SharePermission::View);

        repo.delete(share.id).await.unwrap();
        assert!(repo.delete(share.id).await.unwrap_err().is_not_found());
        assert!(repo.update(&share).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_update_rejects_cap_below_concurrent_downloads() {
        let (repo, owner) = setup().await;
        let stale = repo.create(&new_share(owner, "stale")).await.unwrap();
        assert_eq!(stale.downloads, 0);

        let now = Utc::now();
        repo.increment_downloads(stale.id, now).await.unwrap();
        repo.increment_downloads(stale.id, now).await.unwrap();

        let mut lowered = stale.clone();
        lowered.max_downloads = Some(1);
        let err = repo.update(&lowered).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);

        let stored = repo.find_by_id(stale.id).await.unwrap().unwrap();
        assert_eq!(stored.downloads, 2);
        assert_eq!(stored.max_downloads, None);

        lowered.max_downloads = Some(2);
        let updated = repo.update(&lowered).await.unwrap();
        assert_eq!(updated.max_downloads, Some(2));
        assert_eq!(updated.downloads, 2);
    }

    #[tokio::test]
    async fn test_increment_respects_cap() {
        let (repo, owner) = setup().await;
        let mut data = new_share(owner, "cap");
        data.max_downloads = Some(2);
        let share = repo.create(&data).await.unwrap();
        let now = Utc::now();

        assert_eq!(
            repo.increment_downloads(share.id, now).await.unwrap(),
            DownloadSlot::Granted { downloads: 1 }
        );
        assert_eq!(
            repo.increment_downloads(share.id, now).await.unwrap(),
            DownloadSlot::Granted { downloads: 2 }
        );
        assert_eq!(
            repo.increment_downloads(share.id, now).await.unwrap(),
            DownloadSlot::Rejected(GoneReason::DownloadLimitReached)
        );
        assert_eq!(repo.find_by_id(share.id).await.unwrap().unwrap().downloads, 2);
    }

    #[tokio::test]
    async fn test_increment_rejects_revoked_and_expired() {
        let (repo, owner) = setup().await;
        let now = Utc::now();

        let mut expired = new_share(owner, "exp");
        expired.expires_at = Some(now - Duration::minutes(5));
        let expired = repo.create(&expired).await.unwrap();
        assert_eq!(
            repo.increment_downloads(expired.id, now).await.unwrap(),
            DownloadSlot::Rejected(GoneReason::Expired)
        );

        let mut revoked = repo.create(&new_share(owner, "rev")).await.unwrap();
        revoked.is_active = false;
        repo.update(&revoked).await.unwrap();
        assert_eq!(
            repo.increment_downloads(revoked.id, now).await.unwrap(),
            DownloadSlot::Rejected(GoneReason::Inactive)
        );

        let err = repo
            .increment_downloads(Uuid::new_v4(), now)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_expired_before() {
        let (repo, owner) = setup().await;
        let now = Utc::now();

        let mut old = new_share(owner, "old");
        old.expires_at = Some(now - Duration::days(30));
        repo.create(&old).await.unwrap();
        let mut recent = new_share(owner, "recent");
        recent.expires_at = Some(now - Duration::hours(1));
        repo.create(&recent).await.unwrap();
        repo.create(&new_share(owner, "forever")).await.unwrap();

        let removed = repo
            .delete_expired_before(now - Duration::days(7))
            .await
            .unwrap();
        assert_eq!(removed, 1);
        assert!(repo.find_by_token("old").await.unwrap().is_none());
        assert!(repo.find_by_token("recent").await.unwrap().is_some());
        assert!(repo.find_by_token("forever").await.unwrap().is_some());
    }
}
