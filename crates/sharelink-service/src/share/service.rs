//! Share CRUD service for share owners.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use sharelink_auth::PasswordHasher;
use sharelink_core::error::{AppError, ErrorKind};
use sharelink_core::result::AppResult;
use sharelink_core::traits::StorageProvider;
use sharelink_database::ShareRepository;
use sharelink_entity::share::{NewShare, Share, SharePermission, ShareType};
use sharelink_storage::{is_hidden, normalize_path};

use super::link::LinkService;
use crate::context::RequestContext;

/// Insert attempts before a token collision is reported as a failure.
const MAX_TOKEN_ATTEMPTS: usize = 3;

/// Manages share creation, listing, update and deletion.
#[derive(Debug, Clone)]
pub struct ShareService {
    /// Share repository.
    share_repo: Arc<ShareRepository>,
    /// Storage provider the shared paths live in.
    storage: Arc<dyn StorageProvider>,
    /// Link service for token generation.
    link_service: Arc<LinkService>,
    /// Password hasher for password-protected shares.
    hasher: Arc<PasswordHasher>,
    /// Paths that may never be shared.
    hidden_paths: Vec<String>,
}

/// Request to create a new share.
#[derive(Debug, Clone, Default)]
pub struct CreateShareRequest {
    /// Path to share, relative to the storage root.
    pub path: String,
    /// Share type (defaults to public).
    pub share_type: Option<ShareType>,
    /// Password, required for password shares.
    pub password: Option<String>,
    /// Permission level (defaults to download).
    pub permission: Option<SharePermission>,
    /// Expiration time (optional).
    pub expires_at: Option<DateTime<Utc>>,
    /// Maximum downloads (None = unlimited).
    pub max_downloads: Option<i64>,
}

/// Request to update an existing share. `None` leaves a field unchanged;
/// `Some(None)` clears an optional field.
#[derive(Debug, Clone, Default)]
pub struct UpdateShareRequest {
    /// New share type.
    pub share_type: Option<ShareType>,
    /// New password; implies a password share.
    pub password: Option<String>,
    /// New permission.
    pub permission: Option<SharePermission>,
    /// New or cleared expiration.
    pub expires_at: Option<Option<DateTime<Utc>>>,
    /// New or cleared download cap.
    pub max_downloads: Option<Option<i64>>,
    /// Revoke (`false`) or reactivate (`true`).
    pub is_active: Option<bool>,
}

impl ShareService {
    /// Creates a new share service.
    pub fn new(
        share_repo: Arc<ShareRepository>,
        storage: Arc<dyn StorageProvider>,
        link_service: Arc<LinkService>,
        hasher: Arc<PasswordHasher>,
        hidden_paths: Vec<String>,
    ) -> Self {
        Self {
            share_repo,
            storage,
            link_service,
            hasher,
            hidden_paths,
        }
    }

    /// The link service used to render share URLs.
    pub fn links(&self) -> &LinkService {
        &self.link_service
    }

    /// Creates a new share on an existing path.
    pub async fn create_share(
        &self,
        ctx: &RequestContext,
        req: CreateShareRequest,
    ) -> AppResult<Share> {
        if req.path.trim().is_empty() {
            return Err(AppError::validation("Path is required"));
        }
        let path = normalize_path(req.path.trim())?;
        if path.is_empty() {
            return Err(AppError::validation("The storage root cannot be shared"));
        }
        if is_hidden(&path, &self.hidden_paths) {
            return Err(AppError::not_found(format!("Path not found: {path}")));
        }
        self.storage.metadata(&path).await?;

        let share_type = req.share_type.unwrap_or_default();
        let permission = req.permission.unwrap_or_default();
        let password = req.password.filter(|p| !p.is_empty());
        let password_hash = match (share_type, password) {
            (ShareType::Password, Some(password)) => Some(self.hasher.hash_password(&password)?),
            (ShareType::Password, None) => {
                return Err(AppError::validation(
                    "Password is required for password-protected shares",
                ));
            }
            (ShareType::Public, Some(_)) => {
                return Err(AppError::validation(
                    "Password is only allowed for password-protected shares",
                ));
            }
            (ShareType::Public, None) => None,
        };
        validate_max_downloads(req.max_downloads)?;

        let mut attempt = 0;
        let share = loop {
            attempt += 1;
            let data = NewShare {
                id: Uuid::new_v4(),
                token: self.link_service.generate_token(),
                path: path.clone(),
                created_by: ctx.user_id,
                share_type,
                password_hash: password_hash.clone(),
                permission,
                expires_at: req.expires_at,
                max_downloads: req.max_downloads,
                created_at: Utc::now(),
            };

            match self.share_repo.create(&data).await {
                Ok(share) => break share,
                Err(e) if e.kind == ErrorKind::Conflict && attempt < MAX_TOKEN_ATTEMPTS => {
                    warn!(attempt, "Share token collision, retrying");
                }
                Err(e) if e.kind == ErrorKind::Conflict => {
                    return Err(AppError::internal("Failed to allocate a unique share token"));
                }
                Err(e) => return Err(e),
            }
        };

        info!(
            user_id = %ctx.user_id,
            share_id = %share.id,
            path = %share.path,
            share_type = ?share.share_type,
            permission = ?share.permission,
            "Share created"
        );

        Ok(share)
    }

    /// Lists the caller's shares, newest first, optionally for one path.
    pub async fn list_shares(
        &self,
        ctx: &RequestContext,
        path: Option<&str>,
    ) -> AppResult<Vec<Share>> {
        match path {
            Some(path) => {
                let path = normalize_path(path)?;
                let shares = self.share_repo.find_by_path(&path).await?;
                Ok(shares
                    .into_iter()
                    .filter(|s| s.is_owned_by(ctx.user_id))
                    .collect())
            }
            None => self.share_repo.find_by_creator(ctx.user_id).await,
        }
    }

    /// Gets a share by ID. Only its creator may see it.
    pub async fn get_share(&self, ctx: &RequestContext, share_id: Uuid) -> AppResult<Share> {
        let share = self
            .share_repo
            .find_by_id(share_id)
            .await?
            .ok_or_else(|| AppError::not_found("Share not found"))?;

        if !share.is_owned_by(ctx.user_id) {
            return Err(AppError::forbidden("You can only manage your own shares"));
        }

        Ok(share)
    }

    /// Updates a share's settings.
    pub async fn update_share(
        &self,
        ctx: &RequestContext,
        share_id: Uuid,
        req: UpdateShareRequest,
    ) -> AppResult<Share> {
        let mut share = self.get_share(ctx, share_id).await?;

        let password = req.password.filter(|p| !p.is_empty());
        let share_type = req.share_type.unwrap_or(if password.is_some() {
            ShareType::Password
        } else {
            share.share_type
        });

        match (share_type, password) {
            (ShareType::Password, Some(password)) => {
                share.password_hash = Some(self.hasher.hash_password(&password)?);
            }
            (ShareType::Password, None) => {
                if share.password_hash.is_none() {
                    return Err(AppError::validation(
                        "Password is required for password-protected shares",
                    ));
                }
            }
            (ShareType::Public, Some(_)) => {
                return Err(AppError::validation(
                    "Password is only allowed for password-protected shares",
                ));
            }
            (ShareType::Public, None) => share.password_hash = None,
        }
        share.share_type = share_type;

        if let Some(permission) = req.permission {
            share.permission = permission;
        }
        if let Some(expires_at) = req.expires_at {
            share.expires_at = expires_at;
        }
        if let Some(max_downloads) = req.max_downloads {
            validate_max_downloads(max_downloads)?;
            if max_downloads.is_some_and(|max| max < share.downloads) {
                return Err(AppError::validation(
                    "maxDownloads cannot be lower than the downloads already served",
                ));
            }
            share.max_downloads = max_downloads;
        }
        if let Some(is_active) = req.is_active {
            share.is_active = is_active;
        }

        let share = self.share_repo.update(&share).await?;

        info!(
            user_id = %ctx.user_id,
            share_id = %share_id,
            is_active = share.is_active,
            "Share updated"
        );

        Ok(share)
    }

    /// Deletes a share permanently.
    pub async fn delete_share(&self, ctx: &RequestContext, share_id: Uuid) -> AppResult<()> {
        let share = self.get_share(ctx, share_id).await?;
        self.share_repo.delete(share.id).await?;

        info!(
            user_id = %ctx.user_id,
            share_id = %share_id,
            "Share deleted"
        );

        Ok(())
    }
}

fn validate_max_downloads(max_downloads: Option<i64>) -> AppResult<()> {
    if max_downloads.is_some_and(|max| max < 0) {
        return Err(AppError::validation("maxDownloads must not be negative"));
    }
    Ok(())
}
