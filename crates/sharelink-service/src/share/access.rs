//! Public share access: resolves a token and decides what the link holder gets.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use sharelink_auth::PasswordHasher;
use sharelink_core::error::AppError;
use sharelink_core::result::AppResult;
use sharelink_core::traits::{ByteStream, FileEntry, StorageProvider};
use sharelink_database::{DownloadSlot, ShareRepository};
use sharelink_entity::share::{Share, SharePermission};
use sharelink_storage::{content_type_for, file_name_of, is_hidden};

/// What the link holder is asking for.
#[derive(Debug, Clone)]
pub enum AccessIntent {
    /// Plain read (GET).
    Read,
    /// Read with the share password (POST).
    Unlock {
        /// The password supplied by the link holder.
        password: String,
    },
}

/// A file delivery authorized and counted against the share.
pub struct SharedDownload {
    /// Download file name (last path component).
    pub file_name: String,
    /// Guessed content type.
    pub content_type: String,
    /// Size in bytes.
    pub size: u64,
    /// The share's download count including this delivery.
    pub downloads: i64,
    /// File contents.
    pub stream: ByteStream,
}

impl std::fmt::Debug for SharedDownload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedDownload")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("size", &self.size)
            .field("downloads", &self.downloads)
            .finish_non_exhaustive()
    }
}

/// Outcome of a successful share access.
#[derive(Debug)]
pub enum ShareAccess {
    /// The share is password-protected and no password was supplied.
    PasswordRequired {
        /// Shared path.
        path: String,
    },
    /// The share points at a directory.
    Listing {
        /// Shared path.
        path: String,
        /// Permission granted by the share.
        permission: SharePermission,
        /// Visible directory entries.
        files: Vec<FileEntry>,
    },
    /// The share points at a file but only grants viewing.
    Preview {
        /// Shared path.
        path: String,
        /// Permission granted by the share.
        permission: SharePermission,
        /// File metadata.
        file: FileEntry,
    },
    /// The share points at a file and grants downloading.
    Download(SharedDownload),
}

/// Handles public share access validation and delivery.
#[derive(Debug, Clone)]
pub struct AccessService {
    /// Share repository.
    share_repo: Arc<ShareRepository>,
    /// Storage provider the shared paths live in.
    storage: Arc<dyn StorageProvider>,
    /// Password hasher for verification.
    hasher: Arc<PasswordHasher>,
    /// Entries filtered out of listings.
    hidden_paths: Vec<String>,
}

impl AccessService {
    /// Creates a new access service.
    pub fn new(
        share_repo: Arc<ShareRepository>,
        storage: Arc<dyn StorageProvider>,
        hasher: Arc<PasswordHasher>,
        hidden_paths: Vec<String>,
    ) -> Self {
        Self {
            share_repo,
            storage,
            hasher,
            hidden_paths,
        }
    }

    /// Resolves a token to a live share.
    ///
    /// Unknown tokens are `NotFound`; revoked, expired and exhausted shares
    /// are `Gone` with the matching reason.
    pub async fn resolve(&self, token: &str) -> AppResult<Share> {
        let share = self
            .share_repo
            .find_by_token(token)
            .await?
            .ok_or_else(|| AppError::not_found("Share not found"))?;

        share.liveness_at(Utc::now()).map_err(AppError::gone)?;
        Ok(share)
    }

    /// Runs the full access flow for a token.
    pub async fn access(&self, token: &str, intent: AccessIntent) -> AppResult<ShareAccess> {
        let share = self.resolve(token).await?;

        if share.requires_password() {
            match intent {
                AccessIntent::Read => {
                    return Ok(ShareAccess::PasswordRequired { path: share.path });
                }
                AccessIntent::Unlock { password } => self.verify_password(&share, &password)?,
            }
        }

        if is_hidden(&share.path, &self.hidden_paths) {
            return Err(AppError::not_found("Shared content not found"));
        }

        let is_dir = self
            .storage
            .is_directory(&share.path)
            .await
            .map_err(shared_content_error)?;

        if is_dir {
            let files = self
                .storage
                .list(&share.path, &self.hidden_paths)
                .await
                .map_err(shared_content_error)?;
            debug!(share_id = %share.id, path = %share.path, count = files.len(), "Share listing served");
            return Ok(ShareAccess::Listing {
                path: share.path,
                permission: share.permission,
                files,
            });
        }

        if !share.allows_download() {
            let file = self
                .storage
                .metadata(&share.path)
                .await
                .map_err(shared_content_error)?;
            debug!(share_id = %share.id, path = %share.path, "Share preview served");
            return Ok(ShareAccess::Preview {
                path: share.path,
                permission: share.permission,
                file,
            });
        }

        self.deliver(&share).await
    }

    fn verify_password(&self, share: &Share, password: &str) -> AppResult<()> {
        let hash = share
            .password_hash
            .as_deref()
            .ok_or_else(|| AppError::internal("Password share has no password hash"))?;

        if !self.hasher.verify_password(password, hash)? {
            warn!(share_id = %share.id, "Invalid share password");
            return Err(AppError::unauthorized("Invalid password"));
        }
        Ok(())
    }

    /// Opens the file, then claims a download slot. The file handle is
    /// dropped unread when the slot is refused.
    async fn deliver(&self, share: &Share) -> AppResult<ShareAccess> {
        let (entry, stream) = self
            .storage
            .open(&share.path)
            .await
            .map_err(shared_content_error)?;

        let downloads = match self
            .share_repo
            .increment_downloads(share.id, Utc::now())
            .await?
        {
            DownloadSlot::Granted { downloads } => downloads,
            DownloadSlot::Rejected(reason) => {
                debug!(share_id = %share.id, reason = %reason, "Download slot refused");
                return Err(AppError::gone(reason));
            }
        };

        info!(
            share_id = %share.id,
            path = %share.path,
            downloads,
            "Share download authorized"
        );

        Ok(ShareAccess::Download(SharedDownload {
            file_name: file_name_of(&share.path).to_string(),
            content_type: content_type_for(&share.path),
            size: entry.size,
            downloads,
            stream,
        }))
    }
}

fn shared_content_error(err: AppError) -> AppError {
    if err.is_not_found() {
        AppError::not_found("Shared content not found")
    } else {
        err
    }
}
