//! Share entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use sharelink_core::GoneReason;

/// Whether a share needs a secret before it reveals anything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ShareType {
    /// Anyone holding the link may access the share.
    #[default]
    Public,
    /// The link holder must also supply the share password.
    Password,
}

/// What a link holder may do with a shared file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SharePermission {
    /// Listing and metadata only.
    View,
    /// File content may be streamed.
    #[default]
    Download,
}

/// A capability granting time- and volume-bounded access to one path.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Share {
    /// Unique share identifier.
    pub id: Uuid,
    /// Public, unguessable link token.
    pub token: String,
    /// Shared path relative to the storage root.
    pub path: String,
    /// User who created the share.
    pub created_by: Uuid,
    /// Type of share.
    pub share_type: ShareType,
    /// Argon2 hash of the share password.
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    /// Permission granted to link holders.
    pub permission: SharePermission,
    /// When the share expires (`None` = never).
    pub expires_at: Option<DateTime<Utc>>,
    /// Maximum number of downloads (`None` = unlimited).
    pub max_downloads: Option<i64>,
    /// Number of authorized downloads so far.
    pub downloads: i64,
    /// Whether the share is active (false = revoked).
    pub is_active: bool,
    /// When the share was created.
    pub created_at: DateTime<Utc>,
}

impl Share {
    /// Whether the share had expired at `now`. The expiry instant itself
    /// still counts as valid.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| now > expires_at)
    }

    /// Whether the share has expired as of the current wall-clock time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Whether the download cap has been used up.
    pub fn has_reached_max_downloads(&self) -> bool {
        self.max_downloads.is_some_and(|max| self.downloads >= max)
    }

    /// Check liveness at `now`.
    ///
    /// Reasons are checked in a fixed order (revoked, expired, exhausted)
    /// so a share that is several things at once always reports the same one.
    pub fn liveness_at(&self, now: DateTime<Utc>) -> Result<(), GoneReason> {
        if !self.is_active {
            return Err(GoneReason::Inactive);
        }
        if self.is_expired_at(now) {
            return Err(GoneReason::Expired);
        }
        if self.has_reached_max_downloads() {
            return Err(GoneReason::DownloadLimitReached);
        }
        Ok(())
    }

    /// Whether the share is usable at `now`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.liveness_at(now).is_ok()
    }

    /// Whether the share is usable right now.
    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }

    /// Whether the share requires a password.
    pub fn requires_password(&self) -> bool {
        self.share_type == ShareType::Password
    }

    /// Whether link holders may stream file content.
    pub fn allows_download(&self) -> bool {
        self.permission == SharePermission::Download
    }

    /// Whether `user_id` owns this share.
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.created_by == user_id
    }
}

/// Data required to insert a new share.
///
/// Identifiers and the token are assigned by the caller so a token
/// collision can be retried with a fresh one.
#[derive(Debug, Clone)]
pub struct NewShare {
    /// Share identifier.
    pub id: Uuid,
    /// Link token.
    pub token: String,
    /// Normalized shared path.
    pub path: String,
    /// Owning user.
    pub created_by: Uuid,
    /// Type of share.
    pub share_type: ShareType,
    /// Pre-hashed password (password shares only).
    pub password_hash: Option<String>,
    /// Permission level.
    pub permission: SharePermission,
    /// Expiry time (None = never).
    pub expires_at: Option<DateTime<Utc>>,
    /// Max downloads (None = unlimited).
    pub max_downloads: Option<i64>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl NewShare {
    /// The row as it looks right after insertion.
    pub fn into_share(self) -> Share {
        Share {
            id: self.id,
            token: self.token,
            path: self.path,
            created_by: self.created_by,
            share_type: self.share_type,
            password_hash: self.password_hash,
            permission: self.permission,
            expires_at: self.expires_at,
            max_downloads: self.max_downloads,
            downloads: 0,
            is_active: true,
            created_at: self.created_at,
        }
    }
}
