//! Request DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use sharelink_entity::share::{SharePermission, ShareType};

/// Create share request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShareRequest {
    /// Path relative to the storage root.
    #[serde(default)]
    pub path: String,
    /// Share type (defaults to public).
    pub share_type: Option<ShareType>,
    /// Password for password-protected shares.
    pub password: Option<String>,
    /// Permission granted to link holders (defaults to download).
    pub permission: Option<SharePermission>,
    /// Expiration time.
    pub expires_at: Option<DateTime<Utc>>,
    /// Download cap.
    pub max_downloads: Option<i64>,
}

impl From<CreateShareRequest> for sharelink_service::CreateShareRequest {
    fn from(req: CreateShareRequest) -> Self {
        Self {
            path: req.path,
            share_type: req.share_type,
            password: req.password,
            permission: req.permission,
            expires_at: req.expires_at,
            max_downloads: req.max_downloads,
        }
    }
}

/// Update share request body.
///
/// `expiresAt` and `maxDownloads` distinguish an absent field (unchanged)
/// from an explicit `null` (cleared).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateShareRequest {
    /// New share type.
    pub share_type: Option<ShareType>,
    /// New password.
    pub password: Option<String>,
    /// New permission.
    pub permission: Option<SharePermission>,
    /// New expiration.
    #[serde(default, deserialize_with = "double_option")]
    pub expires_at: Option<Option<DateTime<Utc>>>,
    /// New download cap.
    #[serde(default, deserialize_with = "double_option")]
    pub max_downloads: Option<Option<i64>>,
    /// Active flag.
    pub is_active: Option<bool>,
}

impl From<UpdateShareRequest> for sharelink_service::UpdateShareRequest {
    fn from(req: UpdateShareRequest) -> Self {
        Self {
            share_type: req.share_type,
            password: req.password,
            permission: req.permission,
            expires_at: req.expires_at,
            max_downloads: req.max_downloads,
            is_active: req.is_active,
        }
    }
}

/// Share unlock request (password-protected shares).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShareUnlockRequest {
    /// Password.
    #[serde(default)]
    pub password: String,
}

/// Query parameters for listing shares.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListSharesQuery {
    /// Only shares of this path.
    pub path: Option<String>,
}

/// Present-but-null becomes `Some(None)`; an absent field stays `None` via `#[serde(default)]`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
