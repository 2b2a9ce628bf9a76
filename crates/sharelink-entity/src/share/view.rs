//! Client-facing share representation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::model::{Share, SharePermission, ShareType};

/// A share as returned to its owner, including the public link.
///
/// Carries no password material.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareView {
    /// The share ID.
    pub id: Uuid,
    /// The share token.
    pub token: String,
    /// The full URL for accessing the share.
    pub url: String,
    /// Shared path.
    pub path: String,
    /// Owning user.
    pub created_by: Uuid,
    /// Type of share.
    pub share_type: ShareType,
    /// Permission granted to link holders.
    pub permission: SharePermission,
    /// When the link expires (if set).
    pub expires_at: Option<DateTime<Utc>>,
    /// Download cap (if set).
    pub max_downloads: Option<i64>,
    /// Downloads so far.
    pub downloads: i64,
    /// Whether the share is active.
    pub is_active: bool,
    /// Whether the share is currently usable.
    pub is_valid: bool,
    /// When the share was created.
    pub created_at: DateTime<Utc>,
}

impl ShareView {
    /// Build the view for `share`, joining `base_url`, `link_prefix` and the token.
    pub fn new(share: &Share, base_url: &str, link_prefix: &str) -> Self {
        let url = format!(
            "{}/{}/{}",
            base_url.trim_end_matches('/'),
            link_prefix.trim_matches('/'),
            share.token
        );

        Self {
            id: share.id,
            token: share.token.clone(),
            url,
            path: share.path.clone(),
            created_by: share.created_by,
            share_type: share.share_type,
            permission: share.permission,
            expires_at: share.expires_at,
            max_downloads: share.max_downloads,
            downloads: share.downloads,
            is_active: share.is_active,
            is_valid: share.is_valid(),
            created_at: share.created_at,
        }
    }
}
