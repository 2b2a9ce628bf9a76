//! Response DTOs.

use serde::{Deserialize, Serialize};

use sharelink_core::traits::FileEntry;
use sharelink_entity::share::SharePermission;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Simple message response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message.
    pub message: String,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status (`ok` or `degraded`).
    pub status: String,
    /// Version.
    pub version: String,
    /// Database status.
    pub database: String,
    /// Storage status.
    pub storage: String,
    /// Storage backend type.
    pub storage_provider: String,
}

/// Body of a public share access that does not stream a file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SharedContentResponse {
    /// Password-protected share awaiting a password.
    #[serde(rename_all = "camelCase")]
    PasswordRequired {
        /// Always `true`.
        requires_password: bool,
        /// Shared path.
        path: String,
    },
    /// Directory listing.
    Listing {
        /// Shared path.
        path: String,
        /// Permission granted by the share.
        permission: SharePermission,
        /// Visible entries.
        files: Vec<FileEntry>,
    },
    /// View-only file metadata.
    Preview {
        /// Shared path.
        path: String,
        /// Permission granted by the share.
        permission: SharePermission,
        /// File metadata.
        file: FileEntry,
    },
}
