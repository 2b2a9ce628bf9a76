//! Storage provider trait for the file tree that shares point into.

use std::path::PathBuf;
use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::Stream;
use serde::{Deserialize, Serialize};

use crate::result::AppResult;

/// A single file or directory as seen through a storage provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    /// Last path component.
    pub name: String,
    /// Size in bytes (0 for directories).
    pub size: u64,
    /// Whether this entry is a directory.
    pub is_dir: bool,
    /// Last modification time.
    pub mod_time: DateTime<Utc>,
    /// Path relative to the storage root.
    pub path: String,
}

/// A byte stream type used for reading file contents.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// Trait for file storage backends.
///
/// All paths are relative to the provider's root. Implementations must
/// refuse paths that escape the root.
#[async_trait]
pub trait StorageProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local").
    fn provider_type(&self) -> &str;

    /// Check whether the provider is healthy and reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// List a directory, skipping any entry whose path is in `hidden`.
    ///
    /// Directories sort before files, then by case-insensitive name.
    async fn list(&self, path: &str, hidden: &[String]) -> AppResult<Vec<FileEntry>>;

    /// Resolve a relative path to an absolute location on the backend.
    async fn resolve(&self, path: &str) -> AppResult<PathBuf>;

    /// Whether the path refers to a directory.
    async fn is_directory(&self, path: &str) -> AppResult<bool>;

    /// Get metadata about a file or directory.
    async fn metadata(&self, path: &str) -> AppResult<FileEntry>;

    /// Open a regular file for streaming, returning its metadata alongside.
    async fn open(&self, path: &str) -> AppResult<(FileEntry, ByteStream)>;
}
