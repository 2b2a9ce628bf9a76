//! Local filesystem storage provider.

use std::fs::Metadata;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::fs;
use tokio_util::io::ReaderStream;
use tracing::{debug, warn};

use sharelink_core::error::{AppError, ErrorKind};
use sharelink_core::result::AppResult;
use sharelink_core::traits::storage::{ByteStream, FileEntry, StorageProvider};

use crate::path::{file_name_of, is_hidden, normalize_path};

/// Local filesystem storage provider.
///
/// Every resolved path is canonicalized and must stay under the root, so
/// symlinks cannot be used to reach files outside the tree.
#[derive(Debug, Clone)]
pub struct LocalStorageProvider {
    /// Canonical root directory.
    root: PathBuf,
}

impl LocalStorageProvider {
    /// Create a new local storage provider rooted at the given path.
    pub async fn new(root_path: &str) -> AppResult<Self> {
        let root = PathBuf::from(root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create storage root: {}", root.display()),
                e,
            )
        })?;
        let root = fs::canonicalize(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to resolve storage root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// Normalize `path` and map it to a canonical location under the root.
    async fn locate(&self, path: &str) -> AppResult<(String, PathBuf)> {
        let relative = normalize_path(path)?;
        let joined = self.root.join(&relative);

        let canonical = fs::canonicalize(&joined).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("Path not found: {relative}"))
            } else {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to resolve path: {relative}"),
                    e,
                )
            }
        })?;

        if !canonical.starts_with(&self.root) {
            warn!(path = %relative, "Rejected path resolving outside storage root");
            return Err(AppError::not_found(format!("Path not found: {relative}")));
        }

        Ok((relative, canonical))
    }

    async fn stat(&self, full_path: &Path, relative: &str) -> AppResult<Metadata> {
        fs::metadata(full_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("Path not found: {relative}"))
            } else {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to get metadata: {relative}"),
                    e,
                )
            }
        })
    }
}

fn to_entry(relative: &str, meta: &Metadata) -> FileEntry {
    let mod_time = meta
        .modified()
        .map(DateTime::<Utc>::from)
        .unwrap_or_else(|_| Utc::now());

    FileEntry {
        name: file_name_of(relative).to_string(),
        size: if meta.is_dir() { 0 } else { meta.len() },
        is_dir: meta.is_dir(),
        mod_time,
        path: relative.to_string(),
    }
}

#[async_trait]
impl StorageProvider for LocalStorageProvider {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(fs::metadata(&self.root)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false))
    }

    async fn list(&self, path: &str, hidden: &[String]) -> AppResult<Vec<FileEntry>> {
        let (relative, full_path) = self.locate(path).await?;
        if !self.stat(&full_path, &relative).await?.is_dir() {
            return Err(AppError::validation(format!(
                "Path is not a directory: {relative}"
            )));
        }

        let mut entries = Vec::new();
        let mut dir = fs::read_dir(&full_path).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to list directory: {relative}"),
                e,
            )
        })?;

        while let Some(entry) = dir.next_entry().await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, "Failed to read directory entry", e)
        })? {
            let entry_meta = entry.metadata().await.map_err(|e| {
                AppError::with_source(ErrorKind::Storage, "Failed to get entry metadata", e)
            })?;
            // Symlinks are never followed out of a listing.
            if entry_meta.file_type().is_symlink() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().to_string();
            let entry_path = if relative.is_empty() {
                name
            } else {
                format!("{relative}/{name}")
            };
            if is_hidden(&entry_path, hidden) {
                continue;
            }

            entries.push(to_entry(&entry_path, &entry_meta));
        }

        entries.sort_by(|a, b| {
            b.is_dir
                .cmp(&a.is_dir)
                .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        });

        debug!(path = %relative, count = entries.len(), "Listed directory");
        Ok(entries)
    }

    async fn resolve(&self, path: &str) -> AppResult<PathBuf> {
        self.locate(path).await.map(|(_, full_path)| full_path)
    }

    async fn is_directory(&self, path: &str) -> AppResult<bool> {
        let (relative, full_path) = self.locate(path).await?;
        Ok(self.stat(&full_path, &relative).await?.is_dir())
    }

    async fn metadata(&self, path: &str) -> AppResult<FileEntry> {
        let (relative, full_path) = self.locate(path).await?;
        let meta = self.stat(&full_path, &relative).await?;
        Ok(to_entry(&relative, &meta))
    }

    async fn open(&self, path: &str) -> AppResult<(FileEntry, ByteStream)> {
        let (relative, full_path) = self.locate(path).await?;
        let file = fs::File::open(&full_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("File not found: {relative}"))
            } else {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to open file: {relative}"),
                    e,
                )
            }
        })?;

        let meta = file.metadata().await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to get metadata: {relative}"),
                e,
            )
        })?;
        if meta.is_dir() {
            return Err(AppError::validation(format!(
                "Path is a directory: {relative}"
            )));
        }

        let stream = ReaderStream::new(file);
        Ok((to_entry(&relative, &meta), Box::pin(stream)))
    }
}
