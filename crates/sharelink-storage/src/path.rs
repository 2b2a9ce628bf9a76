//! Relative path normalization.
//!
//! Paths arriving from clients are relative to the storage root and use
//! `/` separators. Normalization never touches the filesystem.

use sharelink_core::error::AppError;
use sharelink_core::result::AppResult;

/// Normalize a client-supplied path.
///
/// Leading, trailing and repeated separators are dropped along with `.`
/// segments. Any `..` segment, backslash or NUL byte is rejected. The
/// storage root normalizes to the empty string.
pub fn normalize_path(path: &str) -> AppResult<String> {
    if path.contains('\0') || path.contains('\\') {
        return Err(AppError::validation("Invalid path"));
    }

    let mut segments = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return Err(AppError::validation("Invalid path")),
            other => segments.push(other),
        }
    }

    Ok(segments.join("/"))
}

/// Whether a normalized path is, or lives under, one of the hidden entries.
pub fn is_hidden(path: &str, hidden: &[String]) -> bool {
    hidden.iter().any(|h| {
        let h = h.trim_matches('/');
        !h.is_empty()
            && (path == h
                || path
                    .strip_prefix(h)
                    .is_some_and(|rest| rest.starts_with('/')))
    })
}

/// Last component of a normalized path.
pub fn file_name_of(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Best-effort MIME type for a path, falling back to `application/octet-stream`.
pub fn content_type_for(path: &str) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}
