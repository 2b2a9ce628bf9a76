//! # sharelink-storage
//!
//! Storage provider implementations for ShareLink, plus the path
//! normalization rules every provider and service applies to
//! caller-supplied paths.

pub mod path;
pub mod providers;

pub use path::{content_type_for, file_name_of, is_hidden, normalize_path};
pub use providers::local::LocalStorageProvider;
