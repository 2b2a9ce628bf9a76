//! # sharelink-core
//!
//! Core crate for ShareLink. Contains the configuration schema, the
//! unified error system, and the storage provider trait that the share
//! services consume.
//!
//! This crate has **no** internal dependencies on other ShareLink crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;

pub use error::{AppError, ErrorKind, GoneReason};
pub use result::AppResult;
