//! # sharelink-service
//!
//! Business logic service layer for ShareLink. Services orchestrate the
//! share repository, the storage provider, and credential handling.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod context;
pub mod share;

#[cfg(test)]
mod testing;

pub use context::RequestContext;
pub use share::{
    AccessIntent, AccessService, CreateShareRequest, LinkService, ShareAccess, ShareCleanup,
    ShareService, SharedDownload, UpdateShareRequest,
};
