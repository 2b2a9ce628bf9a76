//! Share management: create, manage, resolve and serve shared paths.

pub mod access;
pub mod cleanup;
pub mod link;
pub mod service;

pub use access::{AccessIntent, AccessService, ShareAccess, SharedDownload};
pub use cleanup::ShareCleanup;
pub use link::LinkService;
pub use service::{CreateShareRequest, ShareService, UpdateShareRequest};
