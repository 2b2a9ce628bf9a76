//! # sharelink-database
//!
//! SQLite connection management and concrete repository implementations
//! for ShareLink entities.

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use repositories::share::{DownloadSlot, ShareRepository};
pub use repositories::user::UserRepository;
