//! Trait seams implemented by outer crates.

pub mod storage;

pub use storage::{ByteStream, FileEntry, StorageProvider};
