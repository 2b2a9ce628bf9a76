//! Storage backends.

pub mod local;
