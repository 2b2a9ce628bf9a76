//! Concrete repositories, one per table.

pub mod share;
pub mod user;
