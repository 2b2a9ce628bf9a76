//! # sharelink-api
//!
//! HTTP API layer for ShareLink built on Axum.
//!
//! Provides the share management endpoints, the public share endpoints,
//! a health check, middleware (CORS, logging), extractors, DTOs, and the
//! mapping from [`AppError`](sharelink_core::AppError) to HTTP responses.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, build_state, run_server};
pub use state::AppState;
