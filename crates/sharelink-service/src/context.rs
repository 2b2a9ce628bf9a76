//! Request context carrying the authenticated user.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Context for the current authenticated request.
///
/// Built by the API's auth extractor and passed into service methods so
/// that every owner operation knows *who* is acting.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: Uuid,
    /// The username (convenience field from JWT claims).
    pub username: String,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(user_id: Uuid, username: String) -> Self {
        Self {
            user_id,
            username,
            request_time: Utc::now(),
        }
    }
}
