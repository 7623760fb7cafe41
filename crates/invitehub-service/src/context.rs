//! Request context carrying the authenticated user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use invitehub_core::types::UserId;

/// Context for the current authenticated request.
///
/// Extracted from the bearer token and passed into service methods so
/// that every operation knows *who* is acting. `email` is the verified,
/// normalized address that invite tickets are bound to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: UserId,
    /// Verified email from the access token.
    pub email: String,
    /// The username (convenience field from JWT claims).
    pub username: String,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context.
    pub fn new(
        user_id: UserId,
        email: String,
        username: String,
        request_time: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            email,
            username,
            request_time,
        }
    }
}
