//! Request context carrying the authenticated user.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use quill_entity::user::{User, UserRole};

/// Context for the current authenticated request.
///
/// Extracted at the HTTP boundary and passed into service methods so
/// that every operation knows *who* is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: Uuid,
    /// The username.
    pub username: String,
    /// The user's role.
    pub role: UserRole,
}

impl RequestContext {
    /// Creates a request context from a resolved user.
    pub fn from_user(user: &User) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            role: user.role,
        }
    }

    /// Returns whether the current user is an admin.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Returns whether the current user is at least a moderator.
    pub fn is_moderator_or_above(&self) -> bool {
        self.role.is_moderator_or_above()
    }
}
