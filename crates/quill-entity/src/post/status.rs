//! Post lifecycle status enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a post.
///
/// Posts move `Draft -> Public -> Archived`. Draft and archived posts
/// are excluded from public listing and search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "post_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    /// Unpublished, visible only to the author.
    Draft,
    /// Published and publicly visible.
    Public,
    /// Retired from public listing but retained.
    Archived,
}

impl PostStatus {
    /// Whether a post in this status appears in public listings and search.
    pub fn is_publicly_visible(&self) -> bool {
        matches!(self, Self::Public)
    }

    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Public => "public",
            Self::Archived => "archived",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility() {
        assert!(!PostStatus::Draft.is_publicly_visible());
        assert!(PostStatus::Public.is_publicly_visible());
        assert!(!PostStatus::Archived.is_publicly_visible());
    }
}
