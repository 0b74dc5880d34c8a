//! Vote entity model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One user's rating of one post.
///
/// At most one vote may exist per `(author_id, post_id)` pair; the
/// storage layer enforces this with a unique constraint and the vote
/// ledger re-checks it before insert. `value` is `-1` or `+1`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vote {
    /// Unique vote identifier.
    pub id: Uuid,
    /// The voting user.
    pub author_id: Uuid,
    /// The voted post.
    pub post_id: Uuid,
    /// Vote value: `-1` or `+1`.
    pub value: i32,
}
