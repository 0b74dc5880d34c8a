//! # quill-entity
//!
//! Domain entity models for the Quill blogging platform: users, posts,
//! comments, tags, and votes. Row structs derive `sqlx::FromRow` and
//! serde traits; role and status enums map to Postgres enum types.

pub mod comment;
pub mod post;
pub mod tag;
pub mod user;
pub mod vote;

pub use comment::Comment;
pub use post::{Post, PostStatus};
pub use tag::Tag;
pub use user::{User, UserRole};
pub use vote::Vote;
