//! Tag management.

use std::sync::Arc;

use uuid::Uuid;

use quill_core::error::AppError;
use quill_database::repositories::tag::TagRepository;
use quill_entity::tag::Tag;

/// Handles tag creation and lookup.
#[derive(Debug, Clone)]
pub struct TagService {
    /// Tag repository.
    tag_repo: Arc<TagRepository>,
}

impl TagService {
    /// Creates a new tag service.
    pub fn new(tag_repo: Arc<TagRepository>) -> Self {
        Self { tag_repo }
    }

    /// Creates a new tag.
    pub async fn create_tag(&self, name: &str) -> Result<Tag, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Tag name cannot be empty"));
        }
        self.tag_repo.create(name).await
    }

    /// Lists all tags.
    pub async fn list_tags(&self) -> Result<Vec<Tag>, AppError> {
        self.tag_repo.find_all().await
    }

    /// Lists the tags attached to a post.
    pub async fn tags_for_post(&self, post_id: Uuid) -> Result<Vec<Tag>, AppError> {
        self.tag_repo.find_by_post(post_id).await
    }
}
