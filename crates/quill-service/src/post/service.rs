//! Post lifecycle, listing, search, and bookmarks.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use quill_cache::keys;
use quill_cache::provider::CacheManager;
use quill_core::error::AppError;
use quill_core::traits::cache::CacheProvider;
use quill_core::types::pagination::{PageRequest, PageResponse};
use quill_database::repositories::post::PostRepository;
use quill_database::repositories::tag::TagRepository;
use quill_entity::post::model::{CreatePost, UpdatePost};
use quill_entity::post::{Post, PostStatus};

use crate::context::RequestContext;

/// Route identity used for memoized search responses.
const SEARCH_ROUTE: &str = "posts:search";

/// Decide whether this update publishes the post for the first time.
///
/// `published_at` is set exactly once, when the status first leaves
/// `Draft`. Later transitions (public -> archived) must not touch it.
fn first_publication(
    current_status: PostStatus,
    published_at: Option<DateTime<Utc>>,
    new_status: PostStatus,
) -> bool {
    current_status == PostStatus::Draft && new_status != PostStatus::Draft && published_at.is_none()
}

/// Handles post CRUD, public listing, full-text search, and bookmarks.
#[derive(Debug, Clone)]
pub struct PostService {
    /// Post repository.
    post_repo: Arc<PostRepository>,
    /// Tag repository (post tag attachment).
    tag_repo: Arc<TagRepository>,
    /// Cache for memoized search responses.
    cache: Arc<CacheManager>,
}

impl PostService {
    /// Creates a new post service.
    pub fn new(
        post_repo: Arc<PostRepository>,
        tag_repo: Arc<TagRepository>,
        cache: Arc<CacheManager>,
    ) -> Self {
        Self {
            post_repo,
            tag_repo,
            cache,
        }
    }

    /// Creates a new post in draft status, authored by the caller.
    pub async fn create_post(
        &self,
        ctx: &RequestContext,
        title: &str,
        content: &str,
    ) -> Result<Post, AppError> {
        if title.trim().is_empty() {
            return Err(AppError::validation("Title cannot be empty"));
        }
        if content.trim().is_empty() {
            return Err(AppError::validation("Content cannot be empty"));
        }

        let post = self
            .post_repo
            .create(&CreatePost {
                author_id: ctx.user_id,
                title: title.to_string(),
                content: content.to_string(),
            })
            .await?;

        info!(post_id = %post.id, author = %ctx.username, "Post created");
        Ok(post)
    }

    /// Gets a post by ID.
    ///
    /// Public posts increment their view counter. Draft and archived
    /// posts are visible only to their author (and moderators); for
    /// anyone else the post does not exist.
    pub async fn get_post(
        &self,
        post_id: Uuid,
        viewer: Option<&RequestContext>,
    ) -> Result<Post, AppError> {
        let post = self
            .post_repo
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Post {post_id} not found")))?;

        if post.status.is_publicly_visible() {
            self.post_repo.increment_view_count(post_id).await?;
            return Ok(post);
        }

        let allowed = viewer
            .map(|ctx| ctx.user_id == post.author_id || ctx.is_moderator_or_above())
            .unwrap_or(false);
        if !allowed {
            // Do not leak the existence of unpublished posts.
            return Err(AppError::not_found(format!("Post {post_id} not found")));
        }

        Ok(post)
    }

    /// Lists public posts, newest first.
    pub async fn list_public(&self, page: &PageRequest) -> Result<PageResponse<Post>, AppError> {
        self.post_repo.find_public(page).await
    }

    /// Lists posts authored by a user, any status.
    pub async fn posts_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, AppError> {
        self.post_repo.find_by_author(author_id).await
    }

    /// Full-text search over public posts, memoized in the cache.
    ///
    /// Cache failures are logged and degrade to a direct database read;
    /// they are never fatal.
    pub async fn search(&self, query: &str) -> Result<Vec<Post>, AppError> {
        let fingerprint = keys::query_fingerprint(&[("query", query)]);
        let key = keys::response(SEARCH_ROUTE, &fingerprint);

        match self.cache.get_json::<Vec<Post>>(&key).await {
            Ok(Some(cached)) => return Ok(cached),
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Cache read failed; falling through to database"),
        }

        let posts = self.post_repo.search(query).await?;

        if let Err(e) = self
            .cache
            .set_json(&key, &posts, std::time::Duration::from_secs(300))
            .await
        {
            warn!(error = %e, "Cache write failed");
        }

        Ok(posts)
    }

    /// Updates a post. Author only.
    ///
    /// Status moves `draft -> public -> archived`; a published post can
    /// never return to draft. The first transition away from draft
    /// stamps `published_at`, exactly once.
    pub async fn update_post(
        &self,
        ctx: &RequestContext,
        post_id: Uuid,
        data: &UpdatePost,
    ) -> Result<Post, AppError> {
        let post = self
            .post_repo
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Post {post_id} not found")))?;

        if post.author_id != ctx.user_id {
            return Err(AppError::authorization("Only the author can update this post"));
        }

        if data.title.is_none() && data.content.is_none() && data.status.is_none() {
            return Err(AppError::validation("No fields to update"));
        }

        let mut published_at = None;
        if let Some(new_status) = data.status {
            if new_status == PostStatus::Draft && post.status != PostStatus::Draft {
                return Err(AppError::validation(
                    "A published post cannot return to draft",
                ));
            }
            if first_publication(post.status, post.published_at, new_status) {
                published_at = Some(Utc::now());
            }
        }

        let updated = self
            .post_repo
            .update(
                post_id,
                data.title.as_deref(),
                data.content.as_deref(),
                data.status,
                published_at,
            )
            .await?;

        self.invalidate_post_caches().await;

        Ok(updated)
    }

    /// Deletes a post. Allowed for the author and for moderators.
    pub async fn delete_post(&self, ctx: &RequestContext, post_id: Uuid) -> Result<(), AppError> {
        let post = self
            .post_repo
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Post {post_id} not found")))?;

        if post.author_id != ctx.user_id && !ctx.is_moderator_or_above() {
            return Err(AppError::authorization(
                "Only the author or a moderator can delete this post",
            ));
        }

        self.post_repo.delete(post_id).await?;
        self.invalidate_post_caches().await;

        info!(post_id = %post_id, by = %ctx.username, "Post deleted");
        Ok(())
    }

    /// Replaces the tags attached to a post. Author only.
    pub async fn set_tags(
        &self,
        ctx: &RequestContext,
        post_id: Uuid,
        tag_ids: &[Uuid],
    ) -> Result<(), AppError> {
        let post = self
            .post_repo
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Post {post_id} not found")))?;

        if post.author_id != ctx.user_id {
            return Err(AppError::authorization("Only the author can tag this post"));
        }

        for tag_id in tag_ids {
            if self.tag_repo.find_by_id(*tag_id).await?.is_none() {
                return Err(AppError::not_found(format!("Tag {tag_id} not found")));
            }
        }

        self.post_repo.set_tags(post_id, tag_ids).await
    }

    /// Bookmarks a post for the caller.
    pub async fn bookmark(&self, ctx: &RequestContext, post_id: Uuid) -> Result<(), AppError> {
        if !self.post_repo.exists(post_id).await? {
            return Err(AppError::not_found(format!("Post {post_id} not found")));
        }
        self.post_repo.add_bookmark(ctx.user_id, post_id).await?;
        Ok(())
    }

    /// Removes a post from the caller's bookmarks.
    pub async fn remove_bookmark(
        &self,
        ctx: &RequestContext,
        post_id: Uuid,
    ) -> Result<(), AppError> {
        self.post_repo.remove_bookmark(ctx.user_id, post_id).await?;
        Ok(())
    }

    /// Drops every memoized post response after a mutation.
    async fn invalidate_post_caches(&self) {
        if let Err(e) = self
            .cache
            .delete_pattern(&keys::response_pattern("posts"))
            .await
        {
            warn!(error = %e, "Cache invalidation failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_transition_from_draft_publishes() {
        assert!(first_publication(PostStatus::Draft, None, PostStatus::Public));
        assert!(first_publication(PostStatus::Draft, None, PostStatus::Archived));
    }

    #[test]
    fn test_later_transitions_do_not_republish() {
        let stamped = Some(Utc::now());
        assert!(!first_publication(
            PostStatus::Public,
            stamped,
            PostStatus::Archived
        ));
        assert!(!first_publication(PostStatus::Draft, None, PostStatus::Draft));
        // A draft that somehow carries a timestamp must not restamp.
        assert!(!first_publication(
            PostStatus::Draft,
            stamped,
            PostStatus::Public
        ));
    }
}
