//! Post repository implementation.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use quill_core::error::{AppError, ErrorKind};
use quill_core::result::AppResult;
use quill_core::types::pagination::{PageRequest, PageResponse};
use quill_entity::post::model::CreatePost;
use quill_entity::post::{Post, PostStatus};

/// Repository for post CRUD, listing, and full-text search.
#[derive(Debug, Clone)]
pub struct PostRepository {
    pool: PgPool,
}

impl PostRepository {
    /// Create a new post repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a post by primary key.
    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Post>> {
        sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find post by id", e))
    }

    /// Check whether a post exists.
    pub async fn exists(&self, id: Uuid) -> AppResult<bool> {
        let found: Option<i32> = sqlx::query_scalar("SELECT 1 FROM posts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to check post existence", e)
            })?;
        Ok(found.is_some())
    }

    /// Create a new post in draft status.
    pub async fn create(&self, data: &CreatePost) -> AppResult<Post> {
        sqlx::query_as::<_, Post>(
            "INSERT INTO posts (author_id, title, content) \
             VALUES ($1, $2, $3) \
             RETURNING *",
        )
        .bind(data.author_id)
        .bind(&data.title)
        .bind(&data.content)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create post", e))
    }

    /// Update a post's fields. `published_at` is written only when the
    /// service passes a value, which it does exactly once.
    pub async fn update(
        &self,
        id: Uuid,
        title: Option<&str>,
        content: Option<&str>,
        status: Option<PostStatus>,
        published_at: Option<DateTime<Utc>>,
    ) -> AppResult<Post> {
        sqlx::query_as::<_, Post>(
            "UPDATE posts SET title = COALESCE($2, title), \
                              content = COALESCE($3, content), \
                              status = COALESCE($4, status), \
                              published_at = COALESCE($5, published_at), \
                              updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(title)
        .bind(content)
        .bind(status)
        .bind(published_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update post", e))?
        .ok_or_else(|| AppError::not_found(format!("Post {id} not found")))
    }

    /// Delete a post by ID.
    pub async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete post", e))?;

        Ok(result.rows_affected() > 0)
    }

    /// List public posts, newest first.
    pub async fn find_public(&self, page: &PageRequest) -> AppResult<PageResponse<Post>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE status = 'public'")
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to count public posts", e)
                })?;

        let posts = sqlx::query_as::<_, Post>(
            "SELECT * FROM posts WHERE status = 'public' \
             ORDER BY published_at DESC NULLS LAST LIMIT $1 OFFSET $2",
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list public posts", e))?;

        Ok(PageResponse::new(
            posts,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// List all posts regardless of status (administrative view).
    pub async fn find_all(&self, page: &PageRequest) -> AppResult<PageResponse<Post>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count posts", e))?;

        let posts = sqlx::query_as::<_, Post>(
            "SELECT * FROM posts ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list posts", e))?;

        Ok(PageResponse::new(
            posts,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    /// List posts authored by a user, any status.
    pub async fn find_by_author(&self, author_id: Uuid) -> AppResult<Vec<Post>> {
        sqlx::query_as::<_, Post>(
            "SELECT * FROM posts WHERE author_id = $1 ORDER BY created_at DESC",
        )
        .bind(author_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list posts by author", e)
        })
    }

    /// Full-text search over public posts.
    pub async fn search(&self, query: &str) -> AppResult<Vec<Post>> {
        sqlx::query_as::<_, Post>(
            "SELECT * FROM posts \
             WHERE status = 'public' \
               AND to_tsvector('simple', title || ' ' || content) \
                   @@ plainto_tsquery('simple', $1) \
             ORDER BY published_at DESC NULLS LAST",
        )
        .bind(query)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to search posts", e))
    }

    /// Increment a post's view counter.
    pub async fn increment_view_count(&self, id: Uuid) -> AppResult<()> {
        sqlx::query("UPDATE posts SET view_count = view_count + 1 WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to increment view count", e)
            })?;
        Ok(())
    }

    /// Add a post to a user's bookmarks. Returns `false` if it was
    /// already bookmarked.
    pub async fn add_bookmark(&self, user_id: Uuid, post_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            "INSERT INTO bookmarks (user_id, post_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(post_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to add bookmark", e))?;

        Ok(result.rows_affected() > 0)
    }

    /// Remove a post from a user's bookmarks. Returns `false` if it was
    /// not bookmarked.
    pub async fn remove_bookmark(&self, user_id: Uuid, post_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM bookmarks WHERE user_id = $1 AND post_id = $2")
            .bind(user_id)
            .bind(post_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to remove bookmark", e)
            })?;

        Ok(result.rows_affected() > 0)
    }

    /// Replace the tag set attached to a post.
    pub async fn set_tags(&self, post_id: Uuid, tag_ids: &[Uuid]) -> AppResult<()> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        sqlx::query("DELETE FROM post_tags WHERE post_id = $1")
            .bind(post_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to clear post tags", e)
            })?;

        for tag_id in tag_ids {
            sqlx::query(
                "INSERT INTO post_tags (post_id, tag_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .bind(post_id)
            .bind(tag_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to attach tag", e)
            })?;
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit post tags", e)
        })
    }
}
