//! User registration, profiles, and admin-gated deletion.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use quill_auth::password::PasswordHasher;
use quill_auth::rbac::RoleGate;
use quill_core::config::auth::AuthConfig;
use quill_core::error::AppError;
use quill_database::repositories::user::UserRepository;
use quill_entity::post::Post;
use quill_entity::tag::Tag;
use quill_entity::user::model::{CreateUser, UpdateUser};
use quill_entity::user::{User, UserRole};

use crate::context::RequestContext;

/// A user's complete profile: account data plus bookmarked posts and
/// favorited tags.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Profile {
    /// The account record.
    pub user: User,
    /// Bookmarked posts.
    pub bookmarks: Vec<Post>,
    /// Favorited tags.
    pub favorite_tags: Vec<Tag>,
}

/// Handles registration, profile management, and account deletion.
#[derive(Debug, Clone)]
pub struct UserService {
    /// User repository.
    user_repo: Arc<UserRepository>,
    /// Password hasher.
    hasher: Arc<PasswordHasher>,
    /// Role gate for admin-only operations.
    gate: RoleGate,
    /// Auth configuration (password policy).
    auth_config: AuthConfig,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(
        user_repo: Arc<UserRepository>,
        hasher: Arc<PasswordHasher>,
        auth_config: AuthConfig,
    ) -> Self {
        Self {
            user_repo,
            hasher,
            gate: RoleGate::new(),
            auth_config,
        }
    }

    /// Registers a new user with the default role.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AppError> {
        if password.len() < self.auth_config.password_min_length {
            return Err(AppError::validation(format!(
                "Password must be at least {} characters",
                self.auth_config.password_min_length
            )));
        }

        let password_hash = self.hasher.hash_password(password)?;

        let user = self
            .user_repo
            .create(&CreateUser {
                username: username.to_string(),
                email: email.to_string(),
                password_hash,
                role: UserRole::User,
            })
            .await?;

        info!(username = %user.username, "User registered");
        Ok(user)
    }

    /// Gets a user by ID.
    pub async fn get(&self, id: Uuid) -> Result<User, AppError> {
        self.user_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))
    }

    /// Gets a user by an identifier that is either a UUID or a username.
    pub async fn get_by_ident(&self, ident: &str) -> Result<User, AppError> {
        let found = match ident.parse::<Uuid>() {
            Ok(id) => self.user_repo.find_by_id(id).await?,
            Err(_) => self.user_repo.find_by_username(ident).await?,
        };
        found.ok_or_else(|| AppError::not_found(format!("User '{ident}' not found")))
    }

    /// Returns the caller's complete profile.
    pub async fn profile(&self, ctx: &RequestContext) -> Result<Profile, AppError> {
        let user = self.get(ctx.user_id).await?;
        let bookmarks = self.user_repo.bookmarked_posts(ctx.user_id).await?;
        let favorite_tags = self.user_repo.favorite_tags(ctx.user_id).await?;

        Ok(Profile {
            user,
            bookmarks,
            favorite_tags,
        })
    }

    /// Updates the caller's own profile fields.
    pub async fn update_profile(
        &self,
        ctx: &RequestContext,
        data: &UpdateUser,
    ) -> Result<User, AppError> {
        self.user_repo.update(ctx.user_id, data).await
    }

    /// Replaces the caller's favorite tag set.
    pub async fn set_favorite_tags(
        &self,
        ctx: &RequestContext,
        tag_ids: &[Uuid],
    ) -> Result<(), AppError> {
        self.user_repo.set_favorite_tags(ctx.user_id, tag_ids).await
    }

    /// Deletes a user account. Admin only; the requesting admin must
    /// re-confirm their own password.
    pub async fn delete_user(
        &self,
        ctx: &RequestContext,
        target_id: Uuid,
        password: &str,
    ) -> Result<(), AppError> {
        self.gate.require_admin(ctx.role)?;

        let admin = self.get(ctx.user_id).await?;
        let confirmed = self
            .hasher
            .verify_password(password, &admin.password_hash)?;
        if !confirmed {
            return Err(AppError::authentication("Password confirmation failed"));
        }

        let deleted = self.user_repo.delete(target_id).await?;
        if !deleted {
            return Err(AppError::not_found(format!("User {target_id} not found")));
        }

        info!(admin = %ctx.username, target_id = %target_id, "User deleted");
        Ok(())
    }

    /// Changes a user's role. Admin only.
    pub async fn change_role(
        &self,
        ctx: &RequestContext,
        target_id: Uuid,
        role: UserRole,
    ) -> Result<User, AppError> {
        self.gate.require_admin(ctx.role)?;
        let user = self.user_repo.update_role(target_id, role).await?;
        info!(admin = %ctx.username, target_id = %target_id, role = %role, "Role changed");
        Ok(user)
    }
}
