//! User service implementation.

use crate::cache::{cache_keys, CacheExt, CacheInterface};
use crate::dto::{PublicUserResponse, UpdateProfileRequest, UserListResponse, UserResponse};
use crate::user_service::UserService;
use async_trait::async_trait;
use shopsmart_config::CacheConfig;
use shopsmart_core::{normalize_email, Actor, PageRequest, ShopError, ShopResult, UserId, UserRole, ValidateExt};
use shopsmart_repository::UserRepository;
use std::sync::Arc;
use tracing::{debug, info};

/// User service implementation.
pub struct UserServiceImpl {
    user_repository: Arc<dyn UserRepository>,
    cache: Arc<dyn CacheInterface>,
    cache_config: Arc<CacheConfig>,
}

impl UserServiceImpl {
    /// Creates a new user service.
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        cache: Arc<dyn CacheInterface>,
        cache_config: Arc<CacheConfig>,
    ) -> Self {
        Self {
            user_repository,
            cache,
            cache_config,
        }
    }
}

impl std::fmt::Debug for UserServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserServiceImpl")
            .field("cache_enabled", &self.cache.is_enabled())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl UserService for UserServiceImpl {
    async fn get_public_profile(&self, id: UserId) -> ShopResult<PublicUserResponse> {
        let key = cache_keys::user_public(id);
        if let Some(profile) = self.cache.try_get::<PublicUserResponse>(&key).await {
            debug!("Cache hit for user profile: {}", id);
            return Ok(profile);
        }

        debug!("Cache miss for user profile: {}", id);
        let user = self
            .user_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ShopError::not_found("User", id))?;

        let profile = PublicUserResponse::from(&user);
        self.cache.try_set(&key, &profile, self.cache_config.list_ttl()).await;
        Ok(profile)
    }

    async fn update_profile(
        &self,
        actor: &Actor,
        id: UserId,
        request: UpdateProfileRequest,
    ) -> ShopResult<UserResponse> {
        debug!("Updating profile: {}", id);

        actor.require_owner_or_admin(id)?;
        request.validate_request()?;

        let mut user = self
            .user_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ShopError::not_found("User", id))?;

        if let Some(email) = &request.email {
            if normalize_email(email) != user.email && self.user_repository.exists_by_email(email).await? {
                return Err(ShopError::conflict(format!("Email '{email}' is already registered")));
            }
        }

        user.update_profile(request.name, request.email.as_deref(), request.profile_photo);
        let updated = self.user_repository.update(&user).await?;
        self.cache.try_invalidate(&cache_keys::user_write(id)).await;

        info!("Profile updated: {}", id);
        Ok(UserResponse::from(updated))
    }

    async fn list_users(&self, actor: &Actor, page: PageRequest) -> ShopResult<UserListResponse> {
        actor.require_any_role(UserRole::ADMINS)?;

        let key = cache_keys::users_list(page);
        if let Some(list) = self.cache.try_get::<UserListResponse>(&key).await {
            debug!("Cache hit for user list page {}", page.page);
            return Ok(list);
        }

        debug!("Listing users, page: {}, size: {}", page.page, page.size);
        let users = self.user_repository.find_all(page).await?;
        let list = UserListResponse::from(users);
        self.cache.try_set(&key, &list, self.cache_config.list_ttl()).await;
        Ok(list)
    }
}
