//! User service trait definition.

use crate::dto::{PublicUserResponse, UpdateProfileRequest, UserListResponse, UserResponse};
use async_trait::async_trait;
use shopsmart_core::{Actor, Interface, PageRequest, ShopResult, UserId};

/// User service trait.
#[async_trait]
pub trait UserService: Interface + Send + Sync {
    /// Gets the public profile of a user. Cached.
    async fn get_public_profile(&self, id: UserId) -> ShopResult<PublicUserResponse>;

    /// Updates a profile. Only the user themself or an admin may do so.
    async fn update_profile(&self, actor: &Actor, id: UserId, request: UpdateProfileRequest)
        -> ShopResult<UserResponse>;

    /// Lists all users with pagination. Admin only, cached per page.
    async fn list_users(&self, actor: &Actor, page: PageRequest) -> ShopResult<UserListResponse>;
}
