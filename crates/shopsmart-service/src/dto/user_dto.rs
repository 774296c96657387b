//! User-related DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shopsmart_core::{Page, User, UserId, UserRole};
use utoipa::ToSchema;
use validator::Validate;

/// Partial profile update.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 64, message = "Name must be 1-64 characters"))]
    pub name: Option<String>,

    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,

    #[validate(url(message = "Invalid profile photo URL"))]
    pub profile_photo: Option<String>,
}

/// Profile visible to anyone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PublicUserResponse {
    pub id: UserId,
    pub name: String,
    pub role: UserRole,
    pub profile_photo: Option<String>,
}

impl From<&User> for PublicUserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            role: user.role,
            profile_photo: user.profile_photo.clone(),
        }
    }
}

/// Full user record without credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub profile_photo: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            profile_photo: user.profile_photo,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// User list response with pagination.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserListResponse {
    pub users: Vec<UserResponse>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u64,
}

impl From<Page<User>> for UserListResponse {
    fn from(page: Page<User>) -> Self {
        let info = page.info;
        Self {
            users: page.content.into_iter().map(UserResponse::from).collect(),
            page: info.page,
            size: info.size,
            total_elements: info.total_elements,
            total_pages: info.total_pages,
        }
    }
}

/// Seller shown next to a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OwnerSummary {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

impl From<&User> for OwnerSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Author shown next to a review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ReviewerSummary {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub profile_photo: Option<String>,
}

impl From<&User> for ReviewerSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            profile_photo: user.profile_photo.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shopsmart_core::PageRequest;

    fn create_test_user() -> User {
        User::new(Some("Ravi".to_string()), "ravi@example.com", "hash".to_string(), UserRole::Seller)
    }

    #[test]
    fn test_user_response_omits_password() {
        let response = UserResponse::from(create_test_user());
        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("hash"));
        assert!(json.contains("ravi@example.com"));
    }

    #[test]
    fn test_public_profile_hides_email() {
        let response = PublicUserResponse::from(&create_test_user());
        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("email"));
        assert_eq!(response.role, UserRole::Seller);
    }

    #[test]
    fn test_user_list_from_page() {
        let page = Page::new(vec![create_test_user()], PageRequest::new(1, 10), 11);
        let response = UserListResponse::from(page);
        assert_eq!(response.users.len(), 1);
        assert_eq!(response.total_pages, 2);
    }

    #[test]
    fn test_update_profile_rejects_empty_name() {
        let request = UpdateProfileRequest {
            name: Some(String::new()),
            ..UpdateProfileRequest::default()
        };
        assert!(request.validate().is_err());
    }
}
