//! Role checks on verified claims.

use crate::Claims;
use shopsmart_core::{Actor, ShopError, ShopResult, UserId, UserRole};

/// Extension trait for Claims to check permissions.
pub trait ClaimsExt {
    /// Returns the caller as a service-layer actor.
    fn actor(&self) -> Actor;

    /// Requires the caller's role to be in `allowed`.
    fn require_any_role(&self, allowed: &[UserRole]) -> ShopResult<()>;

    /// Requires the caller to own the resource or be an admin.
    fn require_owner_or_admin(&self, resource_owner_id: UserId) -> ShopResult<()>;

    /// Checks if the user is the owner of a resource.
    fn is_owner(&self, resource_owner_id: UserId) -> bool;

    /// Requires the user to be an admin.
    fn require_admin(&self) -> ShopResult<()>;
}

impl ClaimsExt for Claims {
    fn actor(&self) -> Actor {
        Actor::new(self.user_id(), self.role)
    }

    fn require_any_role(&self, allowed: &[UserRole]) -> ShopResult<()> {
        if self.role.is_any_of(allowed) {
            Ok(())
        } else {
            Err(ShopError::Forbidden(format!("Access denied for role {}", self.role)))
        }
    }

    fn require_owner_or_admin(&self, resource_owner_id: UserId) -> ShopResult<()> {
        if self.role.is_admin() || self.is_owner(resource_owner_id) {
            Ok(())
        } else {
            Err(ShopError::Forbidden(
                "You don't have permission to access this resource".to_string(),
            ))
        }
    }

    fn is_owner(&self, resource_owner_id: UserId) -> bool {
        self.user_id() == resource_owner_id
    }

    fn require_admin(&self) -> ShopResult<()> {
        self.require_any_role(UserRole::ADMINS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{TokenSubject, TokenType};
    use chrono::{Duration, Utc};

    fn claims(user_id: UserId, role: UserRole) -> Claims {
        Claims::new(
            &TokenSubject {
                user_id,
                name: "Test",
                email: "test@example.com",
                role,
            },
            TokenType::Access,
            "issuer",
            "audience",
            Utc::now() + Duration::hours(1),
            None,
        )
    }

    #[test]
    fn test_require_any_role() {
        let seller = claims(UserId::new(), UserRole::Seller);
        assert!(seller.require_any_role(UserRole::MERCHANTS).is_ok());
        assert!(seller.require_any_role(UserRole::SHOPPERS).is_err());
        assert_eq!(seller.require_admin().unwrap_err().status_code(), 403);
    }

    #[test]
    fn test_owner_checks() {
        let owner = UserId::new();
        let user = claims(owner, UserRole::User);
        let admin = claims(UserId::new(), UserRole::Admin);
        let stranger = claims(UserId::new(), UserRole::Seller);

        assert!(user.is_owner(owner));
        assert!(user.require_owner_or_admin(owner).is_ok());
        assert!(admin.require_owner_or_admin(owner).is_ok());
        assert!(stranger.require_owner_or_admin(owner).is_err());
    }

    #[test]
    fn test_actor_from_claims() {
        let id = UserId::new();
        let actor = claims(id, UserRole::Seller).actor();
        assert_eq!(actor.user_id, id);
        assert_eq!(actor.role, UserRole::Seller);
    }
}
