//! The authenticated caller of a service operation.

use super::UserRole;
use crate::{ShopError, ShopResult, UserId};
use serde::{Deserialize, Serialize};

/// Identity and role of the user performing an operation.
///
/// Built from verified token claims in the REST layer and passed to services,
/// which use it for ownership checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: UserId,
    pub role: UserRole,
}

impl Actor {
    #[must_use]
    pub const fn new(user_id: UserId, role: UserRole) -> Self {
        Self { user_id, role }
    }

    /// Checks if the actor is an admin.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Fails with `Forbidden` unless the actor's role is in `allowed`.
    pub fn require_any_role(&self, allowed: &[UserRole]) -> ShopResult<()> {
        if self.role.is_any_of(allowed) {
            Ok(())
        } else {
            Err(ShopError::forbidden("Access denied"))
        }
    }

    /// Fails with `Forbidden` unless the actor owns the resource or is an admin.
    pub fn require_owner_or_admin(&self, owner: UserId) -> ShopResult<()> {
        if self.is_admin() || self.user_id == owner {
            Ok(())
        } else {
            Err(ShopError::forbidden("Access denied"))
        }
    }
}
