//! User role value object.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Store roles. Permissions are granted per operation through allow-lists,
/// so there is no ordering between roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Shopper: cart, wishlist, orders and reviews.
    #[default]
    User,
    /// Merchant managing their own products.
    Seller,
    /// Full access.
    Admin,
}

impl UserRole {
    /// Roles allowed to browse the catalog listing.
    pub const ANY: &'static [Self] = &[Self::User, Self::Seller, Self::Admin];
    /// Roles allowed to manage products.
    pub const MERCHANTS: &'static [Self] = &[Self::Seller, Self::Admin];
    /// Roles allowed to shop (cart, wishlist, orders, reviews).
    pub const SHOPPERS: &'static [Self] = &[Self::User, Self::Admin];
    /// Administrators only.
    pub const ADMINS: &'static [Self] = &[Self::Admin];

    /// Returns all available roles.
    #[must_use]
    pub const fn all() -> [Self; 3] {
        [Self::User, Self::Seller, Self::Admin]
    }

    /// Returns the lowercase role name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Seller => "seller",
            Self::Admin => "admin",
        }
    }

    /// Checks if this role appears in an allow-list.
    #[must_use]
    pub fn is_any_of(&self, allowed: &[Self]) -> bool {
        allowed.contains(self)
    }

    /// Checks if the role is admin.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown role name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role: {}", self.0)
    }
}

impl std::error::Error for UnknownRole {}

impl FromStr for UserRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "user" => Ok(Self::User),
            "seller" => Ok(Self::Seller),
            "admin" => Ok(Self::Admin),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing() {
        assert_eq!("user".parse::<UserRole>().unwrap(), UserRole::User);
        assert_eq!("Seller".parse::<UserRole>().unwrap(), UserRole::Seller);
        assert_eq!(" ADMIN ".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert!("moderator".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_role_display_round_trips() {
        for role in UserRole::all() {
            assert_eq!(role.to_string().parse::<UserRole>().unwrap(), role);
        }
    }

    #[test]
    fn test_allow_lists() {
        assert!(UserRole::Seller.is_any_of(UserRole::MERCHANTS));
        assert!(!UserRole::User.is_any_of(UserRole::MERCHANTS));
        assert!(!UserRole::Seller.is_any_of(UserRole::SHOPPERS));
        assert!(UserRole::Admin.is_any_of(UserRole::SHOPPERS));
        assert!(UserRole::User.is_any_of(UserRole::ANY));
    }

    #[test]
    fn test_role_serde() {
        assert_eq!(serde_json::to_string(&UserRole::Seller).unwrap(), "\"seller\"");
        let role: UserRole = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, UserRole::Admin);
    }
}
