//! # ShopSmart Security
//!
//! JWT authentication, password hashing and role checks for ShopSmart.

pub mod jwt;
pub mod password;
pub mod rbac;

pub use jwt::*;
pub use password::*;
pub use rbac::*;
