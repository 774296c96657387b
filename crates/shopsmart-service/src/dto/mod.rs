//! Data Transfer Objects (DTOs).

mod auth_dto;
mod product_dto;
mod shopping_dto;
mod user_dto;

pub use auth_dto::*;
pub use product_dto::*;
pub use shopping_dto::*;
pub use user_dto::*;
