//! REST API controllers.

pub mod admin_controller;
pub mod auth_controller;
pub mod health_controller;
pub mod me_controller;
pub mod product_controller;
pub mod user_controller;

pub use health_controller::*;

use crate::responses::AppError;
use shopsmart_core::ShopError;
use std::str::FromStr;

/// Parses a path identifier, answering 400 when it is not a valid ID.
pub(crate) fn parse_id<T: FromStr>(raw: &str, resource: &str) -> Result<T, AppError> {
    raw.parse()
        .map_err(|_| AppError(ShopError::validation(format!("Invalid {resource} ID: {raw}"))))
}
