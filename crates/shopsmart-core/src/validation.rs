//! Validation utilities.

use crate::{FieldError, ShopError};
use validator::{Validate, ValidationErrors};

/// Extension trait for validation.
pub trait ValidateExt: Validate {
    /// Validates the struct and returns a `ShopError` on failure.
    fn validate_request(&self) -> Result<(), ShopError> {
        self.validate().map_err(validation_errors_to_shop_error)
    }
}

impl<T: Validate> ValidateExt for T {}

/// Flattens `validator::ValidationErrors` into field errors.
#[must_use]
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut fields: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| FieldError {
                field: (*field).to_string(),
                message: error
                    .message
                    .as_ref()
                    .map_or_else(|| error.code.to_string(), ToString::to_string),
                code: error.code.to_string(),
            })
        })
        .collect();
    fields.sort_by(|a, b| a.field.cmp(&b.field));
    fields
}

/// Converts `validator::ValidationErrors` to `ShopError`.
#[must_use]
pub fn validation_errors_to_shop_error(errors: ValidationErrors) -> ShopError {
    let message = field_errors(&errors)
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ");

    ShopError::Validation(message)
}

/// Common validation functions.
pub mod rules {
    use crate::{MAX_AMOUNT, MONEY_SCALE};
    use rust_decimal::Decimal;
    use validator::ValidationError;

    /// Validates that a string is not blank (not empty after trimming).
    pub fn not_blank(value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::new("not_blank"));
        }
        Ok(())
    }

    /// Validates that a price fits the money columns: `0..=MAX_AMOUNT`, two decimals at most.
    pub fn price_in_range(value: &Decimal) -> Result<(), ValidationError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(ValidationError::new("negative_price").with_message("Price must not be negative".into()));
        }
        if *value > MAX_AMOUNT {
            return Err(ValidationError::new("price_range").with_message("Price is too large".into()));
        }
        if value.normalize().scale() > MONEY_SCALE {
            return Err(ValidationError::new("price_scale").with_message("Price has more than 2 decimals".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::rules::*;
    use super::*;
    use crate::MAX_AMOUNT;
    use rust_decimal::Decimal;

    #[derive(Validate)]
    struct Signup {
        #[validate(email)]
        email: String,
        #[validate(length(min = 6))]
        password: String,
    }

    #[test]
    fn test_not_blank() {
        assert!(not_blank("hello").is_ok());
        assert!(not_blank("   ").is_err());
        assert!(not_blank("").is_err());
    }

    #[test]
    fn test_price_in_range() {
        assert!(price_in_range(&Decimal::ZERO).is_ok());
        assert!(price_in_range(&Decimal::new(1999, 2)).is_ok());
        assert!(price_in_range(&Decimal::new(19_900, 3)).is_ok());
        assert!(price_in_range(&MAX_AMOUNT).is_ok());
        assert_eq!(price_in_range(&Decimal::new(-1, 0)).unwrap_err().code, "negative_price");
    }

    #[test]
    fn test_price_beyond_column_is_rejected() {
        let too_large = Decimal::new(10_000_000_000, 0);
        assert_eq!(price_in_range(&too_large).unwrap_err().code, "price_range");
        assert_eq!(price_in_range(&Decimal::new(19_999, 3)).unwrap_err().code, "price_scale");
    }

    #[test]
    fn test_validate_request_collects_fields() {
        let request = Signup {
            email: "nope".to_string(),
            password: "123".to_string(),
        };
        let err = request.validate_request().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("email"));
        assert!(message.contains("password"));
    }

    #[test]
    fn test_field_errors_sorted_by_field() {
        let request = Signup {
            email: "nope".to_string(),
            password: "123".to_string(),
        };
        let errors = request.validate().unwrap_err();
        let fields = field_errors(&errors);
        assert_eq!(fields[0].field, "email");
        assert_eq!(fields[1].field, "password");
    }
}
