//! Validated JSON extractor.
//!
//! `ValidatedJson<T>` deserializes the body and runs the `validator` rules of
//! `T`. Malformed JSON is answered with 400, failed rules with 422 and one
//! [`FieldError`] per violated rule.

use crate::responses::error_response;
use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;
use shopsmart_core::{ErrorResponse, FieldError};
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

/// JSON extractor that validates the deserialized value.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T> std::ops::Deref for ValidatedJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Rejection type for validated JSON extraction.
#[derive(Debug)]
pub enum ValidatedJsonRejection {
    /// Body missing, not JSON, or not the expected shape.
    JsonError(JsonRejection),
    /// Body parsed but broke a validation rule.
    ValidationError(ValidationErrors),
}

impl IntoResponse for ValidatedJsonRejection {
    fn into_response(self) -> Response {
        match self {
            Self::JsonError(rejection) => error_response(
                StatusCode::BAD_REQUEST,
                ErrorResponse::new("INVALID_JSON", format!("Invalid JSON: {rejection}")),
            ),
            Self::ValidationError(errors) => error_response(
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorResponse::new("VALIDATION_ERROR", "Request validation failed")
                    .with_details(convert_validation_errors(&errors)),
            ),
        }
    }
}

/// Flattens validator errors into field errors; nested fields are dotted.
pub(crate) fn convert_validation_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut field_errors = Vec::new();

    for (field, kind) in errors.errors() {
        match kind {
            ValidationErrorsKind::Field(errs) => {
                for err in errs {
                    field_errors.push(FieldError {
                        field: field.to_string(),
                        message: err
                            .message
                            .as_ref()
                            .map_or_else(|| format!("Validation failed for field '{field}'"), ToString::to_string),
                        code: err.code.to_string(),
                    });
                }
            }
            ValidationErrorsKind::Struct(nested) => {
                for nested_err in convert_validation_errors(nested) {
                    field_errors.push(FieldError {
                        field: format!("{field}.{}", nested_err.field),
                        ..nested_err
                    });
                }
            }
            ValidationErrorsKind::List(items) => {
                for (index, item_errors) in items {
                    for nested_err in convert_validation_errors(item_errors) {
                        field_errors.push(FieldError {
                            field: format!("{field}[{index}].{}", nested_err.field),
                            ..nested_err
                        });
                    }
                }
            }
        }
    }

    field_errors
}

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ValidatedJsonRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(ValidatedJsonRejection::JsonError)?;

        value.validate().map_err(ValidatedJsonRejection::ValidationError)?;

        Ok(ValidatedJson(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct AddressForm {
        #[validate(length(min = 2, message = "City is too short"))]
        city: String,
    }

    #[derive(Debug, Deserialize, Validate)]
    struct CheckoutForm {
        #[validate(range(min = 1, message = "Quantity must be at least 1"))]
        quantity: u32,
        #[validate(email)]
        email: String,
        #[validate(nested)]
        address: AddressForm,
    }

    fn form(quantity: u32, email: &str, city: &str) -> CheckoutForm {
        CheckoutForm {
            quantity,
            email: email.to_string(),
            address: AddressForm { city: city.to_string() },
        }
    }

    #[test]
    fn test_field_errors_carry_messages() {
        let errors = form(0, "asha@example.com", "Pune").validate().unwrap_err();
        let fields = convert_validation_errors(&errors);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].field, "quantity");
        assert_eq!(fields[0].message, "Quantity must be at least 1");
        assert_eq!(fields[0].code, "range");
    }

    #[test]
    fn test_nested_fields_are_dotted() {
        let errors = form(1, "not-an-email", "P").validate().unwrap_err();
        let mut names: Vec<String> = convert_validation_errors(&errors).into_iter().map(|e| e.field).collect();
        names.sort();
        assert_eq!(names, vec!["address.city".to_string(), "email".to_string()]);
    }

    #[test]
    fn test_valid_form_passes() {
        assert!(form(2, "asha@example.com", "Pune").validate().is_ok());
    }
}
