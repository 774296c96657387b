//! Shipping address value object.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Country used when an address omits one.
pub const DEFAULT_COUNTRY: &str = "India";

fn default_country() -> String {
    DEFAULT_COUNTRY.to_string()
}

/// Delivery address attached to an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ShippingAddress {
    #[validate(length(min = 1, max = 255))]
    pub street: String,
    #[validate(length(min = 1, max = 100))]
    pub city: String,
    #[validate(length(min = 1, max = 100))]
    pub state: String,
    #[validate(length(min = 3, max = 12))]
    pub pincode: String,
    #[serde(default = "default_country")]
    #[validate(length(min = 1, max = 100))]
    pub country: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_country_defaults_to_india() {
        let address: ShippingAddress = serde_json::from_str(
            r#"{"street":"1 MG Road","city":"Pune","state":"MH","pincode":"411001"}"#,
        )
        .unwrap();
        assert_eq!(address.country, DEFAULT_COUNTRY);
        assert!(address.validate().is_ok());
    }

    #[test]
    fn test_short_pincode_rejected() {
        let address = ShippingAddress {
            street: "1 MG Road".to_string(),
            city: "Pune".to_string(),
            state: "MH".to_string(),
            pincode: "41".to_string(),
            country: default_country(),
        };
        assert!(address.validate().is_err());
    }
}
