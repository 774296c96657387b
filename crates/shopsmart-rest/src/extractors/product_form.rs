//! Multipart form for creating a product with its image.

use crate::responses::AppError;
use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request},
};
use rust_decimal::Decimal;
use shopsmart_core::{split_csv, ShopError};
use shopsmart_service::{CreateProductRequest, ImageUpload};
use std::str::FromStr;

/// Name of the file part holding the product image.
pub const IMAGE_FIELD: &str = "image";

/// Product fields and image read from a `multipart/form-data` body.
///
/// Text parts: `name`, `price`, `company`, `category`, `stock`,
/// `available_colors` and `available_options` (both comma-separated).
#[derive(Debug)]
pub struct ProductForm {
    pub request: CreateProductRequest,
    pub image: ImageUpload,
}

#[derive(Default)]
struct FormFields {
    name: Option<String>,
    price: Option<String>,
    company: Option<String>,
    category: Option<String>,
    stock: Option<String>,
    available_colors: Option<String>,
    available_options: Option<String>,
    image: Option<ImageUpload>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl FormFields {
    fn into_form(self) -> Result<ProductForm, ShopError> {
        let image = self
            .image
            .ok_or_else(|| ShopError::validation("Product image is required"))?;
        let name = non_blank(self.name).ok_or_else(|| ShopError::validation("Product name is required"))?;
        let price = non_blank(self.price).ok_or_else(|| ShopError::validation("Product price is required"))?;
        let price = Decimal::from_str(&price).map_err(|_| ShopError::validation("Price must be a number"))?;
        let stock = non_blank(self.stock)
            .map(|raw| raw.parse::<u32>())
            .transpose()
            .map_err(|_| ShopError::validation("Stock must be a non-negative integer"))?;

        Ok(ProductForm {
            request: CreateProductRequest {
                name,
                price,
                company: non_blank(self.company),
                category: non_blank(self.category),
                stock,
                available_colors: self.available_colors.as_deref().map(split_csv).unwrap_or_default(),
                available_options: self.available_options.as_deref().map(split_csv).unwrap_or_default(),
            },
            image,
        })
    }
}

fn multipart_error(err: impl std::fmt::Display) -> AppError {
    AppError(ShopError::validation(format!("Invalid multipart body: {err}")))
}

#[async_trait]
impl<S> FromRequest<S> for ProductForm
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state).await.map_err(multipart_error)?;
        let mut fields = FormFields::default();

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let Some(name) = field.name().map(ToString::to_string) else {
                continue;
            };

            if name == IMAGE_FIELD {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field.bytes().await.map_err(multipart_error)?;
                fields.image = Some(ImageUpload {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
                continue;
            }

            let value = field.text().await.map_err(multipart_error)?;
            match name.as_str() {
                "name" => fields.name = Some(value),
                "price" => fields.price = Some(value),
                "company" => fields.company = Some(value),
                "category" => fields.category = Some(value),
                "stock" => fields.stock = Some(value),
                "available_colors" => fields.available_colors = Some(value),
                "available_options" => fields.available_options = Some(value),
                _ => {}
            }
        }

        fields.into_form().map_err(AppError)
    }
}
