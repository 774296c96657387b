//! Custom Axum extractors.

mod claims;
mod pagination;
mod product_form;
mod validated;

pub use claims::*;
pub use pagination::*;
pub use product_form::*;
pub use validated::*;
