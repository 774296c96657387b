//! Narrow interfaces to external collaborators: mail, image storage and payments.

mod image_storage;
mod mailer;
mod payment;

pub use image_storage::*;
pub use mailer::*;
pub use payment::*;
