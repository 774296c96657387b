//! Domain entities.

mod cart;
mod order;
mod product;
mod review;
mod user;

pub use cart::*;
pub use order::*;
pub use product::*;
pub use review::*;
pub use user::*;
