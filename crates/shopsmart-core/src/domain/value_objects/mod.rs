//! Value objects.

mod actor;
mod address;
mod order_status;
mod role;

pub use actor::*;
pub use address::*;
pub use order_status::*;
pub use role::*;
