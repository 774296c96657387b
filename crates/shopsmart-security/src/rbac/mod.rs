//! Role-based access checks on verified claims.

mod checker;

pub use checker::*;
