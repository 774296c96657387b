//! # ShopSmart Repository
//!
//! Data access for the store. Services depend on the traits in [`traits`];
//! the MySQL implementations in [`mysql`] use SQLx with `?` placeholders and
//! store UUIDs as `CHAR(36)`.
//!
//! ```text
//! Service
//!   ↓  Arc<dyn ProductRepository>   (domain interface)
//! MySqlProductRepository            (SQLx)
//!   ↓  Arc<dyn DatabasePoolInterface>
//! MySQL
//! ```

pub mod mysql;
pub mod pool;
pub mod traits;

pub use mysql::*;
pub use pool::*;
pub use traits::*;
