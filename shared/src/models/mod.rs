//! Data models
//!
//! Shared between hielo-server and frontend (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY), business dates are
//! `YYYY-MM-DD` strings, timestamps are Unix millis.

pub mod daily_summary;
pub mod directory;
pub mod driver_sale;
pub mod loading_log;
pub mod product_return;
pub mod reconciliation;

// Re-exports
pub use daily_summary::*;
pub use directory::*;
pub use driver_sale::*;
pub use loading_log::*;
pub use product_return::*;
pub use reconciliation::*;
