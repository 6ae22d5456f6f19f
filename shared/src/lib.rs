//! Shared types for the Hielo Ops backend
//!
//! Data models and small utilities used by the server and by API clients.
//! DB row types are feature-gated behind `db` so frontend consumers don't
//! pull in sqlx.

pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
