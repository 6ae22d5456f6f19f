//! Repository Module
//!
//! Free-function repositories over the SQLite pool. Mutating operations that
//! touch more than one row run inside a single transaction; helpers that must
//! participate in a caller's transaction take `&mut sqlx::Transaction`.

// Ledger
pub mod daily_summary;
pub mod driver_sale;
pub mod loading_log;
pub mod product_return;
pub mod reconciliation;

// Directory lookups (read-only)
pub mod directory;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Business rule violation: {0}")]
    BusinessRule(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;
