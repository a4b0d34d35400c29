//! Unified error type for catalog operations.

use thiserror::Error;

/// Top-level error for the `catalog-store` crate.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Connection establishment failed.
    #[error("connection failed: {0}")]
    Connect(String),

    /// Schema migration failed.
    #[error("migration failed: {0}")]
    Migration(String),

    /// Query execution failed.
    #[error("query failed: {0}")]
    Query(#[from] sqlx::Error),

    /// A message carried a role outside user/assistant/system.
    #[error("invalid message role: {0}")]
    InvalidRole(String),
}
