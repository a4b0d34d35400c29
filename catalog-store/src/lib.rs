//! PostgreSQL-backed stores for the assistant's relational data.
//!
//! One connection pool serves six concerns: the document catalog, license
//! policies, the vendor directory, audit sessions/messages, feedback, and
//! chat history. All operations are simple filtered reads or single-row
//! writes; atomicity per row is provided by PostgreSQL, and the store keeps
//! no in-memory state.

pub mod chats;
pub mod documents;
pub mod errors;
pub mod feedback;
pub mod licenses;
pub mod sessions;
pub mod vendors;

pub use chats::{ChatMessageRow, ChatRow};
pub use documents::DocumentRecord;
pub use errors::CatalogError;
pub use licenses::LicenseRecord;
pub use sessions::{MessageRole, MessageRow};
pub use vendors::VendorRecord;

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

/// Shared handle over the PostgreSQL pool.
#[derive(Clone)]
pub struct CatalogStore {
    pub(crate) pool: PgPool,
}

impl CatalogStore {
    /// Connects to PostgreSQL with a small pool.
    ///
    /// # Errors
    /// Returns [`CatalogError::Connect`] if the pool cannot be established.
    pub async fn connect(database_url: &str) -> Result<Self, CatalogError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .map_err(|e| CatalogError::Connect(e.to_string()))?;

        info!("Connected to PostgreSQL catalog store");
        Ok(Self { pool })
    }

    /// Wraps an existing pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Runs the schema migration.
    ///
    /// # Errors
    /// Returns [`CatalogError::Migration`] when the migration SQL fails.
    pub async fn migrate(&self) -> Result<(), CatalogError> {
        let migration_sql = include_str!("../migrations/001_init.sql");

        sqlx::raw_sql(migration_sql)
            .execute(&self.pool)
            .await
            .map_err(|e| CatalogError::Migration(e.to_string()))?;

        info!("Catalog schema migration complete");
        Ok(())
    }
}
