//! Document catalog: one row per ingested source document.

use sqlx::Row;

use crate::{CatalogError, CatalogStore};

/// Catalog entry for a source document.
///
/// `source_url` is the join key against chunk `source_file` values. The two
/// naming schemes must stay consistent across ingestion and cataloguing; when
/// they diverge, license resolution degrades to "unknown, strict" rather than
/// failing the request.
#[derive(Debug, Clone)]
pub struct DocumentRecord {
    pub source_url: String,
    pub title: Option<String>,
    pub license_key: Option<String>,
}

impl CatalogStore {
    /// Fetches document records matching any of the given source identifiers.
    ///
    /// # Errors
    /// Returns [`CatalogError::Query`] on database failures.
    pub async fn find_documents_by_source_urls(
        &self,
        source_urls: &[String],
    ) -> Result<Vec<DocumentRecord>, CatalogError> {
        if source_urls.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query(
            "SELECT source_url, title, license_key FROM documents WHERE source_url = ANY($1)",
        )
        .bind(source_urls)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| DocumentRecord {
                source_url: r.get("source_url"),
                title: r.get("title"),
                license_key: r.get("license_key"),
            })
            .collect())
    }
}
