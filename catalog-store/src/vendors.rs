//! Vendor directory: free-text searchable rows, no normalization enforced.

use sqlx::Row;
use tracing::debug;

use crate::{CatalogError, CatalogStore};

/// One vendor row. All descriptive fields are free text and optional.
#[derive(Debug, Clone)]
pub struct VendorRecord {
    pub name: String,
    pub category: Option<String>,
    pub industries: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub capabilities: Option<String>,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub contact_name: Option<String>,
    pub contact_email: Option<String>,
}

impl CatalogStore {
    /// Searches vendors with fuzzy substring filters.
    ///
    /// Industry terms are ANDed (`industries ILIKE '%term%'` for each);
    /// the capability phrase is ORed across the four free-text columns
    /// (category, description, capabilities, notes). Results are capped at
    /// `limit`.
    ///
    /// # Errors
    /// Returns [`CatalogError::Query`] on database failures.
    pub async fn search_vendors(
        &self,
        industries: &[String],
        capability: Option<&str>,
        limit: i64,
    ) -> Result<Vec<VendorRecord>, CatalogError> {
        // Build the WHERE clause dynamically with numbered binds.
        let mut conditions: Vec<String> = Vec::new();
        let mut bind_values: Vec<String> = Vec::new();

        for term in industries {
            bind_values.push(format!("%{}%", term));
            conditions.push(format!("industries ILIKE ${}", bind_values.len()));
        }

        if let Some(cap) = capability.map(str::trim).filter(|c| !c.is_empty()) {
            bind_values.push(format!("%{}%", cap));
            let n = bind_values.len();
            conditions.push(format!(
                "(category ILIKE ${n} OR description ILIKE ${n} OR \
                 capabilities ILIKE ${n} OR notes ILIKE ${n})"
            ));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        let sql = format!(
            "SELECT name, category, industries, website, location, capabilities, \
             description, notes, contact_name, contact_email \
             FROM vendors{where_clause} ORDER BY name LIMIT ${}",
            bind_values.len() + 1
        );

        debug!(sql = %sql, "vendor search query");

        let mut qb = sqlx::query(&sql);
        for v in &bind_values {
            qb = qb.bind(v);
        }
        qb = qb.bind(limit);

        let rows = qb.fetch_all(&self.pool).await?;

        Ok(rows
            .into_iter()
            .map(|r| VendorRecord {
                name: r.get("name"),
                category: r.get("category"),
                industries: r.get("industries"),
                website: r.get("website"),
                location: r.get("location"),
                capabilities: r.get("capabilities"),
                description: r.get("description"),
                notes: r.get("notes"),
                contact_name: r.get("contact_name"),
                contact_email: r.get("contact_email"),
            })
            .collect())
    }
}
