//! License policies: immutable reference data keyed by license key.

use sqlx::Row;

use crate::{CatalogError, CatalogStore};

/// Machine-readable usage constraints for one license.
///
/// Fields are nullable in the table; the resolver substitutes documented
/// defaults when a field is absent.
#[derive(Debug, Clone)]
pub struct LicenseRecord {
    pub license_key: String,
    pub commercial_use_allowed: Option<bool>,
    pub derivatives_allowed: Option<bool>,
    pub sharealike_required: Option<bool>,
    pub verbatim_allowed: Option<bool>,
    pub verbatim_char_limit: Option<i32>,
    pub citation_required: Option<bool>,
    pub attribution_required: Option<bool>,
}

impl CatalogStore {
    /// Fetches license policies matching any of the given keys.
    ///
    /// # Errors
    /// Returns [`CatalogError::Query`] on database failures.
    pub async fn find_licenses_by_keys(
        &self,
        license_keys: &[String],
    ) -> Result<Vec<LicenseRecord>, CatalogError> {
        if license_keys.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query(
            "SELECT license_key, commercial_use_allowed, derivatives_allowed, \
             sharealike_required, verbatim_allowed, verbatim_char_limit, \
             citation_required, attribution_required \
             FROM licenses WHERE license_key = ANY($1)",
        )
        .bind(license_keys)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| LicenseRecord {
                license_key: r.get("license_key"),
                commercial_use_allowed: r.get("commercial_use_allowed"),
                derivatives_allowed: r.get("derivatives_allowed"),
                sharealike_required: r.get("sharealike_required"),
                verbatim_allowed: r.get("verbatim_allowed"),
                verbatim_char_limit: r.get("verbatim_char_limit"),
                citation_required: r.get("citation_required"),
                attribution_required: r.get("attribution_required"),
            })
            .collect())
    }
}
