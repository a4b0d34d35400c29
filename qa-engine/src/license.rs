//! License resolution: maps cited sources to usage-constraint directives.
//!
//! The resolver renders a directive block that is injected verbatim into the
//! generation prompt as a hard constraint. It does not enforce license rules
//! on the generated text itself; enforcement is delegated to the validator
//! and the model's instruction-following.
//!
//! Store failures fail closed: lookups degrade to empty result sets, so
//! every source renders as "strict" rather than crashing the request.

use std::collections::HashMap;
use std::fmt::Write;

use catalog_store::{DocumentRecord, LicenseRecord};
use tracing::warn;

use crate::ports::{DocumentCatalog, LicenseCatalog};

/// First line of every license block.
pub const LICENSE_HEADER: &str = "LICENSE CONSTRAINTS (must follow):";

/// Block used when no documents were retrieved at all.
pub fn empty_license_block() -> String {
    format!("{LICENSE_HEADER}\n- No retrieved documents.")
}

/// Fetches document and license records for the cited sources and renders
/// the directive block. Lookups fail closed to empty lists on store errors.
pub async fn build_license_block(
    documents: &dyn DocumentCatalog,
    licenses: &dyn LicenseCatalog,
    source_files: &[String],
) -> String {
    if source_files.is_empty() {
        return empty_license_block();
    }

    let docs = match documents.find_by_source_urls(source_files).await {
        Ok(rows) => rows,
        Err(e) => {
            warn!(error = %e, "document lookup failed; treating all sources as strict");
            Vec::new()
        }
    };
    let doc_by_source: HashMap<&str, &DocumentRecord> =
        docs.iter().map(|d| (d.source_url.as_str(), d)).collect();

    // License keys in source order, deduplicated.
    let mut keys: Vec<String> = Vec::new();
    for sf in source_files {
        if let Some(doc) = doc_by_source.get(sf.as_str()) {
            if let Some(lk) = &doc.license_key {
                if !keys.contains(lk) {
                    keys.push(lk.clone());
                }
            }
        }
    }

    let lic_rows = if keys.is_empty() {
        Vec::new()
    } else {
        match licenses.find_by_keys(&keys).await {
            Ok(rows) => rows,
            Err(e) => {
                warn!(error = %e, "license lookup failed; treating all sources as strict");
                Vec::new()
            }
        }
    };
    let lic_by_key: HashMap<&str, &LicenseRecord> = lic_rows
        .iter()
        .map(|l| (l.license_key.as_str(), l))
        .collect();

    render_license_block(source_files, &doc_by_source, &lic_by_key)
}

/// Renders directive lines for each source in input order.
///
/// - No document record → strict: summarize only, cite if used.
/// - Document without resolvable license → unknown, strict: summarize only,
///   do not quote, cite if used.
/// - Otherwise every policy field is emitted, with defaults substituted for
///   absent values.
fn render_license_block(
    source_files: &[String],
    doc_by_source: &HashMap<&str, &DocumentRecord>,
    lic_by_key: &HashMap<&str, &LicenseRecord>,
) -> String {
    fn b(val: Option<bool>, default: bool) -> bool {
        val.unwrap_or(default)
    }

    let mut out = String::from(LICENSE_HEADER);
    for sf in source_files {
        let Some(doc) = doc_by_source.get(sf.as_str()) else {
            let _ = write!(
                out,
                "\n- {sf}: no document record found. Treat as strict: summarize only, cite if used."
            );
            continue;
        };

        let title = doc.title.as_deref().unwrap_or(sf);
        let _ = write!(out, "\n- {sf} | title: {title}");

        let lic = doc
            .license_key
            .as_deref()
            .and_then(|lk| lic_by_key.get(lk).copied());
        let (Some(lk), Some(lic)) = (doc.license_key.as_deref(), lic) else {
            let _ = write!(
                out,
                "\n  license: unknown. Treat as strict: summarize only, do not quote, cite if used."
            );
            continue;
        };

        let _ = write!(out, "\n  license_key: {lk}");
        let _ = write!(
            out,
            "\n  commercial_use_allowed: {}",
            b(lic.commercial_use_allowed, true)
        );
        let _ = write!(
            out,
            "\n  derivatives_allowed: {}",
            b(lic.derivatives_allowed, true)
        );
        let _ = write!(
            out,
            "\n  sharealike_required: {}",
            b(lic.sharealike_required, false)
        );
        let _ = write!(
            out,
            "\n  verbatim_allowed: {}",
            b(lic.verbatim_allowed, false)
        );
        if let Some(limit) = lic.verbatim_char_limit {
            let _ = write!(out, "\n  verbatim_char_limit: {limit}");
        }
        let _ = write!(
            out,
            "\n  citation_required: {}",
            b(lic.citation_required, true)
        );
        let _ = write!(
            out,
            "\n  attribution_required: {}",
            b(lic.attribution_required, false)
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(source: &str, title: Option<&str>, key: Option<&str>) -> DocumentRecord {
        DocumentRecord {
            source_url: source.to_string(),
            title: title.map(String::from),
            license_key: key.map(String::from),
        }
    }

    fn permissive(key: &str) -> LicenseRecord {
        LicenseRecord {
            license_key: key.to_string(),
            commercial_use_allowed: Some(true),
            derivatives_allowed: None,
            sharealike_required: None,
            verbatim_allowed: Some(true),
            verbatim_char_limit: Some(300),
            citation_required: None,
            attribution_required: Some(true),
        }
    }

    fn render(
        sources: &[&str],
        docs: &[DocumentRecord],
        lics: &[LicenseRecord],
    ) -> String {
        let doc_by_source: HashMap<&str, &DocumentRecord> =
            docs.iter().map(|d| (d.source_url.as_str(), d)).collect();
        let lic_by_key: HashMap<&str, &LicenseRecord> =
            lics.iter().map(|l| (l.license_key.as_str(), l)).collect();
        let sources: Vec<String> = sources.iter().map(|s| s.to_string()).collect();
        render_license_block(&sources, &doc_by_source, &lic_by_key)
    }

    #[test]
    fn missing_document_record_is_strict() {
        let block = render(&["ghost.txt"], &[], &[]);
        assert!(block.contains(
            "ghost.txt: no document record found. Treat as strict: summarize only, cite if used."
        ));
    }

    #[test]
    fn document_without_license_is_unknown_strict() {
        let block = render(
            &["handbook.txt"],
            &[doc("handbook.txt", Some("Shop Handbook"), None)],
            &[],
        );
        assert!(block.contains("handbook.txt | title: Shop Handbook"));
        assert!(block.contains(
            "license: unknown. Treat as strict: summarize only, do not quote, cite if used."
        ));
    }

    #[test]
    fn policy_fields_render_with_defaults() {
        let block = render(
            &["spec.txt"],
            &[doc("spec.txt", None, Some("cc-by"))],
            &[permissive("cc-by")],
        );
        assert!(block.contains("license_key: cc-by"));
        assert!(block.contains("commercial_use_allowed: true"));
        // absent derivatives_allowed defaults to true
        assert!(block.contains("derivatives_allowed: true"));
        // absent sharealike_required defaults to false
        assert!(block.contains("sharealike_required: false"));
        assert!(block.contains("verbatim_allowed: true"));
        assert!(block.contains("verbatim_char_limit: 300"));
        // absent citation_required defaults to true
        assert!(block.contains("citation_required: true"));
        assert!(block.contains("attribution_required: true"));
    }

    #[test]
    fn verbatim_limit_line_is_omitted_when_absent() {
        let mut lic = permissive("mit");
        lic.verbatim_char_limit = None;
        let block = render(&["a.txt"], &[doc("a.txt", None, Some("mit"))], &[lic]);
        assert!(!block.contains("verbatim_char_limit"));
    }
}
