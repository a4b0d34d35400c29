//! Vendor matching: hint extraction from free text plus directory search.
//!
//! Industry keywords use whole-word matching against a fixed vocabulary; the
//! capability phrase is whatever follows need/seeking/looking for/find. The
//! rendered block always exists in the generation prompt: "Not requested."
//! or "None found." keeps the model's instructions syntactically stable.

use std::fmt::Write;
use std::sync::LazyLock;

use catalog_store::VendorRecord;
use regex::Regex;

use crate::error::EngineError;
use crate::ports::VendorDirectory;

/// Industry vocabulary recognized in questions (whole-word matches).
const INDUSTRY_TOKENS: [&str; 9] = [
    "medical",
    "medtech",
    "aerospace",
    "automotive",
    "consumer",
    "industrial",
    "electronics",
    "robotics",
    "defense",
];

static CAPABILITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(need|seeking|looking for|find)\s+(a|an)?\s*([^.;,\n]+)")
        .expect("capability regex")
});

/// Block rendered when vendor lookup was not requested.
pub const VENDOR_BLOCK_NOT_REQUESTED: &str = "VENDOR_TABLE_MATCHES:\n- Not requested.";

/// Extracts industry keywords and a single capability phrase from the
/// question. Returns an empty industry list when nothing matches.
pub fn parse_vendor_hints(question: &str) -> (Vec<String>, Option<String>) {
    let q = question.to_lowercase();

    let industries: Vec<String> = INDUSTRY_TOKENS
        .iter()
        .filter(|token| {
            Regex::new(&format!(r"\b{}\b", regex::escape(token)))
                .map(|re| re.is_match(&q))
                .unwrap_or(false)
        })
        .map(|t| t.to_string())
        .collect();

    // crude capability phrase: the text after the request verb
    let capability = CAPABILITY_RE
        .captures(&q)
        .and_then(|c| c.get(3))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty());

    (industries, capability)
}

/// Renders the vendor directive block. Absent descriptive fields are
/// omitted, not blanked; an empty result set renders an explicit
/// "None found." block.
pub fn render_vendor_block(vendors: &[VendorRecord]) -> String {
    if vendors.is_empty() {
        return "VENDOR_TABLE_MATCHES:\n- None found.".to_string();
    }

    let mut out = String::from("VENDOR_TABLE_MATCHES (use these explicitly when asked):");
    for v in vendors {
        match v.category.as_deref().filter(|c| !c.is_empty()) {
            Some(cat) => {
                let _ = write!(out, "\n- {} ({})", v.name, cat);
            }
            None => {
                let _ = write!(out, "\n- {}", v.name);
            }
        }
        if let Some(website) = v.website.as_deref().filter(|s| !s.is_empty()) {
            let _ = write!(out, "\n  website: {website}");
        }
        if let Some(location) = v.location.as_deref().filter(|s| !s.is_empty()) {
            let _ = write!(out, "\n  location: {location}");
        }
        if let Some(caps) = v.capabilities.as_deref().filter(|s| !s.is_empty()) {
            let _ = write!(out, "\n  capabilities: {caps}");
        }
    }
    out
}

/// Parses hints from the question, queries the directory, and renders the
/// directive block. Returns the block plus the matched rows.
///
/// # Errors
/// Directory failures propagate; unlike license lookups, vendor search does
/// not fail closed.
pub async fn vendor_context_block(
    directory: &dyn VendorDirectory,
    question: &str,
    limit: i64,
) -> Result<(String, Vec<VendorRecord>), EngineError> {
    let (industries, capability) = parse_vendor_hints(question);
    let vendors = directory
        .search(&industries, capability.as_deref(), limit)
        .await?;
    let block = render_vendor_block(&vendors);
    Ok((block, vendors))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vendor(name: &str) -> VendorRecord {
        VendorRecord {
            name: name.to_string(),
            category: None,
            industries: None,
            website: None,
            location: None,
            capabilities: None,
            description: None,
            notes: None,
            contact_name: None,
            contact_email: None,
        }
    }

    #[test]
    fn industry_tokens_are_whole_word() {
        let (industries, _) = parse_vendor_hints("we are a medical device startup");
        assert_eq!(industries, vec!["medical"]);

        // "premedical" must not match "medical"
        let (industries, _) = parse_vendor_hints("premedical coursework");
        assert!(industries.is_empty());
    }

    #[test]
    fn hyphenated_industry_still_matches() {
        let (industries, capability) = parse_vendor_hints("I need a medical-grade CNC supplier");
        assert_eq!(industries, vec!["medical"]);
        assert_eq!(capability.as_deref(), Some("medical-grade cnc supplier"));
    }

    #[test]
    fn capability_follows_request_verb() {
        let (_, capability) = parse_vendor_hints("we are looking for an anodizing shop. urgent");
        assert_eq!(capability.as_deref(), Some("anodizing shop"));
    }

    #[test]
    fn no_hints_yields_empty() {
        let (industries, capability) = parse_vendor_hints("what is the modulus of steel?");
        assert!(industries.is_empty());
        assert!(capability.is_none());
    }

    #[test]
    fn empty_result_set_renders_none_found() {
        assert_eq!(render_vendor_block(&[]), "VENDOR_TABLE_MATCHES:\n- None found.");
    }

    #[test]
    fn absent_fields_are_omitted() {
        let mut v = vendor("Acme Machining");
        v.category = Some("CNC".into());
        v.website = Some("https://acme.example".into());
        let block = render_vendor_block(&[v, vendor("Plain Shop")]);
        assert!(block.contains("- Acme Machining (CNC)"));
        assert!(block.contains("  website: https://acme.example"));
        assert!(block.contains("- Plain Shop"));
        assert!(!block.contains("location:"));
        assert!(!block.contains("capabilities:"));
    }
}
