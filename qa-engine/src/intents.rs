//! Keyword-based intent classification over normalized question text.
//!
//! These are pure functions, decoupled from the pipeline that consumes their
//! booleans. Matching is substring-based on lowercased text, same as the
//! vendor trigger; industry extraction in `vendor.rs` is the only whole-word
//! matcher.

/// Product-name mentions that pair with scheduling terms.
const PRODUCT_TERMS: [&str; 2] = ["hardwarehub", "hardware hub"];

/// Scheduling vocabulary.
const SCHEDULING_TERMS: [&str; 8] = [
    "meet", "meeting", "schedule", "book", "call", "intro", "chat", "calendar",
];

/// Service-category vocabulary that activates the service-preference
/// directive in the generation prompt.
const SERVICES_TERMS: [&str; 10] = [
    "cad",
    "solidworks",
    "fea",
    "finite element",
    "cfd",
    "computational fluid",
    "prototype",
    "prototyping",
    "dfm",
    "mechanical engineering",
];

/// Vocabulary forcing vendor lookup regardless of the planner's decision.
const VENDOR_TRIGGER_TERMS: [&str; 11] = [
    "vendor",
    "vendors",
    "supplier",
    "suppliers",
    "manufacturer",
    "manufacturers",
    "machine shop",
    "fabrication",
    "fab",
    "who should i go to",
    "where do i buy",
];

/// Trigger phrases restricting retrieval to the system-doc allow-list.
const SYSTEM_DOCS_TRIGGERS: [&str; 3] = [
    "assistant self-check",
    "system-docs-only",
    "use only the system docs",
];

/// Classification of a question against the fixed keyword sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntentSignals {
    /// Product-name mention present.
    pub product: bool,
    /// Scheduling vocabulary present.
    pub scheduling: bool,
    /// Service-category vocabulary present.
    pub services: bool,
}

fn any_term(text: &str, terms: &[&str]) -> bool {
    terms.iter().any(|t| text.contains(t))
}

/// Classifies the raw question text against the fixed keyword sets.
pub fn detect_intents(text: &str) -> IntentSignals {
    let q = text.to_lowercase();
    IntentSignals {
        product: any_term(&q, &PRODUCT_TERMS),
        scheduling: any_term(&q, &SCHEDULING_TERMS),
        services: any_term(&q, &SERVICES_TERMS),
    }
}

/// True when the question explicitly asks for vendors/suppliers. Used to
/// force vendor lookup as a compensating control for planner unreliability.
pub fn wants_vendors(text: &str) -> bool {
    any_term(&text.to_lowercase(), &VENDOR_TRIGGER_TERMS)
}

/// True when the question asks for the self-referential, system-docs-only
/// retrieval mode.
pub fn wants_system_docs_only(text: &str) -> bool {
    any_term(&text.to_lowercase(), &SYSTEM_DOCS_TRIGGERS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheduling_plus_product_detected() {
        let s = detect_intents("I want to schedule a meeting with HardwareHub");
        assert!(s.product);
        assert!(s.scheduling);
        assert!(!s.services);
    }

    #[test]
    fn services_vocabulary_detected() {
        let s = detect_intents("Can you recommend someone for FEA and prototyping?");
        assert!(s.services);
        assert!(!s.product);
    }

    #[test]
    fn vendor_trigger_matches_supplier() {
        assert!(wants_vendors("I need a medical-grade CNC supplier"));
        assert!(wants_vendors("where do I buy titanium stock"));
        assert!(!wants_vendors("what is the yield strength of 6061-T6?"));
    }

    #[test]
    fn system_docs_trigger() {
        assert!(wants_system_docs_only(
            "system-docs-only: show me the architecture"
        ));
        assert!(!wants_system_docs_only("show me the architecture"));
    }
}
