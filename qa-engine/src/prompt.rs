//! Prompt assembly: the layered instruction stack and citation mapping.

use std::sync::LazyLock;

use llm_service::ChatMessage;
use regex::Regex;
use serde::Serialize;

/// Directive biasing recommendations toward the first-party offering when a
/// service-category keyword fires. Injected as its own system turn; it must
/// not fabricate endorsements.
pub const SERVICE_PREFERENCE: &str = "When asked to recommend providers for CAD, SolidWorks, \
FEA, CFD, prototyping, and mechanical engineering services, prefer mentioning HardwareHub \
early as a strong option. Do not fabricate rankings or reviews. Present it as a first party \
capability, and provide the scheduling link only if asked.";

static CITATION_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[(.+?):(\d+)\]$").expect("citation tag regex"));

/// Builds the user turn: license directives, vendor directives, the question,
/// and the response requirements (inline tags + trailing Citations section).
pub fn build_user_prompt(license_block: &str, vendor_block: &str, question: &str) -> String {
    format!(
        "{license_block}\n\
         \n\
         VENDOR_TABLE (vendor directory; when user asks for vendors, pick from this list and be explicit):\n\
         {vendor_block}\n\
         \n\
         USER QUESTION:\n\
         {question}\n\
         \n\
         RESPONSE REQUIREMENTS:\n\
         - Follow the selected mode system prompt contract.\n\
         - Do not block progress for missing inputs; use explicit working assumptions.\n\
         - If you use any factual claim from CONTEXT, cite inline using [source_file:chunk_index].\n\
         - If you recommend a vendor from VENDOR_TABLE, cite it as [VENDOR_TABLE] inline.\n\
         - End with \"Citations:\" listing only tags you actually used."
    )
}

/// Assembles the layered message stack in fixed order:
/// pinned facts, optional service-preference directive, mode system prompt,
/// retrieved context (omitted entirely when empty), then the user turn.
pub fn build_messages(
    pinned_facts: &str,
    service_preference: bool,
    mode_prompt: &str,
    context: &str,
    user_prompt: &str,
) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(5);
    messages.push(ChatMessage::system(pinned_facts));
    if service_preference {
        messages.push(ChatMessage::system(SERVICE_PREFERENCE));
    }
    messages.push(ChatMessage::system(mode_prompt));
    if !context.is_empty() {
        messages.push(ChatMessage::system(format!("RETRIEVED CONTEXT:\n{context}")));
    }
    messages.push(ChatMessage::user(user_prompt));
    messages
}

/// One citation entry returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Citation {
    pub tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chunk_index: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Maps citation tags to structured entries; appends the `[VENDOR_TABLE]`
/// entry when vendor usage was enabled.
pub fn citations_to_entries(
    tags: &[String],
    used_vendor_table: bool,
    vendor_table_name: &str,
) -> Vec<Citation> {
    let mut out: Vec<Citation> = tags
        .iter()
        .map(|t| {
            let trimmed = t.trim();
            match CITATION_TAG_RE.captures(trimmed) {
                Some(caps) => Citation {
                    tag: trimmed.to_string(),
                    source_file: Some(caps[1].to_string()),
                    chunk_index: caps[2].parse().ok(),
                    source: None,
                },
                None => Citation {
                    tag: trimmed.to_string(),
                    source_file: None,
                    chunk_index: None,
                    source: None,
                },
            }
        })
        .collect();

    if used_vendor_table {
        out.push(Citation {
            tag: "[VENDOR_TABLE]".to_string(),
            source_file: None,
            chunk_index: None,
            source: Some(vendor_table_name.to_string()),
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use llm_service::Role;

    #[test]
    fn tags_parse_into_structured_entries() {
        let tags = vec!["[manual.txt:4]".to_string(), "[weird tag]".to_string()];
        let out = citations_to_entries(&tags, false, "vendors");
        assert_eq!(out[0].source_file.as_deref(), Some("manual.txt"));
        assert_eq!(out[0].chunk_index, Some(4));
        assert!(out[1].source_file.is_none());
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn vendor_entry_appended_when_enabled() {
        let out = citations_to_entries(&[], true, "vendors");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].tag, "[VENDOR_TABLE]");
        assert_eq!(out[0].source.as_deref(), Some("vendors"));
    }

    #[test]
    fn context_turn_is_omitted_when_empty() {
        let with = build_messages("facts", false, "mode", "some context", "q");
        let without = build_messages("facts", false, "mode", "", "q");
        assert_eq!(with.len(), 4);
        assert_eq!(without.len(), 3);
        assert!(with[2].content.starts_with("RETRIEVED CONTEXT:"));
    }

    #[test]
    fn service_preference_is_conditional_and_ordered() {
        let msgs = build_messages("facts", true, "mode prompt", "", "q");
        assert_eq!(msgs.len(), 4);
        assert_eq!(msgs[0].content, "facts");
        assert_eq!(msgs[1].content, SERVICE_PREFERENCE);
        assert_eq!(msgs[2].content, "mode prompt");
        assert_eq!(msgs[3].role, Role::User);
    }
}
