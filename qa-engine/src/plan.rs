//! Planner: LLM classification of the retrieval strategy for a question.
//!
//! Best-effort classifier; malformed output fails open to the safe default
//! (retrieve docs, skip vendors, no clarification). Its vendor decision is
//! additionally overridden downstream by the deterministic keyword trigger.

use llm_service::ChatMessage;
use serde::Deserialize;
use tracing::warn;

use crate::error::EngineError;
use crate::ports::{CompletionClient, PromptSource};

fn default_true() -> bool {
    true
}

/// Structured decision returned by the planner.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PlanDecision {
    #[serde(default)]
    pub needs_clarification: bool,
    #[serde(default)]
    pub clarifying_question: String,
    #[serde(default = "default_true")]
    pub use_docs_rag: bool,
    #[serde(default)]
    pub use_vendors: bool,
}

impl Default for PlanDecision {
    /// Safe fallback used when the planner output cannot be parsed.
    fn default() -> Self {
        Self {
            needs_clarification: false,
            clarifying_question: String::new(),
            use_docs_rag: true,
            use_vendors: false,
        }
    }
}

/// Parses the planner's raw output into a [`PlanDecision`].
///
/// # Errors
/// Returns the underlying JSON error; callers substitute
/// [`PlanDecision::default`] themselves, never this function.
pub fn parse_plan(raw: &str) -> Result<PlanDecision, serde_json::Error> {
    serde_json::from_str(raw.trim())
}

/// Asks the LLM to plan the retrieval strategy for `question` under `mode`.
///
/// Runs at temperature 0 for determinism. Parse failures fail open to the
/// documented default; transport failures propagate.
///
/// # Errors
/// Returns [`EngineError`] for prompt-loading or completion failures.
pub async fn plan(
    llm: &dyn CompletionClient,
    prompts: &dyn PromptSource,
    question: &str,
    mode_name: &str,
) -> Result<PlanDecision, EngineError> {
    let system = prompts.load("planner")?;
    let messages = [
        ChatMessage::system(system),
        ChatMessage::user(format!("mode={mode_name}\nquestion={question}")),
    ];
    let raw = llm.complete(&messages, 0.0).await?;

    Ok(parse_plan(&raw).unwrap_or_else(|e| {
        warn!(error = %e, "planner returned malformed JSON; using default plan");
        PlanDecision::default()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_plan_parses() {
        let p = parse_plan(
            r#"{"needs_clarification": true, "clarifying_question": "Which alloy?",
                "use_docs_rag": false, "use_vendors": true}"#,
        )
        .unwrap();
        assert!(p.needs_clarification);
        assert_eq!(p.clarifying_question, "Which alloy?");
        assert!(!p.use_docs_rag);
        assert!(p.use_vendors);
    }

    #[test]
    fn missing_keys_take_defaults() {
        let p = parse_plan("{}").unwrap();
        assert!(!p.needs_clarification);
        assert!(p.use_docs_rag);
        assert!(!p.use_vendors);
    }

    #[test]
    fn malformed_json_is_an_error_for_the_caller_to_default() {
        assert!(parse_plan("I think you should use docs").is_err());
        assert_eq!(
            PlanDecision::default(),
            PlanDecision {
                needs_clarification: false,
                clarifying_question: String::new(),
                use_docs_rag: true,
                use_vendors: false,
            }
        );
    }
}
