//! Validation and the single-shot repair policy.
//!
//! The judge's verdict drives at most one repair pass. `should_repair` is a
//! pure decision function so the max-one-retry invariant stays visible and
//! testable, rather than buried in branching.

use llm_service::ChatMessage;
use serde::Deserialize;
use tracing::warn;

use crate::error::EngineError;
use crate::ports::{CompletionClient, PromptSource};

fn default_true() -> bool {
    true
}

/// Judge verdict for a generated answer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Verdict {
    #[serde(default = "default_true")]
    pub ok: bool,
    #[serde(default)]
    pub issues: Vec<String>,
}

impl Default for Verdict {
    /// Fail-open verdict used when the judge output cannot be parsed.
    fn default() -> Self {
        Self {
            ok: true,
            issues: Vec::new(),
        }
    }
}

/// Which generation produced the final answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStage {
    Draft,
    Repaired,
}

/// Parses the judge's raw output into a [`Verdict`].
///
/// # Errors
/// Returns the underlying JSON error; callers substitute
/// [`Verdict::default`] explicitly.
pub fn parse_verdict(raw: &str) -> Result<Verdict, serde_json::Error> {
    serde_json::from_str(raw.trim())
}

/// Pure repair decision: repair exactly when the judge rejected the answer.
pub fn should_repair(verdict: &Verdict) -> bool {
    !verdict.ok
}

/// Builds the repair request turn from the judge's issues.
pub fn repair_request(issues: &[String]) -> String {
    let mut out = String::from("Fix the answer to address these issues:");
    for issue in issues {
        out.push_str("\n- ");
        out.push_str(issue);
    }
    out
}

/// Asks the LLM judge whether `answer` satisfies the mode's rules.
///
/// Runs at temperature 0. Parse failures fail open to `{ok: true}`;
/// transport failures propagate.
///
/// # Errors
/// Returns [`EngineError`] for prompt-loading or completion failures.
pub async fn validate(
    llm: &dyn CompletionClient,
    prompts: &dyn PromptSource,
    answer: &str,
    mode_name: &str,
) -> Result<Verdict, EngineError> {
    let system = prompts.load("validator")?;
    let messages = [
        ChatMessage::system(system),
        ChatMessage::user(format!("mode={mode_name}\nanswer={answer}")),
    ];
    let raw = llm.complete(&messages, 0.0).await?;

    Ok(parse_verdict(&raw).unwrap_or_else(|e| {
        warn!(error = %e, "validator returned malformed JSON; accepting answer");
        Verdict::default()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_parses_and_triggers_repair() {
        let v = parse_verdict(r#"{"ok": false, "issues": ["missing citation"]}"#).unwrap();
        assert!(should_repair(&v));
        assert_eq!(v.issues, vec!["missing citation"]);
    }

    #[test]
    fn acceptance_does_not_repair() {
        let v = parse_verdict(r#"{"ok": true, "issues": []}"#).unwrap();
        assert!(!should_repair(&v));
    }

    #[test]
    fn malformed_verdict_fails_open() {
        assert!(parse_verdict("LGTM!").is_err());
        let fallback = Verdict::default();
        assert!(fallback.ok);
        assert!(fallback.issues.is_empty());
        assert!(!should_repair(&fallback));
    }

    #[test]
    fn repair_request_lists_issues() {
        let msg = repair_request(&["missing citation".into(), "wrong units".into()]);
        assert_eq!(
            msg,
            "Fix the answer to address these issues:\n- missing citation\n- wrong units"
        );
    }
}
