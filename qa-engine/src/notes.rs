//! Engineering-notes generation from a session's message log.

use llm_service::ChatMessage;
use uuid::Uuid;

use crate::error::EngineError;
use crate::ports::{CompletionClient, ConversationLog};

const SCRIBE_SYSTEM: &str = "You are an engineering scribe. Produce concise engineering notes \
for another engineer. Extract: requirements, assumptions, decisions, open questions, risks, \
next actions. Use Markdown headings and bullet points. No fluff.";

/// Maximum messages folded into one notes document.
const NOTES_MESSAGE_LIMIT: i64 = 200;

/// Builds a `# Engineering Notes` markdown document from the session's
/// conversation, via one scribe completion at temperature 0.
///
/// # Errors
/// Returns [`EngineError`] for log or completion failures.
pub async fn build_engineering_notes(
    log: &dyn ConversationLog,
    llm: &dyn CompletionClient,
    session_id: Uuid,
) -> Result<String, EngineError> {
    let rows = log.list_messages(session_id, NOTES_MESSAGE_LIMIT).await?;
    if rows.is_empty() {
        return Ok(format!(
            "# Engineering Notes\n\nNo messages found for session_id={session_id}\n"
        ));
    }

    let convo: Vec<String> = rows
        .iter()
        .map(|r| format!("{}: {}", r.role.to_uppercase(), r.content))
        .collect();

    let messages = [
        ChatMessage::system(SCRIBE_SYSTEM),
        ChatMessage::user(convo.join("\n\n")),
    ];
    let text = llm.complete(&messages, 0.0).await?;
    let text = text.trim();

    Ok(format!(
        "# Engineering Notes\n\n{}",
        if text.is_empty() { "No content.\n" } else { text }
    ))
}
