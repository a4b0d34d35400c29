//! Audit sessions and their append-only message log.

use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use crate::{CatalogError, CatalogStore};

/// Role of a persisted message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
            MessageRole::System => "system",
        }
    }

    /// Parses a role string, rejecting anything outside the allowed set.
    ///
    /// # Errors
    /// Returns [`CatalogError::InvalidRole`] for unknown roles.
    pub fn parse(s: &str) -> Result<Self, CatalogError> {
        match s {
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            "system" => Ok(MessageRole::System),
            other => Err(CatalogError::InvalidRole(other.to_string())),
        }
    }
}

/// One persisted conversation turn; ordering by `created_at` is the
/// conversation order.
#[derive(Debug, Clone)]
pub struct MessageRow {
    pub id: Uuid,
    pub session_id: Uuid,
    pub role: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl CatalogStore {
    /// Creates the session row if absent; refreshes the tester label when a
    /// new one is supplied (idempotent upsert).
    ///
    /// # Errors
    /// Returns [`CatalogError::Query`] on database failures.
    pub async fn upsert_session(
        &self,
        session_id: Uuid,
        tester_label: Option<&str>,
    ) -> Result<(), CatalogError> {
        sqlx::query(
            "INSERT INTO sessions (id, tester_label) VALUES ($1, $2) \
             ON CONFLICT (id) DO UPDATE \
             SET tester_label = COALESCE(EXCLUDED.tester_label, sessions.tester_label)",
        )
        .bind(session_id)
        .bind(tester_label)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Appends one message to a session and returns the new message id.
    ///
    /// # Errors
    /// Returns [`CatalogError::Query`] on database failures.
    pub async fn append_message(
        &self,
        session_id: Uuid,
        role: MessageRole,
        content: &str,
    ) -> Result<Uuid, CatalogError> {
        let id = Uuid::new_v4();
        sqlx::query("INSERT INTO messages (id, session_id, role, content) VALUES ($1, $2, $3, $4)")
            .bind(id)
            .bind(session_id)
            .bind(role.as_str())
            .bind(content)
            .execute(&self.pool)
            .await?;
        Ok(id)
    }

    /// Lists up to `limit` messages of a session in conversation order.
    ///
    /// # Errors
    /// Returns [`CatalogError::Query`] on database failures.
    pub async fn list_messages(
        &self,
        session_id: Uuid,
        limit: i64,
    ) -> Result<Vec<MessageRow>, CatalogError> {
        let rows = sqlx::query(
            "SELECT id, session_id, role, content, created_at FROM messages \
             WHERE session_id = $1 ORDER BY created_at ASC LIMIT $2",
        )
        .bind(session_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| MessageRow {
                id: r.get("id"),
                session_id: r.get("session_id"),
                role: r.get("role"),
                content: r.get("content"),
                created_at: r.get("created_at"),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trip() {
        for role in [MessageRole::User, MessageRole::Assistant, MessageRole::System] {
            assert_eq!(MessageRole::parse(role.as_str()).unwrap(), role);
        }
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert!(matches!(
            MessageRole::parse("moderator"),
            Err(CatalogError::InvalidRole(_))
        ));
    }
}
