//! Chat history: user-visible conversations with soft deletion.

use chrono::{DateTime, Utc};
use sqlx::Row;
use uuid::Uuid;

use crate::sessions::MessageRole;
use crate::{CatalogError, CatalogStore};

/// One chat conversation.
#[derive(Debug, Clone)]
pub struct ChatRow {
    pub id: Uuid,
    pub user_id: String,
    pub title: Option<String>,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub last_message_at: Option<DateTime<Utc>>,
}

/// One chat message.
#[derive(Debug, Clone)]
pub struct ChatMessageRow {
    pub id: Uuid,
    pub chat_id: Uuid,
    pub role: String,
    pub content: String,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
}

fn chat_from_row(r: sqlx::postgres::PgRow) -> ChatRow {
    ChatRow {
        id: r.get("id"),
        user_id: r.get("user_id"),
        title: r.get("title"),
        is_deleted: r.get("is_deleted"),
        created_at: r.get("created_at"),
        updated_at: r.get("updated_at"),
        last_message_at: r.get("last_message_at"),
    }
}

fn chat_message_from_row(r: sqlx::postgres::PgRow) -> ChatMessageRow {
    ChatMessageRow {
        id: r.get("id"),
        chat_id: r.get("chat_id"),
        role: r.get("role"),
        content: r.get("content"),
        is_deleted: r.get("is_deleted"),
        created_at: r.get("created_at"),
    }
}

const CHAT_COLUMNS: &str =
    "id, user_id, title, is_deleted, created_at, updated_at, last_message_at";

impl CatalogStore {
    /// Creates a chat for a user.
    ///
    /// # Errors
    /// Returns [`CatalogError::Query`] on database failures.
    pub async fn create_chat(
        &self,
        user_id: &str,
        title: Option<&str>,
    ) -> Result<ChatRow, CatalogError> {
        let id = Uuid::new_v4();
        let row = sqlx::query(&format!(
            "INSERT INTO chats (id, user_id, title) VALUES ($1, $2, $3) RETURNING {CHAT_COLUMNS}"
        ))
        .bind(id)
        .bind(user_id)
        .bind(title)
        .fetch_one(&self.pool)
        .await?;
        Ok(chat_from_row(row))
    }

    /// Fetches a live (not soft-deleted) chat owned by `user_id`.
    ///
    /// # Errors
    /// Returns [`CatalogError::Query`] on database failures.
    pub async fn get_chat(
        &self,
        chat_id: Uuid,
        user_id: &str,
    ) -> Result<Option<ChatRow>, CatalogError> {
        let row = sqlx::query(&format!(
            "SELECT {CHAT_COLUMNS} FROM chats \
             WHERE id = $1 AND user_id = $2 AND is_deleted = FALSE"
        ))
        .bind(chat_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(chat_from_row))
    }

    /// Lists a user's live chats, most recently active first.
    ///
    /// # Errors
    /// Returns [`CatalogError::Query`] on database failures.
    pub async fn list_chats(&self, user_id: &str) -> Result<Vec<ChatRow>, CatalogError> {
        let rows = sqlx::query(&format!(
            "SELECT {CHAT_COLUMNS} FROM chats \
             WHERE user_id = $1 AND is_deleted = FALSE \
             ORDER BY last_message_at DESC NULLS LAST, created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(chat_from_row).collect())
    }

    /// Soft-deletes a chat and all of its messages.
    ///
    /// # Errors
    /// Returns [`CatalogError::Query`] on database failures.
    pub async fn soft_delete_chat(&self, chat_id: Uuid) -> Result<(), CatalogError> {
        sqlx::query("UPDATE chats SET is_deleted = TRUE, updated_at = now() WHERE id = $1")
            .bind(chat_id)
            .execute(&self.pool)
            .await?;
        sqlx::query("UPDATE chat_messages SET is_deleted = TRUE WHERE chat_id = $1")
            .bind(chat_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Lists live messages of a chat in conversation order.
    ///
    /// # Errors
    /// Returns [`CatalogError::Query`] on database failures.
    pub async fn list_chat_messages(
        &self,
        chat_id: Uuid,
    ) -> Result<Vec<ChatMessageRow>, CatalogError> {
        let rows = sqlx::query(
            "SELECT id, chat_id, role, content, is_deleted, created_at FROM chat_messages \
             WHERE chat_id = $1 AND is_deleted = FALSE ORDER BY created_at ASC",
        )
        .bind(chat_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(chat_message_from_row).collect())
    }

    /// Appends a message to a chat, refreshes the chat's activity timestamps,
    /// and auto-titles the chat from the first user message.
    ///
    /// # Errors
    /// Returns [`CatalogError::Query`] on database failures.
    pub async fn append_chat_message(
        &self,
        chat: &ChatRow,
        role: MessageRole,
        content: &str,
    ) -> Result<ChatMessageRow, CatalogError> {
        let id = Uuid::new_v4();
        let row = sqlx::query(
            "INSERT INTO chat_messages (id, chat_id, role, content) VALUES ($1, $2, $3, $4) \
             RETURNING id, chat_id, role, content, is_deleted, created_at",
        )
        .bind(id)
        .bind(chat.id)
        .bind(role.as_str())
        .bind(content)
        .fetch_one(&self.pool)
        .await?;

        // First user message names the chat, truncated to 40 chars.
        let needs_title = role == MessageRole::User
            && chat.title.as_deref().map(|t| t == "New chat").unwrap_or(true);
        if needs_title {
            let trimmed: String = content.trim().chars().take(40).collect();
            let title = if trimmed.is_empty() { "Chat".to_string() } else { trimmed };
            sqlx::query(
                "UPDATE chats SET updated_at = now(), last_message_at = now(), title = $2 \
                 WHERE id = $1",
            )
            .bind(chat.id)
            .bind(title)
            .execute(&self.pool)
            .await?;
        } else {
            sqlx::query("UPDATE chats SET updated_at = now(), last_message_at = now() WHERE id = $1")
                .bind(chat.id)
                .execute(&self.pool)
                .await?;
        }

        Ok(chat_message_from_row(row))
    }
}
