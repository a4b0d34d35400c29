//! Feedback rows attached to sessions/messages.

use uuid::Uuid;

use crate::{CatalogError, CatalogStore};

impl CatalogStore {
    /// Inserts one feedback row and returns its id.
    ///
    /// Score range validation (-1/0/1) happens at the API boundary before the
    /// store is touched.
    ///
    /// # Errors
    /// Returns [`CatalogError::Query`] on database failures.
    pub async fn insert_feedback(
        &self,
        session_id: Uuid,
        message_id: Option<Uuid>,
        score: Option<i16>,
        comment: Option<&str>,
    ) -> Result<Uuid, CatalogError> {
        let id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO feedback (id, session_id, message_id, score, comment) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(id)
        .bind(session_id)
        .bind(message_id)
        .bind(score)
        .bind(comment)
        .execute(&self.pool)
        .await?;
        Ok(id)
    }
}
