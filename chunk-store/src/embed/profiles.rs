//! Embedding provider backed by the shared `llm-service` profiles.

use std::sync::Arc;
use std::{future::Future, pin::Pin};

use llm_service::LlmProfiles;

use crate::embed::EmbeddingsProvider;
use crate::errors::ChunkStoreError;

/// Delegates embedding calls to the application-wide [`LlmProfiles`].
pub struct ProfilesEmbedder {
    svc: Arc<LlmProfiles>,
}

impl ProfilesEmbedder {
    pub fn new(svc: Arc<LlmProfiles>) -> Self {
        Self { svc }
    }
}

impl EmbeddingsProvider for ProfilesEmbedder {
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, ChunkStoreError>> + Send + 'a>> {
        Box::pin(async move {
            self.svc
                .embed(text)
                .await
                .map_err(|e| ChunkStoreError::Embedding(e.to_string()))
        })
    }
}
