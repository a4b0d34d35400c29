//! Collaborator contracts for the pipeline.
//!
//! The engine talks to every external system through these traits so that
//! tests can inject doubles without touching the network. The production
//! implementations live right here as blanket impls over the concrete
//! service types.

use async_trait::async_trait;
use uuid::Uuid;

use catalog_store::{
    CatalogStore, DocumentRecord, LicenseRecord, MessageRole, MessageRow, VendorRecord,
};
use chunk_store::{ChunkHit, ChunkStore};
use llm_service::{ChatMessage, LlmProfiles};
use prompt_store::PromptStore;

use crate::error::EngineError;

/// Chat completion service: full message stack in, completion text out.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
    ) -> Result<String, EngineError>;
}

/// Embedding service: text in, fixed-length vector out.
#[async_trait]
pub trait EmbeddingClient: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EngineError>;
}

/// Similarity search over stored chunks, ordered by descending similarity.
#[async_trait]
pub trait ChunkSearch: Send + Sync {
    async fn search(
        &self,
        query_vector: Vec<f32>,
        top_k: u64,
    ) -> Result<Vec<ChunkHit>, EngineError>;
}

/// Document catalog lookups by source identifier.
#[async_trait]
pub trait DocumentCatalog: Send + Sync {
    async fn find_by_source_urls(
        &self,
        source_urls: &[String],
    ) -> Result<Vec<DocumentRecord>, EngineError>;
}

/// License policy lookups by license key.
#[async_trait]
pub trait LicenseCatalog: Send + Sync {
    async fn find_by_keys(&self, keys: &[String]) -> Result<Vec<LicenseRecord>, EngineError>;
}

/// Vendor directory search with fuzzy substring filters.
#[async_trait]
pub trait VendorDirectory: Send + Sync {
    async fn search(
        &self,
        industries: &[String],
        capability: Option<&str>,
        limit: i64,
    ) -> Result<Vec<VendorRecord>, EngineError>;
}

/// Session/message audit log (append-only).
#[async_trait]
pub trait ConversationLog: Send + Sync {
    async fn upsert_session(
        &self,
        session_id: Uuid,
        tester_label: Option<&str>,
    ) -> Result<(), EngineError>;

    async fn append_message(
        &self,
        session_id: Uuid,
        role: MessageRole,
        content: &str,
    ) -> Result<Uuid, EngineError>;

    async fn list_messages(
        &self,
        session_id: Uuid,
        limit: i64,
    ) -> Result<Vec<MessageRow>, EngineError>;
}

/// Named prompt templates.
pub trait PromptSource: Send + Sync {
    fn load(&self, name: &str) -> Result<String, EngineError>;

    fn pinned_facts(&self) -> Result<String, EngineError> {
        self.load("pinned_facts")
    }
}

/* --------------------- Production implementations --------------------- */

#[async_trait]
impl CompletionClient for LlmProfiles {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
    ) -> Result<String, EngineError> {
        Ok(LlmProfiles::complete(self, messages, temperature).await?)
    }
}

#[async_trait]
impl EmbeddingClient for LlmProfiles {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EngineError> {
        Ok(LlmProfiles::embed(self, text).await?)
    }
}

#[async_trait]
impl ChunkSearch for ChunkStore {
    async fn search(
        &self,
        query_vector: Vec<f32>,
        top_k: u64,
    ) -> Result<Vec<ChunkHit>, EngineError> {
        Ok(ChunkStore::search(self, query_vector, top_k).await?)
    }
}

#[async_trait]
impl DocumentCatalog for CatalogStore {
    async fn find_by_source_urls(
        &self,
        source_urls: &[String],
    ) -> Result<Vec<DocumentRecord>, EngineError> {
        Ok(self.find_documents_by_source_urls(source_urls).await?)
    }
}

#[async_trait]
impl LicenseCatalog for CatalogStore {
    async fn find_by_keys(&self, keys: &[String]) -> Result<Vec<LicenseRecord>, EngineError> {
        Ok(self.find_licenses_by_keys(keys).await?)
    }
}

#[async_trait]
impl VendorDirectory for CatalogStore {
    async fn search(
        &self,
        industries: &[String],
        capability: Option<&str>,
        limit: i64,
    ) -> Result<Vec<VendorRecord>, EngineError> {
        Ok(self.search_vendors(industries, capability, limit).await?)
    }
}

#[async_trait]
impl ConversationLog for CatalogStore {
    async fn upsert_session(
        &self,
        session_id: Uuid,
        tester_label: Option<&str>,
    ) -> Result<(), EngineError> {
        Ok(CatalogStore::upsert_session(self, session_id, tester_label).await?)
    }

    async fn append_message(
        &self,
        session_id: Uuid,
        role: MessageRole,
        content: &str,
    ) -> Result<Uuid, EngineError> {
        Ok(CatalogStore::append_message(self, session_id, role, content).await?)
    }

    async fn list_messages(
        &self,
        session_id: Uuid,
        limit: i64,
    ) -> Result<Vec<MessageRow>, EngineError> {
        Ok(CatalogStore::list_messages(self, session_id, limit).await?)
    }
}

impl PromptSource for PromptStore {
    fn load(&self, name: &str) -> Result<String, EngineError> {
        Ok(PromptStore::load(self, name)?)
    }
}
