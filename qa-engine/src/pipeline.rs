//! The per-question pipeline: intent routing → planning → retrieval →
//! license resolution → vendor matching → generation → validation →
//! optional single repair.
//!
//! Every step runs strictly sequentially inside one request. Each external
//! call is a blocking round trip with its own client-level timeout; the
//! engine holds no shared mutable state between questions.

use std::sync::Arc;

use catalog_store::MessageRole;
use llm_service::ChatMessage;
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::context::{self, AssembledContext};
use crate::error::EngineError;
use crate::intents;
use crate::license;
use crate::plan;
use crate::ports::{
    ChunkSearch, CompletionClient, ConversationLog, DocumentCatalog, EmbeddingClient,
    LicenseCatalog, PromptSource, VendorDirectory,
};
use crate::prompt::{self, Citation};
use crate::validate::{self, GenerationStage};
use crate::vendor;

/// Routing tag for the scripted scheduling flow.
pub const ROUTED_SCHEDULE: &str = "hardwarehub_schedule";

/// Literal answer for the system-docs-only mode when retrieval stays empty
/// after the retry.
pub const NO_SYSTEM_DOC_CONTEXT: &str = "No system-doc context retrieved";

/// One question entering the pipeline.
#[derive(Debug, Clone)]
pub struct AnswerRequest {
    /// Mode name; also the name of the mode's system prompt template.
    pub mode: String,
    /// Raw question text.
    pub message: String,
    /// Session to attach to; a fresh one is created when absent.
    pub session_id: Option<Uuid>,
    /// Answer to a previously surfaced clarifying question.
    pub clarification: Option<String>,
    /// Optional tester label stored on the session row.
    pub tester_label: Option<String>,
}

/// Final answer plus structured citations and debug metadata.
#[derive(Debug, Clone)]
pub struct AnswerOutcome {
    pub answer: String,
    pub citations: Vec<Citation>,
    pub debug: DebugMeta,
}

/// Which subsystems fired for a question, for callers and test harnesses.
#[derive(Debug, Clone, Serialize)]
pub struct DebugMeta {
    pub session_id: Uuid,
    pub mode: String,
    /// Persisted assistant message id; absent on the no-context early exit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<Uuid>,
    pub user_message_id: Uuid,
    pub used_docs: bool,
    pub used_vendors: bool,
    pub retrieved_k: usize,
    pub source_files: Vec<String>,
    pub repaired: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routed: Option<String>,
    /// Clarifying question the planner wants answered; surfaced so the
    /// caller can run the single clarification round-trip.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clarifying_question: Option<String>,
}

/// The question-answering engine with all collaborators injected.
pub struct QaEngine {
    cfg: EngineConfig,
    llm: Arc<dyn CompletionClient>,
    embedder: Arc<dyn EmbeddingClient>,
    chunks: Arc<dyn ChunkSearch>,
    documents: Arc<dyn DocumentCatalog>,
    licenses: Arc<dyn LicenseCatalog>,
    vendors: Arc<dyn VendorDirectory>,
    log: Arc<dyn ConversationLog>,
    prompts: Arc<dyn PromptSource>,
}

impl QaEngine {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        cfg: EngineConfig,
        llm: Arc<dyn CompletionClient>,
        embedder: Arc<dyn EmbeddingClient>,
        chunks: Arc<dyn ChunkSearch>,
        documents: Arc<dyn DocumentCatalog>,
        licenses: Arc<dyn LicenseCatalog>,
        vendors: Arc<dyn VendorDirectory>,
        log: Arc<dyn ConversationLog>,
        prompts: Arc<dyn PromptSource>,
    ) -> Self {
        Self {
            cfg,
            llm,
            embedder,
            chunks,
            documents,
            licenses,
            vendors,
            log,
            prompts,
        }
    }

    /// Current configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.cfg
    }

    /// Generates engineering notes for a session; see [`crate::notes`].
    pub async fn engineering_notes(&self, session_id: Uuid) -> Result<String, EngineError> {
        crate::notes::build_engineering_notes(self.log.as_ref(), self.llm.as_ref(), session_id)
            .await
    }

    /// Answers one question.
    ///
    /// State machine: `ROUTED` (terminal, if intent matched) → else
    /// `PLANNED` → `RETRIEVING` (docs/vendors, independently optional) →
    /// `GENERATING` → `VALIDATING` → `ACCEPTED | REPAIRING → FINAL`.
    /// All paths terminate; retrieval and planning have no retries beyond
    /// the documented fail-open defaults.
    ///
    /// # Errors
    /// Transport failures from any collaborator propagate; malformed
    /// planner/validator output never does.
    pub async fn answer(&self, req: AnswerRequest) -> Result<AnswerOutcome, EngineError> {
        let sid = req.session_id.unwrap_or_else(Uuid::new_v4);
        self.log
            .upsert_session(sid, req.tester_label.as_deref())
            .await?;
        let user_mid = self
            .log
            .append_message(sid, MessageRole::User, &req.message)
            .await?;

        let mode_prompt = self.prompts.load(&req.mode)?;

        let signals = intents::detect_intents(&req.message);
        if signals.product && signals.scheduling {
            // Scripted flow: no planner, no retrieval, no LLM call.
            let answer = format!(
                "HardwareHub provides mechanical engineering services and can help with your \
                 request. Schedule here: {}. If you want, share a couple of times you prefer \
                 and I can confirm.",
                self.cfg.scheduling_url
            );
            let assistant_mid = self
                .log
                .append_message(sid, MessageRole::Assistant, &answer)
                .await?;
            info!(routed = ROUTED_SCHEDULE, "intent router short-circuited");
            return Ok(AnswerOutcome {
                answer,
                citations: Vec::new(),
                debug: DebugMeta {
                    session_id: sid,
                    mode: req.mode,
                    message_id: Some(assistant_mid),
                    user_message_id: user_mid,
                    used_docs: false,
                    used_vendors: false,
                    retrieved_k: 0,
                    source_files: Vec::new(),
                    repaired: false,
                    routed: Some(ROUTED_SCHEDULE.to_string()),
                    clarifying_question: None,
                },
            });
        }

        let decision = plan::plan(
            self.llm.as_ref(),
            self.prompts.as_ref(),
            &req.message,
            &req.mode,
        )
        .await?;
        debug!(?decision, "planner decision");

        let mut qtext = req.message.clone();
        let mut pending_clarification = None;
        if decision.needs_clarification && !decision.clarifying_question.is_empty() {
            match &req.clarification {
                Some(clarification) => {
                    qtext.push_str("\n\nUser clarification: ");
                    qtext.push_str(clarification);
                    self.log
                        .append_message(
                            sid,
                            MessageRole::User,
                            &format!("User clarification: {clarification}"),
                        )
                        .await?;
                }
                None => pending_clarification = Some(decision.clarifying_question.clone()),
            }
        }

        let use_docs = decision.use_docs_rag;
        // The planner's vendor classification is unreliable; the keyword
        // trigger forces vendor usage whenever the user asks.
        let use_vendors = decision.use_vendors || intents::wants_vendors(&qtext);
        let system_docs_only = intents::wants_system_docs_only(&qtext);

        let mut assembled = AssembledContext::default();
        let mut license_block = license::empty_license_block();
        if use_docs {
            let query_vector = self.embedder.embed(&qtext).await?;
            let mut hits = self
                .chunks
                .search(query_vector.clone(), self.cfg.retrieve_k)
                .await?;
            if system_docs_only {
                hits = context::restrict_to_system_docs(hits, &self.cfg.system_doc_allowlist);
            }
            assembled = context::build_context(&hits, self.cfg.max_context_chunks);

            if system_docs_only && assembled.citation_tags.is_empty() {
                // one retry with a wider net before giving up
                let retry_hits = self
                    .chunks
                    .search(query_vector, self.cfg.fallback_retrieve_k)
                    .await?;
                let retry_hits =
                    context::restrict_to_system_docs(retry_hits, &self.cfg.system_doc_allowlist);
                assembled = context::build_context(&retry_hits, self.cfg.max_context_chunks);

                if assembled.citation_tags.is_empty() {
                    info!("system-docs-only retrieval empty after retry");
                    return Ok(AnswerOutcome {
                        answer: NO_SYSTEM_DOC_CONTEXT.to_string(),
                        citations: Vec::new(),
                        debug: DebugMeta {
                            session_id: sid,
                            mode: req.mode,
                            message_id: None,
                            user_message_id: user_mid,
                            used_docs: use_docs,
                            used_vendors: false,
                            retrieved_k: 0,
                            source_files: Vec::new(),
                            repaired: false,
                            routed: None,
                            clarifying_question: pending_clarification,
                        },
                    });
                }
            }

            license_block = license::build_license_block(
                self.documents.as_ref(),
                self.licenses.as_ref(),
                &assembled.source_files,
            )
            .await;
        }

        let vendor_block = if use_vendors {
            let (block, _rows) =
                vendor::vendor_context_block(self.vendors.as_ref(), &qtext, self.cfg.vendor_limit)
                    .await?;
            block
        } else {
            vendor::VENDOR_BLOCK_NOT_REQUESTED.to_string()
        };

        let pinned_facts = self.prompts.pinned_facts()?;
        let user_prompt = prompt::build_user_prompt(&license_block, &vendor_block, &qtext);
        let mut messages = prompt::build_messages(
            &pinned_facts,
            signals.services,
            &mode_prompt,
            &assembled.context,
            &user_prompt,
        );

        let mut answer = self
            .llm
            .complete(&messages, self.cfg.draft_temperature)
            .await?;

        let verdict = validate::validate(
            self.llm.as_ref(),
            self.prompts.as_ref(),
            &answer,
            &req.mode,
        )
        .await?;

        let mut stage = GenerationStage::Draft;
        if validate::should_repair(&verdict) {
            // Deterministic single-shot correction: replay the original
            // stack plus the issue list, accept whatever comes back.
            messages.push(ChatMessage::user(validate::repair_request(&verdict.issues)));
            answer = self.llm.complete(&messages, 0.0).await?;
            stage = GenerationStage::Repaired;
        }

        let assistant_mid = self
            .log
            .append_message(sid, MessageRole::Assistant, &answer)
            .await?;

        // If vendors were enabled, expose [VENDOR_TABLE] as an available tag.
        let citations = prompt::citations_to_entries(
            &assembled.citation_tags,
            use_vendors,
            &self.cfg.vendor_table_name,
        );

        Ok(AnswerOutcome {
            answer,
            citations,
            debug: DebugMeta {
                session_id: sid,
                mode: req.mode,
                message_id: Some(assistant_mid),
                user_message_id: user_mid,
                used_docs: use_docs,
                used_vendors: use_vendors,
                retrieved_k: assembled.citation_tags.len(),
                source_files: assembled.source_files,
                repaired: stage == GenerationStage::Repaired,
                routed: None,
                clarifying_question: pending_clarification,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notes::build_engineering_notes;
    use async_trait::async_trait;
    use catalog_store::{DocumentRecord, LicenseRecord, MessageRow, VendorRecord};
    use chunk_store::ChunkHit;
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /* ----------------------------- doubles ----------------------------- */

    struct ScriptedLlm {
        responses: Mutex<VecDeque<String>>,
        captured: Mutex<Vec<Vec<ChatMessage>>>,
        calls: AtomicUsize,
    }

    impl ScriptedLlm {
        fn new(responses: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.iter().map(|s| s.to_string()).collect()),
                captured: Mutex::new(Vec::new()),
                calls: AtomicUsize::new(0),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn captured_call(&self, index: usize) -> Vec<ChatMessage> {
            self.captured.lock().unwrap()[index].clone()
        }
    }

    #[async_trait]
    impl CompletionClient for ScriptedLlm {
        async fn complete(
            &self,
            messages: &[ChatMessage],
            _temperature: f32,
        ) -> Result<String, EngineError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.captured.lock().unwrap().push(messages.to_vec());
            Ok(self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| "stub answer".to_string()))
        }
    }

    struct FixedEmbedder;

    #[async_trait]
    impl EmbeddingClient for FixedEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>, EngineError> {
            Ok(vec![0.1; 8])
        }
    }

    struct ScriptedChunks {
        hits: Vec<ChunkHit>,
        requested_k: Mutex<Vec<u64>>,
    }

    impl ScriptedChunks {
        fn new(hits: Vec<ChunkHit>) -> Arc<Self> {
            Arc::new(Self {
                hits,
                requested_k: Mutex::new(Vec::new()),
            })
        }

        fn search_count(&self) -> usize {
            self.requested_k.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ChunkSearch for ScriptedChunks {
        async fn search(
            &self,
            _query_vector: Vec<f32>,
            top_k: u64,
        ) -> Result<Vec<ChunkHit>, EngineError> {
            self.requested_k.lock().unwrap().push(top_k);
            Ok(self.hits.clone())
        }
    }

    struct NoCatalog;

    #[async_trait]
    impl DocumentCatalog for NoCatalog {
        async fn find_by_source_urls(
            &self,
            _source_urls: &[String],
        ) -> Result<Vec<DocumentRecord>, EngineError> {
            Ok(Vec::new())
        }
    }

    #[async_trait]
    impl LicenseCatalog for NoCatalog {
        async fn find_by_keys(&self, _keys: &[String]) -> Result<Vec<LicenseRecord>, EngineError> {
            Ok(Vec::new())
        }
    }

    /// Vendor directory that mimics the store's ILIKE semantics: industry
    /// terms ANDed as case-insensitive substrings of the `industries` field.
    struct FilteringVendors {
        rows: Vec<VendorRecord>,
        seen_industries: Mutex<Vec<String>>,
    }

    impl FilteringVendors {
        fn new(rows: Vec<VendorRecord>) -> Arc<Self> {
            Arc::new(Self {
                rows,
                seen_industries: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl VendorDirectory for FilteringVendors {
        async fn search(
            &self,
            industries: &[String],
            _capability: Option<&str>,
            limit: i64,
        ) -> Result<Vec<VendorRecord>, EngineError> {
            self.seen_industries
                .lock()
                .unwrap()
                .extend(industries.iter().cloned());
            Ok(self
                .rows
                .iter()
                .filter(|row| {
                    industries.iter().all(|term| {
                        row.industries
                            .as_deref()
                            .unwrap_or("")
                            .to_lowercase()
                            .contains(&term.to_lowercase())
                    })
                })
                .take(limit as usize)
                .cloned()
                .collect())
        }
    }

    struct MemoryLog {
        entries: Mutex<Vec<(String, String)>>,
    }

    impl MemoryLog {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                entries: Mutex::new(Vec::new()),
            })
        }

        fn entries(&self) -> Vec<(String, String)> {
            self.entries.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ConversationLog for MemoryLog {
        async fn upsert_session(
            &self,
            _session_id: Uuid,
            _tester_label: Option<&str>,
        ) -> Result<(), EngineError> {
            Ok(())
        }

        async fn append_message(
            &self,
            _session_id: Uuid,
            role: MessageRole,
            content: &str,
        ) -> Result<Uuid, EngineError> {
            self.entries
                .lock()
                .unwrap()
                .push((role.as_str().to_string(), content.to_string()));
            Ok(Uuid::new_v4())
        }

        async fn list_messages(
            &self,
            session_id: Uuid,
            limit: i64,
        ) -> Result<Vec<MessageRow>, EngineError> {
            Ok(self
                .entries
                .lock()
                .unwrap()
                .iter()
                .take(limit as usize)
                .map(|(role, content)| MessageRow {
                    id: Uuid::new_v4(),
                    session_id,
                    role: role.clone(),
                    content: content.clone(),
                    created_at: chrono::Utc::now(),
                })
                .collect())
        }
    }

    struct MapPrompts(HashMap<String, String>);

    impl PromptSource for MapPrompts {
        fn load(&self, name: &str) -> Result<String, EngineError> {
            Ok(self
                .0
                .get(name)
                .cloned()
                .unwrap_or_else(|| format!("{name} prompt")))
        }
    }

    /* ----------------------------- helpers ----------------------------- */

    fn prompts() -> Arc<MapPrompts> {
        Arc::new(MapPrompts(HashMap::new()))
    }

    fn good_hit(source: &str, index: u32) -> ChunkHit {
        ChunkHit {
            source_file: source.to_string(),
            chunk_index: index,
            content: "a".repeat(120),
            similarity: 0.9,
        }
    }

    fn engine(
        llm: Arc<ScriptedLlm>,
        chunks: Arc<ScriptedChunks>,
        vendors: Arc<FilteringVendors>,
        log: Arc<MemoryLog>,
    ) -> QaEngine {
        QaEngine::new(
            EngineConfig::default(),
            llm,
            Arc::new(FixedEmbedder),
            chunks,
            Arc::new(NoCatalog),
            Arc::new(NoCatalog),
            vendors,
            log,
            prompts(),
        )
    }

    fn request(message: &str) -> AnswerRequest {
        AnswerRequest {
            mode: "mode_1".to_string(),
            message: message.to_string(),
            session_id: None,
            clarification: None,
            tester_label: None,
        }
    }

    const PLAN_NO_DOCS: &str = r#"{"needs_clarification": false, "clarifying_question": "",
        "use_docs_rag": false, "use_vendors": false}"#;

    /* ------------------------------ tests ------------------------------ */

    #[tokio::test]
    async fn scheduling_intent_bypasses_planner_entirely() {
        let llm = ScriptedLlm::new(&[]);
        let log = MemoryLog::new();
        let eng = engine(
            llm.clone(),
            ScriptedChunks::new(vec![]),
            FilteringVendors::new(vec![]),
            log.clone(),
        );

        let out = eng
            .answer(request("I want to schedule a meeting with HardwareHub"))
            .await
            .unwrap();

        assert!(out
            .answer
            .contains("https://calendar.app.google/b9H7oKXC58tDX4ge9"));
        assert_eq!(llm.call_count(), 0, "planner must never run on this path");
        assert_eq!(out.debug.routed.as_deref(), Some(ROUTED_SCHEDULE));
        assert!(out.citations.is_empty());

        // both turns persisted
        let entries = log.entries();
        assert_eq!(entries[0].0, "user");
        assert_eq!(entries[1].0, "assistant");
    }

    #[tokio::test]
    async fn accepted_draft_is_final() {
        let llm = ScriptedLlm::new(&[PLAN_NO_DOCS, "draft answer", r#"{"ok": true, "issues": []}"#]);
        let eng = engine(
            llm.clone(),
            ScriptedChunks::new(vec![]),
            FilteringVendors::new(vec![]),
            MemoryLog::new(),
        );

        let out = eng.answer(request("Explain flatness callouts")).await.unwrap();

        assert_eq!(out.answer, "draft answer");
        assert_eq!(llm.call_count(), 3); // plan + draft + validate
        assert!(!out.debug.repaired);
        assert!(!out.debug.used_docs);
    }

    #[tokio::test]
    async fn rejected_draft_triggers_exactly_one_repair() {
        let llm = ScriptedLlm::new(&[
            PLAN_NO_DOCS,
            "draft answer",
            r#"{"ok": false, "issues": ["missing citation"]}"#,
            "repaired answer",
        ]);
        let eng = engine(
            llm.clone(),
            ScriptedChunks::new(vec![]),
            FilteringVendors::new(vec![]),
            MemoryLog::new(),
        );

        let out = eng.answer(request("Explain flatness callouts")).await.unwrap();

        // final answer is the second generation, not the draft
        assert_eq!(out.answer, "repaired answer");
        // plan + draft + validate + repair: exactly one extra generation
        assert_eq!(llm.call_count(), 4);
        assert!(out.debug.repaired);

        // the repair turn replays the stack plus the issue list
        let repair_call = llm.captured_call(3);
        let last = repair_call.last().unwrap();
        assert!(last.content.contains("missing citation"));
    }

    #[tokio::test]
    async fn malformed_plan_fails_open_to_docs_retrieval() {
        let hits: Vec<ChunkHit> = (0..8).map(|i| good_hit("guide.txt", i)).collect();
        let llm = ScriptedLlm::new(&[
            "use docs, probably?",
            "draft answer",
            r#"{"ok": true, "issues": []}"#,
        ]);
        let chunks = ScriptedChunks::new(hits);
        let eng = engine(
            llm.clone(),
            chunks.clone(),
            FilteringVendors::new(vec![]),
            MemoryLog::new(),
        );

        let out = eng.answer(request("Explain flatness callouts")).await.unwrap();

        assert!(out.debug.used_docs, "default plan retrieves docs");
        assert_eq!(chunks.search_count(), 1);
        assert_eq!(out.debug.retrieved_k, 5, "context capped at 5 chunks");
        assert_eq!(out.answer, "draft answer");
    }

    #[tokio::test]
    async fn system_docs_only_short_circuits_after_one_retry() {
        // Hits exist but none survive the allow-list restriction.
        let hits = vec![good_hit("library/datasheet.txt", 0)];
        let llm = ScriptedLlm::new(&[r#"{"use_docs_rag": true}"#]);
        let chunks = ScriptedChunks::new(hits);
        let eng = engine(
            llm.clone(),
            chunks.clone(),
            FilteringVendors::new(vec![]),
            MemoryLog::new(),
        );

        let out = eng
            .answer(request("system-docs-only: summarize the runbook"))
            .await
            .unwrap();

        assert_eq!(out.answer, NO_SYSTEM_DOC_CONTEXT);
        assert_eq!(llm.call_count(), 1, "only the planner ran");
        assert_eq!(
            *chunks.requested_k.lock().unwrap(),
            vec![8, 24],
            "one retry at the fallback K"
        );
        assert!(out.debug.message_id.is_none());
        assert!(out.citations.is_empty());
    }

    #[tokio::test]
    async fn vendor_question_filters_by_industry() {
        let rows = vec![
            VendorRecord {
                name: "MedGrade Machining".into(),
                category: Some("CNC".into()),
                industries: Some("Medical, Aerospace".into()),
                website: None,
                location: None,
                capabilities: Some("5-axis milling".into()),
                description: None,
                notes: None,
                contact_name: None,
                contact_email: None,
            },
            VendorRecord {
                name: "AutoParts Inc".into(),
                category: Some("Stamping".into()),
                industries: Some("Automotive".into()),
                website: None,
                location: None,
                capabilities: None,
                description: None,
                notes: None,
                contact_name: None,
                contact_email: None,
            },
        ];
        let llm = ScriptedLlm::new(&[
            r#"{"use_docs_rag": false, "use_vendors": true}"#,
            "draft answer [VENDOR_TABLE]",
            r#"{"ok": true, "issues": []}"#,
        ]);
        let vendors = FilteringVendors::new(rows);
        let eng = engine(
            llm.clone(),
            ScriptedChunks::new(vec![]),
            vendors.clone(),
            MemoryLog::new(),
        );

        let out = eng
            .answer(request("I need a medical-grade CNC supplier"))
            .await
            .unwrap();

        assert_eq!(*vendors.seen_industries.lock().unwrap(), vec!["medical"]);

        // the generation prompt offers only the medical vendor
        let generation_call = llm.captured_call(1);
        let user_turn = &generation_call.last().unwrap().content;
        assert!(user_turn.contains("MedGrade Machining"));
        assert!(!user_turn.contains("AutoParts Inc"));

        assert!(out.debug.used_vendors);
        assert!(out.citations.iter().any(|c| c.tag == "[VENDOR_TABLE]"));
    }

    #[tokio::test]
    async fn clarification_is_appended_and_logged() {
        let llm = ScriptedLlm::new(&[
            r#"{"needs_clarification": true, "clarifying_question": "Which alloy?",
                "use_docs_rag": false, "use_vendors": false}"#,
            "draft answer",
            r#"{"ok": true, "issues": []}"#,
        ]);
        let log = MemoryLog::new();
        let eng = engine(
            llm.clone(),
            ScriptedChunks::new(vec![]),
            FilteringVendors::new(vec![]),
            log.clone(),
        );

        let mut req = request("What torque spec should I use?");
        req.clarification = Some("6061-T6".to_string());
        let out = eng.answer(req).await.unwrap();

        assert!(out.debug.clarifying_question.is_none());
        let entries = log.entries();
        assert!(entries
            .iter()
            .any(|(role, content)| role == "user" && content == "User clarification: 6061-T6"));

        let generation_call = llm.captured_call(1);
        let user_turn = &generation_call.last().unwrap().content;
        assert!(user_turn.contains("User clarification: 6061-T6"));
    }

    #[tokio::test]
    async fn unanswered_clarification_is_surfaced_in_debug() {
        let llm = ScriptedLlm::new(&[
            r#"{"needs_clarification": true, "clarifying_question": "Which alloy?",
                "use_docs_rag": false, "use_vendors": false}"#,
            "draft answer",
            r#"{"ok": true, "issues": []}"#,
        ]);
        let eng = engine(
            llm,
            ScriptedChunks::new(vec![]),
            FilteringVendors::new(vec![]),
            MemoryLog::new(),
        );

        let out = eng
            .answer(request("What torque spec should I use?"))
            .await
            .unwrap();
        assert_eq!(out.debug.clarifying_question.as_deref(), Some("Which alloy?"));
    }

    #[tokio::test]
    async fn notes_for_empty_session_need_no_llm() {
        let llm = ScriptedLlm::new(&[]);
        let log = MemoryLog::new();
        let sid = Uuid::new_v4();

        let md = build_engineering_notes(log.as_ref(), llm.as_ref(), sid)
            .await
            .unwrap();
        assert!(md.contains("No messages found"));
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn notes_fold_the_conversation_into_one_scribe_call() {
        let llm = ScriptedLlm::new(&["- requirement: hold 0.01mm flatness"]);
        let log = MemoryLog::new();
        let sid = Uuid::new_v4();
        log.append_message(sid, MessageRole::User, "flatness question")
            .await
            .unwrap();
        log.append_message(sid, MessageRole::Assistant, "flatness answer")
            .await
            .unwrap();

        let md = build_engineering_notes(log.as_ref(), llm.as_ref(), sid)
            .await
            .unwrap();
        assert!(md.starts_with("# Engineering Notes"));
        assert!(md.contains("hold 0.01mm flatness"));
        assert_eq!(llm.call_count(), 1);

        let call = llm.captured_call(0);
        assert!(call[1].content.contains("USER: flatness question"));
        assert!(call[1].content.contains("ASSISTANT: flatness answer"));
    }
}
