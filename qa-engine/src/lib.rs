//! Retrieval-augmented question answering for mechanical-engineering queries.
//!
//! Public API: [`QaEngine::answer`]. A question first hits the intent router
//! (scripted scheduling flow); otherwise the planner decides the retrieval
//! strategy, the context assembler and license resolver build a bounded,
//! license-annotated context, the vendor matcher optionally adds candidate
//! vendors, and the answer is generated, judged, and repaired at most once.
//!
//! All collaborators (LLM, embedding, similarity search, catalogs, audit
//! log, prompts) are injected through the traits in [`ports`], so the whole
//! pipeline runs against in-memory doubles in tests.

pub mod config;
pub mod context;
pub mod error;
pub mod intents;
pub mod license;
pub mod notes;
pub mod pipeline;
pub mod plan;
pub mod ports;
pub mod prompt;
pub mod validate;
pub mod vendor;

pub use config::EngineConfig;
pub use error::EngineError;
pub use pipeline::{
    AnswerOutcome, AnswerRequest, DebugMeta, NO_SYSTEM_DOC_CONTEXT, QaEngine, ROUTED_SCHEDULE,
};
pub use plan::PlanDecision;
pub use prompt::Citation;
pub use validate::Verdict;
