//! Pipeline configuration constructed once at process start and injected
//! into the engine.

/// Knobs for one question's pipeline run. All fields have defaults via
/// [`EngineConfig::from_env`].
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Initial candidates requested from the vector store.
    pub retrieve_k: u64,
    /// Candidates requested on the system-docs-only retry.
    pub fallback_retrieve_k: u64,
    /// Hard cap on chunks passed to generation.
    pub max_context_chunks: usize,
    /// Cap on vendor rows offered to the model.
    pub vendor_limit: i64,
    /// Sampling temperature for the first generation attempt. The planner,
    /// validator, and repair passes always run at 0.
    pub draft_temperature: f32,
    /// Scheduling link used by the routed scheduling answer.
    pub scheduling_url: String,
    /// Vendor table name exposed in `[VENDOR_TABLE]` citations.
    pub vendor_table_name: String,
    /// Document basenames allowed in system-docs-only retrieval.
    pub system_doc_allowlist: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            retrieve_k: 8,
            fallback_retrieve_k: 24,
            max_context_chunks: 5,
            vendor_limit: 8,
            draft_temperature: 0.2,
            scheduling_url: "https://calendar.app.google/b9H7oKXC58tDX4ge9".into(),
            vendor_table_name: "vendors".into(),
            system_doc_allowlist: [
                "01_Project_Overview.txt",
                "02_System_Architecture.txt",
                "03_Tech_Stack.txt",
                "04_Env_and_Secrets.txt",
                "05_Database_Schema.txt",
                "06_Ingestion_Pipeline.txt",
                "07_Known_Issues.txt",
                "08_Runbook.txt",
                "09_Future_Roadmap.txt",
                "10_Glossary.txt",
                "ui_schema.md",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

impl EngineConfig {
    /// Builds the config from environment variables with defaults.
    ///
    /// - `RAG_TOP_K`          (default 8)
    /// - `RAG_FALLBACK_TOP_K` (default 24)
    /// - `VENDOR_LIMIT`       (default 8)
    /// - `DRAFT_TEMPERATURE`  (default 0.2)
    /// - `SCHEDULING_URL`     (default: the HardwareHub calendar link)
    pub fn from_env() -> Self {
        let dflt = Self::default();
        Self {
            retrieve_k: parse("RAG_TOP_K", dflt.retrieve_k),
            fallback_retrieve_k: parse("RAG_FALLBACK_TOP_K", dflt.fallback_retrieve_k),
            vendor_limit: parse("VENDOR_LIMIT", dflt.vendor_limit),
            draft_temperature: parse("DRAFT_TEMPERATURE", dflt.draft_temperature),
            scheduling_url: std::env::var("SCHEDULING_URL")
                .unwrap_or_else(|_| dflt.scheduling_url.clone()),
            ..dflt
        }
    }
}

fn parse<T: std::str::FromStr>(k: &str, dflt: T) -> T {
    std::env::var(k)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(dflt)
}
