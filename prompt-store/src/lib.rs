//! File-backed store for named prompt templates.
//!
//! Templates live as `{dir}/{name}.txt`. The store is read-on-demand: prompts
//! are small and editing them must not require a restart, so nothing is
//! cached. Loading a missing name fails with [`PromptError::NotFound`].

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::trace;

/// Errors raised while loading prompt templates.
#[derive(Debug, Error)]
pub enum PromptError {
    /// The named template file does not exist.
    #[error("missing prompt file: {0}")]
    NotFound(PathBuf),

    /// I/O error while reading an existing template.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Store of named prompt templates rooted at a directory.
#[derive(Debug, Clone)]
pub struct PromptStore {
    dir: PathBuf,
}

impl PromptStore {
    /// Creates a store rooted at `dir`. The directory is not validated here;
    /// a missing directory surfaces as `NotFound` on first load.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Builds a store from the `PROMPT_DIR` environment variable
    /// (default `prompts`).
    pub fn from_env() -> Self {
        Self::new(std::env::var("PROMPT_DIR").unwrap_or_else(|_| "prompts".into()))
    }

    /// Loads the template named `name` from `{dir}/{name}.txt`, trimmed.
    ///
    /// # Errors
    /// - [`PromptError::NotFound`] when the file is absent
    /// - [`PromptError::Io`] for other read failures
    pub fn load(&self, name: &str) -> Result<String, PromptError> {
        let path = self.dir.join(format!("{name}.txt"));
        trace!("prompt_store::load {:?}", path);
        if !path.exists() {
            return Err(PromptError::NotFound(path));
        }
        let text = std::fs::read_to_string(&path)?;
        Ok(text.trim().to_string())
    }

    /// Loads the pinned background facts template.
    ///
    /// # Errors
    /// Same as [`PromptStore::load`].
    pub fn pinned_facts(&self) -> Result<String, PromptError> {
        self.load("pinned_facts")
    }

    /// Root directory of the store.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn load_trims_and_reads() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("planner.txt"), "  You are a planner.\n\n").unwrap();
        let store = PromptStore::new(dir.path());
        assert_eq!(store.load("planner").unwrap(), "You are a planner.");
    }

    #[test]
    fn missing_template_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = PromptStore::new(dir.path());
        match store.load("nope") {
            Err(PromptError::NotFound(p)) => assert!(p.ends_with("nope.txt")),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }
}
