//! Fakes shared by handler and batch tests.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Semaphore;

use crate::analysis::engine::AnalysisEngine;
use crate::analysis::extractor::DocumentExtractor;
use crate::analysis::fit_scoring::KeywordFitScorer;
use crate::llm_client::{LlmBackend, LlmClient, LlmError};
use crate::state::AppState;
use crate::storage::FileStore;
use crate::store::memory::MemoryApplicantStore;

/// Reads uploads as UTF-8 text, so tests can post plain-text "PDFs".
pub struct PlainTextExtractor;

#[async_trait]
impl DocumentExtractor for PlainTextExtractor {
    async fn extract(&self, path: &Path) -> String {
        tokio::fs::read_to_string(path).await.unwrap_or_default()
    }
}

pub const SKILLS_JSON: &str =
    r#"{"must_have_skills": ["Rust", "SQL"], "good_to_have_skills": ["Docker"]}"#;
pub const ANALYSIS_JSON: &str = r#"{
    "relevance_score": 90,
    "fit_verdict": "High",
    "missing_elements": ["Docker"],
    "personalized_feedback": "Add a containerized project.",
    "summary_for_recruiter": "Strong Rust and SQL background."
}"#;

/// Answers both prompts with fixed JSON and counts calls.
#[derive(Default)]
pub struct StubLlm {
    pub calls: AtomicUsize,
    /// When set, every call waits for a permit first; permits are returned.
    gate: Option<Semaphore>,
    /// When set, the relevance prompt fails with an API error.
    fail_analysis: bool,
}

impl StubLlm {
    /// A stub whose calls block until `open_gate` is called.
    pub fn gated() -> Self {
        Self {
            gate: Some(Semaphore::new(0)),
            ..Self::default()
        }
    }

    pub fn failing_analysis() -> Self {
        Self {
            fail_analysis: true,
            ..Self::default()
        }
    }

    pub fn open_gate(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1);
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmBackend for StubLlm {
    async fn complete(&self, prompt: &str, _system: &str) -> Result<String, LlmError> {
        if let Some(gate) = &self.gate {
            let _permit = gate.acquire().await;
        }
        self.calls.fetch_add(1, Ordering::SeqCst);
        if prompt.contains("must_have_skills") {
            Ok(SKILLS_JSON.to_string())
        } else if self.fail_analysis {
            Err(LlmError::Api {
                status: 503,
                message: "model overloaded".to_string(),
            })
        } else {
            Ok(ANALYSIS_JSON.to_string())
        }
    }
}

pub struct TestHarness {
    pub state: AppState,
    pub store: Arc<MemoryApplicantStore>,
    pub llm: Arc<StubLlm>,
    pub files: FileStore,
    _dir: tempfile::TempDir,
}

pub async fn harness() -> TestHarness {
    harness_with(Arc::new(StubLlm::default())).await
}

pub async fn harness_with(llm: Arc<StubLlm>) -> TestHarness {
    let dir = tempfile::tempdir().unwrap();
    let files = FileStore::new(dir.path().join("resumes"), dir.path().join("jds"));
    files.ensure_dirs().await.unwrap();

    let store = Arc::new(MemoryApplicantStore::new());
    let engine = AnalysisEngine::new(
        LlmClient::with_backend(llm.clone()),
        Arc::new(PlainTextExtractor),
        Arc::new(KeywordFitScorer),
    );

    TestHarness {
        state: AppState::new(store.clone(), files.clone(), engine),
        store,
        llm,
        files,
        _dir: dir,
    }
}
