use std::sync::Arc;

use tokio::sync::Mutex;

use crate::analysis::engine::AnalysisEngine;
use crate::storage::FileStore;
use crate::store::ApplicantStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ApplicantStore>,
    pub files: FileStore,
    /// LLM client, document extractor and fit scorer, wired once at startup.
    pub engine: AnalysisEngine,
    /// Held for the duration of a batch run; a second trigger is refused.
    pub batch_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(store: Arc<dyn ApplicantStore>, files: FileStore, engine: AnalysisEngine) -> Self {
        Self {
            store,
            files,
            engine,
            batch_lock: Arc::new(Mutex::new(())),
        }
    }
}
