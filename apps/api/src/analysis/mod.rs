// Resume / job-description relevance pipeline.
// Text extraction, LLM skill extraction, keyword matching, LLM analysis and score blending.
// All LLM calls go through llm_client.

pub mod engine;
pub mod extractor;
pub mod fit_scoring;
pub mod jd_parser;
pub mod prompts;
pub mod relevance;

use thiserror::Error;

/// Why a single relevance analysis could not be produced.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Could not read one or both files.")]
    UnreadableDocuments,

    #[error("API call failed: {0}")]
    Llm(String),
}
