//! Relevance engine — orchestrates one resume-vs-JD analysis.
//!
//! Flow: extract both texts → LLM comprehensive analysis → LLM skill extraction →
//!       keyword fit score → blend. Steps run sequentially.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::analysis::extractor::DocumentExtractor;
use crate::analysis::fit_scoring::FitScorer;
use crate::analysis::jd_parser::parse_jd_skills;
use crate::analysis::relevance::{comprehensive_analysis, LlmAnalysis};
use crate::analysis::AnalysisError;
use crate::llm_client::LlmClient;

pub const HARD_MATCH_WEIGHT: f64 = 0.4;
pub const LLM_RELEVANCE_WEIGHT: f64 = 0.6;

/// The LLM analysis augmented with the blended and keyword scores.
#[derive(Debug, Clone, Serialize)]
pub struct RelevancePackage {
    #[serde(flatten)]
    pub analysis: LlmAnalysis,
    pub final_weighted_score: f64,
    pub hard_match_score: f64,
}

/// Rounds to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// final = round2(hard × 0.4 + llm × 0.6)
pub fn blend_scores(hard_match_score: f64, llm_relevance_score: f64) -> f64 {
    round2(hard_match_score * HARD_MATCH_WEIGHT + llm_relevance_score * LLM_RELEVANCE_WEIGHT)
}

/// Holds the injected collaborators for the relevance pipeline.
#[derive(Clone)]
pub struct AnalysisEngine {
    llm: LlmClient,
    extractor: Arc<dyn DocumentExtractor>,
    fit_scorer: Arc<dyn FitScorer>,
}

impl AnalysisEngine {
    pub fn new(
        llm: LlmClient,
        extractor: Arc<dyn DocumentExtractor>,
        fit_scorer: Arc<dyn FitScorer>,
    ) -> Self {
        Self {
            llm,
            extractor,
            fit_scorer,
        }
    }

    /// Scores one resume against one job description.
    pub async fn analyze(
        &self,
        resume_path: &Path,
        jd_path: &Path,
    ) -> Result<RelevancePackage, AnalysisError> {
        let resume_text = self.extractor.extract(resume_path).await;
        let jd_text = self.extractor.extract(jd_path).await;

        if resume_text.trim().is_empty() || jd_text.trim().is_empty() {
            return Err(AnalysisError::UnreadableDocuments);
        }

        let analysis = comprehensive_analysis(&resume_text, &jd_text, &self.llm).await?;
        let skills = parse_jd_skills(&jd_text, &self.llm).await;
        if skills.is_empty() {
            debug!("No skills extracted from {}", jd_path.display());
        }
        let fit = self.fit_scorer.score(&resume_text, &skills).await;

        debug!(
            "Scored {} ({}): hard={:.2} llm={:.2} matched={:?} missing={:?}",
            resume_path.display(),
            fit.scorer_backend,
            fit.score,
            analysis.relevance_score,
            fit.matched_skills,
            fit.missing_skills
        );

        Ok(RelevancePackage {
            final_weighted_score: blend_scores(fit.score, analysis.relevance_score),
            hard_match_score: round2(fit.score),
            analysis,
        })
    }
}
