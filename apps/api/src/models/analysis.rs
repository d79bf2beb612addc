use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::analysis::engine::RelevancePackage;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AnalysisResultRow {
    pub id: Uuid,
    pub student_id: Uuid,
    pub job_description_id: Option<Uuid>,
    pub final_weighted_score: f64,
    pub fit_verdict: String,
    pub hard_match_score: f64,
    pub llm_relevance_score: f64,
    pub missing_elements: Vec<String>,
    pub personalized_feedback: String,
    pub summary_for_recruiter: String,
    pub created_at: DateTime<Utc>,
}

/// An analysis produced by the batch trigger, not yet persisted.
#[derive(Debug, Clone)]
pub struct NewAnalysis {
    pub student_id: Uuid,
    pub job_description_id: Option<Uuid>,
    pub final_weighted_score: f64,
    pub fit_verdict: String,
    pub hard_match_score: f64,
    pub llm_relevance_score: f64,
    pub missing_elements: Vec<String>,
    pub personalized_feedback: String,
    pub summary_for_recruiter: String,
}

impl NewAnalysis {
    pub fn from_package(
        student_id: Uuid,
        job_description_id: Option<Uuid>,
        package: RelevancePackage,
    ) -> Self {
        let RelevancePackage {
            analysis,
            final_weighted_score,
            hard_match_score,
        } = package;

        Self {
            student_id,
            job_description_id,
            final_weighted_score,
            fit_verdict: analysis.fit_verdict.to_string(),
            hard_match_score,
            llm_relevance_score: analysis.relevance_score,
            missing_elements: analysis.missing_elements,
            personalized_feedback: analysis.personalized_feedback,
            summary_for_recruiter: analysis.summary_for_recruiter,
        }
    }
}
