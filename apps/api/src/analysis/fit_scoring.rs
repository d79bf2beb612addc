//! Fit Scoring — deterministic keyword coverage of a resume against a JD's skill lists.
//!
//! `AnalysisEngine` holds an `Arc<dyn FitScorer>`; `KeywordFitScorer` is the default.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::analysis::jd_parser::SkillBreakdown;

pub const MUST_HAVE_WEIGHT: f64 = 2.0;
pub const GOOD_TO_HAVE_WEIGHT: f64 = 1.0;

/// Keyword coverage report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitReport {
    /// 0.0 – 100.0
    pub score: f64,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub scorer_backend: String,
}

/// The fit scorer trait. Implement this to swap backends without touching
/// the engine or the batch trigger.
#[async_trait]
pub trait FitScorer: Send + Sync {
    async fn score(&self, resume_text: &str, skills: &SkillBreakdown) -> FitReport;
}

/// Pure substring matcher. No stemming, tokenization or fuzzy matching.
///
/// Algorithm:
/// 1. Each must-have skill whose lowercase form is a substring of the lowercased
///    resume earns 2.0; each good-to-have skill earns 1.0.
/// 2. score = earned / maximum × 100, or 0.0 when there is nothing to match.
pub struct KeywordFitScorer;

#[async_trait]
impl FitScorer for KeywordFitScorer {
    async fn score(&self, resume_text: &str, skills: &SkillBreakdown) -> FitReport {
        compute_keyword_fit(resume_text, skills)
    }
}

/// Hard match score in 0.0 – 100.0.
#[cfg(test)]
pub fn compute_hard_match_score(resume_text: &str, skills: &SkillBreakdown) -> f64 {
    compute_keyword_fit(resume_text, skills).score
}

fn compute_keyword_fit(resume_text: &str, skills: &SkillBreakdown) -> FitReport {
    let resume_lower = resume_text.to_lowercase();

    let mut max_score = 0.0_f64;
    let mut earned = 0.0_f64;
    let mut matched_skills = Vec::new();
    let mut missing_skills = Vec::new();

    let weighted = skills
        .must_have_skills
        .iter()
        .map(|s| (s, MUST_HAVE_WEIGHT))
        .chain(
            skills
                .good_to_have_skills
                .iter()
                .map(|s| (s, GOOD_TO_HAVE_WEIGHT)),
        );

    for (skill, weight) in weighted {
        let needle = skill.trim().to_lowercase();
        if needle.is_empty() {
            continue;
        }
        max_score += weight;
        if resume_lower.contains(&needle) {
            earned += weight;
            matched_skills.push(skill.clone());
        } else {
            missing_skills.push(skill.clone());
        }
    }

    let score = if max_score == 0.0 {
        0.0
    } else {
        (earned / max_score) * 100.0
    };

    FitReport {
        score,
        matched_skills,
        missing_skills,
        scorer_backend: "keyword".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skills(must: &[&str], good: &[&str]) -> SkillBreakdown {
        SkillBreakdown {
            must_have_skills: must.iter().map(|s| s.to_string()).collect(),
            good_to_have_skills: good.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_empty_lists_score_zero() {
        assert_eq!(compute_hard_match_score("Rust SQL Docker", &skills(&[], &[])), 0.0);
    }

    #[test]
    fn test_all_skills_present_scores_hundred() {
        let s = skills(&["Rust", "SQL"], &["Docker"]);
        let resume = "Built services in rust backed by PostgreSQL (sql) and shipped via DOCKER.";
        assert_eq!(compute_hard_match_score(resume, &s), 100.0);
    }

    #[test]
    fn test_must_have_weighs_double() {
        // must: rust (2) + sql (2) matched, good: docker (1) missing → 4/5
        let s = skills(&["Rust", "SQL"], &["Docker"]);
        assert_eq!(compute_hard_match_score("rust and sql", &s), 80.0);

        // must missing, good matched → 1/3
        let s = skills(&["Kafka"], &["Python"]);
        let score = compute_hard_match_score("python", &s);
        assert!((score - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_matching_is_substring_case_insensitive() {
        let s = skills(&["Java"], &[]);
        // "javascript" contains "java": pure substring semantics.
        assert_eq!(compute_hard_match_score("JavaScript developer", &s), 100.0);
    }

    #[test]
    fn test_score_is_monotonic_as_skills_are_added() {
        let must = ["Rust", "Tokio", "PostgreSQL"];
        let good = ["Kubernetes", "Terraform"];
        let s = skills(&must, &good);

        let mut resume = String::from("Experienced engineer.");
        let mut previous = compute_hard_match_score(&resume, &s);
        for skill in must.iter().chain(good.iter()) {
            resume.push(' ');
            resume.push_str(&skill.to_uppercase());
            let current = compute_hard_match_score(&resume, &s);
            assert!(current >= previous, "{current} < {previous} after adding {skill}");
            previous = current;
        }
        assert_eq!(previous, 100.0);
    }

    #[test]
    fn test_report_lists_matched_and_missing() {
        let s = skills(&["Rust", "Go"], &["Docker"]);
        let report = compute_keyword_fit("rust docker", &s);
        assert_eq!(report.matched_skills, vec!["Rust", "Docker"]);
        assert_eq!(report.missing_skills, vec!["Go"]);
        assert_eq!(report.scorer_backend, "keyword");
    }

    #[test]
    fn test_blank_skills_are_ignored() {
        let s = skills(&["", "  "], &["Rust"]);
        assert_eq!(compute_hard_match_score("rust", &s), 100.0);
    }

    #[tokio::test]
    async fn test_keyword_scorer_trait_matches_free_function() {
        let s = skills(&["Rust"], &["Docker"]);
        let report = KeywordFitScorer.score("rust", &s).await;
        assert_eq!(report.score, compute_hard_match_score("rust", &s));
    }
}
