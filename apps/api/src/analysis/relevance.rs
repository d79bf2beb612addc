//! Comprehensive LLM analysis of a resume against a job description.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::analysis::prompts::{render_prompt, RELEVANCE_PROMPT_TEMPLATE, RELEVANCE_ROLE};
use crate::analysis::AnalysisError;
use crate::llm_client::prompts::json_system;
use crate::llm_client::LlmClient;

/// Suitability verdict assigned by the LLM.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FitVerdict {
    High,
    Medium,
    Low,
    /// The model returned something outside the three fixed strings, or nothing.
    #[default]
    Unknown,
}

impl FitVerdict {
    pub fn as_str(self) -> &'static str {
        match self {
            FitVerdict::High => "High Suitability",
            FitVerdict::Medium => "Medium Suitability",
            FitVerdict::Low => "Low Suitability",
            FitVerdict::Unknown => "Unknown",
        }
    }

    pub fn parse(raw: &str) -> Self {
        let lower = raw.trim().to_lowercase();
        match lower.trim_end_matches(" suitability") {
            "high" => FitVerdict::High,
            "medium" => FitVerdict::Medium,
            "low" => FitVerdict::Low,
            _ => FitVerdict::Unknown,
        }
    }
}

impl fmt::Display for FitVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FitVerdict {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FitVerdict {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(FitVerdict::parse).unwrap_or_default())
    }
}

/// The LLM's holistic analysis. Missing keys fall back to defaults rather than
/// failing the candidate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlmAnalysis {
    /// 0 – 100, clamped.
    #[serde(default, deserialize_with = "lenient_score")]
    pub relevance_score: f64,
    #[serde(default)]
    pub fit_verdict: FitVerdict,
    #[serde(default, deserialize_with = "lenient_list")]
    pub missing_elements: Vec<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub personalized_feedback: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub summary_for_recruiter: String,
}

/// Accepts a number or a numeric string; anything else reads as 0.
fn lenient_score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    let score = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().trim_end_matches('%').parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    Ok(if score.is_finite() {
        score.clamp(0.0, 100.0)
    } else {
        0.0
    })
}

/// Accepts a list of strings (non-strings stringified), a single string, or null.
fn lenient_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => s,
                other => other.to_string(),
            })
            .collect(),
        Value::String(s) if !s.trim().is_empty() => vec![s],
        _ => Vec::new(),
    })
}

/// Accepts a string, a list of bullet points (joined by newlines), any other
/// scalar, or null.
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        Value::String(s) => s,
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::Null => None,
                Value::String(s) => Some(s),
                other => Some(other.to_string()),
            })
            .collect::<Vec<_>>()
            .join("\n"),
        other => other.to_string(),
    })
}

/// Requests the full relevance analysis. Any LLM failure is an error: the
/// candidate is skipped rather than recorded with a fabricated score.
pub async fn comprehensive_analysis(
    resume_text: &str,
    jd_text: &str,
    llm: &LlmClient,
) -> Result<LlmAnalysis, AnalysisError> {
    let prompt = render_prompt(
        RELEVANCE_PROMPT_TEMPLATE,
        &[("jd_text", jd_text), ("resume_text", resume_text)],
    );

    llm.call_json::<LlmAnalysis>(&prompt, &json_system(RELEVANCE_ROLE))
        .await
        .map_err(|e| AnalysisError::Llm(e.to_string()))
}
