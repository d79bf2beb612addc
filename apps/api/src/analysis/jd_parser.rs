//! JD Parser — extracts the must-have / good-to-have skill lists from a job description.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::analysis::prompts::{
    render_prompt, SKILL_EXTRACTION_PROMPT_TEMPLATE, SKILL_EXTRACTION_ROLE,
};
use crate::llm_client::prompts::json_system;
use crate::llm_client::LlmClient;

/// Weighted skill lists used by the keyword matcher.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillBreakdown {
    /// Weight 2.0 each.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub must_have_skills: Vec<String>,
    /// Weight 1.0 each.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub good_to_have_skills: Vec<String>,
}

impl SkillBreakdown {
    pub fn is_empty(&self) -> bool {
        self.must_have_skills.is_empty() && self.good_to_have_skills.is_empty()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Asks the LLM for the JD's skill lists.
///
/// Never fails: any LLM or parse error yields an empty breakdown, which the
/// keyword matcher scores as 0.0.
pub async fn parse_jd_skills(jd_text: &str, llm: &LlmClient) -> SkillBreakdown {
    let prompt = render_prompt(SKILL_EXTRACTION_PROMPT_TEMPLATE, &[("jd_text", jd_text)]);
    match llm
        .call_json::<SkillBreakdown>(&prompt, &json_system(SKILL_EXTRACTION_ROLE))
        .await
    {
        Ok(skills) => skills,
        Err(e) => {
            warn!("JD skill extraction failed, hard match will score 0: {e}");
            SkillBreakdown::default()
        }
    }
}
