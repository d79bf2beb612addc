// LLM prompt constants for the analysis pipeline.
// System prompts are completed with llm_client::prompts::json_system.

pub const SKILL_EXTRACTION_ROLE: &str =
    "You are an expert job description analyst. Extract the skills a candidate needs.";

/// Skill extraction prompt template. Fill `{jd_text}` with `render_prompt`.
pub const SKILL_EXTRACTION_PROMPT_TEMPLATE: &str = r#"Based on the following job description, extract the "must_have_skills" and "good_to_have_skills".

Return a JSON object with this EXACT schema:
{
  "must_have_skills": ["Python", "SQL"],
  "good_to_have_skills": ["Docker"]
}

Rules:
- Each skill is a short keyword or phrase as it would appear on a resume.
- MUST HAVE: phrases like "required", "must have", "you will need", minimum years.
- GOOD TO HAVE: phrases like "preferred", "bonus", "nice to have", "plus".
- Use an empty list when a category has no skills.

Job Description:
---
{jd_text}
---
"#;

pub const RELEVANCE_ROLE: &str =
    "You are an expert technical recruiter and career coach. \
    Provide a detailed analysis of the resume against the job description.";

/// Comprehensive analysis prompt template. Fill `{jd_text}` and `{resume_text}` with `render_prompt`.
pub const RELEVANCE_PROMPT_TEMPLATE: &str = r#"Analyze how well the resume matches the job description.

Return a single JSON object with the following keys:
- "relevance_score": An integer score from 0 to 100 for the overall match.
- "fit_verdict": A string: "High Suitability", "Medium Suitability", or "Low Suitability".
- "missing_elements": A list of key missing skills, certifications, or projects.
- "personalized_feedback": Constructive feedback for the student on how to improve.
- "summary_for_recruiter": A brief summary for the recruiter.

---
Job Description: {jd_text}
---
Resume Text: {resume_text}
---
"#;

/// Fills `{name}` placeholders in one pass. Substituted text is never scanned
/// again, so a document containing a placeholder stays literal. Braces that
/// name no variable are copied as is.
pub fn render_prompt(template: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open + 1..];
        let hit = vars.iter().find(|(name, _)| {
            tail.strip_prefix(name)
                .is_some_and(|after| after.starts_with('}'))
        });
        match hit {
            Some((name, value)) => {
                out.push_str(value);
                rest = &tail[name.len() + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}
