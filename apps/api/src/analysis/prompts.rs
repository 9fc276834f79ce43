// Prompt template for the ATS analysis call.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::analysis::models::AnalysisRequest;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{(resume|job)\}").expect("valid placeholder pattern"));

/// Analysis prompt template. Replace `{resume}` and `{job}` before sending.
///
/// The JSON shape here is the one `AnalysisResult::from_value` reads back.
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"
You are an ATS Resume Optimization AI.

Resume:
{resume}

Job Description:
{job}

Analyze alignment. Explain mismatches if any. Provide suggestions.
Return only JSON structured as:
{
  "ats_score": number,
  "matching_keywords": [string],
  "missing_keywords": [string],
  "resume_strengths": [string],
  "improvement_suggestions": [
    {
      "original_bullet": string,
      "improved_bullet": string,
      "keywords_added": [string]
    }
  ],
  "overall_feedback": string
}
"#;

/// Builds the analysis prompt for a validated request.
///
/// Placeholders are filled in one pass over the template, so inputs that
/// themselves contain `{resume}` or `{job}` are embedded as written.
pub fn build_prompt(request: &AnalysisRequest) -> String {
    PLACEHOLDER
        .replace_all(ANALYSIS_PROMPT_TEMPLATE, |caps: &Captures| match &caps[1] {
            "resume" => request.resume_text(),
            _ => request.job_text(),
        })
        .into_owned()
}
