//! Result Extractor. Recovers an `AnalysisResult` from raw completion text.
//!
//! Steps: trim → strip markdown fences → detect truncation by brace count →
//! repair (only when truncated) → parse → lenient conversion.
//!
//! Prose outside the fenced block is not handled.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::{debug, warn};

use crate::analysis::models::AnalysisResult;

static OPENING_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^```(?:json)?\s*\n?").expect("valid opening fence pattern"));
static CLOSING_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n?```\s*$").expect("valid closing fence pattern"));

/// Appended after the repair point to close the array and the wrapper object.
const REPAIR_SUFFIX: &str = "\n  ]\n}";

/// The completion could not be turned into JSON. Carries the raw text for display.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ExtractionError {
    pub message: String,
    pub raw: String,
}

impl ExtractionError {
    pub fn new(message: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            raw: raw.into(),
        }
    }

    /// The provider answered without any text block.
    pub fn no_text() -> Self {
        Self::new("No text found in completion", "")
    }
}

/// Best-effort completion of truncated JSON.
///
/// Swappable so a tolerant streaming parser can replace the heuristic
/// without touching the rest of the pipeline.
pub trait JsonRepair: Send + Sync {
    fn repair<'a>(&self, text: &'a str) -> Cow<'a, str>;
}

/// Cuts back to the last complete array element (`},`) and closes the
/// enclosing array and object.
///
/// Only correct when the cut lands inside a top-level array of objects.
/// Any other nesting may still yield invalid JSON, which then surfaces as an
/// `ExtractionError`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrailingElementRepair;

impl JsonRepair for TrailingElementRepair {
    fn repair<'a>(&self, text: &'a str) -> Cow<'a, str> {
        match text.rfind("},") {
            Some(idx) if idx > 0 => {
                let mut repaired = String::with_capacity(idx + 1 + REPAIR_SUFFIX.len());
                repaired.push_str(&text[..=idx]);
                repaired.push_str(REPAIR_SUFFIX);
                Cow::Owned(repaired)
            }
            _ => Cow::Borrowed(text),
        }
    }
}

/// Removes a leading ```` ```json ```` / ```` ``` ```` fence and a trailing ```` ``` ````.
pub fn strip_fences(text: &str) -> &str {
    let text = text.trim();
    let start = OPENING_FENCE.find(text).map_or(0, |m| m.end());
    let body = &text[start..];
    let end = CLOSING_FENCE.find(body).map_or(body.len(), |m| m.start());
    body[..end].trim()
}

/// Counts `{` and `}`. Braces inside strings are counted too.
fn brace_counts(text: &str) -> (usize, usize) {
    text.chars().fold((0, 0), |(open, close), c| match c {
        '{' => (open + 1, close),
        '}' => (open, close + 1),
        _ => (open, close),
    })
}

/// Extracts with the default repair strategy.
pub fn extract(raw: &str) -> Result<AnalysisResult, ExtractionError> {
    extract_with(raw, &TrailingElementRepair)
}

pub fn extract_with(raw: &str, repair: &dyn JsonRepair) -> Result<AnalysisResult, ExtractionError> {
    let cleaned = strip_fences(raw);
    let (open, close) = brace_counts(cleaned);
    debug!(
        "Cleaned completion: {} bytes, open braces={}, close braces={}",
        cleaned.len(),
        open,
        close
    );

    // More opens than closes: the output limit cut the object short.
    let candidate = if open > close {
        warn!("Incomplete JSON detected ({open} open vs {close} close braces); attempting repair");
        repair.repair(cleaned)
    } else {
        Cow::Borrowed(cleaned)
    };

    let value: serde_json::Value = serde_json::from_str(&candidate).map_err(|e| {
        warn!("Failed to parse completion as JSON: {e}");
        ExtractionError::new(e.to_string(), raw)
    })?;

    Ok(AnalysisResult::from_value(&value))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str = "```json\n{\"ats_score\": 85, \"matching_keywords\": [\"SQL\"], \"missing_keywords\": [], \"resume_strengths\": [], \"improvement_suggestions\": [], \"overall_feedback\": \"Good\"}\n```";

    const TRUNCATED: &str = r#"{"ats_score": 70, "improvement_suggestions": [{"original_bullet":"a","improved_bullet":"b","keywords_added":["x"]},{"original_bullet":"c""#;

    fn direct(text: &str) -> AnalysisResult {
        AnalysisResult::from_value(&serde_json::from_str(text).unwrap())
    }

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_tag_is_case_insensitive() {
        let input = "  ```JSON\n{\"key\": 1}\n```  ";
        assert_eq!(strip_fences(input), "{\"key\": 1}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_fences(input), input);
    }

    #[test]
    fn test_strip_fences_handles_missing_closing_fence() {
        let input = "```json\n{\"key\": [";
        assert_eq!(strip_fences(input), "{\"key\": [");
    }

    #[test]
    fn test_fenced_scenario_extracts() {
        let result = extract(SCENARIO).unwrap();
        assert_eq!(result.ats_score, Some(85.0));
        assert_eq!(result.matching_keywords, vec!["SQL"]);
        assert!(result.missing_keywords.is_empty());
        assert!(result.resume_strengths.is_empty());
        assert!(result.improvement_suggestions.is_empty());
        assert_eq!(result.overall_feedback.as_deref(), Some("Good"));
    }

    #[test]
    fn test_fenced_and_unfenced_agree() {
        let body = r#"{"ats_score": 64.5, "matching_keywords": ["Rust", "gRPC"], "resume_strengths": ["Ownership"]}"#;
        let expected = direct(body);
        assert_eq!(extract(body).unwrap(), expected);
        assert_eq!(extract(&format!("```json\n{body}\n```")).unwrap(), expected);
        assert_eq!(extract(&format!("```\n{body}\n```")).unwrap(), expected);
    }

    #[test]
    fn test_truncated_scenario_keeps_only_complete_suggestion() {
        let (open, close) = brace_counts(TRUNCATED);
        assert!(open > close);

        let result = extract(TRUNCATED).unwrap();
        assert_eq!(result.ats_score, Some(70.0));
        assert_eq!(result.improvement_suggestions.len(), 1);
        let suggestion = &result.improvement_suggestions[0];
        assert_eq!(suggestion.original_bullet.as_deref(), Some("a"));
        assert_eq!(suggestion.improved_bullet.as_deref(), Some("b"));
        assert_eq!(suggestion.keywords_added, vec!["x"]);
    }

    #[test]
    fn test_truncated_inside_fence_is_repaired() {
        let fenced = format!("```json\n{TRUNCATED}");
        let result = extract(&fenced).unwrap();
        assert_eq!(result.improvement_suggestions.len(), 1);
    }

    #[test]
    fn test_repair_skipped_for_balanced_input() {
        // A complete object that contains "}," must come through untouched.
        let complete = r#"{"improvement_suggestions": [{"original_bullet": "a"}, {"original_bullet": "b"}]}"#;
        let (open, close) = brace_counts(complete);
        assert_eq!(open, close);
        let result = extract(complete).unwrap();
        assert_eq!(result.improvement_suggestions.len(), 2);
    }

    #[test]
    fn test_repair_without_element_boundary_is_noop() {
        let text = r#"{"ats_score": 50, "matching_keywords": ["a""#;
        assert!(matches!(TrailingElementRepair.repair(text), Cow::Borrowed(t) if t == text));
    }

    #[test]
    fn test_repair_ignores_boundary_at_offset_zero() {
        let text = "},{";
        assert_eq!(TrailingElementRepair.repair(text), text);
    }

    #[test]
    fn test_unrepairable_truncation_is_extraction_error() {
        let raw = r#"{"ats_score": 50, "matching_keywords": ["a""#;
        let err = extract(raw).unwrap_err();
        assert!(!err.message.is_empty());
        assert_eq!(err.raw, raw);
    }

    #[test]
    fn test_empty_input_is_extraction_error() {
        let err = extract("").unwrap_err();
        assert_eq!(err.raw, "");
        assert!(!err.message.is_empty());
    }

    #[test]
    fn test_prose_before_fence_is_not_recovered() {
        let raw = "Here is your analysis:\n```json\n{\"ats_score\": 90}\n```";
        let err = extract(raw).unwrap_err();
        assert_eq!(err.raw, raw);
    }

    #[test]
    fn test_custom_repair_strategy_is_used() {
        struct CloseObject;
        impl JsonRepair for CloseObject {
            fn repair<'a>(&self, text: &'a str) -> Cow<'a, str> {
                Cow::Owned(format!("{text}}}"))
            }
        }

        let result = extract_with(r#"{"ats_score": 42"#, &CloseObject).unwrap();
        assert_eq!(result.ats_score, Some(42.0));
    }
}
