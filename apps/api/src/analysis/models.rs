use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AppError;

pub const EMPTY_FIELDS_MESSAGE: &str = "Please fill in both resume and job description fields.";

/// A validated resume/job pair. Both texts are trimmed and non-empty.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    resume_text: String,
    job_text: String,
}

impl AnalysisRequest {
    pub fn new(resume: &str, job: &str) -> Result<Self, AppError> {
        let resume_text = resume.trim();
        let job_text = job.trim();

        if resume_text.is_empty() || job_text.is_empty() {
            return Err(AppError::Validation(EMPTY_FIELDS_MESSAGE.to_string()));
        }

        Ok(Self {
            resume_text: resume_text.to_string(),
            job_text: job_text.to_string(),
        })
    }

    pub fn resume_text(&self) -> &str {
        &self.resume_text
    }

    pub fn job_text(&self) -> &str {
        &self.job_text
    }
}

/// One before/after rewrite proposed by the model. Every member is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImprovementSuggestion {
    pub original_bullet: Option<String>,
    pub improved_bullet: Option<String>,
    pub keywords_added: Vec<String>,
}

/// Structured analysis recovered from model output.
///
/// The source is untrusted, so nothing here is guaranteed: build it with
/// [`AnalysisResult::from_value`], which degrades each malformed field to
/// its default instead of rejecting the whole object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisResult {
    pub ats_score: Option<f64>,
    pub matching_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub resume_strengths: Vec<String>,
    pub improvement_suggestions: Vec<ImprovementSuggestion>,
    pub overall_feedback: Option<String>,
}

impl AnalysisResult {
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::default();
        };

        Self {
            ats_score: obj.get("ats_score").and_then(lenient_number),
            matching_keywords: string_list(obj.get("matching_keywords")),
            missing_keywords: string_list(obj.get("missing_keywords")),
            resume_strengths: string_list(obj.get("resume_strengths")),
            improvement_suggestions: obj
                .get("improvement_suggestions")
                .and_then(Value::as_array)
                .map(|items| {
                    items
                        .iter()
                        .filter(|item| item.is_object())
                        .map(ImprovementSuggestion::from_value)
                        .collect()
                })
                .unwrap_or_default(),
            overall_feedback: obj.get("overall_feedback").and_then(optional_text),
        }
    }

    /// Score used for display and banding. Absent means 0.
    pub fn score(&self) -> f64 {
        self.ats_score.unwrap_or(0.0)
    }
}

impl ImprovementSuggestion {
    fn from_value(value: &Value) -> Self {
        Self {
            original_bullet: value.get("original_bullet").and_then(optional_text),
            improved_bullet: value.get("improved_bullet").and_then(optional_text),
            keywords_added: string_list(value.get("keywords_added")),
        }
    }
}

fn lenient_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

/// Strings pass through, scalars become their text, everything else is dropped.
fn list_item(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(list_item).collect())
        .unwrap_or_default()
}

fn optional_text(value: &Value) -> Option<String> {
    list_item(value).filter(|s| !s.trim().is_empty())
}
