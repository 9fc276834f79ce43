//! Presentation Renderer. Maps an extraction outcome to a report model.
//!
//! `render` decides what is shown; `html` decides how. The model serializes
//! into the shape the page templates read.

pub mod html;

use serde::{Serialize, Serializer};

use crate::analysis::extractor::ExtractionError;
use crate::analysis::models::{AnalysisResult, ImprovementSuggestion};

/// Qualitative band for an ATS score. Lower bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Excellent,
    Good,
    NeedsImprovement,
}

impl ScoreBand {
    /// `>= 80` excellent, `>= 60` good, anything else (NaN included) needs work.
    pub fn for_score(score: f64) -> Self {
        if score >= 80.0 {
            ScoreBand::Excellent
        } else if score >= 60.0 {
            ScoreBand::Good
        } else {
            ScoreBand::NeedsImprovement
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ScoreBand::Excellent => "Excellent match",
            ScoreBand::Good => "Good match with room for improvement",
            ScoreBand::NeedsImprovement => "Needs significant improvement",
        }
    }
}

impl Serialize for ScoreBand {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreSection {
    #[serde(serialize_with = "serialize_score")]
    pub score: f64,
    pub band: ScoreBand,
    pub feedback: Option<String>,
}

/// Whole scores print without a fractional part.
fn format_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{score:.0}")
    } else {
        score.to_string()
    }
}

fn serialize_score<S: Serializer>(score: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_score(*score))
}

/// Optional report sections, in display order. Never constructed empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "items", rename_all = "snake_case")]
pub enum Section {
    MatchingKeywords(Vec<String>),
    MissingKeywords(Vec<String>),
    Strengths(Vec<String>),
    Suggestions(Vec<ImprovementSuggestion>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub score: ScoreSection,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailurePanel {
    pub message: String,
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rendered {
    Report(Report),
    Failure(FailurePanel),
}

pub fn render(outcome: Result<AnalysisResult, ExtractionError>) -> Rendered {
    match outcome {
        Ok(result) => Rendered::Report(build_report(result)),
        Err(err) => Rendered::Failure(FailurePanel {
            message: err.message,
            raw: err.raw,
        }),
    }
}

fn build_report(result: AnalysisResult) -> Report {
    let score = result.score();
    let AnalysisResult {
        matching_keywords,
        missing_keywords,
        resume_strengths,
        improvement_suggestions,
        overall_feedback,
        ..
    } = result;

    let candidates = [
        (!matching_keywords.is_empty()).then(|| Section::MatchingKeywords(matching_keywords)),
        (!missing_keywords.is_empty()).then(|| Section::MissingKeywords(missing_keywords)),
        (!resume_strengths.is_empty()).then(|| Section::Strengths(resume_strengths)),
        (!improvement_suggestions.is_empty())
            .then(|| Section::Suggestions(improvement_suggestions)),
    ];

    Report {
        score: ScoreSection {
            score,
            band: ScoreBand::for_score(score),
            feedback: overall_feedback,
        },
        sections: candidates.into_iter().flatten().collect(),
    }
}
