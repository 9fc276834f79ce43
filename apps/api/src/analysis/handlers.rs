//! Axum route handlers for the analysis page and JSON API.

use anyhow::Context;
use axum::{
    extract::{rejection::JsonRejection, State},
    response::Html,
    Form, Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::extractor::{extract, ExtractionError};
use crate::analysis::models::{AnalysisRequest, AnalysisResult};
use crate::analysis::prompts::build_prompt;
use crate::errors::AppError;
use crate::llm_client::{CompletionGateway, ContentBlock, LlmResponse};
use crate::render::html::{render_page, PageView};
use crate::render::render;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnalyzeApiRequest {
    pub resume: String,
    pub job: String,
}

/// `result` is the provider's content block list, unmodified.
#[derive(Debug, Serialize)]
pub struct AnalyzeApiResponse {
    pub result: Vec<ContentBlock>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeForm {
    #[serde(default)]
    pub resume: String,
    #[serde(default)]
    pub job: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Prompt → gateway. The only place an analysis reaches the network.
async fn run_analysis(
    gateway: &dyn CompletionGateway,
    request: &AnalysisRequest,
) -> Result<LlmResponse, AppError> {
    let prompt = build_prompt(request);
    info!(
        "Requesting analysis: resume={} chars, job={} chars",
        request.resume_text().chars().count(),
        request.job_text().chars().count()
    );
    let response = gateway.complete(&prompt).await?;
    Ok(response)
}

fn extract_response(response: &LlmResponse) -> Result<AnalysisResult, ExtractionError> {
    match response.text() {
        Some(text) => extract(text),
        None => Err(ExtractionError::no_text()),
    }
}

fn page(view: &PageView<'_>) -> Result<Html<String>, AppError> {
    let html = render_page(view).context("Failed to render analysis page")?;
    Ok(Html(html))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /
pub async fn handle_index() -> Result<Html<String>, AppError> {
    page(&PageView::default())
}

/// POST /analyze
///
/// Form flow. Validation, transport and extraction failures all end up on the
/// page; only a template failure returns an error status.
pub async fn handle_analyze_form(
    State(state): State<AppState>,
    Form(form): Form<AnalyzeForm>,
) -> Result<Html<String>, AppError> {
    let request = match AnalysisRequest::new(&form.resume, &form.job) {
        Ok(request) => request,
        Err(err) => {
            err.log();
            let message = err.public_message();
            return page(&PageView {
                resume: &form.resume,
                job: &form.job,
                error: Some(message.as_str()),
                result: None,
            });
        }
    };

    match run_analysis(state.gateway.as_ref(), &request).await {
        Ok(response) => {
            let rendered = render(extract_response(&response));
            page(&PageView {
                resume: request.resume_text(),
                job: request.job_text(),
                error: None,
                result: Some(&rendered),
            })
        }
        Err(err) => {
            err.log();
            let message = err.public_message();
            page(&PageView {
                resume: request.resume_text(),
                job: request.job_text(),
                error: Some(message.as_str()),
                result: None,
            })
        }
    }
}

/// POST /api/analyze
///
/// Returns the raw completion for clients that do their own extraction.
pub async fn handle_analyze_api(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeApiRequest>, JsonRejection>,
) -> Result<Json<AnalyzeApiResponse>, AppError> {
    let Json(payload) = payload.map_err(|e| AppError::MalformedRequest(e.body_text()))?;
    let request = AnalysisRequest::new(&payload.resume, &payload.job)?;

    let response = run_analysis(state.gateway.as_ref(), &request).await?;

    Ok(Json(AnalyzeApiResponse {
        result: response.content,
    }))
}
