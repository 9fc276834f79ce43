//! HTML output for the single-page UI.
//!
//! Markup lives in `templates/`. Both templates are registered under `.html`
//! names, so tera autoescapes every user or model value written into them.

use once_cell::sync::Lazy;
use serde::Serialize;
use tera::{Context, Tera};

use crate::render::Rendered;

const PAGE_TEMPLATE: &str = "page.html";
const RESULT_TEMPLATE: &str = "result.html";

static TEMPLATES: Lazy<Tera> = Lazy::new(|| {
    let mut tera = Tera::default();
    tera.add_raw_templates(vec![
        (RESULT_TEMPLATE, include_str!("../../templates/result.html")),
        (PAGE_TEMPLATE, include_str!("../../templates/page.html")),
    ])
    .expect("valid page templates");
    tera
});

/// Everything the page shows for one request.
#[derive(Debug, Default, Serialize)]
pub struct PageView<'a> {
    pub resume: &'a str,
    pub job: &'a str,
    /// Validation or transport error, shown above the results.
    pub error: Option<&'a str>,
    pub result: Option<&'a Rendered>,
}

pub fn render_page(view: &PageView<'_>) -> Result<String, tera::Error> {
    let context = Context::from_serialize(view)?;
    TEMPLATES.render(PAGE_TEMPLATE, &context)
}
