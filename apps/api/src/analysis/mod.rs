// Resume ↔ job analysis: prompt building, completion extraction, HTTP handlers.
// All LLM calls go through llm_client, never to Anthropic directly.

pub mod extractor;
pub mod handlers;
pub mod models;
pub mod prompts;
