use anyhow::{Context, Result};

const DEFAULT_ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";

/// Application configuration loaded from environment variables.
///
/// The Anthropic key is optional at startup: a missing key fails every
/// outbound call instead of the whole process.
#[derive(Clone)]
pub struct Config {
    pub anthropic_api_key: Option<String>,
    pub anthropic_api_url: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            anthropic_api_url: optional_env("ANTHROPIC_API_URL")
                .unwrap_or_else(|| DEFAULT_ANTHROPIC_API_URL.to_string()),
            port: parse_port(std::env::var("PORT").ok().as_deref())?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

// Keeps the key out of `{:?}` output.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field(
                "anthropic_api_key",
                &self.anthropic_api_key.as_ref().map(|_| "<redacted>"),
            )
            .field("anthropic_api_url", &self.anthropic_api_url)
            .field("port", &self.port)
            .field("rust_log", &self.rust_log)
            .finish()
    }
}

/// Blank values count as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_port(raw: Option<&str>) -> Result<u16> {
    raw.unwrap_or("8080")
        .parse::<u16>()
        .context("PORT must be a valid port number")
}
