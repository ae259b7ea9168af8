use anyhow::{Context, Result};

use crate::llm_client::DEFAULT_MODEL;
use crate::normalize::ContentPolicy;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub google_api_key: String,
    pub gemini_model: String,
    pub gemini_temperature: f32,
    pub llm_timeout_secs: u64,
    pub max_upload_bytes: usize,
    pub content_policy: ContentPolicy,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            google_api_key: require_env("GOOGLE_API_KEY")?,
            gemini_model: optional_env("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            gemini_temperature: parse_env("GEMINI_TEMPERATURE", 0.7)
                .context("GEMINI_TEMPERATURE must be a number")?,
            llm_timeout_secs: parse_env("LLM_TIMEOUT_SECS", 120)
                .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?,
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)
                .context("MAX_UPLOAD_BYTES must be a byte count")?,
            content_policy: optional_env("CONTENT_POLICY")
                .map(|v| v.parse::<ContentPolicy>())
                .transpose()
                .map_err(anyhow::Error::msg)
                .context("CONTENT_POLICY is invalid")?
                .unwrap_or_default(),
            port: parse_env("PORT", 5000).context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("could not parse {key}='{raw}'")),
        None => Ok(default),
    }
}
