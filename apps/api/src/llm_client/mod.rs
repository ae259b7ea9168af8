/// LLM Client — the single point of entry for all Gemini API calls.
///
/// ARCHITECTURAL RULE: No other module may call the Gemini API directly.
/// Everything else talks to the `GenerativeModel` / `ModelCatalog` traits.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::schema::gemini::to_response_schema;
use crate::schema::SchemaNode;

pub mod prompts;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Default model when `GEMINI_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const MAX_RETRIES: u32 = 3;
const LIST_PAGE_SIZE: u32 = 100;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("Prompt blocked by the model: {reason}")]
    Blocked { reason: String },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Produces raw response text for a prompt, constrained to a schema.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Identifier of the model answering requests, reported in diagnostics.
    fn model_name(&self) -> &str;

    async fn generate(&self, prompt: &str, schema: &SchemaNode) -> Result<String, LlmError>;
}

/// Lists model identifiers available to the configured credentials.
#[async_trait]
pub trait ModelCatalog: Send + Sync {
    async fn list_models(&self) -> Result<Vec<String>, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
pub struct CandidatePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        (!text.is_empty()).then_some(text)
    }

    pub fn block_reason(&self) -> Option<&str> {
        self.prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<ModelInfo>,
}

#[derive(Debug, Deserialize)]
struct ModelInfo {
    name: String,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// Gemini REST client with retry on 429/5xx and structured JSON output.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    temperature: f32,
    base_url: String,
}

impl GeminiClient {
    pub fn new(
        api_key: String,
        model: String,
        temperature: f32,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            model,
            temperature,
            base_url: GEMINI_API_BASE.to_string(),
        })
    }

    /// Makes a raw `generateContent` call, returning the decoded response.
    /// Retries on 429 (rate limit), 5xx and transport errors with exponential backoff.
    pub async fn call(&self, prompt: &str, system: &str, schema: &SchemaNode) -> Result<GenerateContentResponse, LlmError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let request_body = GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part { text: system }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: to_response_schema(schema),
                temperature: self.temperature,
            },
        };

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "Gemini call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&url)
                .header("x-goog-api-key", &self.api_key)
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("Gemini API returned {}: {}", status, body);
                last_error = Some(LlmError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(api_error(status.as_u16(), body));
            }

            let decoded: GenerateContentResponse = response.json().await?;

            if let Some(usage) = &decoded.usage_metadata {
                debug!(
                    "Gemini call succeeded: prompt_tokens={}, candidate_tokens={}",
                    usage.prompt_token_count, usage.candidates_token_count
                );
            }

            return Ok(decoded);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str, schema: &SchemaNode) -> Result<String, LlmError> {
        let response = self.call(prompt, prompts::JSON_ONLY_SYSTEM, schema).await?;
        if let Some(reason) = response
            .candidates
            .first()
            .and_then(|c| c.finish_reason.as_deref())
        {
            debug!("Gemini finish reason: {reason}");
        }
        extract_text(&response).map(|t| strip_json_fences(&t).to_string())
    }
}

#[async_trait]
impl ModelCatalog for GeminiClient {
    async fn list_models(&self) -> Result<Vec<String>, LlmError> {
        let url = format!("{}/models?pageSize={}", self.base_url, LIST_PAGE_SIZE);
        let response = self
            .client
            .get(&url)
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), body));
        }

        let listed: ListModelsResponse = response.json().await?;
        Ok(listed.models.into_iter().map(|m| m.name).collect())
    }
}

/// Maps a decoded response to its text, treating a block as an error.
fn extract_text(response: &GenerateContentResponse) -> Result<String, LlmError> {
    if let Some(reason) = response.block_reason() {
        return Err(LlmError::Blocked {
            reason: reason.to_string(),
        });
    }
    response.text().ok_or(LlmError::EmptyContent)
}

fn api_error(status: u16, body: String) -> LlmError {
    // Try to parse error message
    let message = serde_json::from_str::<GeminiError>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);
    LlmError::Api { status, message }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
