//! Client for the generative model that writes energy-saving suggestions.
//!
//! Handlers depend on the [`SuggestionModel`] trait rather than a concrete
//! client, so the model can be replaced in tests. [`GeminiClient`] is the
//! production implementation over the Gemini `generateContent` REST API.
//!
//! Each call is bounded by a per-attempt timeout and retried a fixed number
//! of times. Only the response text is consumed; it is handed to the
//! suggestion extractor as-is.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::Config;

/// Response text substituted when the model returns no text at all.
pub const EMPTY_RESPONSE: &str = "[]";

/// Pause between a failed attempt and its retry.
const RETRY_PAUSE: Duration = Duration::from_millis(250);

// ---

/// A generative model that turns a prompt into free text.
#[async_trait]
pub trait SuggestionModel: Send + Sync {
    // ---
    /// Send `prompt` and return the model's raw text response.
    async fn generate(&self, prompt: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

/// Response: candidates[0].content.parts[*].text.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    // ---
    /// Concatenated text of the first candidate, if it has any.
    fn text(self) -> Option<String> {
        // ---
        let parts = self.candidates.into_iter().next()?.content?.parts;
        let text: String = parts.into_iter().filter_map(|p| p.text).collect();
        (!text.is_empty()).then_some(text)
    }
}

/// HTTP client for Gemini `generateContent`.
pub struct GeminiClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    max_retries: u32,
}

impl GeminiClient {
    // ---
    /// Build a client from loaded configuration.
    ///
    /// Fails only if the underlying HTTP client cannot be constructed.
    pub fn from_config(config: &Config) -> Result<Self> {
        // ---
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(u64::from(config.llm_timeout_secs)))
            .build()
            .context("Failed to build HTTP client for the generative model")?;

        let endpoint = format!(
            "{}/models/{}:generateContent",
            config.gemini_base_url.trim_end_matches('/'),
            config.gemini_model
        );

        Ok(Self {
            client,
            endpoint,
            api_key: config.gemini_api_key.clone(),
            max_retries: config.llm_max_retries,
        })
    }

    async fn attempt(&self, prompt: &str) -> Result<String> {
        // ---
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let res = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;
        let status = res.status();
        let text = res.text().await?;
        if !status.is_success() {
            return Err(anyhow!("Gemini API error {}: {}", status, text));
        }

        let parsed: GenerateResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Gemini response parse error: {}; body: {}", e, text))?;

        Ok(parsed.text().unwrap_or_else(|| EMPTY_RESPONSE.to_string()))
    }
}

#[async_trait]
impl SuggestionModel for GeminiClient {
    // ---
    async fn generate(&self, prompt: &str) -> Result<String> {
        // ---
        let mut attempt = 0;
        loop {
            attempt += 1;
            debug!(attempt, endpoint = %self.endpoint, "calling generative model");

            match self.attempt(prompt).await {
                Ok(text) => return Ok(text),
                Err(e) if attempt <= self.max_retries => {
                    warn!(attempt, error = %e, "generative model call failed, retrying");
                    tokio::time::sleep(RETRY_PAUSE).await;
                }
                Err(e) => {
                    return Err(e.context(format!(
                        "Generative model call failed after {} attempt(s)",
                        attempt
                    )))
                }
            }
        }
    }
}
