//! Configuration loader for the `wattwise-insights` service.
//!
//! This module centralizes all runtime configuration values and their defaults,
//! loading from environment variables (with optional `.env` file support
//! provided by the caller). The generative-model credential is required:
//! without it the service refuses to start rather than failing per request.
//!
use std::env;

use anyhow::{anyhow, Result};

/// Default Gemini model used for suggestions.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Default Gemini REST base URL.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Parse an optional integer environment variable with a default value.
macro_rules! parse_env_u32 {
    ($var_name:expr, $default:expr) => {
        env::var($var_name)
            .ok()
            .map(|v| v.parse::<u32>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

/// Parse an optional string environment variable with a default value.
macro_rules! env_or {
    ($var_name:expr, $default:expr) => {
        env::var($var_name).unwrap_or_else(|_| $default.to_string())
    };
}

/// Parse a required string environment variable.
macro_rules! require_env {
    ($var_name:expr) => {
        env::var($var_name)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| anyhow!("{} must be set in .env or environment", $var_name))?
    };
}

/// Strongly typed application configuration.
///
/// All fields are immutable after loading, ensuring a consistent configuration
/// snapshot for the lifetime of the application.
#[derive(Debug, Clone)]
pub struct Config {
    // ---
    /// Credential for the Gemini API.
    pub gemini_api_key: String,

    /// Model name passed to `generateContent`.
    pub gemini_model: String,

    /// Gemini REST base URL (overridable for stubs and proxies).
    pub gemini_base_url: String,

    /// Per-attempt timeout for the model call, in seconds.
    pub llm_timeout_secs: u32,

    /// Extra attempts after a failed model call.
    pub llm_max_retries: u32,

    /// TCP port the HTTP server binds.
    pub port: u16,
}

/// Load configuration from environment variables with defaults.
///
/// Required:
/// - `GEMINI_API_KEY` – Gemini API credential
///
/// Optional:
/// - `GEMINI_MODEL` – model name (default: `gemini-2.5-flash`)
/// - `GEMINI_BASE_URL` – REST base URL (default: Google's v1beta endpoint)
/// - `LLM_TIMEOUT_SECS` – per-attempt timeout (default: 30)
/// - `LLM_MAX_RETRIES` – retries after a failed call (default: 1)
/// - `PORT` – listen port (default: 8080)
///
/// Returns an error if any required variable is missing or invalid.
pub fn load_from_env() -> Result<Config> {
    // ---
    let gemini_api_key = require_env!("GEMINI_API_KEY");
    let gemini_model = env_or!("GEMINI_MODEL", DEFAULT_GEMINI_MODEL);
    let gemini_base_url = env_or!("GEMINI_BASE_URL", DEFAULT_GEMINI_BASE_URL);
    let llm_timeout_secs = parse_env_u32!("LLM_TIMEOUT_SECS", 30);
    let llm_max_retries = parse_env_u32!("LLM_MAX_RETRIES", 1);
    let port = env::var("PORT")
        .ok()
        .map(|v| v.parse::<u16>())
        .transpose()
        .map_err(|e| anyhow!("Invalid PORT: {}", e))?
        .unwrap_or(8080);

    Ok(Config {
        gemini_api_key,
        gemini_model,
        gemini_base_url,
        llm_timeout_secs,
        llm_max_retries,
        port,
    })
}

impl Config {
    /// Log the loaded configuration for debugging purposes.
    ///
    /// Masks the API key, keeping only its last four characters.
    pub fn log_config(&self) {
        // ---
        tracing::info!("Configuration loaded:");
        tracing::info!("  GEMINI_API_KEY   : {}", mask_secret(&self.gemini_api_key));
        tracing::info!("  GEMINI_MODEL     : {}", self.gemini_model);
        tracing::info!("  GEMINI_BASE_URL  : {}", self.gemini_base_url);
        tracing::info!("  LLM_TIMEOUT_SECS : {}", self.llm_timeout_secs);
        tracing::info!("  LLM_MAX_RETRIES  : {}", self.llm_max_retries);
        tracing::info!("  PORT             : {}", self.port);
    }
}

fn mask_secret(secret: &str) -> String {
    // ---
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}
