//! HTTP client for a local Ollama server.
//!
//! Only the non-streaming `/api/generate` endpoint is used: the chatbot builds
//! a single flattened transcript prompt and reads back the `response` field.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use crate::error::ChatbotError;

const DEFAULT_BASE_URL: &str = "http://localhost:11434/";

/// Generation settings forwarded with every request.
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl OllamaConfig {
    #[must_use]
    pub fn from_app_config(config: &noticeboard_core::AppConfig) -> Self {
        Self {
            model: config.ollama_model.clone(),
            temperature: config.ollama_temperature,
            max_tokens: config.ollama_max_tokens,
            timeout_secs: config.ollama_timeout_secs,
        }
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            model: "llama3.1:latest".to_string(),
            temperature: 0.7,
            max_tokens: 2000,
            timeout_secs: 120,
        }
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Client for the Ollama generate API.
///
/// Use [`OllamaClient::new`] for the default local server or
/// [`OllamaClient::with_base_url`] to point at another host or a mock server.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: Client,
    generate_url: Url,
    config: OllamaConfig,
}

impl OllamaClient {
    /// Creates a client pointed at `http://localhost:11434`.
    ///
    /// # Errors
    ///
    /// Returns [`ChatbotError::UpstreamUnavailable`] if the HTTP client cannot
    /// be constructed.
    pub fn new(config: OllamaConfig) -> Result<Self, ChatbotError> {
        Self::with_base_url(DEFAULT_BASE_URL, config)
    }

    /// Creates a client with a custom base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ChatbotError::UpstreamUnavailable`] if the HTTP client cannot
    /// be constructed or `base_url` is not a valid URL.
    pub fn with_base_url(base_url: &str, config: OllamaConfig) -> Result<Self, ChatbotError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("noticeboard/0.1 (chatbot)")
            .build()
            .map_err(|e| ChatbotError::UpstreamUnavailable(format!("http client: {e}")))?;

        // A trailing slash keeps `join` from replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let generate_url = Url::parse(&normalised)
            .and_then(|base| base.join("api/generate"))
            .map_err(|e| {
                ChatbotError::UpstreamUnavailable(format!("invalid base URL '{base_url}': {e}"))
            })?;

        Ok(Self {
            client,
            generate_url,
            config,
        })
    }

    #[must_use]
    pub fn generate_url(&self) -> &Url {
        &self.generate_url
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Sends a single non-streaming generation request.
    ///
    /// Returns the model's reply with surrounding whitespace trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`ChatbotError::UpstreamUnavailable`] on network failure, a
    /// non-2xx status, or a body without a `response` string.
    pub async fn generate(&self, prompt: &str) -> Result<String, ChatbotError> {
        let request = GenerateRequest {
            model: &self.config.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: self.config.temperature,
                num_predict: self.config.max_tokens,
            },
        };

        tracing::debug!(
            model = %self.config.model,
            prompt_chars = prompt.len(),
            "sending generate request to ollama"
        );

        let response = self
            .client
            .post(self.generate_url.clone())
            .json(&request)
            .send()
            .await
            .map_err(|e| ChatbotError::UpstreamUnavailable(format!("ollama request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(ChatbotError::UpstreamUnavailable(format!(
                "ollama returned status {}",
                response.status()
            )));
        }

        let body: GenerateResponse = response.json().await.map_err(|e| {
            ChatbotError::UpstreamUnavailable(format!("ollama response parse error: {e}"))
        })?;

        Ok(body.response.trim().to_string())
    }
}
