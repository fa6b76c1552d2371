//! Explanation oracle backed by the Mistral chat-completions API

use super::{ExplanationOracle, strip_code_fences};
use crate::io::configuration::{ORACLE_API_KEY_VAR, ORACLE_TIMEOUT_SECS};
use crate::io::error::{ObserverError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Chat-completions endpoint
pub const MISTRAL_ENDPOINT: &str = "https://api.mistral.ai/v1/chat/completions";

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    content: String,
}

/// Blocking Mistral client
#[derive(Debug, Clone)]
pub struct MistralOracle {
    client: reqwest::blocking::Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl MistralOracle {
    /// Client for the given key and model
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(ORACLE_TIMEOUT_SECS))
            .user_agent(concat!("fractal-observer/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ObserverError::Oracle {
                reason: format!("HTTP client setup failed: {e}"),
            })?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
            endpoint: MISTRAL_ENDPOINT.to_owned(),
        })
    }

    /// Client keyed from the environment, or `None` when no key is set
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn from_env(model: impl Into<String>) -> Result<Option<Self>> {
        match std::env::var(ORACLE_API_KEY_VAR) {
            Ok(key) if !key.trim().is_empty() => Self::new(key.trim(), model).map(Some),
            _ => Ok(None),
        }
    }

    /// Send requests to a different endpoint
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Model identifier used for requests
    pub fn model(&self) -> &str {
        &self.model
    }
}

impl ExplanationOracle for MistralOracle {
    fn complete(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        debug!(model = %self.model, endpoint = %self.endpoint, "requesting explanation");
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .map_err(|e| ObserverError::Oracle {
                reason: format!("HTTP error: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ObserverError::Oracle {
                reason: format!("HTTP {status}"),
            });
        }

        let body: ChatResponse = response.json().map_err(|e| ObserverError::Oracle {
            reason: format!("malformed response: {e}"),
        })?;
        let content = body
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| ObserverError::Oracle {
                reason: "response contained no choices".to_owned(),
            })?;

        Ok(strip_code_fences(&content).to_owned())
    }
}
