//! Completion-service client.
//!
//! One single-turn request per question; no conversation history, no
//! streaming, no retries. A failed call is surfaced to the caller.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::{debug, instrument};
use url::Url;

use inkling_shared::config::OpenRouterConfig;
use inkling_shared::{InklingError, Result};

/// User-Agent string for API requests.
const USER_AGENT: &str = concat!("Inkling/", env!("CARGO_PKG_VERSION"));

/// A black-box text-completion service.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Submit one system instruction plus one user message, returning the
    /// first text segment of the response verbatim.
    async fn complete(&self, system: &str, user: &str) -> Result<String>;
}

/// OpenRouter chat-completions client.
pub struct OpenRouterClient {
    http: Client,
    endpoint: Url,
    token: String,
    model: String,
}

impl OpenRouterClient {
    /// Create a client, reading the API key from the env var named in the
    /// config.
    pub fn new(config: &OpenRouterConfig) -> Result<Self> {
        let token = std::env::var(&config.api_key_env).map_err(|_| {
            InklingError::config(format!(
                "OpenRouter API key not found. Set the {} environment variable.",
                config.api_key_env
            ))
        })?;
        Self::with_token(config, token)
    }

    /// Create a client with an explicit key (used by tests against a mock
    /// server).
    pub fn with_token(config: &OpenRouterConfig, token: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| InklingError::Network(format!("failed to build HTTP client: {e}")))?;

        let endpoint = Url::parse(&format!(
            "{}/chat/completions",
            config.api_base.trim_end_matches('/')
        ))
        .map_err(|e| InklingError::config(format!("invalid completion api_base: {e}")))?;

        Ok(Self {
            http,
            endpoint,
            token: token.into(),
            model: config.default_model.clone(),
        })
    }
}

#[async_trait]
impl CompletionService for OpenRouterClient {
    #[instrument(skip_all, fields(model = %self.model, user_chars = user.len()))]
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let body = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": user},
            ],
        });

        let response = self
            .http
            .post(self.endpoint.clone())
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .map_err(|e| InklingError::Completion(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InklingError::Completion(format!(
                "HTTP {status}: {}",
                body.trim()
            )));
        }

        let value: Value = response
            .json()
            .await
            .map_err(|e| InklingError::Completion(format!("invalid JSON response: {e}")))?;

        let text = value
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .ok_or_else(|| InklingError::Completion("response contained no text".into()))?;

        debug!(reply_chars = text.len(), "completion received");
        Ok(text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(server: &MockServer) -> OpenRouterConfig {
        OpenRouterConfig {
            api_key_env: "UNUSED".into(),
            default_model: "test/model".into(),
            api_base: server.uri(),
        }
    }

    #[tokio::test]
    async fn sends_single_turn_exchange_and_returns_first_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer test-key"))
            .and(body_partial_json(serde_json::json!({
                "model": "test/model",
                "messages": [
                    {"role": "system"},
                    {"role": "user", "content": "What time is check-in?"},
                ],
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [
                    {"message": {"role": "assistant", "content": "Check-in is at 3pm."}},
                ],
            })))
            .mount(&server)
            .await;

        let client = OpenRouterClient::with_token(&test_config(&server), "test-key").unwrap();
        let reply = client
            .complete("You answer questions.", "What time is check-in?")
            .await
            .unwrap();

        assert_eq!(reply, "Check-in is at 3pm.");
    }

    #[tokio::test]
    async fn non_success_status_is_completion_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let client = OpenRouterClient::with_token(&test_config(&server), "k").unwrap();
        let err = client.complete("s", "u").await.unwrap_err();

        assert!(matches!(err, InklingError::Completion(_)));
        assert!(err.to_string().contains("429"));
    }

    #[tokio::test]
    async fn missing_text_segment_is_completion_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})),
            )
            .mount(&server)
            .await;

        let client = OpenRouterClient::with_token(&test_config(&server), "k").unwrap();
        let err = client.complete("s", "u").await.unwrap_err();

        assert!(err.to_string().contains("no text"));
    }
}
