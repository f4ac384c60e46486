//! Upstream language-model providers
//!
//! The service talks to its model through [`CompletionProvider`], so the
//! HTTP handler can be exercised with canned output in tests.

use super::prompt::Prompt;
use crate::config::ProviderConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Source of raw model completions
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Provider name for logs
    fn name(&self) -> &str;

    /// Run the prompt and return the model's raw text output
    async fn complete(&self, prompt: &Prompt) -> Result<String>;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    #[serde(default)]
    content: Option<String>,
}

/// OpenAI-compatible `/chat/completions` provider
pub struct ChatCompletionsProvider {
    base_url: String,
    model: String,
    api_key_ref: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl ChatCompletionsProvider {
    /// Create a provider, resolving the API key from the environment
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let api_key = config.resolve_api_key();
        if api_key.is_none() {
            tracing::warn!(
                api_key_ref = %config.api_key_ref,
                "No API key found; generation requests will fail"
            );
        }

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key_ref: config.api_key_ref.clone(),
            api_key,
            client,
        })
    }

    /// Override the API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

#[async_trait]
impl CompletionProvider for ChatCompletionsProvider {
    fn name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &Prompt) -> Result<String> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            Error::Config(format!(
                "{} is not configured",
                self.api_key_ref.to_uppercase()
            ))
        })?;

        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::ServiceUnavailable(format!("AI gateway request failed: {}", e)))?;

        let status = response.status();
        match status {
            StatusCode::TOO_MANY_REQUESTS => return Err(Error::RateLimited),
            StatusCode::PAYMENT_REQUIRED => return Err(Error::PaymentRequired),
            s if !s.is_success() => {
                let text = response.text().await.unwrap_or_default();
                tracing::error!(status = %s, body = %text, "AI gateway error");
                return Err(Error::ServiceUnavailable(format!("AI gateway error {}", s)));
            }
            _ => {}
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::MalformedResponse(format!("AI gateway response: {}", e)))?;

        Ok(parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        http::{HeaderMap, StatusCode as AxumStatus},
        routing::post,
        Json, Router,
    };

    async fn fake_gateway(status: u16) -> ProviderConfig {
        let app = Router::new().route(
            "/v1/chat/completions",
            post(move |headers: HeaderMap, Json(body): Json<serde_json::Value>| async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                let reply = serde_json::json!({
                    "choices": [{
                        "message": {
                            "content": format!(
                                "{}|{}|{}",
                                auth,
                                body["model"].as_str().unwrap_or_default(),
                                body["messages"][0]["role"].as_str().unwrap_or_default()
                            )
                        }
                    }]
                });
                (AxumStatus::from_u16(status).unwrap(), Json(reply))
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        ProviderConfig {
            base_url: format!("http://{}/v1/", addr),
            model: "test-model".to_string(),
            api_key_ref: "learnloom_provider_test_unset".to_string(),
            timeout_secs: 5,
        }
    }

    fn prompt() -> Prompt {
        Prompt {
            system: "sys".to_string(),
            user: "user".to_string(),
        }
    }

    #[tokio::test]
    async fn test_complete_sends_model_and_bearer() {
        let config = fake_gateway(200).await;
        let provider = ChatCompletionsProvider::new(&config)
            .unwrap()
            .with_api_key("sk-test");

        let text = provider.complete(&prompt()).await.unwrap();
        assert_eq!(text, "Bearer sk-test|test-model|system");
        assert_eq!(provider.name(), "test-model");
    }

    #[tokio::test]
    async fn test_missing_key() {
        let config = fake_gateway(200).await;
        let provider = ChatCompletionsProvider::new(&config).unwrap();
        let err = provider.complete(&prompt()).await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    async fn error_for_status(status: u16) -> Error {
        let config = fake_gateway(status).await;
        let provider = ChatCompletionsProvider::new(&config)
            .unwrap()
            .with_api_key("sk-test");
        provider.complete(&prompt()).await.unwrap_err()
    }

    #[tokio::test]
    async fn test_status_mapping() {
        assert!(matches!(error_for_status(429).await, Error::RateLimited));
        assert!(matches!(error_for_status(402).await, Error::PaymentRequired));
        assert!(matches!(
            error_for_status(503).await,
            Error::ServiceUnavailable(_)
        ));
    }
}
