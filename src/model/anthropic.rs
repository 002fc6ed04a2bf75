//! Anthropic Messages API client.
//!
//! Non-streaming: POST {base_url}/messages with a single user message.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{ModelClient, ModelError};
use crate::config::ModelSettings;

/// API version header
const API_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: [ApiMessage<'a>; 1],
}

#[derive(Debug, Serialize)]
struct ApiMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ResponseBlock>,
}

#[derive(Debug, Deserialize)]
struct ResponseBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: Option<String>,
}

/// Claude model client configured from [`ModelSettings`].
pub struct AnthropicClient {
    http: Client,
    api_key: String,
    settings: ModelSettings,
}

impl AnthropicClient {
    /// Create a client. The key is passed in explicitly; nothing is read
    /// from the environment here.
    pub fn new(settings: ModelSettings, api_key: impl Into<String>) -> Result<Self, ModelError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ModelError::Auth("API key is empty".to_string()));
        }

        let http = Client::builder()
            .user_agent(concat!("wcagaudit/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_millis(settings.timeout_ms))
            .build()
            .map_err(|e| ModelError::Network(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_key,
            settings,
        })
    }

    /// Override the output-token ceiling (used by the connectivity check).
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.settings.max_tokens = max_tokens;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/messages", self.settings.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl ModelClient for AnthropicClient {
    fn name(&self) -> &str {
        &self.settings.name
    }

    async fn complete(&self, prompt: &str) -> Result<String, ModelError> {
        let request = MessagesRequest {
            model: &self.settings.name,
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
            messages: [ApiMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .http
            .post(self.endpoint())
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await?;

        let status = response.status().as_u16();
        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match status {
                401 | 403 => ModelError::Auth(body),
                429 => ModelError::RateLimited,
                _ => ModelError::Provider {
                    status,
                    message: body,
                },
            });
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| ModelError::InvalidResponse(e.to_string()))?;

        first_text(parsed)
    }
}

/// Text of the first text block in a response.
fn first_text(response: MessagesResponse) -> Result<String, ModelError> {
    response
        .content
        .into_iter()
        .find(|block| block.block_type == "text")
        .and_then(|block| block.text)
        .ok_or_else(|| ModelError::InvalidResponse("response has no text content".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let request = MessagesRequest {
            model: "claude-sonnet-4-20250514",
            max_tokens: 500,
            temperature: 0.0,
            messages: [ApiMessage {
                role: "user",
                content: "hi",
            }],
        };
        let v = serde_json::to_value(&request).unwrap();
        assert_eq!(v["max_tokens"], 500);
        assert_eq!(v["temperature"], 0.0);
        assert_eq!(v["messages"][0]["role"], "user");
        assert_eq!(v["messages"][0]["content"], "hi");
    }

    #[test]
    fn test_first_text_block() {
        let response: MessagesResponse = serde_json::from_str(
            r#"{"content": [{"type": "thinking"}, {"type": "text", "text": "{\"ok\": true}"}]}"#,
        )
        .unwrap();
        assert_eq!(first_text(response).unwrap(), r#"{"ok": true}"#);
    }

    #[test]
    fn test_no_text_is_invalid_response() {
        let response: MessagesResponse = serde_json::from_str(r#"{"content": []}"#).unwrap();
        assert!(matches!(
            first_text(response),
            Err(ModelError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_empty_key_rejected() {
        let result = AnthropicClient::new(ModelSettings::default(), "  ");
        assert!(matches!(result, Err(ModelError::Auth(_))));
    }

    #[test]
    fn test_endpoint_trims_slash() {
        let settings = ModelSettings {
            base_url: "http://localhost:8080/v1/".to_string(),
            ..Default::default()
        };
        let client = AnthropicClient::new(settings, "key").unwrap();
        assert_eq!(client.endpoint(), "http://localhost:8080/v1/messages");
    }
}
