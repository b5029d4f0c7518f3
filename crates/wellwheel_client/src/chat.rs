//! OpenAI-compatible chat completions.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use wellwheel_core::products::SYSTEM_PROMPT;

use crate::http_client::{build_http, execute_json};
use crate::{ChatClient, ChatMessage, ChatRequest, ClientError};

const SERVICE: &str = "openai";

pub const TIP_TEMPERATURE: f32 = 0.7;
pub const TIP_MAX_TOKENS: u32 = 160;

impl ChatRequest {
    /// The one-tip request: general, non-medical system message plus `prompt`.
    pub fn smart_tip(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(prompt)],
            temperature: TIP_TEMPERATURE,
            max_tokens: TIP_MAX_TOKENS,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<CompletionMessage>,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Clone, Debug)]
pub struct ReqwestChatClient {
    base_url: String,
    api_key: SecretString,
    client: reqwest::Client,
}

impl ReqwestChatClient {
    pub fn new(base_url: &str, api_key: SecretString, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client,
        }
    }

    pub fn with_timeout(
        base_url: &str,
        api_key: SecretString,
        timeout: std::time::Duration,
    ) -> Result<Self, ClientError> {
        Ok(Self::new(base_url, api_key, build_http(timeout)?))
    }
}

#[async_trait]
impl ChatClient for ReqwestChatClient {
    async fn complete(&self, request: &ChatRequest) -> Result<Option<String>, ClientError> {
        let url = format!("{}/chat/completions", self.base_url);
        tracing::debug!(model = %request.model, "chat completion");
        let resp: CompletionResponse = execute_json(
            SERVICE,
            self.client
                .post(url)
                .bearer_auth(self.api_key.expose_secret())
                .json(request),
            "Chat completion failed",
        )
        .await?;
        Ok(resp
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smart_tip_request_settings() {
        let req = ChatRequest::smart_tip("gpt-4o-mini", "hi");
        assert_eq!(req.messages.len(), 2);
        assert_eq!(req.messages[0].content, SYSTEM_PROMPT);
        assert_eq!(req.messages[1].role, "user");
        assert_eq!(req.max_tokens, 160);
        assert_eq!(req.temperature, 0.7);
    }
}
