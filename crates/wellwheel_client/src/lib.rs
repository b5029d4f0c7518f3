//! Upstream clients for the wellness wheel: video search, chat completion and
//! the score store.
//!
//! Each upstream sits behind an async trait so the server can hold
//! `Arc<dyn Trait>` handles and tests can swap in mocks.

use async_trait::async_trait;
use chrono::NaiveDate;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use wellwheel_core::{SearchResultItem, WellnessScoreRecord};

pub mod chat;
pub mod config;
pub mod http_client;
pub mod memory;
pub mod supabase;
pub mod youtube;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    /// Non-success upstream response; `message` is the upstream's own text.
    #[error("{message}")]
    Upstream { status: u16, message: String },
    #[error("unauthorized: {0}")]
    Auth(String),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("decode error: {0}")]
    Decode(String),
}

impl ClientError {
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            ClientError::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// One page of an uploads playlist.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct VideoPage {
    pub items: Vec<SearchResultItem>,
    pub next_page_token: Option<String>,
}

#[async_trait]
pub trait VideoSearchClient: Send + Sync + 'static {
    /// Newest uploads of a channel, optionally narrowed by a search query.
    async fn search_channel(
        &self,
        channel_id: &str,
        query: Option<&str>,
        max_results: u32,
    ) -> Result<Vec<SearchResultItem>, ClientError>;

    /// A page of a playlist with private and deleted entries removed.
    async fn playlist_page(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
        max_results: u32,
    ) -> Result<VideoPage, ClientError>;
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".into(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[async_trait]
pub trait ChatClient: Send + Sync + 'static {
    /// First choice's message content, `None` when the model returned nothing.
    async fn complete(&self, request: &ChatRequest) -> Result<Option<String>, ClientError>;
}

/// A caller whose bearer token has been verified.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: String,
    pub email: Option<String>,
    pub token: SecretString,
}

#[async_trait]
pub trait AuthVerifier: Send + Sync + 'static {
    async fn verify(&self, token: &str) -> Result<AuthUser, ClientError>;
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub tz: Option<String>,
}

/// Persistence for score rows, one per (user, day, topic).
#[async_trait]
pub trait ScoreStore: Send + Sync + 'static {
    /// Insert or replace the row for the record's (user, day, topic).
    async fn upsert_score(
        &self,
        user: &AuthUser,
        record: &WellnessScoreRecord,
    ) -> Result<(), ClientError>;
    async fn scores_for_day(
        &self,
        user: &AuthUser,
        day: NaiveDate,
    ) -> Result<Vec<WellnessScoreRecord>, ClientError>;
    /// Every row of the user, oldest day first.
    async fn all_scores(&self, user: &AuthUser) -> Result<Vec<WellnessScoreRecord>, ClientError>;
    /// Distinct days with at least one row, ascending.
    async fn filled_days(&self, user: &AuthUser) -> Result<Vec<NaiveDate>, ClientError>;
    async fn reset_day(&self, user: &AuthUser, day: NaiveDate) -> Result<(), ClientError>;
    async fn profile(&self, user: &AuthUser) -> Result<Option<Profile>, ClientError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_error_displays_message_verbatim() {
        let e = ClientError::Upstream {
            status: 403,
            message: "quota exceeded".into(),
        };
        assert_eq!(e.to_string(), "quota exceeded");
        assert_eq!(e.upstream_status(), Some(403));
        assert_eq!(ClientError::Auth("x".into()).upstream_status(), None);
    }

    #[test]
    fn chat_request_wire_shape() {
        let req = ChatRequest {
            model: "m".into(),
            messages: vec![ChatMessage::system("s"), ChatMessage::user("u")],
            temperature: 0.5,
            max_tokens: 10,
        };
        let v = serde_json::to_value(&req).unwrap();
        assert_eq!(v["messages"][0]["role"], "system");
        assert_eq!(v["messages"][1]["content"], "u");
        assert_eq!(v["max_tokens"], 10);
    }
}
