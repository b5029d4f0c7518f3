//! Curated video search over the two YouTube sources.

use std::sync::Arc;

use axum::body::Bytes;
use axum::debug_handler;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::header::CACHE_CONTROL;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use wellwheel_client::VideoSearchClient;
use wellwheel_client::youtube::VideoTopic;
use wellwheel_core::ranking::matches_exact_words;
use wellwheel_core::{SeenIds, VideoItem, rank};

use crate::domains::parse_body;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub const CHANNEL_SEARCH_RESULTS: u32 = 12;
pub const PLAYLIST_PAGE_SIZE: u32 = 50;
const UPLOADS_CACHE: &str = "public, s-maxage=600, stale-while-revalidate=86400";

#[derive(Debug, Default, Deserialize)]
pub struct EduSearchRequest {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EduSearchResponse {
    pub items: Vec<VideoItem>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadsRequest {
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub page_token: Option<String>,
    #[serde(default)]
    pub seen_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadsResponse {
    pub items: Vec<VideoItem>,
    pub next_page_token: Option<String>,
}

fn video_client(state: &AppState) -> ApiResult<&Arc<dyn VideoSearchClient>> {
    state
        .video
        .as_ref()
        .ok_or_else(|| ApiError::Internal("Missing YOUTUBE_API_KEY".into()))
}

/// Newest uploads of the topic's channel, ranked against the query.
#[debug_handler]
pub async fn edu_search(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<Response> {
    let req: EduSearchRequest = parse_body(&body)?;
    let client = video_client(&state)?;
    let query = req.query.as_deref().map(str::trim).unwrap_or_default();
    let topic = VideoTopic::for_channel_search(req.topic.as_deref());

    let found = client
        .search_channel(
            state.channels.channel(topic),
            Some(query).filter(|q| !q.is_empty()),
            CHANNEL_SEARCH_RESULTS,
        )
        .await?;
    let items = rank(found, query);
    tracing::info!(?topic, query, results = items.len(), "edu search");

    Ok((
        [(CACHE_CONTROL, "no-store")],
        Json(EduSearchResponse { items }),
    )
        .into_response())
}

/// One page of the topic's uploads playlist. Titles must contain every query
/// word; ids the client already shows are dropped, as are repeats within the page.
#[debug_handler]
pub async fn uploads_search(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<Response> {
    // A malformed body browses the default playlist rather than failing.
    let req: UploadsRequest = parse_body(&body).unwrap_or_default();
    let client = video_client(&state)?;
    let query = req.query.as_deref().map(str::trim).unwrap_or_default();
    let topic = VideoTopic::for_uploads(req.topic.as_deref());

    let page = client
        .playlist_page(
            state.channels.uploads(topic),
            req.page_token.as_deref(),
            PLAYLIST_PAGE_SIZE,
        )
        .await?;
    let fetched = page.items.len();
    let matching: Vec<_> = page
        .items
        .into_iter()
        .filter(|item| matches_exact_words(&item.title, query))
        .collect();
    let mut seen: SeenIds = req.seen_ids.into_iter().collect();
    let items = seen.retain_unseen(rank(matching, query));
    tracing::info!(?topic, query, fetched, returned = items.len(), "uploads search");

    Ok((
        [(CACHE_CONTROL, UPLOADS_CACHE)],
        Json(UploadsResponse {
            items,
            next_page_token: page.next_page_token,
        }),
    )
        .into_response())
}

/// Bare `OPTIONS` without CORS preflight headers.
pub async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uploads_request_reads_camel_case() {
        let req: UploadsRequest = serde_json::from_str(
            r#"{"topic":"other","query":"dry eye","pageToken":"P2","seenIds":["a","b"]}"#,
        )
        .unwrap();
        assert_eq!(req.page_token.as_deref(), Some("P2"));
        assert_eq!(req.seen_ids, vec!["a", "b"]);
    }

    #[test]
    fn uploads_response_writes_null_token() {
        let v = serde_json::to_value(UploadsResponse {
            items: vec![],
            next_page_token: None,
        })
        .unwrap();
        assert!(v["nextPageToken"].is_null());
    }
}
