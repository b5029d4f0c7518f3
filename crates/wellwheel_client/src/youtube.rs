//! YouTube Data API v3 client.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use wellwheel_core::SearchResultItem;
use wellwheel_core::ranking::{is_placeholder_title, watch_url};

use crate::http_client::{build_http, execute_json};
use crate::{ClientError, VideoPage, VideoSearchClient};

const SERVICE: &str = "youtube";

/// Which curated source a search targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VideoTopic {
    Vision,
    Other,
}

impl VideoTopic {
    /// Channel search: anything but `"vision"` means the general channel.
    pub fn for_channel_search(topic: Option<&str>) -> Self {
        match topic {
            Some("vision") => VideoTopic::Vision,
            _ => VideoTopic::Other,
        }
    }

    /// Uploads browsing: anything but `"other"` means the vision playlist.
    pub fn for_uploads(topic: Option<&str>) -> Self {
        match topic {
            Some("other") => VideoTopic::Other,
            _ => VideoTopic::Vision,
        }
    }
}

/// Channel and uploads-playlist ids for both sources.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Channels {
    pub vision_channel: String,
    pub other_channel: String,
    pub vision_uploads: String,
    pub other_uploads: String,
}

impl Default for Channels {
    fn default() -> Self {
        Self {
            vision_channel: "UCxB-mlL9MoYZbw8B7vXZb3g".into(),
            other_channel: "UCN2pD4zVw3u3qcsqY1o7JhA".into(),
            vision_uploads: "UUU1eFGW-UcdUhg3DlTafLOg".into(),
            other_uploads: "UUoquIFLN9kHo2HNKb5JSoqA".into(),
        }
    }
}

impl Channels {
    pub fn channel(&self, topic: VideoTopic) -> &str {
        match topic {
            VideoTopic::Vision => &self.vision_channel,
            VideoTopic::Other => &self.other_channel,
        }
    }

    pub fn uploads(&self, topic: VideoTopic) -> &str {
        match topic {
            VideoTopic::Vision => &self.vision_uploads,
            VideoTopic::Other => &self.other_uploads,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct Thumb {
    #[serde(default)]
    url: String,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    high: Option<Thumb>,
    medium: Option<Thumb>,
    default: Option<Thumb>,
}

impl Thumbnails {
    fn best(&self) -> String {
        [&self.high, &self.medium, &self.default]
            .into_iter()
            .flatten()
            .map(|t| t.url.as_str())
            .find(|u| !u.is_empty())
            .unwrap_or_default()
            .to_string()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceId {
    video_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    #[serde(default)]
    title: String,
    published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    thumbnails: Thumbnails,
    resource_id: Option<ResourceId>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchId {
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchEntry {
    #[serde(default)]
    id: SearchId,
    #[serde(default)]
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchEntry>,
}

#[derive(Debug, Deserialize)]
struct PlaylistEntry {
    #[serde(default)]
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistResponse {
    #[serde(default)]
    items: Vec<PlaylistEntry>,
    next_page_token: Option<String>,
}

fn to_item(video_id: Option<String>, snippet: Snippet) -> Option<SearchResultItem> {
    let id = video_id.filter(|v| !v.is_empty())?;
    if snippet.title.is_empty() {
        return None;
    }
    Some(SearchResultItem {
        url: watch_url(&id),
        thumbnail: snippet.thumbnails.best(),
        id,
        title: snippet.title,
        published_at: snippet.published_at,
    })
}

#[derive(Clone, Debug)]
pub struct ReqwestYoutubeClient {
    base_url: String,
    api_key: SecretString,
    client: reqwest::Client,
}

impl ReqwestYoutubeClient {
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

    fn get_request(&self, endpoint: &str) -> reqwest::RequestBuilder {
        self.client
            .get(format!("{}/{endpoint}", self.base_url))
            .query(&[("key", self.api_key.expose_secret())])
    }
}

#[async_trait]
impl VideoSearchClient for ReqwestYoutubeClient {
    async fn search_channel(
        &self,
        channel_id: &str,
        query: Option<&str>,
        max_results: u32,
    ) -> Result<Vec<SearchResultItem>, ClientError> {
        let mut qp: Vec<(&str, String)> = vec![
            ("channelId", channel_id.to_string()),
            ("part", "snippet".into()),
            ("maxResults", max_results.to_string()),
            ("order", "date".into()),
            ("type", "video".into()),
        ];
        if let Some(q) = query.map(str::trim).filter(|q| !q.is_empty()) {
            qp.push(("q", q.to_string()));
        }
        tracing::debug!(channel_id, ?query, "youtube channel search");
        let resp: SearchResponse = execute_json(
            SERVICE,
            self.get_request("search").query(&qp),
            "Failed to fetch",
        )
        .await?;
        Ok(resp
            .items
            .into_iter()
            .filter_map(|e| to_item(e.id.video_id, e.snippet))
            .collect())
    }

    async fn playlist_page(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
        max_results: u32,
    ) -> Result<VideoPage, ClientError> {
        let mut qp: Vec<(&str, String)> = vec![
            ("part", "snippet".into()),
            ("maxResults", max_results.to_string()),
            ("playlistId", playlist_id.to_string()),
        ];
        if let Some(token) = page_token.filter(|t| !t.is_empty()) {
            qp.push(("pageToken", token.to_string()));
        }
        tracing::debug!(playlist_id, ?page_token, "youtube playlist page");
        let resp: PlaylistResponse = execute_json(
            SERVICE,
            self.get_request("playlistItems").query(&qp),
            "YouTube API error",
        )
        .await?;
        let items = resp
            .items
            .into_iter()
            .filter(|e| !is_placeholder_title(&e.snippet.title))
            .filter_map(|e| {
                let vid = e.snippet.resource_id.as_ref().and_then(|r| r.video_id.clone());
                to_item(vid, e.snippet)
            })
            .collect();
        Ok(VideoPage {
            items,
            next_page_token: resp.next_page_token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_defaults_differ_per_endpoint() {
        assert_eq!(VideoTopic::for_channel_search(Some("vision")), VideoTopic::Vision);
        assert_eq!(VideoTopic::for_channel_search(None), VideoTopic::Other);
        assert_eq!(VideoTopic::for_uploads(None), VideoTopic::Vision);
        assert_eq!(VideoTopic::for_uploads(Some("other")), VideoTopic::Other);
    }

    #[test]
    fn thumbnail_falls_back_through_sizes() {
        let t = Thumbnails {
            high: None,
            medium: Some(Thumb { url: String::new() }),
            default: Some(Thumb { url: "d.jpg".into() }),
        };
        assert_eq!(t.best(), "d.jpg");
        assert_eq!(Thumbnails::default().best(), "");
    }
}
