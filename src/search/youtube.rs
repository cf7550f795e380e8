//! YouTube Data API search client

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::config::SearchConfig;

/// Errors from the upstream search call
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("upstream returned HTTP {status}")]
    Upstream { status: u16, body: Option<String> },
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("malformed upstream response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid search endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
}

/// Reduced search hit returned to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
}

// Upstream response shape (only the fields we read)

#[derive(Debug, Deserialize)]
struct SearchListResponse {
    #[serde(default)]
    items: Option<Vec<SearchItem>>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: ItemId,
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
struct ItemId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    title: Option<String>,
    #[serde(rename = "channelTitle")]
    channel_title: Option<String>,
    #[serde(default)]
    thumbnails: Option<Thumbnails>,
}

#[derive(Debug, Deserialize)]
struct Thumbnails {
    medium: Option<Thumbnail>,
    default: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: Option<String>,
}

impl From<SearchItem> for VideoSummary {
    fn from(item: SearchItem) -> Self {
        let thumbnail = item.snippet.thumbnails.and_then(|t| {
            let medium = t.medium.and_then(|m| m.url).filter(|u| !u.is_empty());
            medium.or_else(|| t.default.and_then(|d| d.url).filter(|u| !u.is_empty()))
        });
        Self {
            id: item.id.video_id,
            title: item.snippet.title,
            channel: item.snippet.channel_title,
            thumbnail,
        }
    }
}

/// Parse an upstream success body into summaries
pub fn parse_search_response(body: &str) -> Result<Vec<VideoSummary>, SearchError> {
    let response: SearchListResponse = serde_json::from_str(body)?;
    Ok(response
        .items
        .unwrap_or_default()
        .into_iter()
        .map(VideoSummary::from)
        .collect())
}

/// Client for the YouTube search endpoint
#[derive(Debug, Clone)]
pub struct YouTubeSearch {
    client: reqwest::Client,
    endpoint: Url,
    max_results: u32,
}

impl YouTubeSearch {
    pub fn new(config: &SearchConfig) -> Result<Self, SearchError> {
        let endpoint = Url::parse(&config.endpoint)?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("mediashelf/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            endpoint,
            max_results: config.max_results,
        })
    }

    /// Full request URL with query and key percent-encoded
    pub fn request_url(&self, query: &str, api_key: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("part", "snippet")
            .append_pair("type", "video")
            .append_pair("maxResults", &self.max_results.to_string())
            .append_pair("q", query)
            .append_pair("key", api_key);
        url
    }

    /// Run a search
    pub async fn search(&self, query: &str, api_key: &str) -> Result<Vec<VideoSummary>, SearchError> {
        let url = self.request_url(query, api_key);
        debug!("YouTube search: q={}", query);

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.ok();
            return Err(SearchError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        parse_search_response(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> YouTubeSearch {
        YouTubeSearch::new(&SearchConfig::default()).unwrap()
    }

    #[test]
    fn request_url_encodes_query_and_key() {
        let url = client().request_url("lo-fi & chill", "k/ey+1");
        assert_eq!(url.host_str(), Some("www.googleapis.com"));
        assert_eq!(url.path(), "/youtube/v3/search");
        assert_eq!(
            url.query(),
            Some("part=snippet&type=video&maxResults=8&q=lo-fi+%26+chill&key=k%2Fey%2B1")
        );
    }

    #[test]
    fn reshapes_items_preferring_medium_thumbnail() {
        let body = r#"{
            "kind": "youtube#searchListResponse",
            "items": [
                {
                    "id": {"kind": "youtube#video", "videoId": "abc123"},
                    "snippet": {
                        "title": "Rust in 100 seconds",
                        "channelTitle": "Fireship",
                        "thumbnails": {
                            "default": {"url": "https://i.ytimg.com/vi/abc123/default.jpg"},
                            "medium": {"url": "https://i.ytimg.com/vi/abc123/mqdefault.jpg"}
                        }
                    }
                },
                {
                    "id": {"videoId": "def456"},
                    "snippet": {
                        "title": "Only default",
                        "channelTitle": "Someone",
                        "thumbnails": {"default": {"url": "https://i.ytimg.com/vi/def456/default.jpg"}}
                    }
                }
            ]
        }"#;

        let items = parse_search_response(body).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(
            items[0],
            VideoSummary {
                id: Some("abc123".to_string()),
                title: Some("Rust in 100 seconds".to_string()),
                channel: Some("Fireship".to_string()),
                thumbnail: Some("https://i.ytimg.com/vi/abc123/mqdefault.jpg".to_string()),
            }
        );
        assert_eq!(
            items[1].thumbnail.as_deref(),
            Some("https://i.ytimg.com/vi/def456/default.jpg")
        );
    }

    #[test]
    fn missing_thumbnails_are_omitted() {
        let body = r#"{"items": [{"id": {"videoId": "x"}, "snippet": {"title": "t", "channelTitle": "c"}}]}"#;
        let items = parse_search_response(body).unwrap();
        assert_eq!(items[0].thumbnail, None);

        let json = serde_json::to_value(&items[0]).unwrap();
        assert!(json.get("thumbnail").is_none());
    }

    #[test]
    fn missing_items_means_no_results() {
        assert!(parse_search_response("{}").unwrap().is_empty());
        assert!(parse_search_response(r#"{"items": null}"#).unwrap().is_empty());
    }

    #[test]
    fn malformed_body_is_a_decode_error() {
        assert!(matches!(
            parse_search_response("<html>"),
            Err(SearchError::Decode(_))
        ));
        assert!(matches!(
            parse_search_response(r#"{"items": [{"id": {"videoId": "x"}}]}"#),
            Err(SearchError::Decode(_))
        ));
    }
}
