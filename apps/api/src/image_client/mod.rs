//! Image Lookup — single-shot Unsplash search for one landscape photo.
//!
//! Contract: `search` returns `Some(ImageResult)` for the top-ranked match and
//! `None` for an empty result set OR any failure. Callers cannot distinguish
//! "provider down" from "no match"; both degrade to a caption-only result.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const UNSPLASH_SEARCH_URL: &str = "https://api.unsplash.com/search/photos";

/// Queries are scoped to the domain by prefixing the topic.
const QUERY_PREFIX: &str = "palm";

const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Attribution and display data for one matched photo.
#[derive(Debug, Clone, Serialize)]
pub struct ImageResult {
    pub url: String,
    pub thumb_url: String,
    pub photographer: String,
    pub photographer_url: String,
    pub download_url: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types (search/photos response)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
struct Photo {
    urls: PhotoUrls,
    user: PhotoUser,
    links: PhotoLinks,
}

#[derive(Debug, Deserialize)]
struct PhotoUrls {
    regular: String,
    thumb: String,
}

#[derive(Debug, Deserialize)]
struct PhotoUser {
    name: String,
    links: UserLinks,
}

#[derive(Debug, Deserialize)]
struct UserLinks {
    html: String,
}

#[derive(Debug, Deserialize)]
struct PhotoLinks {
    download: String,
}

impl SearchResponse {
    fn into_top_result(self) -> Option<ImageResult> {
        self.results.into_iter().next().map(|photo| ImageResult {
            url: photo.urls.regular,
            thumb_url: photo.urls.thumb,
            photographer: photo.user.name,
            photographer_url: photo.user.links.html,
            download_url: photo.links.download,
        })
    }
}

/// Unsplash search client. One request per lookup, no retry, no caching.
#[derive(Clone, Debug)]
pub struct ImageClient {
    client: Client,
    access_key: String,
}

impl ImageClient {
    pub fn new(access_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            access_key,
        }
    }

    /// Returns the best landscape match for the topic, or `None`.
    /// Failures are logged and folded into `None`.
    pub async fn search(&self, topic: &str) -> Option<ImageResult> {
        match self.try_search(topic).await {
            Ok(result) => result,
            Err(e) => {
                warn!("Image lookup failed for '{topic}': {e}");
                None
            }
        }
    }

    async fn try_search(&self, topic: &str) -> Result<Option<ImageResult>, reqwest::Error> {
        let response = self
            .client
            .get(UNSPLASH_SEARCH_URL)
            .header("Authorization", format!("Client-ID {}", self.access_key))
            .query(&[
                ("query", format!("{QUERY_PREFIX} {topic}").as_str()),
                ("per_page", "1"),
                ("orientation", "landscape"),
            ])
            .send()
            .await?
            .error_for_status()?;

        let parsed: SearchResponse = response.json().await?;
        debug!("Image search for '{topic}': {} result(s)", parsed.results.len());

        Ok(parsed.into_top_result())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RESPONSE: &str = r#"{
        "total": 1,
        "total_pages": 1,
        "results": [
            {
                "id": "abc123",
                "urls": {
                    "regular": "https://images.unsplash.com/photo-1?w=1080",
                    "thumb": "https://images.unsplash.com/photo-1?w=200"
                },
                "user": {
                    "name": "A. Photographer",
                    "links": {"html": "https://unsplash.com/@aphotographer"}
                },
                "links": {"download": "https://unsplash.com/photos/abc123/download"}
            }
        ]
    }"#;

    #[test]
    fn test_decode_search_response_top_result() {
        let parsed: SearchResponse = serde_json::from_str(SAMPLE_RESPONSE).unwrap();
        let result = parsed.into_top_result().unwrap();
        assert_eq!(result.url, "https://images.unsplash.com/photo-1?w=1080");
        assert_eq!(result.thumb_url, "https://images.unsplash.com/photo-1?w=200");
        assert_eq!(result.photographer, "A. Photographer");
        assert_eq!(result.photographer_url, "https://unsplash.com/@aphotographer");
        assert_eq!(
            result.download_url,
            "https://unsplash.com/photos/abc123/download"
        );
    }

    #[test]
    fn test_decode_empty_results_is_absence() {
        let body = r#"{"total": 0, "total_pages": 0, "results": []}"#;
        let parsed: SearchResponse = serde_json::from_str(body).unwrap();
        assert!(parsed.into_top_result().is_none());
    }

    #[test]
    fn test_decode_missing_results_field_is_absence() {
        let parsed: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.into_top_result().is_none());
    }
}
