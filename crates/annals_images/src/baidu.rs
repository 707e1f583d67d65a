//! Baidu image search backend.

use annals_core::{FetchedImage, ImageCandidate};
use annals_error::{ImageError, ImageErrorKind, ImageResult};
use annals_interface::{ImageFetch, ImageSearch};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Baidu's JSON image search endpoint.
pub const BAIDU_ENDPOINT: &str = "https://image.baidu.com/search/acjson";

const SEARCH_TIMEOUT: Duration = Duration::from_secs(15);
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const REFERER: &str = "https://image.baidu.com/";

/// Searches and downloads images through Baidu image search.
///
/// Baidu refuses requests that do not look like they came from its own
/// search page, so every request carries browser headers and a Baidu
/// `Referer`.
#[derive(Debug, Clone)]
pub struct BaiduImageSearcher {
    client: Client,
    endpoint: String,
}

impl BaiduImageSearcher {
    /// Creates a searcher for the public endpoint.
    ///
    /// # Errors
    ///
    /// Returns `ClientCreation` if the HTTP client cannot be built.
    pub fn new() -> ImageResult<Self> {
        Self::with_endpoint(BAIDU_ENDPOINT)
    }

    /// Creates a searcher against another endpoint speaking the same format.
    ///
    /// # Errors
    ///
    /// Returns `ClientCreation` if the HTTP client cannot be built.
    pub fn with_endpoint(endpoint: impl Into<String>) -> ImageResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("application/json, text/javascript, */*; q=0.01"),
        );
        headers.insert(
            header::ACCEPT_LANGUAGE,
            HeaderValue::from_static("zh-CN,zh;q=0.9,en;q=0.8"),
        );
        headers.insert(header::REFERER, HeaderValue::from_static(REFERER));
        headers.insert(
            HeaderName::from_static("x-requested-with"),
            HeaderValue::from_static("XMLHttpRequest"),
        );

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(|e| ImageError::new(ImageErrorKind::ClientCreation(e.to_string())))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

fn as_u32(value: Option<&Value>) -> Option<u32> {
    match value? {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn non_empty_str<'a>(item: &'a Value, key: &str) -> Option<&'a str> {
    item.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Parses an `acjson` response body into candidates.
///
/// Baidu escapes single quotes as `\'`, which strict JSON rejects, so a
/// failed parse is retried with those unescaped.
pub(crate) fn parse_search_response(keyword: &str, body: &str) -> ImageResult<Vec<ImageCandidate>> {
    let value: Value = serde_json::from_str(body)
        .or_else(|_| serde_json::from_str(&body.replace("\\'", "'")))
        .map_err(|e| {
            ImageError::new(ImageErrorKind::SearchResponse {
                keyword: keyword.to_string(),
                message: format!("invalid JSON: {}", e),
            })
        })?;

    let data = value.get("data").and_then(Value::as_array).ok_or_else(|| {
        ImageError::new(ImageErrorKind::SearchResponse {
            keyword: keyword.to_string(),
            message: "no 'data' array in response".to_string(),
        })
    })?;

    Ok(data
        .iter()
        .filter_map(|item| {
            let url = non_empty_str(item, "middleURL").or_else(|| non_empty_str(item, "thumbURL"))?;
            Some(
                ImageCandidate::new(url)
                    .with_dimensions(as_u32(item.get("width")), as_u32(item.get("height")))
                    .with_format(non_empty_str(item, "type").map(str::to_string)),
            )
        })
        .collect())
}

#[async_trait]
impl ImageSearch for BaiduImageSearcher {
    #[instrument(skip(self), fields(source = "baidu"))]
    async fn search(&self, query: &str, limit: usize) -> ImageResult<Vec<ImageCandidate>> {
        let rn = limit.max(1).to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("tn", "resultjson_com"),
                ("word", query),
                ("pn", "0"),
                ("rn", rn.as_str()),
                ("ie", "utf-8"),
                ("oe", "utf-8"),
            ])
            .timeout(SEARCH_TIMEOUT)
            .send()
            .await
            .map_err(|e| {
                ImageError::new(ImageErrorKind::Search {
                    keyword: query.to_string(),
                    message: e.to_string(),
                })
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImageError::new(ImageErrorKind::Search {
                keyword: query.to_string(),
                message: format!("HTTP {}", status),
            }));
        }

        let body = response.text().await.map_err(|e| {
            ImageError::new(ImageErrorKind::Search {
                keyword: query.to_string(),
                message: e.to_string(),
            })
        })?;

        let mut candidates = parse_search_response(query, &body)?;
        candidates.truncate(limit);
        debug!(count = candidates.len(), "Search returned candidates");
        Ok(candidates)
    }

    fn source_name(&self) -> &'static str {
        "baidu"
    }
}

#[async_trait]
impl ImageFetch for BaiduImageSearcher {
    #[instrument(skip(self), fields(source = "baidu"))]
    async fn fetch(&self, url: &str) -> ImageResult<FetchedImage> {
        let download_error = |message: String| {
            ImageError::new(ImageErrorKind::Download {
                url: url.to_string(),
                message,
            })
        };

        let response = self
            .client
            .get(url)
            .timeout(DOWNLOAD_TIMEOUT)
            .send()
            .await
            .map_err(|e| download_error(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, "Image download refused");
            return Err(download_error(format!("HTTP {}", status)));
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| download_error(e.to_string()))?;

        debug!(bytes = bytes.len(), content_type = %content_type, "Image downloaded");
        Ok(FetchedImage::new(bytes.to_vec(), content_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_prefers_middle_url_and_skips_empty_items() {
        let body = r#"{"queryEnc":"x","data":[
            {"middleURL":"https://img0.baidu.com/1.jpg","thumbURL":"https://t/1.jpg","width":800,"height":"600","type":"jpg"},
            {"thumbURL":"https://t/2.png","width":0,"height":0},
            {}
        ]}"#;
        let candidates = parse_search_response("管仲", body).unwrap();

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].url(), "https://img0.baidu.com/1.jpg");
        assert_eq!(*candidates[0].height(), Some(600));
        assert_eq!(candidates[0].format().as_deref(), Some("jpg"));
        assert_eq!(candidates[1].url(), "https://t/2.png");
    }

    #[test]
    fn test_parse_tolerates_escaped_single_quotes() {
        let body = r#"{"data":[{"middleURL":"https://img/1.jpg","fromPageTitleEnc":"It\'s"}]}"#;
        let candidates = parse_search_response("q", body).unwrap();
        assert_eq!(candidates.len(), 1);
    }

    #[test]
    fn test_parse_rejects_missing_data() {
        let err = parse_search_response("q", r#"{"antiFlag":1}"#).unwrap_err();
        assert!(matches!(err.kind, ImageErrorKind::SearchResponse { .. }));
    }
}
