//! Trait definitions for LLM backends, image backends and secrets.

use annals_core::{FetchedImage, GenerateRequest, GenerateResponse, ImageCandidate};
use annals_error::{AnnalsResult, ImageResult};
use async_trait::async_trait;
use std::collections::HashMap;

/// Core trait that every LLM backend implements.
///
/// One call is one HTTP request. Implementations must not retry.
#[async_trait]
pub trait AnnalsDriver: Send + Sync {
    /// Generate text for a request.
    async fn generate(&self, req: &GenerateRequest) -> AnnalsResult<GenerateResponse>;

    /// Provider name (e.g., "deepseek", "openai").
    fn provider_name(&self) -> &'static str;

    /// Model identifier (e.g., "deepseek-chat").
    fn model_name(&self) -> &str;
}

/// Image search backend.
#[async_trait]
pub trait ImageSearch: Send + Sync {
    /// Return up to `limit` candidates for a query, best first.
    async fn search(&self, query: &str, limit: usize) -> ImageResult<Vec<ImageCandidate>>;

    /// Backend name for logs.
    fn source_name(&self) -> &'static str;
}

/// Image downloader.
#[async_trait]
pub trait ImageFetch: Send + Sync {
    /// Download an image body.
    async fn fetch(&self, url: &str) -> ImageResult<FetchedImage>;
}

/// Lookup for named secrets such as API keys.
pub trait SecretSource {
    /// Value of the named secret, if set.
    fn get(&self, name: &str) -> Option<String>;
}

impl SecretSource for HashMap<String, String> {
    fn get(&self, name: &str) -> Option<String> {
        HashMap::get(self, name).cloned()
    }
}
