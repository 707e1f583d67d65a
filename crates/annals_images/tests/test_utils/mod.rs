//! In-memory image backend for enricher tests.

use annals_core::{FetchedImage, ImageCandidate};
use annals_error::{ImageError, ImageErrorKind, ImageResult};
use annals_interface::{ImageFetch, ImageSearch};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Mock search + fetch backend.
///
/// Keywords without configured results fail the search; URLs without a
/// configured body fail the download.
#[derive(Clone, Default)]
pub struct MockImageBackend {
    results: HashMap<String, Vec<ImageCandidate>>,
    downloads: HashMap<String, FetchedImage>,
    queries: Arc<Mutex<Vec<String>>>,
    fetches: Arc<Mutex<Vec<String>>>,
}

impl MockImageBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Search for `keyword` returns these candidates.
    pub fn with_results(mut self, keyword: &str, candidates: Vec<ImageCandidate>) -> Self {
        self.results.insert(keyword.to_string(), candidates);
        self
    }

    /// Download of `url` returns this body.
    pub fn with_download(mut self, url: &str, image: FetchedImage) -> Self {
        self.downloads.insert(url.to_string(), image);
        self
    }

    /// Queries searched, in order.
    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    /// Number of search calls.
    pub fn search_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }

    /// Number of download calls.
    pub fn fetch_count(&self) -> usize {
        self.fetches.lock().unwrap().len()
    }
}

#[async_trait]
impl ImageSearch for MockImageBackend {
    async fn search(&self, query: &str, limit: usize) -> ImageResult<Vec<ImageCandidate>> {
        self.queries.lock().unwrap().push(query.to_string());
        match self.results.get(query) {
            Some(candidates) => Ok(candidates.iter().take(limit).cloned().collect()),
            None => Err(ImageError::new(ImageErrorKind::Search {
                keyword: query.to_string(),
                message: "mock search failure".to_string(),
            })),
        }
    }

    fn source_name(&self) -> &'static str {
        "mock"
    }
}

#[async_trait]
impl ImageFetch for MockImageBackend {
    async fn fetch(&self, url: &str) -> ImageResult<FetchedImage> {
        self.fetches.lock().unwrap().push(url.to_string());
        self.downloads.get(url).cloned().ok_or_else(|| {
            ImageError::new(ImageErrorKind::Download {
                url: url.to_string(),
                message: "mock download failure".to_string(),
            })
        })
    }
}

/// A candidate large enough for the default policy.
pub fn candidate(url: &str) -> ImageCandidate {
    ImageCandidate::new(url).with_dimensions(Some(800), Some(600))
}

/// A JPEG-typed body above the default size floor.
pub fn jpeg() -> FetchedImage {
    FetchedImage::new(vec![0xff; 4096], "image/jpeg")
}
