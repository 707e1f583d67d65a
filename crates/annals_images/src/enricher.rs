//! Placeholder resolution.

use crate::{BaiduImageSearcher, ImagePolicy, Placeholder, extract_placeholders};
use annals_core::{ChapterImage, ChapterSpec, ImageSettings, ImageSource, chapter_dir_name};
use annals_error::{ImageError, ImageErrorKind, ImageResult};
use annals_interface::{ImageFetch, ImageSearch};
use derive_getters::Getters;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Result of enriching one chapter.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Enrichment {
    /// Text with resolved placeholders replaced
    markdown: String,
    /// Downloaded images, in placeholder order
    images: Vec<ChapterImage>,
    /// Placeholders replaced
    resolved: usize,
    /// Placeholders left as written
    skipped: usize,
}

impl Enrichment {
    fn unchanged(markdown: &str) -> Self {
        Self {
            markdown: markdown.to_string(),
            images: Vec::new(),
            resolved: 0,
            skipped: 0,
        }
    }

    /// Splits into text and images.
    pub fn into_parts(self) -> (String, Vec<ChapterImage>) {
        (self.markdown, self.images)
    }
}

/// Resolves image placeholders in generated chapter text.
///
/// Placeholders are handled one at a time in source order. A failed search or
/// download leaves that placeholder untouched and moves on; enrichment itself
/// never fails.
pub struct ImageEnricher {
    search: Arc<dyn ImageSearch>,
    fetch: Arc<dyn ImageFetch>,
    policy: ImagePolicy,
    enabled: bool,
    download: bool,
    image_dir: String,
}

impl std::fmt::Debug for ImageEnricher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageEnricher")
            .field("source", &self.search.source_name())
            .field("policy", &self.policy)
            .field("enabled", &self.enabled)
            .field("download", &self.download)
            .field("image_dir", &self.image_dir)
            .finish()
    }
}

impl ImageEnricher {
    /// Creates an enricher over explicit search and fetch backends.
    pub fn new(
        settings: &ImageSettings,
        search: Arc<dyn ImageSearch>,
        fetch: Arc<dyn ImageFetch>,
    ) -> Self {
        Self {
            search,
            fetch,
            policy: ImagePolicy::from_settings(settings),
            enabled: *settings.enabled(),
            download: *settings.download(),
            image_dir: settings.image_dir().clone(),
        }
    }

    /// Creates an enricher for the configured search source.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend's HTTP client cannot be built.
    pub fn from_settings(settings: &ImageSettings) -> ImageResult<Self> {
        match settings.search_source() {
            ImageSource::Baidu => {
                let baidu = Arc::new(BaiduImageSearcher::new()?);
                Ok(Self::new(settings, baidu.clone(), baidu))
            }
        }
    }

    /// Whether placeholders are resolved at all.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Replaces placeholders in `markdown` with image links.
    ///
    /// When disabled, or when there are no placeholders, the text comes back
    /// unchanged and no request is made.
    #[instrument(skip(self, chapter, markdown), fields(chapter = *chapter.number(), source = self.search.source_name()))]
    pub async fn enrich(&self, chapter: &ChapterSpec, markdown: &str) -> Enrichment {
        if !self.enabled {
            debug!("Image enrichment disabled; placeholders left verbatim");
            return Enrichment::unchanged(markdown);
        }

        let placeholders = extract_placeholders(markdown);
        if placeholders.is_empty() {
            debug!("No image placeholders found");
            return Enrichment::unchanged(markdown);
        }
        info!(count = placeholders.len(), "Resolving image placeholders");

        let mut text = String::with_capacity(markdown.len());
        let mut images = Vec::new();
        let mut resolved = 0;
        let mut cursor = 0;

        for placeholder in &placeholders {
            text.push_str(&markdown[cursor..placeholder.span().start]);
            let keyword = placeholder.search_keyword(chapter.keywords());

            match self.resolve(*chapter.number(), placeholder, &keyword).await {
                Ok((link, image)) => {
                    debug!(index = placeholder.index(), keyword = %keyword, link = %link, "Placeholder resolved");
                    text.push_str(&link);
                    images.extend(image);
                    resolved += 1;
                }
                Err(e) => {
                    warn!(
                        index = placeholder.index(),
                        keyword = %keyword,
                        error = %e,
                        "Image placeholder left unresolved"
                    );
                    text.push_str(placeholder.raw());
                }
            }
            cursor = placeholder.span().end;
        }
        text.push_str(&markdown[cursor..]);

        let skipped = placeholders.len() - resolved;
        info!(resolved, skipped, "Image placeholders processed");

        Enrichment {
            markdown: text,
            images,
            resolved,
            skipped,
        }
    }

    async fn resolve(
        &self,
        chapter: u32,
        placeholder: &Placeholder,
        keyword: &str,
    ) -> ImageResult<(String, Option<ChapterImage>)> {
        let limit = *self.policy.max_candidates();
        let candidates: Vec<_> = self
            .search
            .search(keyword, limit)
            .await?
            .into_iter()
            .filter(|c| self.policy.accepts_candidate(c))
            .take(limit)
            .collect();

        if candidates.is_empty() {
            return Err(ImageError::new(ImageErrorKind::NoAcceptableImage(
                keyword.to_string(),
            )));
        }

        if !self.download {
            let url = candidates[0].url();
            return Ok((format!("![{}]({})", keyword, url), None));
        }

        let mut last_error = None;
        for candidate in &candidates {
            let image = match self.fetch.fetch(candidate.url()).await {
                Ok(image) => image,
                Err(e) => {
                    debug!(url = %candidate.url(), error = %e, "Candidate download failed");
                    last_error = Some(e);
                    continue;
                }
            };

            if let Err(reason) = self.policy.check_download(&image) {
                debug!(url = %candidate.url(), reason = %reason, "Candidate rejected");
                last_error = Some(ImageError::new(ImageErrorKind::Rejected {
                    url: candidate.url().clone(),
                    reason,
                }));
                continue;
            }

            let extension = image.extension().unwrap_or("jpg");
            let file_name = format!(
                "{}_image_{}.{}",
                chapter_dir_name(chapter),
                placeholder.index(),
                extension
            );
            let link_path = format!("{}/{}", self.image_dir.trim_end_matches('/'), file_name);
            let local_path = PathBuf::from(&self.image_dir).join(&file_name);

            return Ok((
                format!("![{}]({})", keyword, link_path),
                Some(ChapterImage::new(
                    local_path,
                    candidate.url().clone(),
                    keyword,
                    image.into_bytes(),
                )),
            ));
        }

        Err(last_error.unwrap_or_else(|| {
            ImageError::new(ImageErrorKind::NoAcceptableImage(keyword.to_string()))
        }))
    }
}
