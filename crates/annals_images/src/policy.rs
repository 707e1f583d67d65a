//! Image acceptance policy.

use annals_core::{FetchedImage, ImageCandidate, ImageSettings};
use derive_getters::Getters;
use derive_setters::Setters;

/// Which search hits and downloads are good enough to use.
///
/// Candidates are screened on their reported dimensions before download;
/// downloads are screened on content type and size. A dimension the search
/// backend did not report (or reported as 0) is not held against the
/// candidate.
///
/// # Examples
///
/// ```
/// use annals_core::{FetchedImage, ImageCandidate};
/// use annals_images::ImagePolicy;
///
/// let policy = ImagePolicy::default().with_min_bytes(4);
///
/// let small = ImageCandidate::new("https://img/1.jpg").with_dimensions(Some(64), Some(64));
/// let large = ImageCandidate::new("https://img/2.jpg").with_dimensions(Some(800), Some(600));
/// assert!(!policy.accepts_candidate(&small));
/// assert!(policy.accepts_candidate(&large));
///
/// let html = FetchedImage::new(b"<html></html>".to_vec(), "text/html");
/// assert!(policy.check_download(&html).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters)]
#[setters(prefix = "with_")]
pub struct ImagePolicy {
    /// Minimum reported width in pixels
    min_width: u32,
    /// Minimum reported height in pixels
    min_height: u32,
    /// Minimum body size in bytes (an empty body is always rejected)
    min_bytes: u64,
    /// Accepted content types, lowercase
    allowed_content_types: Vec<String>,
    /// Candidates tried per placeholder
    max_candidates: usize,
}

impl Default for ImagePolicy {
    fn default() -> Self {
        Self::from_settings(&ImageSettings::default())
    }
}

impl ImagePolicy {
    /// Builds the policy from the `[images]` settings.
    pub fn from_settings(settings: &ImageSettings) -> Self {
        Self {
            min_width: *settings.min_width(),
            min_height: *settings.min_height(),
            min_bytes: *settings.min_bytes(),
            allowed_content_types: settings
                .allowed_content_types()
                .iter()
                .map(|t| t.trim().to_ascii_lowercase())
                .collect(),
            max_candidates: *settings.max_candidates(),
        }
    }

    /// Whether a search hit is worth downloading.
    pub fn accepts_candidate(&self, candidate: &ImageCandidate) -> bool {
        if candidate.url().trim().is_empty() {
            return false;
        }
        let wide_enough = (*candidate.width())
            .is_none_or(|w| w == 0 || w >= self.min_width);
        let tall_enough = (*candidate.height())
            .is_none_or(|h| h == 0 || h >= self.min_height);
        wide_enough && tall_enough
    }

    /// Checks a downloaded body, returning the rejection reason.
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason when the content type is not an
    /// allowed image type or the body is too small.
    pub fn check_download(&self, image: &FetchedImage) -> Result<(), String> {
        let content_type = image.content_type();
        if !content_type.starts_with("image/") {
            return Err(format!("not an image (Content-Type: {})", content_type));
        }
        if !self.allowed_content_types.is_empty()
            && !self.allowed_content_types.iter().any(|t| t == content_type)
        {
            return Err(format!("content type {} not allowed", content_type));
        }
        if image.extension().is_none() {
            return Err(format!("no file extension for {}", content_type));
        }
        if image.is_empty() {
            return Err("empty body".to_string());
        }
        if (image.len() as u64) < self.min_bytes {
            return Err(format!(
                "{} bytes is below the {} byte minimum",
                image.len(),
                self.min_bytes
            ));
        }
        Ok(())
    }
}
