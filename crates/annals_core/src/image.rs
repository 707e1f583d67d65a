//! Image search and download types.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// A search hit, before anything is downloaded.
///
/// Dimensions and format are whatever the search backend reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ImageCandidate {
    /// Direct image URL
    url: String,
    /// Reported width in pixels
    width: Option<u32>,
    /// Reported height in pixels
    height: Option<u32>,
    /// Reported format, e.g. `jpeg`
    format: Option<String>,
}

impl ImageCandidate {
    /// Creates a candidate with no metadata.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            width: None,
            height: None,
            format: None,
        }
    }

    /// Sets reported dimensions.
    pub fn with_dimensions(mut self, width: Option<u32>, height: Option<u32>) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Sets reported format.
    pub fn with_format(mut self, format: Option<String>) -> Self {
        self.format = format;
        self
    }
}

/// Downloaded image bytes.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct FetchedImage {
    /// Raw body
    bytes: Vec<u8>,
    /// `Content-Type` without parameters, lowercased
    content_type: String,
}

impl FetchedImage {
    /// Creates a fetched image, normalizing the content type.
    ///
    /// # Examples
    ///
    /// ```
    /// use annals_core::FetchedImage;
    ///
    /// let image = FetchedImage::new(vec![0xff, 0xd8], "Image/JPEG; charset=binary");
    /// assert_eq!(image.content_type(), "image/jpeg");
    /// assert_eq!(image.extension(), Some("jpg"));
    /// ```
    pub fn new(bytes: Vec<u8>, content_type: impl AsRef<str>) -> Self {
        let content_type = content_type
            .as_ref()
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        Self {
            bytes,
            content_type,
        }
    }

    /// Size of the body.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the body is empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// File extension for the content type, when it is a known image type.
    pub fn extension(&self) -> Option<&'static str> {
        match self.content_type.as_str() {
            "image/jpeg" | "image/jpg" | "image/pjpeg" => Some("jpg"),
            "image/png" => Some("png"),
            "image/gif" => Some("gif"),
            "image/webp" => Some("webp"),
            _ => None,
        }
    }

    /// Consumes the image, returning the body.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}
