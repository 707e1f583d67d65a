//! Image search and download errors.
//!
//! These are the only recoverable errors in the workspace: the enricher logs
//! them and leaves the placeholder untouched.

use crate::ErrorClass;

/// Image search/download error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ImageErrorKind {
    /// Search request failed to complete
    #[display("Image search request failed for '{}': {}", keyword, message)]
    Search {
        /// Search keyword
        keyword: String,
        /// Underlying message
        message: String,
    },
    /// Search response was not in the expected shape
    #[display("Unexpected search response for '{}': {}", keyword, message)]
    SearchResponse {
        /// Search keyword
        keyword: String,
        /// Underlying message
        message: String,
    },
    /// No candidate passed the acceptance policy
    #[display("No acceptable image for '{}'", _0)]
    NoAcceptableImage(String),
    /// Download request failed
    #[display("Failed to download {}: {}", url, message)]
    Download {
        /// Image URL
        url: String,
        /// Underlying message
        message: String,
    },
    /// Downloaded content rejected by the acceptance policy
    #[display("Rejected {}: {}", url, reason)]
    Rejected {
        /// Image URL
        url: String,
        /// Why it was rejected
        reason: String,
    },
    /// HTTP client could not be created
    #[display("Failed to create image HTTP client: {}", _0)]
    ClientCreation(String),
}

impl ImageErrorKind {
    /// Failure class of this condition.
    pub fn class(&self) -> ErrorClass {
        match self {
            ImageErrorKind::Search { .. } | ImageErrorKind::Download { .. } => ErrorClass::Network,
            ImageErrorKind::SearchResponse { .. } | ImageErrorKind::Rejected { .. } => {
                ErrorClass::Upstream
            }
            ImageErrorKind::NoAcceptableImage(_) => ErrorClass::NotFound,
            ImageErrorKind::ClientCreation(_) => ErrorClass::InvalidArgument,
        }
    }
}

/// Image error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Image Error: {} at line {} in {}", kind, line, file)]
pub struct ImageError {
    /// The kind of error that occurred
    pub kind: ImageErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ImageError {
    /// Create a new image error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ImageErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

/// Result type for image operations.
pub type ImageResult<T> = Result<T, ImageError>;
