//! Top-level error wrapper types.

use crate::{
    ChapterError, ConfigError, ErrorClass, ImageError, ModelsError, StorageError,
};

/// Every error the workspace can surface.
///
/// # Examples
///
/// ```
/// use annals_error::{AnnalsError, ConfigError};
///
/// let err: AnnalsError = ConfigError::new("max_tokens must be positive").into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum AnnalsErrorKind {
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Plan, selection or prompt error
    #[from(ChapterError)]
    Chapter(ChapterError),
    /// LLM client error
    #[from(ModelsError)]
    Models(ModelsError),
    /// Image search/download error
    #[from(ImageError)]
    Image(ImageError),
    /// Filesystem error
    #[from(StorageError)]
    Storage(StorageError),
}

/// Annals error with kind discrimination.
///
/// # Examples
///
/// ```
/// use annals_error::{AnnalsResult, ErrorClass, ModelsError, ModelsErrorKind};
///
/// fn call() -> AnnalsResult<String> {
///     Err(ModelsError::new(ModelsErrorKind::Timeout("120s elapsed".into())))?
/// }
///
/// assert_eq!(call().unwrap_err().class(), ErrorClass::Network);
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Annals Error: {}", _0)]
pub struct AnnalsError(Box<AnnalsErrorKind>);

impl AnnalsError {
    /// Create a new error from a kind.
    pub fn new(kind: AnnalsErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &AnnalsErrorKind {
        &self.0
    }

    /// Failure class used for reporting and the exit code.
    pub fn class(&self) -> ErrorClass {
        match self.kind() {
            AnnalsErrorKind::Config(_) => ErrorClass::InvalidArgument,
            AnnalsErrorKind::Chapter(e) => e.kind.class(),
            AnnalsErrorKind::Models(e) => e.kind.class(),
            AnnalsErrorKind::Image(e) => e.kind.class(),
            AnnalsErrorKind::Storage(_) => ErrorClass::Io,
        }
    }
}

// Generic From implementation for any type that converts to AnnalsErrorKind
impl<T> From<T> for AnnalsError
where
    T: Into<AnnalsErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for annals operations.
pub type AnnalsResult<T> = std::result::Result<T, AnnalsError>;
