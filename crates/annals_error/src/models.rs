//! LLM provider errors.

use crate::ErrorClass;

/// LLM client error conditions.
///
/// None of these are retried; they surface to the caller as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ModelsErrorKind {
    /// API key environment variable unset or empty
    #[display("API key not found in environment variable {}", _0)]
    MissingApiKey(String),
    /// Provider rejected the credentials (401/403)
    #[display("Authentication failed (HTTP {}): {}", status, message)]
    Authentication {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },
    /// Provider refused for quota, rate or balance reasons (402/429)
    #[display("Quota exceeded (HTTP {}): {}", status, message)]
    QuotaExceeded {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },
    /// Connection failure
    #[display("Network error: {}", _0)]
    Network(String),
    /// Request timed out
    #[display("Request timed out: {}", _0)]
    Timeout(String),
    /// Any other non-2xx response
    #[display("Upstream error (HTTP {}): {}", status, message)]
    Upstream {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },
    /// 2xx response whose body could not be used
    #[display("Malformed response: {}", _0)]
    MalformedResponse(String),
    /// Request could not be built (bad base URL, bad header value)
    #[display("Invalid request: {}", _0)]
    InvalidRequest(String),
    /// HTTP client could not be created
    #[display("Failed to create HTTP client: {}", _0)]
    ClientCreation(String),
}

impl ModelsErrorKind {
    /// Failure class of this condition.
    pub fn class(&self) -> ErrorClass {
        match self {
            ModelsErrorKind::MissingApiKey(_) | ModelsErrorKind::Authentication { .. } => {
                ErrorClass::Authentication
            }
            ModelsErrorKind::QuotaExceeded { .. } => ErrorClass::QuotaExceeded,
            ModelsErrorKind::Network(_) | ModelsErrorKind::Timeout(_) => ErrorClass::Network,
            ModelsErrorKind::Upstream { .. } | ModelsErrorKind::MalformedResponse(_) => {
                ErrorClass::Upstream
            }
            ModelsErrorKind::InvalidRequest(_) | ModelsErrorKind::ClientCreation(_) => {
                ErrorClass::InvalidArgument
            }
        }
    }
}

/// Model provider error with location tracking.
///
/// # Examples
///
/// ```
/// use annals_error::{ErrorClass, ModelsError, ModelsErrorKind};
///
/// let err = ModelsError::new(ModelsErrorKind::MissingApiKey("DEEPSEEK_API_KEY".into()));
/// assert!(format!("{}", err).contains("DEEPSEEK_API_KEY"));
/// assert_eq!(err.kind.class(), ErrorClass::Authentication);
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Models Error: {} at {}:{}", kind, file, line)]
pub struct ModelsError {
    /// The specific error kind
    pub kind: ModelsErrorKind,
    /// Line number where error occurred
    pub line: u32,
    /// Source file where error occurred
    pub file: &'static str,
}

impl ModelsError {
    /// Create a new models error.
    #[track_caller]
    pub fn new(kind: ModelsErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Result type for model operations.
pub type ModelsResult<T> = Result<T, ModelsError>;
