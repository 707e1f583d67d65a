//! Failure classes reported to the command line.

/// Coarse failure class used for reporting and exit codes.
///
/// # Examples
///
/// ```
/// use annals_error::ErrorClass;
///
/// assert_eq!(ErrorClass::NotFound.exit_code(), 7);
/// assert_eq!(ErrorClass::QuotaExceeded.to_string(), "QuotaExceeded");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
pub enum ErrorClass {
    /// Bad chapter number, malformed config or plan, bad template
    InvalidArgument,
    /// API key missing or rejected by the provider
    #[strum(serialize = "AuthenticationError")]
    Authentication,
    /// Provider refused the request for quota or balance reasons
    QuotaExceeded,
    /// Connection failure or timeout
    #[strum(serialize = "NetworkError")]
    Network,
    /// Non-2xx response or malformed response body
    #[strum(serialize = "UpstreamError")]
    Upstream,
    /// No chapter left to generate
    NotFound,
    /// Local filesystem failure
    #[strum(serialize = "IoError")]
    Io,
}

impl ErrorClass {
    /// Process exit code for this class. Always non-zero.
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorClass::Io => 1,
            ErrorClass::InvalidArgument => 2,
            ErrorClass::Authentication => 3,
            ErrorClass::QuotaExceeded => 4,
            ErrorClass::Network => 5,
            ErrorClass::Upstream => 6,
            ErrorClass::NotFound => 7,
        }
    }
}
