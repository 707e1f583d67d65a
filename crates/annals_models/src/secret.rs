//! API key handling.

use annals_error::{ModelsError, ModelsErrorKind, ModelsResult};
use annals_interface::SecretSource;
use std::fmt;
use tracing::debug;

/// Secrets read from the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl SecretSource for ProcessEnv {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// A provider API key. Never printed.
///
/// # Examples
///
/// ```
/// use annals_models::ApiKey;
/// use std::collections::HashMap;
///
/// let mut env = HashMap::new();
/// env.insert("DEEPSEEK_API_KEY".to_string(), "sk-secret".to_string());
///
/// let key = ApiKey::resolve("DEEPSEEK_API_KEY", &env).unwrap();
/// assert_eq!(key.expose(), "sk-secret");
/// assert!(!format!("{:?}", key).contains("secret"));
///
/// assert!(ApiKey::resolve("OTHER_KEY", &env).is_err());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wraps a key value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Reads the key named `var` from `source`.
    ///
    /// # Errors
    ///
    /// Returns `MissingApiKey` when the variable is unset or blank.
    pub fn resolve(var: &str, source: &dyn SecretSource) -> ModelsResult<Self> {
        match source.get(var) {
            Some(value) if !value.trim().is_empty() => {
                debug!(var, "API key resolved");
                Ok(Self(value.trim().to_string()))
            }
            _ => Err(ModelsError::new(ModelsErrorKind::MissingApiKey(
                var.to_string(),
            ))),
        }
    }

    /// The raw key, for the `Authorization` header.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}
