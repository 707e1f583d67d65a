//! Generic client for OpenAI-compatible APIs.

use crate::ApiKey;
use crate::openai_compat::{ChatResponse, conversions};
use annals_core::{GenerateRequest, GenerateResponse};
use annals_error::{ModelsError, ModelsErrorKind, ModelsResult};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, error, instrument};

/// Longest response body kept in an error message.
const MAX_ERROR_BODY: usize = 500;

/// Maps a non-success HTTP status onto the error taxonomy.
///
/// # Examples
///
/// ```
/// use annals_error::{ErrorClass, ModelsErrorKind};
/// use annals_models::classify_status;
///
/// assert_eq!(classify_status(401, "bad key".into()).class(), ErrorClass::Authentication);
/// assert_eq!(classify_status(402, "balance".into()).class(), ErrorClass::QuotaExceeded);
/// assert_eq!(classify_status(503, "busy".into()).class(), ErrorClass::Upstream);
/// ```
pub fn classify_status(status: u16, message: String) -> ModelsErrorKind {
    match status {
        401 | 403 => ModelsErrorKind::Authentication { status, message },
        402 | 429 => ModelsErrorKind::QuotaExceeded { status, message },
        _ => ModelsErrorKind::Upstream { status, message },
    }
}

fn classify_transport(error: &reqwest::Error) -> ModelsErrorKind {
    if error.is_timeout() {
        ModelsErrorKind::Timeout(error.to_string())
    } else if error.is_builder() {
        ModelsErrorKind::InvalidRequest(error.to_string())
    } else {
        ModelsErrorKind::Network(error.to_string())
    }
}

fn truncate(body: &str) -> String {
    match body.char_indices().nth(MAX_ERROR_BODY) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

/// Generic client for any OpenAI-compatible API.
///
/// Sends exactly one request per [`generate`](Self::generate) call and
/// never retries.
#[derive(Debug, Clone)]
pub struct OpenAICompatibleClient {
    client: Client,
    api_key: ApiKey,
    model: String,
    endpoint: String,
    provider_name: &'static str,
}

impl OpenAICompatibleClient {
    /// Creates a new OpenAI-compatible client.
    ///
    /// # Arguments
    ///
    /// * `api_key` - API key for authentication
    /// * `model` - Default model identifier
    /// * `base_url` - API root; `/chat/completions` is appended
    /// * `provider_name` - Name of the provider (for logging/tracing)
    /// * `timeout` - Whole-request timeout; the reqwest default when `None`
    ///
    /// # Errors
    ///
    /// Returns `ClientCreation` if the HTTP client cannot be built.
    #[instrument(skip(api_key), fields(provider = provider_name, model = %model))]
    pub fn new(
        api_key: ApiKey,
        model: String,
        base_url: &str,
        provider_name: &'static str,
        timeout: Option<Duration>,
    ) -> ModelsResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ModelsError::new(ModelsErrorKind::ClientCreation(e.to_string())))?;

        let endpoint = format!("{}/chat/completions", base_url.trim_end_matches('/'));

        debug!(
            provider = provider_name,
            model = %model,
            url = %endpoint,
            timeout = ?timeout,
            "Created OpenAI-compatible client"
        );

        Ok(Self {
            client,
            api_key,
            model,
            endpoint,
            provider_name,
        })
    }

    /// Generates a response from the API.
    ///
    /// # Errors
    ///
    /// * `Authentication` for 401/403
    /// * `QuotaExceeded` for 402/429
    /// * `Upstream` for any other non-2xx status
    /// * `Timeout` or `Network` when no response arrives
    /// * `MalformedResponse` when a 2xx body has no usable text
    #[instrument(skip(self, req), fields(provider = self.provider_name, model = %self.model))]
    pub async fn generate(&self, req: &GenerateRequest) -> ModelsResult<GenerateResponse> {
        let chat_request = conversions::to_chat_request(req, &self.model)?;

        debug!(
            provider = self.provider_name,
            model = %chat_request.model(),
            message_count = chat_request.messages().len(),
            max_tokens = ?chat_request.max_tokens(),
            "Sending request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(self.api_key.expose())
            .json(&chat_request)
            .send()
            .await
            .map_err(|e| {
                error!(provider = self.provider_name, error = %e, "HTTP request failed");
                ModelsError::new(classify_transport(&e))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            error!(provider = self.provider_name, error = %e, "Failed to read response body");
            ModelsError::new(classify_transport(&e))
        })?;

        if !status.is_success() {
            error!(
                provider = self.provider_name,
                status = %status,
                error = %truncate(&body),
                "API error"
            );
            return Err(ModelsError::new(classify_status(
                status.as_u16(),
                error_message(status, &body),
            )));
        }

        let chat_response: ChatResponse = serde_json::from_str(&body).map_err(|e| {
            error!(provider = self.provider_name, error = %e, "Failed to parse response");
            ModelsError::new(ModelsErrorKind::MalformedResponse(format!(
                "Failed to parse JSON: {}",
                e
            )))
        })?;

        debug!(
            provider = self.provider_name,
            choices = chat_response.choices.len(),
            "Received response"
        );

        conversions::from_chat_response(chat_response)
    }

    /// Returns the provider name.
    pub fn provider_name(&self) -> &'static str {
        self.provider_name
    }

    /// Returns the model name.
    pub fn model_name(&self) -> &str {
        &self.model
    }

    /// Returns the full chat-completions URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn error_message(status: StatusCode, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("no response body")
            .to_string()
    } else {
        truncate(body)
    }
}
