//! Request and response types for LLM generation.

use crate::Message;
use derive_builder::Builder;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Provider-neutral generation request.
///
/// Unset sampling fields are left to the provider's defaults.
///
/// # Examples
///
/// ```
/// use annals_core::{GenerateRequest, Message};
///
/// let request = GenerateRequest::builder()
///     .messages(vec![Message::system("你是历史作家"), Message::user("写第一章")])
///     .max_tokens(4000u32)
///     .temperature(0.8f32)
///     .build()
///     .unwrap();
///
/// assert_eq!(request.messages().len(), 2);
/// assert_eq!(*request.max_tokens(), Some(4000));
/// assert_eq!(*request.top_p(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default, Getters, Builder)]
#[builder(setter(into, strip_option), default)]
pub struct GenerateRequest {
    /// The conversation messages to send
    messages: Vec<Message>,
    /// Maximum number of tokens to generate
    max_tokens: Option<u32>,
    /// Sampling temperature (0.0 to 1.0)
    temperature: Option<f32>,
    /// Nucleus sampling mass (0.0 to 1.0)
    top_p: Option<f32>,
    /// Model identifier; the client's configured model when unset
    model: Option<String>,
}

impl GenerateRequest {
    /// Creates a new request builder.
    pub fn builder() -> GenerateRequestBuilder {
        GenerateRequestBuilder::default()
    }

    /// Creates a request with every sampling parameter set.
    pub fn new(messages: Vec<Message>, max_tokens: u32, temperature: f32, top_p: f32) -> Self {
        Self {
            messages,
            max_tokens: Some(max_tokens),
            temperature: Some(temperature),
            top_p: Some(top_p),
            model: None,
        }
    }
}

/// Token accounting reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Getters)]
pub struct TokenUsage {
    /// Tokens in the prompt
    prompt_tokens: u32,
    /// Tokens in the completion
    completion_tokens: u32,
    /// Sum of both
    total_tokens: u32,
}

impl TokenUsage {
    /// Creates a usage record.
    pub fn new(prompt_tokens: u32, completion_tokens: u32, total_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens,
        }
    }
}

/// Generated text plus provider metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct GenerateResponse {
    /// The generated text
    text: String,
    /// Why generation stopped, when reported
    finish_reason: Option<String>,
    /// Token usage, when reported
    usage: Option<TokenUsage>,
}

impl GenerateResponse {
    /// Creates a response carrying only text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            finish_reason: None,
            usage: None,
        }
    }

    /// Attaches the finish reason.
    pub fn with_finish_reason(mut self, reason: Option<String>) -> Self {
        self.finish_reason = reason;
        self
    }

    /// Attaches token usage.
    pub fn with_usage(mut self, usage: Option<TokenUsage>) -> Self {
        self.usage = usage;
        self
    }

    /// Consumes the response, returning the text.
    pub fn into_text(self) -> String {
        self.text
    }
}
