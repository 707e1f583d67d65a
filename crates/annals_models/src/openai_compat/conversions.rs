//! Type conversions between annals and OpenAI formats.

use crate::openai_compat::{ChatMessage, ChatRequest, ChatResponse};
use annals_core::{GenerateRequest, GenerateResponse, TokenUsage};
use annals_error::{ModelsError, ModelsErrorKind, ModelsResult};

/// Converts a GenerateRequest to OpenAI chat format.
///
/// Streaming is always disabled.
pub fn to_chat_request(req: &GenerateRequest, model: &str) -> ModelsResult<ChatRequest> {
    if req.messages().is_empty() {
        return Err(ModelsError::new(ModelsErrorKind::InvalidRequest(
            "Request has no messages".to_string(),
        )));
    }

    let messages = req
        .messages()
        .iter()
        .map(|msg| ChatMessage {
            role: msg.role().to_string(),
            content: msg.content().clone(),
        })
        .collect::<Vec<_>>();

    let mut builder = ChatRequest::builder();
    builder
        .model(req.model().clone().unwrap_or_else(|| model.to_string()))
        .messages(messages)
        .max_tokens(*req.max_tokens())
        .temperature(*req.temperature())
        .top_p(*req.top_p())
        .stream(Some(false));

    builder.build().map_err(|e| {
        ModelsError::new(ModelsErrorKind::InvalidRequest(format!(
            "Failed to build request: {}",
            e
        )))
    })
}

/// Converts an OpenAI chat response to a GenerateResponse.
///
/// # Errors
///
/// Returns `MalformedResponse` when there is no choice or the first choice
/// has no text.
pub fn from_chat_response(response: ChatResponse) -> ModelsResult<GenerateResponse> {
    let choice = response.choices.into_iter().next().ok_or_else(|| {
        ModelsError::new(ModelsErrorKind::MalformedResponse(
            "No choices in response".to_string(),
        ))
    })?;

    if choice.message.content.trim().is_empty() {
        return Err(ModelsError::new(ModelsErrorKind::MalformedResponse(
            "First choice has empty content".to_string(),
        )));
    }

    let usage = response.usage.and_then(|u| {
        match (u.prompt_tokens, u.completion_tokens, u.total_tokens) {
            (Some(input), Some(output), Some(total)) => Some(TokenUsage::new(input, output, total)),
            _ => None,
        }
    });

    Ok(GenerateResponse::new(choice.message.content)
        .with_finish_reason(choice.finish_reason)
        .with_usage(usage))
}
