//! Generic OpenAI-compatible API client.
//!
//! Speaks the `POST {base_url}/chat/completions` protocol shared by DeepSeek,
//! OpenAI and others.

mod client;
mod conversions;
mod dto;

pub use client::{OpenAICompatibleClient, classify_status};
pub use dto::{ChatChoice, ChatMessage, ChatRequest, ChatResponse, ChatUsage};
