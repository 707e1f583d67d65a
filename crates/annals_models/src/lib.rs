//! LLM provider integration for annals.
//!
//! The only provider is DeepSeek, reached through a generic client for
//! OpenAI-compatible chat-completions APIs. Any other endpoint speaking the
//! same protocol works by changing `api.base_url` and `api.model`.
//!
//! # Example
//!
//! ```no_run
//! use annals_core::{AnnalsConfig, ChapterPrompt};
//! use annals_interface::AnnalsDriver;
//! use annals_models::{ApiKey, DeepSeekDriver, ProcessEnv};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AnnalsConfig::load(None)?;
//! let key = ApiKey::resolve(config.api().api_key_env(), &ProcessEnv)?;
//! let driver = DeepSeekDriver::new(config.api(), key)?;
//!
//! let request = ChapterPrompt::new("你是历史作家", "写第一章").request(&config.generation());
//! let response = driver.generate(&request).await?;
//! println!("{}", response.text());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod deepseek;
mod openai_compat;
mod secret;

pub use deepseek::DeepSeekDriver;
pub use openai_compat::{
    ChatMessage, ChatRequest, ChatResponse, OpenAICompatibleClient, classify_status,
};
pub use secret::{ApiKey, ProcessEnv};
