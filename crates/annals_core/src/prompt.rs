//! Rendered prompt pair.

use crate::{GenerateRequest, GenerationConfig, Message};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// System and user prompts for one chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ChapterPrompt {
    /// System prompt
    system: String,
    /// User prompt
    user: String,
}

impl ChapterPrompt {
    /// Creates a prompt pair.
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }

    /// Builds the generation request for this prompt.
    ///
    /// An empty system prompt is omitted from the messages.
    ///
    /// # Examples
    ///
    /// ```
    /// use annals_core::{AnnalsConfig, ChapterPrompt};
    ///
    /// let generation = AnnalsConfig::default().generation();
    /// let request = ChapterPrompt::new("你是历史作家", "写第一章").request(&generation);
    ///
    /// assert_eq!(request.messages().len(), 2);
    /// assert_eq!(*request.max_tokens(), Some(4000));
    /// assert_eq!(*request.model(), None);
    /// ```
    pub fn request(&self, generation: &GenerationConfig) -> GenerateRequest {
        let mut messages = Vec::with_capacity(2);
        if !self.system.trim().is_empty() {
            messages.push(Message::system(self.system.clone()));
        }
        messages.push(Message::user(self.user.clone()));

        GenerateRequest::new(
            messages,
            *generation.max_tokens(),
            *generation.temperature(),
            *generation.top_p(),
        )
    }
}
