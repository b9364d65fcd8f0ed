//! External engine abstractions.
//!
//! Providers never talk to the network directly; they go through one of two
//! engine traits so the HTTP clients can be swapped for mocks in tests:
//!
//! - [`TextTranslationEngine`] — a plain `translate(text, source, target)`
//!   call against a web translation service.
//! - [`ChatEngine`] — a chat-completion call against an LLM API, consuming a
//!   structured [`ChatRequest`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SuggestResult;

/// A single message of a chat-completion conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender (system, user, assistant)
    pub role: String,
    /// Content of the message
    pub content: String,
}

/// A chat-completion request
///
/// Built with the fluent methods below and handed to a [`ChatEngine`]:
///
/// ```ignore
/// let request = ChatRequest::new("gpt-4o")
///     .temperature(0.2)
///     .system("You are a professional translator.")
///     .user("Translate: hello");
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// The model to use
    model: String,
    /// The messages for the conversation
    messages: Vec<ChatMessage>,
    /// Temperature for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

impl ChatRequest {
    /// Create a new request for the given model
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: Vec::new(),
            temperature: None,
        }
    }

    /// Append a system message
    pub fn system(self, content: impl Into<String>) -> Self {
        self.message("system", content)
    }

    /// Append a user message
    pub fn user(self, content: impl Into<String>) -> Self {
        self.message("user", content)
    }

    /// Append a message with an arbitrary role
    pub fn message(mut self, role: impl Into<String>, content: impl Into<String>) -> Self {
        self.messages.push(ChatMessage {
            role: role.into(),
            content: content.into(),
        });
        self
    }

    /// Set the sampling temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// The model this request targets
    pub fn model(&self) -> &str {
        &self.model
    }

    /// The conversation messages in order
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// The configured temperature, if any
    pub fn sampling_temperature(&self) -> Option<f32> {
        self.temperature
    }
}

/// A web translation service consumed as `translate(text, source, target)`
///
/// `source` may be `"auto"` to let the service detect the source language.
#[async_trait]
pub trait TextTranslationEngine: Send + Sync {
    /// Translate one string
    async fn translate_text(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> SuggestResult<String>;

    /// Engine name for display and logging
    fn name(&self) -> &'static str;
}

/// A chat-completion LLM consumed as a single-completion call
#[async_trait]
pub trait ChatEngine: Send + Sync {
    /// Run one chat completion and return the completion text
    async fn complete(&self, request: ChatRequest) -> SuggestResult<String>;

    /// Engine name for display and logging
    fn name(&self) -> &'static str;
}
