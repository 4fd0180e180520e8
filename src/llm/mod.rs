// src/llm/mod.rs
// Model provider abstraction: conversation state and the two operations the
// chat endpoint consumes (start a conversation, send a message into it)

pub mod conversation;
pub mod gemini;

pub use conversation::{Conversation, GenerationConfig, Role, Turn};
pub use gemini::GeminiClient;

use async_trait::async_trait;

use crate::error::Result;

/// Trait for text-generation backends
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Start a conversation with fixed generation parameters and empty history
    fn start_chat(&self, config: GenerationConfig) -> Result<Conversation> {
        Ok(Conversation::new(config))
    }

    /// Send one message into an existing conversation and return the reply text.
    ///
    /// On success the user turn and the reply are appended to the history;
    /// on failure the history is left as it was.
    async fn send_message(&self, conversation: &mut Conversation, message: &str) -> Result<String>;

    /// Model identifier, for logging and the page config
    fn model_name(&self) -> &str;
}
