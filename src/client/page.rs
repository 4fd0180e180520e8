// src/client/page.rs
// Chat page view state: message list, input buffer and the single
// in-flight request flag

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use tracing::warn;

/// Shown in place of a reply whenever the request fails
pub const APOLOGY: &str =
    "I apologize, but I encountered an error processing your request. Please try again.";

/// Greeting shown while the list is empty
pub const GREETING: &str = "Good morning";
pub const GREETING_PROMPT: &str = "How can I help you today?";

/// One entry in the message list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub text: String,
    pub is_user: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_loading: bool,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_user: true,
            is_loading: false,
        }
    }

    pub fn reply(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_user: false,
            is_loading: false,
        }
    }

    pub fn placeholder() -> Self {
        Self {
            text: String::new(),
            is_user: false,
            is_loading: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    Idle,
    Awaiting,
}

#[derive(Debug, Default)]
pub struct ChatPage {
    messages: Vec<Message>,
    input: String,
    in_flight: bool,
}

impl ChatPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Newest entry; the view keeps it scrolled into sight
    pub fn latest(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn state(&self) -> PageState {
        if self.in_flight {
            PageState::Awaiting
        } else {
            PageState::Idle
        }
    }

    /// Send button and Enter are live only for non-blank input while idle
    pub fn can_submit(&self) -> bool {
        !self.in_flight && !self.input.trim().is_empty()
    }

    /// Submit the current input.
    ///
    /// Appends the user entry and a loading placeholder, clears the input,
    /// and returns the text to send. Returns `None` (and changes nothing)
    /// for blank input or while a request is in flight.
    pub fn submit(&mut self) -> Option<String> {
        if !self.can_submit() {
            return None;
        }

        let text = std::mem::take(&mut self.input);
        self.messages.push(Message::user(text.clone()));
        self.messages.push(Message::placeholder());
        self.in_flight = true;
        Some(text)
    }

    /// Replace the placeholder with the outcome of the request.
    ///
    /// Any error becomes the fixed apology; its detail is only logged.
    /// Returns `false` if no request was in flight.
    pub fn resolve<E: Display>(&mut self, outcome: Result<String, E>) -> bool {
        if !self.in_flight {
            return false;
        }

        let text = match outcome {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "Error sending message");
                APOLOGY.to_string()
            }
        };

        match self.messages.iter().rposition(|m| m.is_loading) {
            Some(index) => self.messages[index] = Message::reply(text),
            None => self.messages.push(Message::reply(text)),
        }
        self.in_flight = false;
        true
    }
}
