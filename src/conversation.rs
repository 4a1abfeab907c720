//! Conversation types shared by the chat endpoint and the client session
//!
//! The wire shape follows the common chat-UI message format: a role plus an
//! ordered list of typed parts.

use serde::{Deserialize, Serialize};

/// Who authored a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One part of a turn's content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Part {
    Text {
        text: String,
    },
    /// Any part kind we don't render or forward (step markers, reasoning, ...)
    #[serde(other)]
    Unsupported,
}

impl Part {
    pub fn text(s: impl Into<String>) -> Self {
        Part::Text { text: s.into() }
    }
}

/// A single message in a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            parts: vec![Part::text(text)],
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            parts: vec![Part::text(text)],
        }
    }

    /// Concatenated text of every text part
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|part| match part {
                Part::Text { text } => Some(text.as_str()),
                Part::Unsupported => None,
            })
            .collect()
    }

    /// Append to the trailing text part, creating one if needed
    pub fn push_text(&mut self, chunk: &str) {
        if let Some(Part::Text { text }) = self.parts.last_mut() {
            text.push_str(chunk);
        } else {
            self.parts.push(Part::text(chunk));
        }
    }
}

/// Ordered, append-only list of turns
pub type Conversation = Vec<Turn>;
