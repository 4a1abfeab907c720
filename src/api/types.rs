//! API request and response types

use crate::conversation::Conversation;
use serde::{Deserialize, Serialize};

/// Body of `POST /api/ai`
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(alias = "conversation")]
    pub messages: Conversation,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
