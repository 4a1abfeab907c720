//! Session state types

use crate::conversation::Conversation;
use serde::{Deserialize, Serialize};

/// Where the session is in its request cycle. Exactly one at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionStatus {
    /// Ready for user input
    #[default]
    Idle,

    /// Request sent, no response bytes yet
    Submitted,

    /// Response bytes are arriving
    Streaming,

    /// The last request failed; the transcript is kept
    Error { message: String },
}

impl SessionStatus {
    /// Whether a request is outstanding
    pub fn is_busy(&self) -> bool {
        matches!(self, SessionStatus::Submitted | SessionStatus::Streaming)
    }
}

/// Full reducer state: the snapshot handed to the rendering layer
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SessionState {
    pub conversation: Conversation,
    pub status: SessionStatus,
    /// Unsubmitted input text
    pub input: String,
    /// Id of the most recent request, 0 before the first submission
    pub request_id: u64,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a response event belongs to the outstanding request
    pub fn is_current(&self, request_id: u64) -> bool {
        self.status.is_busy() && request_id == self.request_id
    }
}
