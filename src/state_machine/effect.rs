//! Effects produced by state transitions

use crate::conversation::Conversation;

/// Effects to be executed after a state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Send the full conversation to the chat endpoint
    OpenRequest {
        request_id: u64,
        conversation: Conversation,
    },
}
