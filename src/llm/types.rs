//! Common types for generation requests

use super::GenerationError;
use crate::conversation::Conversation;
use futures::stream::BoxStream;

/// A single generation call: instructions plus the replayed conversation
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub system: String,
    pub messages: Conversation,
}

impl GenerationRequest {
    pub fn new(system: impl Into<String>, messages: Conversation) -> Self {
        Self {
            system: system.into(),
            messages,
        }
    }
}

/// Lazy, finite sequence of text fragments in arrival order.
///
/// The stream ends after the first error.
pub type TextStream = BoxStream<'static, Result<String, GenerationError>>;
