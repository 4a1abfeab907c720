//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the executor with mock implementations.

use crate::conversation::Conversation;
use async_trait::async_trait;
use futures::stream::BoxStream;
use std::sync::Arc;
use thiserror::Error;

/// Decoded response text, chunk by chunk
pub type ResponseStream = BoxStream<'static, Result<String, TransportError>>;

/// Failures talking to the chat endpoint
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("Could not reach the server: {0}")]
    Connect(String),
    #[error("Server returned HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Response interrupted: {0}")]
    Body(String),
}

/// Client for the chat endpoint
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send the full conversation and stream back the assistant text
    async fn open(&self, conversation: &Conversation) -> Result<ResponseStream, TransportError>;
}

#[async_trait]
impl<T: ChatTransport + ?Sized> ChatTransport for Arc<T> {
    async fn open(&self, conversation: &Conversation) -> Result<ResponseStream, TransportError> {
        (**self).open(conversation).await
    }
}
