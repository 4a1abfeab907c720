//! Mock transport for testing
//!
//! Enables exercising the session runtime without a server.

use super::traits::{ChatTransport, ResponseStream, TransportError};
use crate::conversation::Conversation;
use async_trait::async_trait;
use futures::StreamExt;
use std::collections::VecDeque;
use std::sync::Mutex;

/// What the mock does for one request
pub enum MockResponse {
    /// Fail before any bytes
    Reject(TransportError),
    /// Emit these items, then end
    Chunks(Vec<Result<String, TransportError>>),
    /// Emit these chunks, then never finish
    Hang(Vec<String>),
}

/// Mock transport that replays queued responses
#[derive(Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<MockResponse>>,
    /// Every conversation that was sent
    pub requests: Mutex<Vec<Conversation>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue(&self, response: MockResponse) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn queue_chunks<const N: usize>(&self, chunks: [&str; N]) {
        self.queue(MockResponse::Chunks(
            chunks.iter().map(|c| Ok((*c).to_string())).collect(),
        ));
    }

    pub fn recorded_requests(&self) -> Vec<Conversation> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatTransport for MockTransport {
    async fn open(&self, conversation: &Conversation) -> Result<ResponseStream, TransportError> {
        self.requests.lock().unwrap().push(conversation.clone());
        let response = self.responses.lock().unwrap().pop_front().unwrap_or_else(|| {
            MockResponse::Reject(TransportError::Connect("No mock response queued".to_string()))
        });

        match response {
            MockResponse::Reject(e) => Err(e),
            MockResponse::Chunks(items) => Ok(futures::stream::iter(items).boxed()),
            MockResponse::Hang(chunks) => Ok(futures::stream::iter(chunks.into_iter().map(Ok))
                .chain(futures::stream::pending())
                .boxed()),
        }
    }
}
