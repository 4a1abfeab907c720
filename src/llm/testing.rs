//! Mock generation service for tests

use super::{GenerationError, GenerationRequest, GenerationService, TextStream};
use async_trait::async_trait;
use futures::StreamExt;
use std::collections::VecDeque;
use std::sync::Mutex;

/// What the mock does for one call
pub enum MockGeneration {
    /// Fail before streaming
    Reject(GenerationError),
    /// Emit these items, then end
    Stream(Vec<Result<String, GenerationError>>),
    /// Emit these items, then never finish
    Hang(Vec<String>),
}

/// Mock generation service that replays queued scripts
pub struct MockGenerationService {
    scripts: Mutex<VecDeque<MockGeneration>>,
    model_id: String,
    /// Record of all requests made
    pub requests: Mutex<Vec<GenerationRequest>>,
}

impl MockGenerationService {
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            scripts: Mutex::new(VecDeque::new()),
            model_id: model_id.into(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn queue(&self, script: MockGeneration) {
        self.scripts.lock().unwrap().push_back(script);
    }

    /// Queue a successful response made of these chunks
    pub fn queue_chunks<const N: usize>(&self, chunks: [&str; N]) {
        self.queue(MockGeneration::Stream(
            chunks.iter().map(|c| Ok((*c).to_string())).collect(),
        ));
    }

    pub fn queue_stream(&self, items: Vec<Result<String, GenerationError>>) {
        self.queue(MockGeneration::Stream(items));
    }

    pub fn queue_error(&self, error: GenerationError) {
        self.queue(MockGeneration::Reject(error));
    }

    /// Get recorded requests
    pub fn recorded_requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationService for MockGenerationService {
    async fn generate(&self, request: &GenerationRequest) -> Result<TextStream, GenerationError> {
        self.requests.lock().unwrap().push(request.clone());
        let script = self
            .scripts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| MockGeneration::Reject(GenerationError::network("No mock response queued")));

        match script {
            MockGeneration::Reject(e) => Err(e),
            MockGeneration::Stream(items) => Ok(futures::stream::iter(items).boxed()),
            MockGeneration::Hang(chunks) => Ok(futures::stream::iter(chunks.into_iter().map(Ok))
                .chain(futures::stream::pending())
                .boxed()),
        }
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}
