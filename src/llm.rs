//! Generation provider abstraction
//!
//! A provider turns a system prompt plus a conversation into a lazy stream
//! of text chunks. Failures are surfaced immediately; nothing here retries.

mod azure;
mod error;
mod types;

#[cfg(test)]
pub mod testing;

pub use azure::{AzureConfig, AzureService, DEFAULT_API_VERSION, DEFAULT_MODEL};
pub use error::{GenerationError, GenerationErrorKind};
pub use types::*;

use async_trait::async_trait;
use futures::StreamExt;
use std::sync::Arc;
use std::time::Instant;

/// Common interface for streaming text generation
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Start a generation. Errors returned here happen before any chunk.
    async fn generate(&self, request: &GenerationRequest) -> Result<TextStream, GenerationError>;

    /// Get the model ID
    fn model_id(&self) -> &str;
}

/// Logging wrapper for generation services
pub struct LoggingService {
    inner: Arc<dyn GenerationService>,
    model_id: String,
}

impl LoggingService {
    pub fn new(inner: Arc<dyn GenerationService>) -> Self {
        let model_id = inner.model_id().to_string();
        Self { inner, model_id }
    }
}

struct StreamStats {
    model_id: String,
    started: Instant,
    chunks: usize,
    bytes: usize,
}

#[async_trait]
impl GenerationService for LoggingService {
    async fn generate(&self, request: &GenerationRequest) -> Result<TextStream, GenerationError> {
        let started = Instant::now();
        let stream = match self.inner.generate(request).await {
            Ok(stream) => stream,
            Err(e) => {
                tracing::error!(
                    model = %self.model_id,
                    duration_ms = %started.elapsed().as_millis(),
                    status = ?e.status,
                    kind = ?e.kind,
                    error = %e.message,
                    "Generation request failed"
                );
                return Err(e);
            }
        };

        let stats = StreamStats {
            model_id: self.model_id.clone(),
            started,
            chunks: 0,
            bytes: 0,
        };

        let logged = futures::stream::unfold(Some((stream, stats)), |state| async move {
            let (mut stream, mut stats) = state?;
            match stream.next().await {
                Some(Ok(chunk)) => {
                    if stats.chunks == 0 {
                        tracing::debug!(
                            model = %stats.model_id,
                            first_chunk_ms = %stats.started.elapsed().as_millis(),
                            "Generation streaming"
                        );
                    }
                    stats.chunks += 1;
                    stats.bytes += chunk.len();
                    Some((Ok(chunk), Some((stream, stats))))
                }
                Some(Err(e)) => {
                    tracing::error!(
                        model = %stats.model_id,
                        duration_ms = %stats.started.elapsed().as_millis(),
                        chunks = stats.chunks,
                        kind = ?e.kind,
                        error = %e.message,
                        "Generation stream failed"
                    );
                    Some((Err(e), None))
                }
                None => {
                    tracing::info!(
                        model = %stats.model_id,
                        duration_ms = %stats.started.elapsed().as_millis(),
                        chunks = stats.chunks,
                        bytes = stats.bytes,
                        "Generation completed"
                    );
                    None
                }
            }
        });

        Ok(logged.boxed())
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}
