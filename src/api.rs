//! HTTP API: the chat endpoint and raw-text page exports

mod handlers;
mod types;

pub use handlers::create_router;
pub use types::*;

use crate::config::CHAT_MAX_DURATION;
use crate::context::{ContextSource, PrefixContext};
use crate::corpus::Corpus;
use crate::llm::GenerationService;
use std::sync::Arc;
use std::time::Duration;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub corpus: Arc<dyn Corpus>,
    pub context: Arc<dyn ContextSource>,
    /// `None` when no provider is configured; chat requests then fail with 503
    pub generator: Option<Arc<dyn GenerationService>>,
    pub site_name: Arc<str>,
    /// Wall-clock ceiling for one chat request
    pub chat_deadline: Duration,
}

impl AppState {
    pub fn new(
        corpus: Arc<dyn Corpus>,
        generator: Option<Arc<dyn GenerationService>>,
        site_name: &str,
    ) -> Self {
        Self {
            context: Arc::new(PrefixContext::new(corpus.clone())),
            corpus,
            generator,
            site_name: Arc::from(site_name),
            chat_deadline: CHAT_MAX_DURATION,
        }
    }

    /// Replace the grounding strategy
    #[must_use]
    pub fn with_context(mut self, context: Arc<dyn ContextSource>) -> Self {
        self.context = context;
        self
    }

    #[must_use]
    pub fn with_chat_deadline(mut self, deadline: Duration) -> Self {
        self.chat_deadline = deadline;
        self
    }
}
