//! Grounding context for the assistant
//!
//! The context is a fixed prefix of the corpus, not a relevance-ranked
//! subset. Anything implementing [`ContextSource`] can replace it without
//! touching the chat endpoint.

use crate::corpus::Corpus;
use std::sync::Arc;

/// Number of pages included in the grounding context
pub const MAX_CONTEXT_PAGES: usize = 10;

/// Produces the grounding text for one chat request
pub trait ContextSource: Send + Sync {
    fn build_context(&self) -> String;
}

/// The first [`MAX_CONTEXT_PAGES`] pages, rendered as title + description
pub struct PrefixContext {
    corpus: Arc<dyn Corpus>,
    limit: usize,
}

impl PrefixContext {
    pub fn new(corpus: Arc<dyn Corpus>) -> Self {
        Self::with_limit(corpus, MAX_CONTEXT_PAGES)
    }

    pub fn with_limit(corpus: Arc<dyn Corpus>, limit: usize) -> Self {
        Self { corpus, limit }
    }
}

impl ContextSource for PrefixContext {
    fn build_context(&self) -> String {
        self.corpus
            .pages()
            .iter()
            .take(self.limit)
            .map(|page| {
                format!(
                    "## {}\n{}",
                    page.title,
                    page.description.as_deref().unwrap_or_default()
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
