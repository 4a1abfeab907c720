//! Documentation corpus access
//!
//! Pages are enumerated once at startup in a stable order. Raw bodies are
//! read from backing storage on demand so exports always see the file as
//! it is on disk.

pub mod front_matter;
mod fs;
mod memory;

pub use fs::FsCorpus;
pub use memory::MemoryCorpus;

use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// URL prefix every documentation page is served under
pub const DOCS_BASE_URL: &str = "/docs";

/// Metadata for one documentation page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Source file path relative to the content root
    pub path: PathBuf,
    pub url: String,
    pub title: String,
    pub description: Option<String>,
}

impl Page {
    /// Build a page from its relative source path, deriving the URL
    pub fn new(
        path: impl Into<PathBuf>,
        title: impl Into<String>,
        description: Option<String>,
    ) -> Self {
        let path = path.into();
        Self {
            url: page_url(&path),
            path,
            title: title.into(),
            description,
        }
    }

    /// Slug relative to [`DOCS_BASE_URL`], empty for the docs root
    pub fn slug(&self) -> &str {
        self.url
            .strip_prefix(DOCS_BASE_URL)
            .unwrap_or(&self.url)
            .trim_start_matches('/')
    }
}

/// Errors from the content store
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("failed to load content from {}: {message}", path.display())]
    Load { path: PathBuf, message: String },
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Read-only access to the documentation pages
#[async_trait]
pub trait Corpus: Send + Sync {
    /// All pages, in stable enumeration order
    fn pages(&self) -> &[Page];

    /// Raw source of a page, front matter included
    async fn read_page(&self, page: &Page) -> Result<String, CorpusError>;

    /// Find a page by its slug (`guide/setup` for `/docs/guide/setup`)
    fn find_by_slug(&self, slug: &str) -> Option<&Page> {
        let slug = slug.trim_matches('/');
        self.pages().iter().find(|page| page.slug() == slug)
    }
}

/// Derive a page URL from its source path.
///
/// `call-management/index.mdx` becomes `/docs/call-management` and the
/// root `index.mdx` becomes `/docs`.
pub fn page_url(path: &Path) -> String {
    let mut segments: Vec<String> = path
        .with_extension("")
        .components()
        .filter_map(|component| match component {
            Component::Normal(segment) => Some(segment.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if segments.last().is_some_and(|last| last == "index") {
        segments.pop();
    }

    if segments.is_empty() {
        DOCS_BASE_URL.to_string()
    } else {
        format!("{DOCS_BASE_URL}/{}", segments.join("/"))
    }
}
