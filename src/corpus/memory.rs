//! In-memory corpus, for tests and embedding

use super::{Corpus, CorpusError, Page};
use async_trait::async_trait;
use std::collections::HashMap;
use std::io;
use std::path::PathBuf;

/// Corpus held entirely in memory
pub struct MemoryCorpus {
    pages: Vec<Page>,
    bodies: HashMap<PathBuf, String>,
}

impl MemoryCorpus {
    /// Pages keep the order given here
    pub fn new(entries: Vec<(Page, String)>) -> Self {
        let mut pages = Vec::with_capacity(entries.len());
        let mut bodies = HashMap::with_capacity(entries.len());
        for (page, body) in entries {
            bodies.insert(page.path.clone(), body);
            pages.push(page);
        }
        Self { pages, bodies }
    }

    /// Pages whose bodies are missing from backing storage
    pub fn without_bodies(pages: Vec<Page>) -> Self {
        Self {
            pages,
            bodies: HashMap::new(),
        }
    }
}

#[async_trait]
impl Corpus for MemoryCorpus {
    fn pages(&self) -> &[Page] {
        &self.pages
    }

    async fn read_page(&self, page: &Page) -> Result<String, CorpusError> {
        self.bodies
            .get(&page.path)
            .cloned()
            .ok_or_else(|| CorpusError::Read {
                path: page.path.clone(),
                source: io::Error::new(io::ErrorKind::NotFound, "no such page"),
            })
    }
}
