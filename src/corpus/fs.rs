//! Filesystem-backed corpus over a directory of `.md`/`.mdx` sources

use super::front_matter::{split_front_matter, PageMeta};
use super::{Corpus, CorpusError, Page};
use async_trait::async_trait;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

const PAGE_EXTENSIONS: &[&str] = &["md", "mdx"];

/// Corpus loaded from a content directory
pub struct FsCorpus {
    root: PathBuf,
    pages: Vec<Page>,
}

impl FsCorpus {
    /// Scan `root` for documentation sources.
    ///
    /// Hidden files and gitignored paths are skipped. Pages are ordered by
    /// relative path so enumeration is stable across restarts.
    pub fn load(root: impl Into<PathBuf>) -> Result<Self, CorpusError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(CorpusError::Load {
                path: root,
                message: "not a directory".to_string(),
            });
        }

        let mut sources = Vec::new();
        for entry in WalkBuilder::new(&root).build() {
            let entry = entry.map_err(|e| CorpusError::Load {
                path: root.clone(),
                message: e.to_string(),
            })?;
            let path = entry.path();
            if !entry.file_type().is_some_and(|t| t.is_file()) || !is_page_source(path) {
                continue;
            }
            if let Ok(relative) = path.strip_prefix(&root) {
                sources.push(relative.to_path_buf());
            }
        }
        sources.sort();

        let mut pages = Vec::with_capacity(sources.len());
        for relative in sources {
            let full = root.join(&relative);
            // One unreadable page must not keep the rest of the docs offline
            let raw = match std::fs::read_to_string(&full) {
                Ok(raw) => raw,
                Err(e) => {
                    tracing::warn!(path = %full.display(), error = %e, "Skipping unreadable page");
                    continue;
                }
            };
            pages.push(page_from_source(relative, &raw));
        }

        tracing::debug!(root = %root.display(), pages = pages.len(), "Scanned content directory");
        Ok(Self { root, pages })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl Corpus for FsCorpus {
    fn pages(&self) -> &[Page] {
        &self.pages
    }

    async fn read_page(&self, page: &Page) -> Result<String, CorpusError> {
        let path = self.root.join(&page.path);
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| CorpusError::Read { path, source })
    }
}

fn is_page_source(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| PAGE_EXTENSIONS.contains(&ext))
}

fn page_from_source(relative: PathBuf, raw: &str) -> Page {
    let (matter, _) = split_front_matter(raw);
    let meta = match matter.map(PageMeta::parse).transpose() {
        Ok(meta) => meta.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(path = %relative.display(), error = %e, "Invalid front matter, using defaults");
            PageMeta::default()
        }
    };
    let title = meta.title.unwrap_or_else(|| file_stem(&relative));
    Page::new(relative, title, meta.description)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}
