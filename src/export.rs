//! Plain-text page exports for copy buttons and `llms` routes

use crate::corpus::front_matter::strip_front_matter;
use crate::corpus::{Corpus, Page, DOCS_BASE_URL};

/// Route prefix for per-page raw-text exports
pub const EXPORT_ROUTE_PREFIX: &str = "/llms.mdx";

/// Export URL of a page (`/llms.mdx/<slug>`)
pub fn export_url(page: &Page) -> String {
    export_path(&page.url)
}

/// Export URL for a docs URL such as `/docs/guides/setup`
pub fn export_path(docs_url: &str) -> String {
    let slug = match docs_url.strip_prefix(DOCS_BASE_URL) {
        Some(rest) if rest.is_empty() || rest.starts_with('/') => rest,
        _ => docs_url,
    }
    .trim_matches('/');
    if slug.is_empty() {
        EXPORT_ROUTE_PREFIX.to_string()
    } else {
        format!("{EXPORT_ROUTE_PREFIX}/{slug}")
    }
}

/// Render a page as `# title`, `URL:` line, description, then the body.
///
/// The body is read fresh from the corpus with front matter stripped. A
/// failed read leaves the body empty; the header is always produced.
pub async fn export_page(corpus: &dyn Corpus, page: &Page) -> String {
    let raw = match corpus.read_page(page).await {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!(page = %page.url, error = %e, "Export read failed, using empty body");
            String::new()
        }
    };

    render_export(page, strip_front_matter(&raw))
}

/// Every page's export in enumeration order, separated by a blank line
pub async fn export_all(corpus: &dyn Corpus) -> String {
    let mut exports = Vec::with_capacity(corpus.pages().len());
    for page in corpus.pages() {
        exports.push(export_page(corpus, page).await);
    }
    exports.join("\n\n")
}

fn render_export(page: &Page, body: &str) -> String {
    format!(
        "# {}\nURL: {}\n\n{}\n\n{}",
        page.title,
        page.url,
        page.description.as_deref().unwrap_or_default(),
        body
    )
}
