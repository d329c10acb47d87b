//! Full-corpus aggregation across all accessible pages.

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

use inkling_notion::ContentStore;
use inkling_shared::Result;

use crate::extract::extract_page_text;

/// Separator line placed between pages in the corpus.
pub const PAGE_SEPARATOR: &str = "\n\n---\n";

/// Anything that can produce a fresh corpus. The cache depends on this seam
/// rather than on the aggregator directly so tests can count and fail
/// rebuilds.
#[async_trait]
pub trait CorpusSource: Send + Sync {
    /// Build the full corpus from scratch. An empty string is a legitimate
    /// result (zero qualifying pages), not an error.
    async fn build_corpus(&self) -> Result<String>;
}

/// Builds the corpus by enumerating pages and extracting each one.
pub struct CorpusAggregator<S> {
    store: S,
}

impl<S: ContentStore> CorpusAggregator<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S: ContentStore> CorpusSource for CorpusAggregator<S> {
    /// Aggregate all pages into one delimited document.
    ///
    /// Pages arrive most-recently-edited first (the store contract). Each
    /// page is attempted independently: an extraction failure is logged and
    /// skips that page only — one malformed or inaccessible page must never
    /// fail the whole refresh. Pages whose rendered body is blank are
    /// excluded.
    #[instrument(skip(self))]
    async fn build_corpus(&self) -> Result<String> {
        let pages = self.store.search_pages().await?;
        info!(page_count = pages.len(), "aggregating corpus");

        let mut sections: Vec<String> = Vec::new();
        for page in &pages {
            match extract_page_text(&self.store, &page.id).await {
                Ok(body) if body.trim().is_empty() => {
                    debug!(page_id = %page.id, title = %page.title, "skipping blank page");
                }
                Ok(body) => {
                    sections.push(format!("\n## {}\n\n{}", page.title, body));
                }
                Err(e) => {
                    warn!(page_id = %page.id, title = %page.title, error = %e, "skipping page");
                }
            }
        }

        info!(
            included = sections.len(),
            skipped = pages.len() - sections.len(),
            "corpus aggregation complete"
        );
        Ok(sections.join(PAGE_SEPARATOR))
    }
}
