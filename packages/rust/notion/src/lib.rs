//! Notion content-store client and wire parsing.
//!
//! [`ContentStore`] is the seam the extraction pipeline consumes: page
//! enumeration (newest-edited first) and cursor-paginated child listing.
//! [`NotionClient`] is the reqwest implementation; `parse` turns API JSON
//! into the domain types tolerantly (unknown block kinds become
//! [`inkling_shared::BlockKind::Other`], never an error).

mod client;
pub mod parse;

use async_trait::async_trait;
use inkling_shared::{Block, PageRef, Result};

pub use client::NotionClient;

/// Maximum children returned per listing call; the store paginates at 100.
pub const CHILD_PAGE_SIZE: u32 = 100;

/// Read access to the external content store.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Enumerate all accessible top-level pages, most-recently-edited first,
    /// following pagination until exhausted.
    async fn search_pages(&self) -> Result<Vec<PageRef>>;

    /// Fetch one page of a node's direct children (up to [`CHILD_PAGE_SIZE`]).
    ///
    /// Returns the children plus the continuation cursor; `None` signals
    /// exhaustion. Callers must follow the cursor — a single call may cover
    /// only part of the child list.
    async fn list_children(
        &self,
        block_id: &str,
        cursor: Option<&str>,
    ) -> Result<(Vec<Block>, Option<String>)>;
}
