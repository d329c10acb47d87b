//! Depth-bounded block-tree extraction.
//!
//! Materializes the descendant set of a page into a flat ordered list of
//! rendered text lines. Traversal uses an explicit worklist with a depth
//! counter rather than call recursion, so stack usage stays bounded no
//! matter how the external tree branches.

use tracing::{debug, instrument};

use inkling_notion::ContentStore;
use inkling_render::render_block;
use inkling_shared::{Block, Result};

/// Maximum visible nesting depth, counting a page's direct children as
/// depth 1. Children of a node at this depth are not fetched; deeper nodes
/// are silently omitted.
pub const MAX_DEPTH: u32 = 3;

/// Fetch all direct children of a node, following the continuation cursor
/// until exhausted.
///
/// The store paginates at 100; stopping after the first page would silently
/// truncate, so the cursor loop is required for correctness.
pub async fn fetch_all_children(store: &dyn ContentStore, block_id: &str) -> Result<Vec<Block>> {
    let mut children = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
        let (batch, next) = store.list_children(block_id, cursor.as_deref()).await?;
        children.extend(batch);
        match next {
            Some(c) => cursor = Some(c),
            None => break,
        }
    }

    Ok(children)
}

/// Flatten a page's block tree into rendered text, depth-first in document
/// order, joined by single newlines.
///
/// Each node's line is appended before its children are expanded; children
/// are pushed ahead of the node's later siblings. Blank-rendered nodes are
/// filtered out entirely. Fetch errors propagate to the caller — per-page
/// isolation is the aggregator's responsibility.
#[instrument(skip(store))]
pub async fn extract_page_text(store: &dyn ContentStore, page_id: &str) -> Result<String> {
    let mut lines: Vec<String> = Vec::new();

    // Worklist of (block, depth), top of the stack is the next node in
    // document order.
    let mut stack: Vec<(Block, u32)> = Vec::new();
    let roots = fetch_all_children(store, page_id).await?;
    for block in roots.into_iter().rev() {
        stack.push((block, 1));
    }

    while let Some((block, depth)) = stack.pop() {
        if let Some(line) = render_block(&block) {
            if !line.trim().is_empty() {
                lines.push(line);
            }
        }

        if block.has_children && depth < MAX_DEPTH {
            let children = fetch_all_children(store, &block.id).await?;
            for child in children.into_iter().rev() {
                stack.push((child, depth + 1));
            }
        }
    }

    debug!(page_id, line_count = lines.len(), "page extraction complete");
    Ok(lines.join("\n"))
}

#[cfg(test)]
pub(crate) mod stub {
    //! In-memory [`ContentStore`] used across the corpus tests.

    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use inkling_notion::ContentStore;
    use inkling_shared::{Block, BlockKind, InklingError, PageRef, Result, RichTextSpan};

    pub fn paragraph(id: &str, text: &str) -> Block {
        Block::leaf(
            id,
            BlockKind::Paragraph {
                text: vec![RichTextSpan::new(text)],
            },
        )
    }

    pub fn parent(id: &str, text: &str) -> Block {
        let mut block = paragraph(id, text);
        block.has_children = true;
        block
    }

    /// Scripted store: a page list, a children map, an optional pagination
    /// chunk size, and a set of node ids whose child listing fails.
    #[derive(Default)]
    pub struct StubStore {
        pub pages: Vec<PageRef>,
        pub children: HashMap<String, Vec<Block>>,
        /// When set, child listings are served in cursor pages of this size.
        pub chunk: Option<usize>,
        pub failing: HashSet<String>,
        pub list_calls: AtomicUsize,
    }

    impl StubStore {
        pub fn with_children(children: HashMap<String, Vec<Block>>) -> Self {
            Self {
                children,
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl ContentStore for StubStore {
        async fn search_pages(&self) -> Result<Vec<PageRef>> {
            Ok(self.pages.clone())
        }

        async fn list_children(
            &self,
            block_id: &str,
            cursor: Option<&str>,
        ) -> Result<(Vec<Block>, Option<String>)> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);

            if self.failing.contains(block_id) {
                return Err(InklingError::api(500, format!("children of {block_id}")));
            }

            let all = self.children.get(block_id).cloned().unwrap_or_default();
            let Some(chunk) = self.chunk else {
                return Ok((all, None));
            };

            let start: usize = cursor.map(|c| c.parse().unwrap()).unwrap_or(0);
            let end = (start + chunk).min(all.len());
            let next = (end < all.len()).then(|| end.to_string());
            Ok((all[start..end].to_vec(), next))
        }
    }
}
