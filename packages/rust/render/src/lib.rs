//! Block-to-text rendering: rich-text reduction and the per-kind line rules.
//!
//! This crate is pure text shaping. [`reduce_rich_text`] flattens a span
//! sequence to one plain string, and [`render_block`] maps a block kind to
//! its text line. Neither function touches the network; tree traversal
//! lives in `inkling-corpus`.

use inkling_shared::{Block, BlockKind, RichTextSpan};

/// Literal separator line emitted for a divider block.
pub const DIVIDER_LINE: &str = "---";

/// Fence delimiter wrapped around code block content.
pub const CODE_FENCE: &str = "```";

// ---------------------------------------------------------------------------
// Rich-text reduction
// ---------------------------------------------------------------------------

/// Concatenate the plain text of a span sequence, in order.
///
/// Total function: an empty sequence yields the empty string. The parsing
/// layer maps absent or malformed wire input to an empty span list, so
/// malformed rich text degrades to "no text" rather than failing the
/// pipeline.
pub fn reduce_rich_text(spans: &[RichTextSpan]) -> String {
    spans.iter().map(|s| s.plain_text.as_str()).collect()
}

// ---------------------------------------------------------------------------
// Per-kind rendering
// ---------------------------------------------------------------------------

/// Render one block to its text line, or `None` for kinds that contribute
/// nothing.
///
/// Only the block's own payload is considered; descendants are rendered
/// separately by the extractor. The default arm is mandatory: a new
/// unrendered kind falls through to `None` instead of breaking extraction.
pub fn render_block(block: &Block) -> Option<String> {
    match &block.kind {
        BlockKind::Paragraph { text }
        | BlockKind::Heading1 { text }
        | BlockKind::Heading2 { text }
        | BlockKind::Heading3 { text }
        | BlockKind::BulletedListItem { text }
        | BlockKind::NumberedListItem { text }
        | BlockKind::Quote { text }
        | BlockKind::Callout { text }
        | BlockKind::Toggle { text } => Some(reduce_rich_text(text)),
        BlockKind::Code { text, .. } => Some(format!(
            "{CODE_FENCE}\n{}\n{CODE_FENCE}",
            reduce_rich_text(text)
        )),
        BlockKind::ToDo { text, checked } => {
            let marker = if *checked { "[x]" } else { "[ ]" };
            Some(format!("{marker} {}", reduce_rich_text(text)))
        }
        BlockKind::Divider => Some(DIVIDER_LINE.to_string()),
        _ => None,
    }
}
