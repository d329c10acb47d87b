//! Core domain types for Inkling: blocks, rich text, and page references.
//!
//! These mirror the content store's wire shapes only as far as this system
//! needs them: a block is an id, a children flag, and a kind with its
//! text payload. Everything else the API sends is dropped at parse time.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// RichTextSpan
// ---------------------------------------------------------------------------

/// One inline span of rich text.
///
/// Styling annotations (bold, italic, links) are intentionally discarded;
/// only the plain text survives into the corpus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichTextSpan {
    /// The plain-text payload of this span.
    pub plain_text: String,
}

impl RichTextSpan {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            plain_text: text.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// BlockKind / Block
// ---------------------------------------------------------------------------

/// The discriminant of a content block, with its per-kind payload.
///
/// `Other` covers every kind this system does not render (tables, embeds,
/// images, ...) as well as blocks whose payload is missing or malformed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockKind {
    Paragraph { text: Vec<RichTextSpan> },
    Heading1 { text: Vec<RichTextSpan> },
    Heading2 { text: Vec<RichTextSpan> },
    Heading3 { text: Vec<RichTextSpan> },
    BulletedListItem { text: Vec<RichTextSpan> },
    NumberedListItem { text: Vec<RichTextSpan> },
    Quote { text: Vec<RichTextSpan> },
    Callout { text: Vec<RichTextSpan> },
    /// A collapsible (toggle) section header; its body arrives as children.
    Toggle { text: Vec<RichTextSpan> },
    Code {
        text: Vec<RichTextSpan>,
        language: Option<String>,
    },
    ToDo {
        text: Vec<RichTextSpan>,
        checked: bool,
    },
    Divider,
    /// Unrecognized kind or absent payload; contributes no text.
    Other,
}

/// One node (block) in a page's tree structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Opaque identifier assigned by the content store.
    pub id: String,
    /// Whether the store reports nested child blocks under this one.
    pub has_children: bool,
    /// Discriminant plus payload.
    pub kind: BlockKind,
}

impl Block {
    /// Convenience constructor for a leaf block.
    pub fn leaf(id: impl Into<String>, kind: BlockKind) -> Self {
        Self {
            id: id.into(),
            has_children: false,
            kind,
        }
    }
}

// ---------------------------------------------------------------------------
// PageRef
// ---------------------------------------------------------------------------

/// A reference to one top-level page: its id and resolved title.
///
/// Produced by the store's search endpoint, ordered most-recently-edited
/// first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRef {
    /// Opaque page identifier.
    pub id: String,
    /// Title resolved via the ordered property-lookup fallback.
    pub title: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_serde_roundtrip() {
        let block = Block {
            id: "abc-123".into(),
            has_children: true,
            kind: BlockKind::ToDo {
                text: vec![RichTextSpan::new("ship it")],
                checked: false,
            },
        };

        let json = serde_json::to_string(&block).expect("serialize");
        let parsed: Block = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, block);
    }

    #[test]
    fn leaf_constructor_has_no_children() {
        let block = Block::leaf("x", BlockKind::Divider);
        assert!(!block.has_children);
        assert_eq!(block.kind, BlockKind::Divider);
    }
}
