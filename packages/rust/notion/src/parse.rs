//! Wire-format parsing: Notion API JSON → domain types.
//!
//! Parsing is deliberately tolerant. A block with an unknown `type`, or one
//! whose per-kind payload is absent, parses to [`BlockKind::Other`] and
//! contributes no text; malformed rich-text arrays reduce to no spans. Only
//! a response that is not the expected envelope at all (no `results` array)
//! is an error.

use serde_json::Value;

use inkling_render::reduce_rich_text;
use inkling_shared::{Block, BlockKind, InklingError, PageRef, Result, RichTextSpan};

/// Title used when no property lookup strategy produces one.
pub const UNTITLED: &str = "Untitled";

// ---------------------------------------------------------------------------
// Rich text
// ---------------------------------------------------------------------------

/// Parse a rich-text array into spans.
///
/// Absent, null, or non-array input yields no spans; entries without a
/// string `plain_text` are skipped. Styling annotations are discarded.
pub fn parse_rich_text(value: Option<&Value>) -> Vec<RichTextSpan> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| item.get("plain_text").and_then(Value::as_str))
        .map(RichTextSpan::new)
        .collect()
}

// ---------------------------------------------------------------------------
// Blocks
// ---------------------------------------------------------------------------

/// Parse one block object.
pub fn parse_block(value: &Value) -> Block {
    let id = value
        .get("id")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let has_children = value
        .get("has_children")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let kind = match value.get("type").and_then(Value::as_str) {
        Some(kind_name) => parse_kind(kind_name, value.get(kind_name)),
        None => BlockKind::Other,
    };

    Block {
        id,
        has_children,
        kind,
    }
}

/// Map a block's `type` discriminant plus its payload to a [`BlockKind`].
fn parse_kind(kind_name: &str, payload: Option<&Value>) -> BlockKind {
    // Every recognized kind requires its payload object; a block whose
    // payload is missing degrades to Other.
    let Some(payload) = payload else {
        return BlockKind::Other;
    };
    let text = parse_rich_text(payload.get("rich_text"));

    match kind_name {
        "paragraph" => BlockKind::Paragraph { text },
        "heading_1" => BlockKind::Heading1 { text },
        "heading_2" => BlockKind::Heading2 { text },
        "heading_3" => BlockKind::Heading3 { text },
        "bulleted_list_item" => BlockKind::BulletedListItem { text },
        "numbered_list_item" => BlockKind::NumberedListItem { text },
        "quote" => BlockKind::Quote { text },
        "callout" => BlockKind::Callout { text },
        "toggle" => BlockKind::Toggle { text },
        "code" => BlockKind::Code {
            text,
            language: payload
                .get("language")
                .and_then(Value::as_str)
                .map(str::to_string),
        },
        "to_do" => BlockKind::ToDo {
            text,
            checked: payload
                .get("checked")
                .and_then(Value::as_bool)
                .unwrap_or(false),
        },
        "divider" => BlockKind::Divider,
        _ => BlockKind::Other,
    }
}

/// Parse a block-children listing response into `(blocks, next_cursor)`.
pub fn parse_children_page(value: &Value) -> Result<(Vec<Block>, Option<String>)> {
    let results = value
        .get("results")
        .and_then(Value::as_array)
        .ok_or_else(|| InklingError::parse("children response missing `results` array"))?;

    let blocks = results.iter().map(parse_block).collect();
    Ok((blocks, next_cursor(value)))
}

/// Extract a response's continuation cursor, if any.
pub fn next_cursor(value: &Value) -> Option<String> {
    value
        .get("next_cursor")
        .and_then(Value::as_str)
        .map(str::to_string)
}

// ---------------------------------------------------------------------------
// Pages and title resolution
// ---------------------------------------------------------------------------

/// Parse a search response into `(pages, next_cursor)`.
///
/// Non-page results (databases, etc.) are skipped.
pub fn parse_search_page(value: &Value) -> Result<(Vec<PageRef>, Option<String>)> {
    let results = value
        .get("results")
        .and_then(Value::as_array)
        .ok_or_else(|| InklingError::parse("search response missing `results` array"))?;

    let pages = results
        .iter()
        .filter(|r| r.get("object").and_then(Value::as_str) == Some("page"))
        .filter_map(parse_page)
        .collect();

    Ok((pages, next_cursor(value)))
}

/// Parse one page object into a [`PageRef`], resolving its title.
pub fn parse_page(value: &Value) -> Option<PageRef> {
    let id = value.get("id").and_then(Value::as_str)?.to_string();
    let title = resolve_title(value.get("properties"));
    Some(PageRef { id, title })
}

/// Resolve a page title from its properties map.
///
/// The store does not guarantee a fixed title property name, so the lookup
/// is an ordered sequence of strategies, each yielding option-of-string:
/// the property literally named `title`, then `Name`, then the first
/// property whose declared type is `title`, then the [`UNTITLED`] fallback.
/// The ordering is part of the contract.
pub fn resolve_title(properties: Option<&Value>) -> String {
    let Some(Value::Object(props)) = properties else {
        return UNTITLED.to_string();
    };

    title_named(props, "title")
        .or_else(|| title_named(props, "Name"))
        .or_else(|| title_typed(props))
        .unwrap_or_else(|| UNTITLED.to_string())
}

/// Strategy: text of the property with this exact name.
fn title_named(props: &serde_json::Map<String, Value>, name: &str) -> Option<String> {
    props.get(name).and_then(property_text)
}

/// Strategy: text of the first property whose declared `type` is `title`.
fn title_typed(props: &serde_json::Map<String, Value>) -> Option<String> {
    props
        .values()
        .find(|prop| prop.get("type").and_then(Value::as_str) == Some("title"))
        .and_then(property_text)
}

/// Reduce a property value's text content, whichever array it carries.
fn property_text(prop: &Value) -> Option<String> {
    let spans = prop
        .get("title")
        .or_else(|| prop.get("rich_text"))
        .map(|v| parse_rich_text(Some(v)))?;

    let text = reduce_rich_text(&spans);
    if text.is_empty() { None } else { Some(text) }
}
