//! Shared types, error model, and configuration for Inkling.
//!
//! This crate is the foundation depended on by all other Inkling crates.
//! It provides:
//! - [`InklingError`] — the unified error type
//! - Domain types ([`Block`], [`BlockKind`], [`RichTextSpan`], [`PageRef`])
//! - Configuration ([`AppConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, NotionConfig, OpenRouterConfig, config_dir, config_file_path, init_config,
    load_config, load_config_from, validate_api_keys,
};
pub use error::{InklingError, Result};
pub use types::{Block, BlockKind, PageRef, RichTextSpan};
