//! Corpus pipeline: block-tree extraction, page aggregation, and the TTL
//! cache.
//!
//! The pipeline turns the store's nested page/block trees into one flat
//! text corpus: `extract` flattens a page's block tree into rendered lines,
//! `aggregate` joins all pages into a single delimited document, and `cache`
//! bounds how often that full aggregation runs.

pub mod aggregate;
pub mod cache;
pub mod extract;

pub use aggregate::{CorpusAggregator, CorpusSource, PAGE_SEPARATOR};
pub use cache::{Clock, CorpusCache, SystemClock, CORPUS_TTL};
pub use extract::{extract_page_text, fetch_all_children, MAX_DEPTH};
