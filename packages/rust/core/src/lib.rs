//! Query orchestration for Inkling.
//!
//! This crate ties a corpus snapshot and a user question into one grounded
//! completion call: [`llm`] is the completion-service client, [`answer`] is
//! the orchestrator and the user-facing message rendering.

pub mod answer;
pub mod llm;

pub use answer::{Answer, QueryOrchestrator, failure_message, no_content_message};
pub use llm::{CompletionService, OpenRouterClient};
