//! Query orchestration: one question, one grounded completion call.

use tracing::{info, instrument};

use inkling_shared::{InklingError, Result};

use crate::llm::CompletionService;

/// Role and formatting rules embedded ahead of the corpus in every
/// grounding prompt.
const GROUNDING_HEADER: &str = "\
You are a knowledge assistant for a team workspace. Answer questions using \
only the workspace documentation included below.

Response rules:
- Keep answers concise.
- Cite the relevant section titles when they support the answer.
- If the documentation does not contain the answer, say so plainly instead of guessing.
- Use lightweight markdown suitable for chat (bold, short bullet lists).
- If the question is ambiguous, ask a clarifying question.
- Maintain a professional tone.

Workspace documentation:
";

/// Outcome of answering one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// The model's reply, returned verbatim.
    Reply(String),
    /// The corpus was empty; no model call was made.
    NoContent,
}

/// Answers one question against the current corpus.
pub struct QueryOrchestrator<C> {
    completion: C,
}

impl<C: CompletionService> QueryOrchestrator<C> {
    pub fn new(completion: C) -> Self {
        Self { completion }
    }

    /// Answer a question using the given corpus as grounding context.
    ///
    /// An empty corpus short-circuits to [`Answer::NoContent`] without
    /// spending a model call. Otherwise the full corpus is embedded
    /// verbatim in the grounding prompt, the literal question is submitted
    /// as a single-turn exchange, and the reply is returned unmodified.
    #[instrument(skip_all, fields(question_chars = question.len(), corpus_chars = corpus.len()))]
    pub async fn answer(&self, question: &str, corpus: &str) -> Result<Answer> {
        if corpus.trim().is_empty() {
            info!("corpus is empty, skipping completion call");
            return Ok(Answer::NoContent);
        }

        let system = build_grounding_prompt(corpus);
        let reply = self.completion.complete(&system, question).await?;
        Ok(Answer::Reply(reply))
    }
}

/// Build the grounding instruction: fixed header plus the corpus verbatim.
pub fn build_grounding_prompt(corpus: &str) -> String {
    format!("{GROUNDING_HEADER}{corpus}")
}

// ---------------------------------------------------------------------------
// User-facing message rendering
// ---------------------------------------------------------------------------

/// Message shown when the corpus is empty. Not an error state.
pub fn no_content_message() -> &'static str {
    "I don't have any workspace content to answer from yet. \
     Check that the integration has access to your pages, then try again."
}

/// Render an unrecoverable failure for the end user: apologetic, with the
/// short cause string only, never a stack trace.
pub fn failure_message(err: &InklingError) -> String {
    format!("Sorry, I ran into a problem answering that ({err}). Please try asking again.")
}
