//! Prompt templates for grounded question answering

use crate::providers::ScoredEntry;

/// Prompt builder for retrieval-grounded queries
pub struct PromptBuilder;

impl PromptBuilder {
    /// Assemble grounding context from retrieved entries
    ///
    /// Chunk texts are concatenated best-match-first, separated by a
    /// paragraph boundary.
    pub fn build_context(results: &[ScoredEntry]) -> String {
        results
            .iter()
            .map(|r| r.entry.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Build the grounded prompt: fixed instruction + context + question
    ///
    /// The instruction scopes the answer strictly to the supplied context,
    /// asks for bullet points, and requires missing dates to be flagged.
    pub fn build_grounded_prompt(question: &str, context: &str) -> String {
        format!(
            r#"You are a research assistant helping understand Indian Parliament sessions.

Using ONLY the context below:
- Identify key issues discussed
- Mention dates if present
- Summarize clearly in bullet points
- If date is missing, say "date not specified"

Context:
{context}

Question:
{question}

Answer:"#,
            context = context,
            question = question
        )
    }
}
