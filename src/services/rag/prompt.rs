use crate::models::KnowledgeChunk;

const SYSTEM_INSTRUCTION: &str = "You are a travel assistant answering questions about one \
specific trip itinerary. Answer only from the provided context. If the context does not \
contain the answer, say so plainly instead of guessing. Keep answers concise and practical.";

const CONTEXT_SEPARATOR: &str = "\n\n---\n\n";

/// System and user messages for one question-answering turn.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

impl Prompt {
    /// Build the prompt from the chunks that made it into the context window,
    /// in their relevance order.
    pub fn build(question: &str, context: &[KnowledgeChunk], stale_warning: Option<&str>) -> Self {
        let mut system = SYSTEM_INSTRUCTION.to_string();
        if let Some(warning) = stale_warning {
            system.push_str("\n\nNote: ");
            system.push_str(warning);
            system.push_str(
                " Mention that details may be out of date if the answer depends on them.",
            );
        }

        let context_text = context
            .iter()
            .enumerate()
            .map(|(i, chunk)| format!("[{}] ({})\n{}", i + 1, chunk.chunk_type, chunk.content))
            .collect::<Vec<_>>()
            .join(CONTEXT_SEPARATOR);

        let user = format!(
            "Context:\n{}\n\nQuestion: {}",
            context_text,
            question.trim()
        );

        Prompt { system, user }
    }
}
