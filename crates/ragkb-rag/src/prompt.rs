//! Prompt assembly for grounded generation.

/// Answer returned when retrieval finds nothing relevant. No generation
/// call is made in that case.
pub const NO_MATCH_ANSWER: &str =
    "I couldn't find any relevant information to answer your query.";

/// Join retrieved chunk texts into one context block.
#[must_use]
pub fn join_context(texts: &[String]) -> String {
    texts.join("\n\n")
}

/// Build the grounded prompt handed to the generator.
#[must_use]
pub fn build_rag_prompt(question: &str, context: &str) -> String {
    format!(
        "You are a helpful AI assistant. Use the following context to answer \
         the user's question. If the context doesn't contain relevant \
         information, say so.\n\n\
         Context:\n{context}\n\n\
         Question: {question}\n\n\
         Answer:"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_joined_with_blank_lines() {
        let texts = vec!["first chunk".to_string(), "second chunk".to_string()];
        assert_eq!(join_context(&texts), "first chunk\n\nsecond chunk");
    }

    #[test]
    fn empty_context_is_empty() {
        assert_eq!(join_context(&[]), "");
    }

    #[test]
    fn prompt_embeds_context_and_question() {
        let prompt = build_rag_prompt("What is chunking?", "Chunking splits documents.");
        assert!(prompt.contains("Context:\nChunking splits documents."));
        assert!(prompt.contains("Question: What is chunking?"));
        assert!(prompt.ends_with("Answer:"));
    }
}
