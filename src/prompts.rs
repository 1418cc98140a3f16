pub const ASSISTANT_ROLE: &str =
    "You are a legal assistant chatbot that specializes in the Constitution of India.";

pub const INSTRUCTIONS: &[&str] = &[
    "Provide accurate information about Indian constitutional law",
    "If specific articles are mentioned in the context, reference them",
    "If the context is general, provide comprehensive information based on your knowledge",
    "Always include a clear disclaimer that this is not professional legal advice",
    "Suggest consulting a qualified lawyer for specific legal matters",
    "Keep the response educational, clear, and helpful",
];

/// Build the single user prompt sent to the model.
pub fn build_prompt(question: &str, context: &str) -> String {
    let instructions: String = INSTRUCTIONS
        .iter()
        .map(|line| format!("- {}\n", line))
        .collect();

    format!(
        "{ASSISTANT_ROLE}\n\n\
         User Question: {question}\n\n\
         Constitutional Context Available:\n{context}\n\n\
         Instructions:\n{instructions}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_question_and_context() {
        let prompt = build_prompt("Can I be detained without trial?", "Article 22 ...");
        assert!(prompt.starts_with(ASSISTANT_ROLE));
        assert!(prompt.contains("User Question: Can I be detained without trial?\n"));
        assert!(prompt.contains("Constitutional Context Available:\nArticle 22 ...\n"));
        for line in INSTRUCTIONS {
            assert!(prompt.contains(&format!("- {}\n", line)));
        }
    }

    #[test]
    fn test_prompt_keeps_question_verbatim() {
        let question = "  What about {braces} and 'quotes'?  ";
        assert!(build_prompt(question, "").contains(question));
    }
}
