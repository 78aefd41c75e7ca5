//! Prompt construction for grounded chat

/// Build the system prompt with retrieved context embedded verbatim
pub fn build_system_prompt(context: &str) -> String {
    format!(
        r#"You are a helpful assistant answering questions for a user.

Context information retrieved for this conversation:

{}

Please provide an accurate answer based on the context above. If the context doesn't contain enough information to answer the question, please say so."#,
        context
    )
}
