//! Dummy LLM provider: echoes the current user message back prefixed with
//! `[echo]`. Lets the assistant run offline without an API key.

use crate::llm::{ChatMessage, ChatRole, ProviderError};

#[derive(Debug, Clone)]
pub struct DummyProvider;

impl DummyProvider {
    pub async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ProviderError> {
        let current = messages
            .iter()
            .rev()
            .find(|m| m.role == ChatRole::User)
            .map(|m| m.content.as_str())
            .unwrap_or_default();
        Ok(format!("[echo] {current}"))
    }
}
