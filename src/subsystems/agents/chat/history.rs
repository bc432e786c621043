//! Rebuild completion context from the transcript.
//!
//! The transcript is walked two turns at a time from the start. A trailing
//! unpaired turn (the message being answered right now) is left out; the
//! caller passes it separately as the current message. No windowing: every
//! request replays the whole conversation.

use crate::llm::ChatMessage;
use crate::subsystems::memory::Transcript;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryPair {
    pub user: String,
    pub assistant: String,
}

pub fn history_pairs(transcript: &Transcript) -> Vec<HistoryPair> {
    transcript
        .turns()
        .chunks_exact(2)
        .map(|pair| HistoryPair {
            user: pair[0].text.clone(),
            assistant: pair[1].text.clone(),
        })
        .collect()
}

/// `system`, then each pair as user/assistant, then `current` as user.
pub fn build_messages(system: &str, history: &[HistoryPair], current: &str) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len() * 2 + 2);
    messages.push(ChatMessage::system(system));
    for pair in history {
        messages.push(ChatMessage::user(pair.user.as_str()));
        messages.push(ChatMessage::assistant(pair.assistant.as_str()));
    }
    messages.push(ChatMessage::user(current));
    messages
}
