//! Completion fallback: system prompt + replayed history + current message.
//!
//! ```text
//! Transcript ──history_pairs()──▶ [HistoryPair] ──build_messages()──▶ [ChatMessage]
//! ```

pub mod history;

pub use history::{HistoryPair, build_messages, history_pairs};

pub const SYSTEM_PROMPT: &str = "You are AvePoint Office Assistant. Help with: \
1) Information about AvePoint products and company, \
2) Summarizing text when user says 'summarize this:', \
3) General questions, \
4) Calendar management (show meetings, schedule and cancel meetings). \
Be concise and helpful.";
