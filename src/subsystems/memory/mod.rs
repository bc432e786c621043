//! Memory subsystem — in-process state for one interactive session.
//!
//! ```text
//! SessionContext
//! ├── session_id   (uuid v4, log correlation only)
//! ├── Transcript   user/assistant turns, append-only until reset
//! └── MeetingIndex "1".."K" → event reference, replaced per listing
//! ```
//!
//! Nothing here touches disk. The context is owned by the comms channel and
//! lent to the agents by `&mut` for the duration of one interaction.

pub mod meetings;
pub mod transcript;

pub use meetings::MeetingIndex;
pub use transcript::{Role, Transcript, Turn};

use tracing::info;
use uuid::Uuid;

/// Everything one conversation remembers.
#[derive(Debug)]
pub struct SessionContext {
    session_id: Uuid,
    pub transcript: Transcript,
    pub meetings: MeetingIndex,
}

impl SessionContext {
    pub fn new() -> Self {
        let session_id = Uuid::new_v4();
        info!(%session_id, "session started");
        Self {
            session_id,
            transcript: Transcript::default(),
            meetings: MeetingIndex::default(),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Clear the transcript.
    ///
    /// The meeting index is left as-is: numbers from the last listing stay
    /// resolvable after a reset.
    pub fn reset(&mut self) {
        info!(
            session_id = %self.session_id,
            turns = self.transcript.len(),
            meetings = self.meetings.len(),
            "transcript reset"
        );
        self.transcript.clear();
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_is_empty() {
        let s = SessionContext::new();
        assert!(s.transcript.is_empty());
        assert!(s.meetings.is_empty());
    }

    #[test]
    fn sessions_get_distinct_ids() {
        assert_ne!(SessionContext::new().session_id(), SessionContext::new().session_id());
    }

    #[test]
    fn reset_clears_transcript_but_keeps_meetings() {
        let mut s = SessionContext::new();
        s.transcript.push_user("show my meetings");
        s.transcript.push_assistant("1. Alice");
        s.meetings.replace(["https://cal.example/scheduled_events/A".to_string()]);

        s.reset();

        assert!(s.transcript.is_empty());
        assert_eq!(s.meetings.resolve("1"), Some("https://cal.example/scheduled_events/A"));
    }
}
