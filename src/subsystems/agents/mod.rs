//! Agents subsystem — routes one user message to one handler.
//!
//! ```text
//! respond() ── push user turn ── route() ── push assistant turn
//!                                  │
//!            classify() ───────────┼─▶ CancelMeeting    → calendar (guarded)
//!                                  ├─▶ ListMeetings     → calendar (guarded, rebuilds index)
//!                                  ├─▶ ScheduleMeeting  → calendar (guarded)
//!                                  ├─▶ Weather          → weather  (unguarded)
//!                                  ├─▶ RecommendProduct → product table
//!                                  └─▶ Chat             → history + LLM (unguarded)
//! ```

pub mod chat;
pub mod intent;
pub mod products;

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::AppError;
use crate::llm::{LlmProvider, providers};
use crate::subsystems::memory::SessionContext;
use crate::subsystems::tools::{CalendarClient, FAILURE_MARKER, WeatherClient};
use intent::Intent;

pub const MISSING_MEETING_NUMBER: &str =
    "❌ Please provide a meeting number. Format: `cancel meeting [number]`";
pub const UNKNOWN_MEETING_NUMBER: &str =
    "❌ Meeting number not found. Please view your meetings first with 'show my meetings'.";

/// The router plus the clients it delegates to. Holds no session state;
/// every call borrows the caller's [`SessionContext`].
#[derive(Debug, Clone)]
pub struct Assistant {
    calendar: CalendarClient,
    weather: WeatherClient,
    llm: LlmProvider,
}

impl Assistant {
    pub fn new(calendar: CalendarClient, weather: WeatherClient, llm: LlmProvider) -> Self {
        Self { calendar, weather, llm }
    }

    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let calendar = CalendarClient::new(&config.calendar, config.calendar_token.clone())?;
        let weather = WeatherClient::new(&config.weather, &config.location_label)?;
        let llm = providers::build(&config.llm, config.llm_api_key.clone())?;
        info!(llm = llm.name(), "assistant ready");
        Ok(Self::new(calendar, weather, llm))
    }

    /// One full interaction: record the user turn, route, record the reply.
    ///
    /// If routing fails the user turn is withdrawn so the transcript keeps
    /// strict user/assistant pairs, and the error is returned.
    pub async fn respond(
        &self,
        session: &mut SessionContext,
        message: &str,
    ) -> Result<String, AppError> {
        session.transcript.push_user(message);
        match self.route(session, message).await {
            Ok(reply) => {
                session.transcript.push_assistant(reply.as_str());
                Ok(reply)
            }
            Err(e) => {
                session.transcript.pop_unanswered();
                warn!(session_id = %session.session_id(), error = %e, "interaction failed");
                Err(e)
            }
        }
    }

    /// Dispatch `message` by [`intent::classify`]. Reads `session.meetings`
    /// for cancellations; only the listing handler writes it.
    pub async fn route(
        &self,
        session: &mut SessionContext,
        message: &str,
    ) -> Result<String, AppError> {
        let intent = intent::classify(message);
        debug!(session_id = %session.session_id(), ?intent, "message routed");

        match intent {
            Intent::CancelMeeting => Ok(self.cancel(session, message).await),
            Intent::ListMeetings => Ok(self.calendar.list_meetings(&mut session.meetings).await),
            Intent::ScheduleMeeting => Ok(self.calendar.scheduling_link().await),
            Intent::Weather => Ok(self.weather.current().await?),
            Intent::RecommendProduct => match products::recommend(message) {
                Some(product) => Ok(products::format_recommendation(product)),
                None => self.chat(session, message).await,
            },
            Intent::Chat => self.chat(session, message).await,
        }
    }

    async fn cancel(&self, session: &SessionContext, message: &str) -> String {
        let Some(number) = intent::meeting_number(message) else {
            return MISSING_MEETING_NUMBER.to_string();
        };
        match session.meetings.resolve(&number) {
            Some(event_uri) => {
                info!(%number, %event_uri, "cancelling listed meeting");
                self.calendar.cancel_meeting(event_uri).await
            }
            None => {
                debug!(%number, known = ?session.meetings.numbers(), "unknown meeting number");
                UNKNOWN_MEETING_NUMBER.to_string()
            }
        }
    }

    async fn chat(&self, session: &SessionContext, message: &str) -> Result<String, AppError> {
        let history = chat::history_pairs(&session.transcript);
        let messages = chat::build_messages(chat::SYSTEM_PROMPT, &history, message);
        debug!(pairs = history.len(), "forwarding to completion provider");
        Ok(self.llm.complete(&messages).await?)
    }
}

/// `true` if `reply` is a handled failure rather than a normal answer.
pub fn is_failure_reply(reply: &str) -> bool {
    reply.starts_with(FAILURE_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Nothing listens on port 9 (discard); any network call would fail fast
    // and show up as a failure reply or an Err.
    fn offline_assistant() -> Assistant {
        Assistant::from_config(&Config::for_base_url("http://127.0.0.1:9")).unwrap()
    }

    #[tokio::test]
    async fn cancel_without_number_is_usage_error() {
        let a = offline_assistant();
        let mut s = SessionContext::new();
        for msg in ["cancel meeting", "Cancel Meeting   ", "please CANCEL MEETING"] {
            assert_eq!(a.route(&mut s, msg).await.unwrap(), MISSING_MEETING_NUMBER);
        }
    }

    #[tokio::test]
    async fn cancel_unknown_number_is_not_found() {
        let a = offline_assistant();
        let mut s = SessionContext::new();
        assert_eq!(a.route(&mut s, "cancel meeting 1").await.unwrap(), UNKNOWN_MEETING_NUMBER);

        s.meetings.replace(["https://cal.example/scheduled_events/A".to_string()]);
        assert_eq!(a.route(&mut s, "cancel meeting 2").await.unwrap(), UNKNOWN_MEETING_NUMBER);
    }

    #[tokio::test]
    async fn product_reply_needs_no_network() {
        let a = offline_assistant();
        let mut s = SessionContext::new();
        let reply = a.route(&mut s, "Tell me about governance").await.unwrap();
        assert_eq!(reply, products::format_recommendation(products::PRODUCTS[2].1));
    }

    #[tokio::test]
    async fn summarize_goes_to_completion() {
        let a = offline_assistant();
        let mut s = SessionContext::new();
        let reply = a.route(&mut s, "summarize this: backup policy").await.unwrap();
        assert_eq!(reply, "[echo] summarize this: backup policy");
    }

    #[tokio::test]
    async fn respond_records_one_pair_per_interaction() {
        let a = offline_assistant();
        let mut s = SessionContext::new();
        a.respond(&mut s, "hello").await.unwrap();
        a.respond(&mut s, "need a backup").await.unwrap();
        assert_eq!(s.transcript.len(), 4);
        assert_eq!(s.transcript.turns()[1].text, "[echo] hello");
    }

    #[tokio::test]
    async fn guarded_calendar_failure_is_a_reply() {
        let a = offline_assistant();
        let mut s = SessionContext::new();
        s.meetings.replace(["https://cal.example/scheduled_events/A".to_string()]);

        let reply = a.respond(&mut s, "show my meetings").await.unwrap();
        assert!(is_failure_reply(&reply), "got: {reply}");
        assert!(reply.contains("Error fetching meetings"));
        // Failed listing keeps the previous numbering.
        assert_eq!(s.meetings.len(), 1);
        assert_eq!(s.transcript.len(), 2);
    }

    #[tokio::test]
    async fn unguarded_weather_failure_is_an_error() {
        let a = offline_assistant();
        let mut s = SessionContext::new();
        a.respond(&mut s, "hi").await.unwrap();

        let result = a.respond(&mut s, "what's the weather?").await;
        assert!(matches!(result, Err(AppError::Tool(_))));
        // The failed turn is withdrawn; the earlier pair stays.
        assert_eq!(s.transcript.len(), 2);
    }

    #[test]
    fn failure_marker_detection() {
        assert!(is_failure_reply(MISSING_MEETING_NUMBER));
        assert!(is_failure_reply(UNKNOWN_MEETING_NUMBER));
        assert!(!is_failure_reply("📅 No upcoming meetings found."));
    }
}
