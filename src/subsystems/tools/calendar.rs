//! Calendar provider client (Calendly-compatible REST API).
//!
//! Three guarded operations, each returning ready-to-print text:
//!
//! * [`CalendarClient::list_meetings`] — numbered upcoming meetings; rebuilds
//!   the session's [`MeetingIndex`].
//! * [`CalendarClient::cancel_meeting`] — cancel one event by reference.
//! * [`CalendarClient::scheduling_link`] — public booking URL of the first
//!   active event type.

use chrono::{DateTime, NaiveDateTime};
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{FAILURE_MARKER, ToolError, build_http_client, check_status, decode};
use crate::config::CalendarConfig;
use crate::subsystems::memory::MeetingIndex;

/// Upper bound on events requested per listing.
pub const LIST_PAGE_SIZE: u32 = 10;
pub const CANCEL_REASON: &str = "Cancelled via chatbot";
pub const NO_MEETINGS: &str = "📅 No upcoming meetings found.";
pub const TIME_TBA: &str = "Time TBA";
pub const CANCEL_SUCCESS: &str = "✅ Meeting cancelled successfully!";
pub const NO_EVENT_TYPES: &str =
    "❌ No event types available. Please create an event type in Calendly first.";

const PLACEHOLDER_NAME: &str = "Meeting";
const START_FORMAT: &str = "%b %d, %Y at %I:%M %p";
const NAIVE_START_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const LISTING_FOOTER: &str =
    "\n💡 To cancel a meeting, type: `cancel meeting [number]`\nExample: `cancel meeting 1`";

/// One row of a listing, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingSummary {
    /// Opaque event reference, used for cancellation.
    pub uri: String,
    pub display_name: String,
    /// Formatted start, or [`TIME_TBA`].
    pub starts: String,
}

#[derive(Debug, Clone)]
pub struct CalendarClient {
    client: Client,
    api_base_url: String,
    token: Option<String>,
}

impl CalendarClient {
    pub fn new(config: &CalendarConfig, token: Option<String>) -> Result<Self, ToolError> {
        Ok(Self {
            client: build_http_client(config.timeout_seconds)?,
            api_base_url: config.api_base_url.clone(),
            token,
        })
    }

    fn authed(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    // ── Guarded operations ────────────────────────────────────────────────

    /// List upcoming meetings and replace `index` with their numbering.
    ///
    /// On failure the index is left untouched and a failure line is returned.
    pub async fn list_meetings(&self, index: &mut MeetingIndex) -> String {
        match self.fetch_meetings().await {
            Ok(meetings) => {
                index.replace(meetings.iter().map(|m| m.uri.clone()));
                info!(count = meetings.len(), "meeting index rebuilt");
                format_listing(&meetings)
            }
            Err(e) => {
                warn!(error = %e, "listing meetings failed");
                format!("{FAILURE_MARKER} Error fetching meetings: {e}")
            }
        }
    }

    /// Cancel the event at `event_uri`. Only HTTP 201 counts as success.
    pub async fn cancel_meeting(&self, event_uri: &str) -> String {
        let url = format!("{}/cancellation", event_uri.trim_end_matches('/'));
        debug!(%url, "cancelling meeting");

        let req = self
            .authed(self.client.post(&url))
            .json(&CancellationRequest { reason: CANCEL_REASON });

        let response = match req.send().await {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "cancellation request failed");
                return format!("{FAILURE_MARKER} Error: {e}");
            }
        };

        let status = response.status();
        if status == reqwest::StatusCode::CREATED {
            info!(%event_uri, "meeting cancelled");
            return CANCEL_SUCCESS.to_string();
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<failed to read error body>".to_string());
        warn!(%status, %body, "provider refused cancellation");
        format!("{FAILURE_MARKER} Failed to cancel: {body}")
    }

    /// Booking link for the organisation's first active event type.
    pub async fn scheduling_link(&self) -> String {
        match self.fetch_first_event_type().await {
            Ok(Some(et)) => format!(
                "📅 Schedule a Meeting:\n\n{}\n\nShare this link to book: {}",
                et.name, et.scheduling_url
            ),
            Ok(None) => NO_EVENT_TYPES.to_string(),
            Err(e) => {
                warn!(error = %e, "scheduling link lookup failed");
                format!("{FAILURE_MARKER} Error creating scheduling link: {e}")
            }
        }
    }

    // ── Fallible internals ────────────────────────────────────────────────

    async fn current_user(&self) -> Result<UserResource, ToolError> {
        let url = format!("{}/users/me", self.api_base_url);
        let response = self
            .authed(self.client.get(&url))
            .send()
            .await
            .map_err(|e| ToolError::Request(e.to_string()))?;
        let envelope: UserEnvelope = decode(check_status(response).await?).await?;
        Ok(envelope.resource)
    }

    /// Fetch events, then one invitee lookup per event, in provider order.
    pub async fn fetch_meetings(&self) -> Result<Vec<MeetingSummary>, ToolError> {
        let user = self.current_user().await?;

        let url = format!("{}/scheduled_events", self.api_base_url);
        let count = LIST_PAGE_SIZE.to_string();
        let response = self
            .authed(self.client.get(&url))
            .query(&[("user", user.uri.as_str()), ("count", count.as_str()), ("status", "active")])
            .send()
            .await
            .map_err(|e| ToolError::Request(e.to_string()))?;
        let events: Collection<ScheduledEvent> = decode(check_status(response).await?).await?;
        debug!(events = events.collection.len(), "scheduled events fetched");

        let mut meetings = Vec::with_capacity(events.collection.len());
        for event in events.collection {
            // A failed invitee lookup only costs this event its invitee name.
            let invitee = match self.first_invitee(&event.uri).await {
                Ok(invitee) => invitee,
                Err(e) => {
                    warn!(event_uri = %event.uri, error = %e, "invitee lookup failed");
                    None
                }
            };
            let display_name = invitee
                .and_then(|i| i.name)
                .filter(|n| !n.trim().is_empty())
                .or(event.name.filter(|n| !n.trim().is_empty()))
                .unwrap_or_else(|| PLACEHOLDER_NAME.to_string());
            let starts = format_start(event.start_time.as_deref())?;
            meetings.push(MeetingSummary { uri: event.uri, display_name, starts });
        }
        Ok(meetings)
    }

    async fn first_invitee(&self, event_uri: &str) -> Result<Option<Invitee>, ToolError> {
        let url = format!(
            "{}/scheduled_events/{}/invitees",
            self.api_base_url,
            event_uuid(event_uri)
        );
        let response = self
            .authed(self.client.get(&url))
            .send()
            .await
            .map_err(|e| ToolError::Request(e.to_string()))?;
        let invitees: Collection<Invitee> = decode(check_status(response).await?).await?;
        Ok(invitees.collection.into_iter().next())
    }

    async fn fetch_first_event_type(&self) -> Result<Option<EventType>, ToolError> {
        let user = self.current_user().await?;
        let organization = user
            .current_organization
            .ok_or_else(|| ToolError::Malformed("user has no current_organization".into()))?;

        let url = format!("{}/event_types", self.api_base_url);
        let response = self
            .authed(self.client.get(&url))
            .query(&[("organization", organization.as_str()), ("active", "true"), ("count", "1")])
            .send()
            .await
            .map_err(|e| ToolError::Request(e.to_string()))?;
        let types: Collection<EventType> = decode(check_status(response).await?).await?;
        Ok(types.collection.into_iter().next())
    }
}

// ── Formatting ────────────────────────────────────────────────────────────────

pub fn format_listing(meetings: &[MeetingSummary]) -> String {
    if meetings.is_empty() {
        return NO_MEETINGS.to_string();
    }
    let mut out = String::from("📅 Your Upcoming Meetings:\n\n");
    for (i, m) in meetings.iter().enumerate() {
        out.push_str(&format!("{}. {}\n   📅 {}\n\n", i + 1, m.display_name, m.starts));
    }
    out.push_str(LISTING_FOOTER);
    out
}

/// Render a start time in its own offset, e.g.
/// `2024-01-01T10:00:00Z` → `Jan 01, 2024 at 10:00 AM`.
///
/// RFC 3339 is expected; an ISO 8601 timestamp without an offset is shown
/// as given.
pub fn format_start(raw: Option<&str>) -> Result<String, ToolError> {
    let Some(s) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(TIME_TBA.to_string());
    };
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.format(START_FORMAT).to_string());
    }
    NaiveDateTime::parse_from_str(s, NAIVE_START_FORMAT)
        .map(|dt| dt.format(START_FORMAT).to_string())
        .map_err(|e| ToolError::Malformed(format!("bad start_time '{s}': {e}")))
}

/// Last path segment of an event reference.
fn event_uuid(event_uri: &str) -> &str {
    event_uri.trim_end_matches('/').rsplit('/').next().unwrap_or(event_uri)
}

// ── Private wire types ────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct UserEnvelope {
    resource: UserResource,
}

#[derive(Debug, Deserialize)]
struct UserResource {
    uri: String,
    #[serde(default)]
    current_organization: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Collection<T> {
    #[serde(default = "Vec::new")]
    collection: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct ScheduledEvent {
    #[serde(default)]
    uri: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    start_time: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Invitee {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EventType {
    name: String,
    scheduling_url: String,
}

#[derive(Debug, Serialize)]
struct CancellationRequest {
    reason: &'static str,
}
