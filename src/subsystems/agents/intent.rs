//! Keyword intent classification.
//!
//! [`ROUTING_TABLE`] is an ordered list of `(intent, predicate)` pairs.
//! Predicates receive the lowercased message; the first one that matches
//! decides the intent. The last row always matches.

use super::products;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    CancelMeeting,
    ListMeetings,
    ScheduleMeeting,
    Weather,
    RecommendProduct,
    Chat,
}

pub type Predicate = fn(&str) -> bool;

pub const CANCEL_PHRASE: &str = "cancel meeting";

pub const ROUTING_TABLE: [(Intent, Predicate); 6] = [
    (Intent::CancelMeeting, wants_cancel),
    (Intent::ListMeetings, wants_listing),
    (Intent::ScheduleMeeting, wants_scheduling),
    (Intent::Weather, wants_weather),
    (Intent::RecommendProduct, wants_product),
    (Intent::Chat, always),
];

pub fn classify(message: &str) -> Intent {
    let text = message.to_lowercase();
    ROUTING_TABLE
        .iter()
        .find(|(_, matches)| matches(&text))
        .map(|(intent, _)| *intent)
        .unwrap_or(Intent::Chat)
}

/// First whitespace-delimited token after "cancel meeting", if any.
pub fn meeting_number(message: &str) -> Option<String> {
    let text = message.to_lowercase();
    let start = text.find(CANCEL_PHRASE)? + CANCEL_PHRASE.len();
    text[start..].split_whitespace().next().map(str::to_string)
}

fn wants_cancel(text: &str) -> bool {
    text.contains(CANCEL_PHRASE)
}

fn wants_listing(text: &str) -> bool {
    text.contains("meetings") || text.contains("scheduled")
}

fn wants_scheduling(text: &str) -> bool {
    text.contains("schedule") && text.contains("meeting")
}

fn wants_weather(text: &str) -> bool {
    text.contains("weather")
}

fn wants_product(text: &str) -> bool {
    !text.contains("summarize") && products::recommend(text).is_some()
}

fn always(_: &str) -> bool {
    true
}
