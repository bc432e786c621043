//! Display number → calendar event reference, as of the last listing.

use std::collections::HashMap;

/// Keys are the 1-based numbers shown to the user ("1", "2", ...).
/// Valid until the next [`MeetingIndex::replace`].
#[derive(Debug, Clone, Default)]
pub struct MeetingIndex {
    entries: HashMap<String, String>,
}

impl MeetingIndex {
    /// Replace the whole index with `event_uris`, numbered in iteration order.
    pub fn replace<I>(&mut self, event_uris: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.entries = event_uris
            .into_iter()
            .enumerate()
            .map(|(i, uri)| ((i + 1).to_string(), uri))
            .collect();
    }

    pub fn resolve(&self, number: &str) -> Option<&str> {
        self.entries.get(number).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys sorted numerically.
    pub fn numbers(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_by_key(|k| k.parse::<usize>().unwrap_or(usize::MAX));
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uris(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| format!("https://cal.example/scheduled_events/{n}")).collect()
    }

    #[test]
    fn numbers_follow_input_order() {
        let mut idx = MeetingIndex::default();
        idx.replace(uris(&["a", "b", "c"]));
        assert_eq!(idx.len(), 3);
        assert_eq!(idx.numbers(), vec!["1", "2", "3"]);
        assert_eq!(idx.resolve("1"), Some("https://cal.example/scheduled_events/a"));
        assert_eq!(idx.resolve("3"), Some("https://cal.example/scheduled_events/c"));
        assert_eq!(idx.resolve("0"), None);
        assert_eq!(idx.resolve("4"), None);
    }

    #[test]
    fn replace_drops_stale_numbers() {
        let mut idx = MeetingIndex::default();
        idx.replace(uris(&["a", "b", "c"]));
        idx.replace(uris(&["z"]));
        assert_eq!(idx.len(), 1);
        assert_eq!(idx.resolve("1"), Some("https://cal.example/scheduled_events/z"));
        assert_eq!(idx.resolve("2"), None);
        assert_eq!(idx.resolve("3"), None);
    }

    #[test]
    fn replace_with_nothing_empties() {
        let mut idx = MeetingIndex::default();
        idx.replace(uris(&["a"]));
        idx.replace(Vec::new());
        assert!(idx.is_empty());
    }

    #[test]
    fn numbers_sort_numerically() {
        let mut idx = MeetingIndex::default();
        idx.replace((0..11).map(|i| format!("uri-{i}")));
        let numbers = idx.numbers();
        assert_eq!(numbers.first(), Some(&"1"));
        assert_eq!(numbers.last(), Some(&"11"));
        assert_eq!(numbers[9], "10");
    }
}
