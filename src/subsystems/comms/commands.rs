//! Console input grammar: slash commands vs. plain messages.

/// One-click demo prompts, submitted exactly as if typed.
pub const DEMO_PROMPTS: [(&str, &str); 4] = [
    ("📋", "What does AvePoint do?"),
    ("📅", "Show my meetings"),
    ("➕", "Schedule a meeting"),
    ("🌤️", "What's the weather?"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Free text for the assistant.
    Say(String),
    /// Zero-based index into [`DEMO_PROMPTS`].
    Demo(usize),
    ListDemos,
    History,
    Reset,
    About,
    Help,
    Quit,
    Unknown(String),
}

impl ConsoleCommand {
    /// Parse one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let Some(rest) = line.strip_prefix('/') else {
            return Some(Self::Say(line.to_string()));
        };

        let mut parts = rest.split_whitespace();
        let cmd = parts.next().unwrap_or_default().to_lowercase();
        let arg = parts.next();

        let parsed = match (cmd.as_str(), arg) {
            ("demo", None) => Self::ListDemos,
            ("demo", Some(n)) => demo_index(n).map_or_else(|| Self::Unknown(line.into()), Self::Demo),
            ("history", _) => Self::History,
            ("reset" | "clear", _) => Self::Reset,
            ("about", _) => Self::About,
            ("help" | "?", _) => Self::Help,
            ("quit" | "exit", _) => Self::Quit,
            (n, None) => demo_index(n).map_or_else(|| Self::Unknown(line.into()), Self::Demo),
            _ => Self::Unknown(line.to_string()),
        };
        Some(parsed)
    }
}

/// 1-based display number → index, if it names a demo prompt.
fn demo_index(n: &str) -> Option<usize> {
    n.parse::<usize>()
        .ok()
        .filter(|i| (1..=DEMO_PROMPTS.len()).contains(i))
        .map(|i| i - 1)
}
