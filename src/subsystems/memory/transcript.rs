//! Role-tagged conversation transcript.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

/// Ordered turns for one session. Grows by one user/assistant pair per
/// completed interaction; only [`Transcript::clear`] shrinks it wholesale.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn push_user(&mut self, text: impl Into<String>) {
        self.turns.push(Turn { role: Role::User, text: text.into() });
    }

    pub fn push_assistant(&mut self, text: impl Into<String>) {
        self.turns.push(Turn { role: Role::Assistant, text: text.into() });
    }

    /// Drop a trailing user turn that never got a reply.
    /// Returns the removed text, or `None` if the last turn is not a user turn.
    pub fn pop_unanswered(&mut self) -> Option<String> {
        match self.turns.last() {
            Some(t) if t.role == Role::User => self.turns.pop().map(|t| t.text),
            _ => None,
        }
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_in_order() {
        let mut t = Transcript::default();
        t.push_user("hi");
        t.push_assistant("hello");
        assert_eq!(t.len(), 2);
        assert_eq!(t.turns()[0], Turn { role: Role::User, text: "hi".into() });
        assert_eq!(t.turns()[1].role, Role::Assistant);
    }

    #[test]
    fn pop_unanswered_only_removes_user_turn() {
        let mut t = Transcript::default();
        t.push_user("q1");
        t.push_assistant("a1");
        assert_eq!(t.pop_unanswered(), None);
        assert_eq!(t.len(), 2);

        t.push_user("q2");
        assert_eq!(t.pop_unanswered().as_deref(), Some("q2"));
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn clear_empties() {
        let mut t = Transcript::default();
        t.push_user("x");
        t.clear();
        assert!(t.is_empty());
        assert_eq!(t.pop_unanswered(), None);
    }

    #[test]
    fn role_display() {
        assert_eq!(Role::User.to_string(), "user");
        assert_eq!(Role::Assistant.as_str(), "assistant");
    }
}
