//! Bounded conversation history

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Default number of user/assistant pairs kept
pub const DEFAULT_MAX_PAIRS: usize = 10;

/// Speaker of a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

/// One entry of the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: TurnRole,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            content: content.into(),
        }
    }
}

/// Ordered turn history holding at most `2 * max_pairs` turns.
///
/// Not synchronized; the owner wraps it in a lock.
#[derive(Debug, Clone)]
pub struct Session {
    turns: VecDeque<Turn>,
    max_pairs: usize,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PAIRS)
    }
}

impl Session {
    /// Create an empty session; `max_pairs` of zero is raised to one
    pub fn new(max_pairs: usize) -> Self {
        let max_pairs = max_pairs.max(1);
        Self {
            turns: VecDeque::with_capacity(max_pairs * 2),
            max_pairs,
        }
    }

    /// Append a single turn without truncating
    pub fn append(&mut self, role: TurnRole, content: impl Into<String>) {
        self.turns.push_back(Turn {
            role,
            content: content.into(),
        });
    }

    /// Append one query/response cycle and drop the oldest turns beyond the bound
    pub fn record_exchange(&mut self, user: impl Into<String>, assistant: impl Into<String>) {
        self.append(TurnRole::User, user);
        self.append(TurnRole::Assistant, assistant);
        self.truncate();
    }

    /// Owned copy of the history, oldest first
    pub fn snapshot(&self) -> Vec<Turn> {
        self.turns.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn max_pairs(&self) -> usize {
        self.max_pairs
    }

    fn truncate(&mut self) {
        let limit = self.max_pairs * 2;
        while self.turns.len() > limit {
            self.turns.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounded_after_many_cycles() {
        let k = 3;
        let mut session = Session::new(k);
        for n in 0..10 {
            session.record_exchange(format!("q{}", n), format!("a{}", n));
            assert!(session.len() <= 2 * k);
        }

        let snapshot = session.snapshot();
        let expected: Vec<Turn> = (7..10)
            .flat_map(|n| [Turn::user(format!("q{}", n)), Turn::assistant(format!("a{}", n))])
            .collect();
        assert_eq!(snapshot, expected);
    }

    #[test]
    fn test_fewer_cycles_than_bound_keeps_all() {
        let mut session = Session::default();
        session.record_exchange("hello", "hi");
        session.record_exchange("list pods", "done");

        let snapshot = session.snapshot();
        assert_eq!(snapshot.len(), 4);
        assert_eq!(snapshot[0], Turn::user("hello"));
        assert_eq!(snapshot[3], Turn::assistant("done"));
    }

    #[test]
    fn test_snapshot_is_independent() {
        let mut session = Session::new(2);
        session.record_exchange("q", "a");
        let snapshot = session.snapshot();
        session.clear();

        assert!(session.is_empty());
        assert_eq!(snapshot.len(), 2);
    }

    #[test]
    fn test_append_does_not_truncate() {
        let mut session = Session::new(1);
        session.append(TurnRole::User, "one");
        session.append(TurnRole::User, "two");
        session.append(TurnRole::User, "three");
        assert_eq!(session.len(), 3);

        session.record_exchange("four", "five");
        assert_eq!(session.len(), 2);
        assert_eq!(session.snapshot()[0], Turn::user("four"));
    }

    #[test]
    fn test_zero_pairs_raised_to_one() {
        assert_eq!(Session::new(0).max_pairs(), 1);
    }
}
