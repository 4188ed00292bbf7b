//! Bounded, newest-first log of graded attempts.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Number of attempts kept for display.
pub const HISTORY_CAPACITY: usize = 50;

/// One graded attempt, as shown in the recent-attempts list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attempt {
    pub prompt: String,
    pub answer: String,
    pub correct: bool,
    pub expected: String,
}

#[derive(Debug, Clone)]
pub struct AttemptHistory {
    entries: VecDeque<Attempt>,
    capacity: usize,
}

impl Default for AttemptHistory {
    fn default() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }
}

impl AttemptHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record an attempt as the newest entry, evicting the oldest past capacity.
    pub fn push(&mut self, attempt: Attempt) {
        self.entries.push_front(attempt);
        self.entries.truncate(self.capacity);
    }

    /// Entries, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &Attempt> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&Attempt> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
