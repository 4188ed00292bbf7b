//! Adaptive difficulty controller.
//!
//! A one-step transition over `(difficulty, streak)`. The caller owns the
//! state and reassigns it from the return value; nothing here is stored.

use serde::{Deserialize, Serialize};

pub const DEFAULT_MIN_GRADE: u32 = 6;
pub const DEFAULT_MAX_GRADE: u32 = 12;
pub const DEFAULT_UP_THRESHOLD: u32 = 2;

/// The only state carried from one question to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionState {
    pub difficulty: u32,
    pub streak: u32,
}

impl SessionState {
    pub fn new(difficulty: u32, streak: u32) -> Self {
        Self { difficulty, streak }
    }

    /// Fresh state at the policy's floor.
    pub fn start(policy: &AdaptivePolicy) -> Self {
        Self::new(policy.min_grade, 0)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::start(&AdaptivePolicy::default())
    }
}

/// Promotion threshold and grade bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdaptivePolicy {
    /// Consecutive correct answers needed for a promotion.
    #[serde(default = "default_up_threshold")]
    pub up_threshold: u32,
    #[serde(default = "default_min_grade")]
    pub min_grade: u32,
    #[serde(default = "default_max_grade")]
    pub max_grade: u32,
}

fn default_up_threshold() -> u32 {
    DEFAULT_UP_THRESHOLD
}
fn default_min_grade() -> u32 {
    DEFAULT_MIN_GRADE
}
fn default_max_grade() -> u32 {
    DEFAULT_MAX_GRADE
}

impl Default for AdaptivePolicy {
    fn default() -> Self {
        Self {
            up_threshold: DEFAULT_UP_THRESHOLD,
            min_grade: DEFAULT_MIN_GRADE,
            max_grade: DEFAULT_MAX_GRADE,
        }
    }
}

impl AdaptivePolicy {
    /// Clamp a difficulty into `[min_grade, max_grade]`.
    ///
    /// An inverted policy does not panic; `max_grade` wins.
    pub fn clamp(&self, difficulty: u32) -> u32 {
        difficulty.max(self.min_grade).min(self.max_grade)
    }

    /// Check that the bounds are ordered and the threshold is reachable.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.up_threshold >= 1, "up_threshold must be at least 1");
        anyhow::ensure!(
            self.min_grade <= self.max_grade,
            "min_grade ({}) must not exceed max_grade ({})",
            self.min_grade,
            self.max_grade
        );
        Ok(())
    }
}

/// Compute the next `(difficulty, streak)` after one graded answer.
///
/// A correct answer extends the streak; reaching `up_threshold` below the
/// ceiling promotes one grade and consumes the streak. At the ceiling the
/// streak keeps growing. A wrong answer clears the streak and demotes one
/// grade unless already at the floor.
pub fn decide_next_state(
    current: SessionState,
    was_correct: bool,
    policy: &AdaptivePolicy,
) -> SessionState {
    if was_correct {
        let streak = current.streak.saturating_add(1);
        if streak >= policy.up_threshold && current.difficulty < policy.max_grade {
            SessionState::new(current.difficulty + 1, 0)
        } else {
            SessionState::new(current.difficulty, streak)
        }
    } else {
        let difficulty = if current.difficulty > policy.min_grade {
            current.difficulty - 1
        } else {
            current.difficulty
        };
        SessionState::new(difficulty, 0)
    }
}
