//! Core data model types for chemdrill.
//!
//! These are the values that cross the boundary between the session and its
//! collaborators: question requests, questions, and attempt records.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::adaptive::{DEFAULT_MAX_GRADE, DEFAULT_MIN_GRADE};

/// Practice mode. `Acid` is the primary mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Name an acid from its formula.
    #[default]
    Acid,
    /// Write a skeleton equation from a sentence description.
    Skeleton,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::Acid, Mode::Skeleton];

    /// Short human-readable description used in prompts and the CLI.
    pub fn describe(self) -> &'static str {
        match self {
            Mode::Acid => "acid naming",
            Mode::Skeleton => "sentence-equation skeleton",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Acid => write!(f, "acid"),
            Mode::Skeleton => write!(f, "skeleton"),
        }
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "acid" => Ok(Mode::Acid),
            "skeleton" => Ok(Mode::Skeleton),
            other => Err(format!("unknown mode: {other}")),
        }
    }
}

/// A request for one question at a given difficulty.
///
/// Deserializing never fails: untrusted bodies are re-validated the way a
/// provider endpoint does it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "serde_json::Value")]
pub struct QuestionRequest {
    pub mode: Mode,
    pub difficulty: u32,
}

impl QuestionRequest {
    pub fn new(mode: Mode, difficulty: u32) -> Self {
        Self { mode, difficulty }
    }

    /// The same request with its difficulty clamped into the default range.
    pub fn clamped(self) -> Self {
        Self {
            mode: self.mode,
            difficulty: self.difficulty.clamp(DEFAULT_MIN_GRADE, DEFAULT_MAX_GRADE),
        }
    }
}

impl From<serde_json::Value> for QuestionRequest {
    /// Re-validate an untrusted `{ mode, difficulty }` body.
    ///
    /// Unknown modes become [`Mode::Acid`]. A difficulty that is missing,
    /// non-numeric, or zero becomes the minimum grade; any other number is
    /// clamped into the default grade range and truncated.
    fn from(body: serde_json::Value) -> Self {
        let mode = body
            .get("mode")
            .and_then(|m| m.as_str())
            .and_then(|m| m.parse::<Mode>().ok())
            .unwrap_or_default();
        let difficulty = clamp_raw_difficulty(body.get("difficulty"));
        Self { mode, difficulty }
    }
}

fn clamp_raw_difficulty(raw: Option<&serde_json::Value>) -> u32 {
    let numeric = match raw {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                None
            } else {
                s.parse::<f64>().ok()
            }
        }
        _ => None,
    };

    match numeric {
        Some(n) if !n.is_nan() && n != 0.0 => {
            n.clamp(f64::from(DEFAULT_MIN_GRADE), f64::from(DEFAULT_MAX_GRADE)) as u32
        }
        _ => DEFAULT_MIN_GRADE,
    }
}

/// A single question produced by a question provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Text shown to the learner.
    #[serde(rename = "questionPrompt")]
    pub prompt: String,
    /// The authoritative answer.
    pub canonical_answer: String,
    /// Synonyms that are also graded as correct.
    #[serde(default)]
    pub accepted_answers: Vec<String>,
    #[serde(default)]
    pub explanation: String,
    /// One-sentence tip shown after the answer.
    #[serde(default)]
    pub remediation: String,
    /// Echo of the requested difficulty.
    pub difficulty: u32,
}

/// An attempt as forwarded to an [`AttemptSink`](crate::traits::AttemptSink).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptRecord {
    pub id: Uuid,
    pub mode: Mode,
    /// Difficulty the question was asked at.
    pub difficulty: u32,
    #[serde(rename = "question")]
    pub question_prompt: String,
    pub user_answer: String,
    pub correct: bool,
    pub attempted_at: DateTime<Utc>,
}

impl AttemptRecord {
    pub fn new(
        mode: Mode,
        difficulty: u32,
        question_prompt: impl Into<String>,
        user_answer: impl Into<String>,
        correct: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            mode,
            difficulty,
            question_prompt: question_prompt.into(),
            user_answer: user_answer.into(),
            correct,
            attempted_at: Utc::now(),
        }
    }
}
