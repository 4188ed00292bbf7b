//! Collaborator traits and provider-output validation.
//!
//! Question providers and attempt sinks are implemented by the
//! `chemdrill-providers` crate. The parsing helpers here turn loosely shaped
//! model output into a validated [`Question`], falling back to the built-in
//! question for the requested mode when the output is unusable.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::adaptive::{DEFAULT_MAX_GRADE, DEFAULT_MIN_GRADE};
use crate::fallback::fallback_question;
use crate::model::{AttemptRecord, Question, QuestionRequest};
use crate::normalize::{normalize_answer, normalize_value};

// ---------------------------------------------------------------------------
// Question provider trait
// ---------------------------------------------------------------------------

/// Trait for backends that produce questions.
#[async_trait]
pub trait QuestionProvider: Send + Sync {
    /// Human-readable provider name (e.g. "openai").
    fn name(&self) -> &str;

    /// Produce one question for `request`.
    ///
    /// Malformed backend output should be recovered with
    /// [`parse_question_output`]; only transport and API failures are errors.
    async fn fetch_question(&self, request: &QuestionRequest) -> anyhow::Result<Question>;
}

// ---------------------------------------------------------------------------
// Attempt sink trait
// ---------------------------------------------------------------------------

/// Trait for fire-and-forget attempt recording.
#[async_trait]
pub trait AttemptSink: Send + Sync {
    /// Record one attempt. Callers discard the error.
    async fn record_attempt(&self, attempt: &AttemptRecord) -> anyhow::Result<()>;
}

/// Sink that drops every attempt.
pub struct NoopSink;

#[async_trait]
impl AttemptSink for NoopSink {
    async fn record_attempt(&self, _: &AttemptRecord) -> anyhow::Result<()> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Provider output parsing
// ---------------------------------------------------------------------------

/// Pull a JSON object out of free-form model output.
///
/// Tries the whole text first, then the span from the first `{` to the last
/// `}` (which also covers fenced ```json blocks and trailing chatter).
pub fn extract_json_object(content: &str) -> Option<Value> {
    if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(content.trim()) {
        return Some(value);
    }

    let start = content.find('{')?;
    let end = content.rfind('}')?;
    if end <= start {
        return None;
    }
    match serde_json::from_str::<Value>(&content[start..=end]) {
        Ok(value @ Value::Object(_)) => Some(value),
        _ => None,
    }
}

/// Build a validated question from a decoded JSON value.
///
/// Returns `None` when the value is not an object or lacks a usable prompt
/// or canonical answer. Synonyms that normalize to nothing are dropped so a
/// blank submission can never match them.
pub fn question_from_value(value: &Value, request: &QuestionRequest) -> Option<Question> {
    let obj = value.as_object()?;

    let prompt = first_text(obj, &["questionPrompt", "prompt"])?;
    let canonical_answer = first_text(obj, &["canonicalAnswer", "answer"])
        .filter(|answer| !normalize_answer(answer).is_empty())?;

    let accepted_answers = match obj.get("acceptedAnswers") {
        Some(Value::Array(items)) => items
            .iter()
            .filter(|item| !normalize_value(item).is_empty())
            .filter_map(scalar_text)
            .collect(),
        _ => vec![canonical_answer.clone()],
    };

    let difficulty = obj
        .get("difficulty")
        .and_then(|d| d.as_u64())
        .and_then(|d| u32::try_from(d).ok())
        .filter(|d| (DEFAULT_MIN_GRADE..=DEFAULT_MAX_GRADE).contains(d))
        .unwrap_or(request.difficulty);

    Some(Question {
        prompt,
        canonical_answer,
        accepted_answers,
        explanation: first_text(obj, &["explanation"]).unwrap_or_default(),
        remediation: first_text(obj, &["remediation"]).unwrap_or_default(),
        difficulty,
    })
}

/// Parse raw model output into a question, or fall back to the built-in
/// question for the requested mode.
pub fn parse_question_output(content: &str, request: &QuestionRequest) -> Question {
    match extract_json_object(content).and_then(|v| question_from_value(&v, request)) {
        Some(question) => question,
        None => {
            tracing::warn!(
                mode = %request.mode,
                difficulty = request.difficulty,
                "unusable provider output, serving fallback question"
            );
            fallback_question(request.mode, request.difficulty)
        }
    }
}

fn first_text(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .filter_map(scalar_text)
        .find(|s| !s.is_empty())
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
