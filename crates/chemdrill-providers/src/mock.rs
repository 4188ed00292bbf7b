//! Mock provider and sink for testing sessions without a backend.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use chemdrill_core::error::ProviderError;
use chemdrill_core::fallback::fallback_question;
use chemdrill_core::model::{AttemptRecord, Question, QuestionRequest};
use chemdrill_core::traits::{AttemptSink, QuestionProvider};

/// A scripted question provider.
///
/// Serves queued responses in order, then the fallback question for the
/// requested mode once the queue is empty.
pub struct MockQuestionProvider {
    /// Queued responses; `Err` carries a network error message.
    responses: Mutex<VecDeque<Result<Question, String>>>,
    /// Number of calls made.
    call_count: AtomicU32,
    /// Last request received.
    last_request: Mutex<Option<QuestionRequest>>,
}

impl MockQuestionProvider {
    pub fn new(responses: Vec<Result<Question, String>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// A mock that always serves the fallback questions.
    pub fn fallback_only() -> Self {
        Self::new(Vec::new())
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    pub fn last_request(&self) -> Option<QuestionRequest> {
        self.last_request.lock().ok().and_then(|r| *r)
    }
}

#[async_trait]
impl QuestionProvider for MockQuestionProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch_question(&self, request: &QuestionRequest) -> anyhow::Result<Question> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut last) = self.last_request.lock() {
            *last = Some(*request);
        }

        let next = self.responses.lock().ok().and_then(|mut q| q.pop_front());
        match next {
            Some(Ok(question)) => Ok(question),
            Some(Err(message)) => Err(ProviderError::NetworkError(message).into()),
            None => Ok(fallback_question(request.mode, request.difficulty)),
        }
    }
}

/// An attempt sink that records everything it receives, or always fails.
#[derive(Default)]
pub struct MockAttemptSink {
    records: Mutex<Vec<AttemptRecord>>,
    fail: bool,
}

impl MockAttemptSink {
    pub fn failing() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn records(&self) -> Vec<AttemptRecord> {
        self.records.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl AttemptSink for MockAttemptSink {
    async fn record_attempt(&self, attempt: &AttemptRecord) -> anyhow::Result<()> {
        if self.fail {
            anyhow::bail!("mock sink configured to fail");
        }
        if let Ok(mut records) = self.records.lock() {
            records.push(attempt.clone());
        }
        Ok(())
    }
}
