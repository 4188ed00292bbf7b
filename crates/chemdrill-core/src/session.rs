//! Session orchestration.
//!
//! [`grade_and_advance`] is the pure step: grade an answer and compute the
//! next state. [`QuizSession`] threads that state through a run, talks to the
//! question provider and attempt sink, and keeps the recent-attempts log.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::adaptive::{decide_next_state, AdaptivePolicy, SessionState};
use crate::error::{ProviderError, SessionError};
use crate::grading::{grade, Grade};
use crate::history::{Attempt, AttemptHistory};
use crate::model::{AttemptRecord, Mode, Question, QuestionRequest};
use crate::traits::{AttemptSink, QuestionProvider};

const DEFAULT_SINK_TIMEOUT: Duration = Duration::from_secs(5);

/// Grade `answer` and compute the state that follows it.
pub fn grade_and_advance(
    state: SessionState,
    question: &Question,
    answer: &str,
    policy: &AdaptivePolicy,
) -> (SessionState, Grade) {
    let graded = grade(answer, question);
    let next = decide_next_state(state, graded.correct, policy);
    (next, graded)
}

/// What the session currently has on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionSlot {
    /// Nothing loaded yet, or a load is in flight.
    Empty,
    Ready(Question),
    /// The provider failed; the learner has to retry manually.
    Unavailable(String),
}

/// Result of one submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub correct: bool,
    pub expected: String,
    pub explanation: String,
    pub remediation: String,
    /// State the question was answered in.
    pub previous: SessionState,
    /// State after the answer; the next question is requested at this level.
    pub next: SessionState,
}

/// One learner's run through the quiz.
pub struct QuizSession {
    provider: Arc<dyn QuestionProvider>,
    sink: Arc<dyn AttemptSink>,
    policy: AdaptivePolicy,
    mode: Mode,
    start: SessionState,
    state: SessionState,
    history: AttemptHistory,
    slot: QuestionSlot,
    sink_timeout: Duration,
}

impl QuizSession {
    pub fn new(
        provider: Arc<dyn QuestionProvider>,
        sink: Arc<dyn AttemptSink>,
        mode: Mode,
        policy: AdaptivePolicy,
    ) -> Self {
        let start = SessionState::start(&policy);
        Self {
            provider,
            sink,
            policy,
            mode,
            start,
            state: start,
            history: AttemptHistory::default(),
            slot: QuestionSlot::Empty,
            sink_timeout: DEFAULT_SINK_TIMEOUT,
        }
    }

    /// Begin (and reset to) `difficulty`, clamped into the policy bounds.
    pub fn with_start_difficulty(mut self, difficulty: u32) -> Self {
        self.start = SessionState::new(self.policy.clamp(difficulty), 0);
        self.state = self.start;
        self
    }

    /// Upper bound on how long a submission waits for the attempt sink.
    pub fn with_sink_timeout(mut self, timeout: Duration) -> Self {
        self.sink_timeout = timeout;
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn policy(&self) -> &AdaptivePolicy {
        &self.policy
    }

    pub fn history(&self) -> &AttemptHistory {
        &self.history
    }

    pub fn slot(&self) -> &QuestionSlot {
        &self.slot
    }

    pub fn current_question(&self) -> Option<&Question> {
        match &self.slot {
            QuestionSlot::Ready(q) => Some(q),
            _ => None,
        }
    }

    /// Request a question for the current mode and difficulty.
    pub async fn load_question(&mut self) -> &QuestionSlot {
        self.slot = QuestionSlot::Empty;
        let request = QuestionRequest::new(self.mode, self.state.difficulty);

        self.slot = match self.provider.fetch_question(&request).await {
            Ok(question) => {
                tracing::debug!(
                    provider = self.provider.name(),
                    difficulty = request.difficulty,
                    "question loaded"
                );
                QuestionSlot::Ready(question)
            }
            Err(e) => {
                let permanent = e
                    .downcast_ref::<ProviderError>()
                    .is_some_and(ProviderError::is_permanent);
                tracing::warn!(
                    provider = self.provider.name(),
                    permanent,
                    "could not load question: {e:#}"
                );
                QuestionSlot::Unavailable(format!("could not load question: {e}"))
            }
        };
        &self.slot
    }

    /// Reload after a failed load.
    pub async fn retry(&mut self) -> &QuestionSlot {
        self.load_question().await
    }

    /// Switch practice mode and load a question for it.
    pub async fn set_mode(&mut self, mode: Mode) -> &QuestionSlot {
        self.mode = mode;
        self.load_question().await
    }

    /// Return to the starting difficulty with a cleared streak.
    pub async fn reset(&mut self) -> &QuestionSlot {
        self.state = self.start;
        self.load_question().await
    }

    /// Grade `answer` against the current question and move on.
    ///
    /// The state transition and history entry are applied before any await,
    /// and the graded question is consumed, so dropping this future part-way
    /// leaves the session consistent with an empty slot.
    pub async fn submit(&mut self, answer: &str) -> Result<Feedback, SessionError> {
        let question = match std::mem::replace(&mut self.slot, QuestionSlot::Empty) {
            QuestionSlot::Ready(q) => q,
            other => {
                self.slot = other;
                return Err(SessionError::NoActiveQuestion);
            }
        };

        let previous = self.state;
        let (next, graded) = grade_and_advance(previous, &question, answer, &self.policy);
        self.state = next;
        self.history.push(Attempt {
            prompt: question.prompt.clone(),
            answer: answer.to_string(),
            correct: graded.correct,
            expected: graded.expected.clone(),
        });
        tracing::info!(
            correct = graded.correct,
            difficulty = next.difficulty,
            streak = next.streak,
            "answer graded"
        );

        let record = AttemptRecord::new(
            self.mode,
            previous.difficulty,
            question.prompt.as_str(),
            answer,
            graded.correct,
        );
        match tokio::time::timeout(self.sink_timeout, self.sink.record_attempt(&record)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::debug!("attempt sink failed, ignoring: {e:#}"),
            Err(_) => tracing::debug!("attempt sink timed out, ignoring"),
        }

        self.load_question().await;

        Ok(Feedback {
            correct: graded.correct,
            expected: graded.expected,
            explanation: question.explanation,
            remediation: question.remediation,
            previous,
            next,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Mutex;
    use std::task::Poll;

    use async_trait::async_trait;

    /// Serves `Q{difficulty}` with answer "water", or scripted failures.
    struct ScriptedProvider {
        failures: Mutex<VecDeque<ProviderError>>,
        requests: Mutex<Vec<QuestionRequest>>,
    }

    impl ScriptedProvider {
        fn new() -> Self {
            Self {
                failures: Mutex::new(VecDeque::new()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn failing_with(errors: Vec<ProviderError>) -> Self {
            Self {
                failures: Mutex::new(errors.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<QuestionRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl QuestionProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn fetch_question(&self, request: &QuestionRequest) -> anyhow::Result<Question> {
            self.requests.lock().unwrap().push(*request);
            if let Some(err) = self.failures.lock().unwrap().pop_front() {
                return Err(err.into());
            }
            Ok(Question {
                prompt: format!("Q{}", request.difficulty),
                canonical_answer: "water".into(),
                accepted_answers: vec!["H2O".into()],
                explanation: "It is water.".into(),
                remediation: "Think about oceans.".into(),
                difficulty: request.difficulty,
            })
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        records: Mutex<Vec<AttemptRecord>>,
    }

    #[async_trait]
    impl AttemptSink for RecordingSink {
        async fn record_attempt(&self, attempt: &AttemptRecord) -> anyhow::Result<()> {
            self.records.lock().unwrap().push(attempt.clone());
            Ok(())
        }
    }

    struct FailingSink;

    #[async_trait]
    impl AttemptSink for FailingSink {
        async fn record_attempt(&self, _: &AttemptRecord) -> anyhow::Result<()> {
            anyhow::bail!("sink offline")
        }
    }

    struct HangingSink;

    #[async_trait]
    impl AttemptSink for HangingSink {
        async fn record_attempt(&self, _: &AttemptRecord) -> anyhow::Result<()> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(())
        }
    }

    fn session_with(
        provider: Arc<ScriptedProvider>,
        sink: Arc<dyn AttemptSink>,
    ) -> QuizSession {
        QuizSession::new(provider, sink, Mode::Acid, AdaptivePolicy::default())
    }

    #[test]
    fn pure_step_matches_controller() {
        let question = Question {
            prompt: "Name HCl".into(),
            canonical_answer: "hydrochloric acid".into(),
            accepted_answers: vec![],
            explanation: String::new(),
            remediation: String::new(),
            difficulty: 6,
        };
        let policy = AdaptivePolicy::default();
        let (next, graded) =
            grade_and_advance(SessionState::new(6, 1), &question, "Hydrochloric acid.", &policy);
        assert!(graded.correct);
        assert_eq!(next, SessionState::new(7, 0));

        let (next, graded) = grade_and_advance(next, &question, "chloric acid", &policy);
        assert!(!graded.correct);
        assert_eq!(next, SessionState::new(6, 0));
    }

    #[tokio::test]
    async fn end_to_end_progression() {
        let provider = Arc::new(ScriptedProvider::new());
        let sink = Arc::new(RecordingSink::default());
        let mut session = session_with(provider.clone(), sink.clone());

        session.load_question().await;
        let mut states = Vec::new();
        for answer in ["Water", "h2o.", "ice", "water"] {
            let feedback = session.submit(answer).await.unwrap();
            states.push((feedback.next.difficulty, feedback.next.streak));
        }

        assert_eq!(states, vec![(6, 1), (7, 0), (6, 0), (6, 1)]);
        assert_eq!(session.state(), SessionState::new(6, 1));

        let requested: Vec<u32> = provider.requests().iter().map(|r| r.difficulty).collect();
        assert_eq!(requested, vec![6, 6, 7, 6, 6]);

        let records = sink.records.lock().unwrap();
        let posted: Vec<(u32, bool)> = records.iter().map(|r| (r.difficulty, r.correct)).collect();
        assert_eq!(posted, vec![(6, true), (6, true), (7, false), (6, true)]);
        assert_eq!(records[2].user_answer, "ice");
        assert_eq!(records[2].question_prompt, "Q7");
    }

    #[tokio::test]
    async fn history_is_newest_first() {
        let provider = Arc::new(ScriptedProvider::new());
        let mut session = session_with(provider, Arc::new(RecordingSink::default()));

        session.load_question().await;
        session.submit("water").await.unwrap();
        session.submit("fire").await.unwrap();

        let entries: Vec<_> = session.history().iter().collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].answer, "fire");
        assert!(!entries[0].correct);
        assert_eq!(entries[0].expected, "water");
        assert_eq!(entries[1].answer, "water");
    }

    #[tokio::test]
    async fn feedback_carries_question_details() {
        let provider = Arc::new(ScriptedProvider::new());
        let mut session = session_with(provider, Arc::new(RecordingSink::default()));

        session.load_question().await;
        let feedback = session.submit("steam").await.unwrap();
        assert!(!feedback.correct);
        assert_eq!(feedback.expected, "water");
        assert_eq!(feedback.explanation, "It is water.");
        assert_eq!(feedback.remediation, "Think about oceans.");
        assert_eq!(feedback.previous, SessionState::new(6, 0));
        assert_eq!(feedback.next, SessionState::new(6, 0));
    }

    #[tokio::test]
    async fn sink_failure_does_not_affect_progression() {
        let provider = Arc::new(ScriptedProvider::new());
        let mut session = session_with(provider, Arc::new(FailingSink));

        session.load_question().await;
        session.submit("water").await.unwrap();
        let feedback = session.submit("water").await.unwrap();
        assert_eq!(feedback.next, SessionState::new(7, 0));
        assert!(session.current_question().is_some());
        assert_eq!(session.history().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_sink_is_abandoned() {
        let provider = Arc::new(ScriptedProvider::new());
        let mut session = session_with(provider, Arc::new(HangingSink))
            .with_sink_timeout(Duration::from_millis(50));

        session.load_question().await;
        let feedback = session.submit("water").await.unwrap();
        assert!(feedback.correct);
        assert!(session.current_question().is_some());
    }

    #[tokio::test]
    async fn provider_failure_shows_unavailable_until_retry() {
        let provider = Arc::new(ScriptedProvider::failing_with(vec![
            ProviderError::NetworkError("connection refused".into()),
        ]));
        let mut session = session_with(provider.clone(), Arc::new(RecordingSink::default()));

        let slot = session.load_question().await;
        assert!(matches!(slot, QuestionSlot::Unavailable(msg) if msg.contains("connection refused")));
        assert_eq!(
            session.submit("water").await,
            Err(SessionError::NoActiveQuestion)
        );
        assert!(matches!(session.slot(), QuestionSlot::Unavailable(_)));
        assert_eq!(session.state(), SessionState::new(6, 0));
        assert!(session.history().is_empty());

        session.retry().await;
        assert!(session.current_question().is_some());
        assert_eq!(provider.requests().len(), 2);
    }

    #[tokio::test]
    async fn failed_next_load_keeps_new_state() {
        let provider = Arc::new(ScriptedProvider::new());
        let mut session = session_with(provider.clone(), Arc::new(RecordingSink::default()));
        session.load_question().await;
        session.submit("water").await.unwrap();

        provider
            .failures
            .lock()
            .unwrap()
            .push_back(ProviderError::Timeout(30));
        let feedback = session.submit("water").await.unwrap();
        assert_eq!(feedback.next, SessionState::new(7, 0));
        assert_eq!(session.state(), SessionState::new(7, 0));
        assert!(matches!(session.slot(), QuestionSlot::Unavailable(_)));
    }

    #[tokio::test]
    async fn submit_without_question_is_rejected() {
        let provider = Arc::new(ScriptedProvider::new());
        let mut session = session_with(provider, Arc::new(RecordingSink::default()));
        assert_eq!(
            session.submit("water").await,
            Err(SessionError::NoActiveQuestion)
        );
    }

    #[tokio::test]
    async fn question_cannot_be_graded_twice_after_abandoned_submit() {
        let provider = Arc::new(ScriptedProvider::new());
        let mut session = session_with(provider, Arc::new(HangingSink))
            .with_sink_timeout(Duration::from_secs(3600));
        session.load_question().await;

        // Poll the submission once and drop it while it waits on the sink.
        {
            let fut = session.submit("water");
            tokio::pin!(fut);
            let polled = poll_once(fut.as_mut()).await;
            assert!(polled.is_none());
        }

        assert_eq!(session.state(), SessionState::new(6, 1));
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.slot(), &QuestionSlot::Empty);
        assert_eq!(
            session.submit("water").await,
            Err(SessionError::NoActiveQuestion)
        );
    }

    async fn poll_once<F: Future + Unpin>(mut fut: F) -> Option<F::Output> {
        std::future::poll_fn(|cx| {
            Poll::Ready(match Pin::new(&mut fut).poll(cx) {
                Poll::Ready(v) => Some(v),
                Poll::Pending => None,
            })
        })
        .await
    }

    #[tokio::test]
    async fn reset_and_mode_switch_reload() {
        let provider = Arc::new(ScriptedProvider::new());
        let mut session = session_with(provider.clone(), Arc::new(RecordingSink::default()))
            .with_start_difficulty(8);
        assert_eq!(session.state(), SessionState::new(8, 0));

        session.load_question().await;
        session.submit("water").await.unwrap();
        session.submit("water").await.unwrap();
        assert_eq!(session.state(), SessionState::new(9, 0));

        session.reset().await;
        assert_eq!(session.state(), SessionState::new(8, 0));

        session.set_mode(Mode::Skeleton).await;
        assert_eq!(session.mode(), Mode::Skeleton);
        let last = *provider.requests().last().unwrap();
        assert_eq!(last, QuestionRequest::new(Mode::Skeleton, 8));
    }

    #[test]
    fn start_difficulty_is_clamped() {
        let provider = Arc::new(ScriptedProvider::new());
        let session = session_with(provider.clone(), Arc::new(RecordingSink::default()))
            .with_start_difficulty(40);
        assert_eq!(session.state(), SessionState::new(12, 0));
        let session = session_with(provider, Arc::new(RecordingSink::default()))
            .with_start_difficulty(0);
        assert_eq!(session.state(), SessionState::new(6, 0));
    }

    #[test]
    fn inverted_policy_does_not_panic_on_start() {
        let policy = AdaptivePolicy {
            up_threshold: 2,
            min_grade: 12,
            max_grade: 6,
        };
        let session = QuizSession::new(
            Arc::new(ScriptedProvider::new()),
            Arc::new(RecordingSink::default()),
            Mode::Acid,
            policy,
        )
        .with_start_difficulty(8);
        assert_eq!(session.state(), SessionState::new(6, 0));
    }
}
