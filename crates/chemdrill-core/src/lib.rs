//! chemdrill-core: answer grading, adaptive difficulty, and session flow.
//!
//! The normalizer, grading predicate, and difficulty controller are pure
//! functions. The session module composes them with the asynchronous
//! question provider and attempt sink defined in [`traits`].

pub mod adaptive;
pub mod error;
pub mod fallback;
pub mod grading;
pub mod history;
pub mod model;
pub mod normalize;
pub mod session;
pub mod traits;

pub use adaptive::{decide_next_state, AdaptivePolicy, SessionState};
pub use error::{ProviderError, SessionError};
pub use grading::{grade, is_correct, Grade};
pub use model::{AttemptRecord, Mode, Question, QuestionRequest};
pub use normalize::{normalize_answer, normalize_value};
pub use session::{Feedback, QuestionSlot, QuizSession};
