//! Provider that serves the built-in questions without any network access.

use async_trait::async_trait;

use chemdrill_core::fallback::fallback_question;
use chemdrill_core::model::{Question, QuestionRequest};
use chemdrill_core::traits::QuestionProvider;

pub struct OfflineProvider;

#[async_trait]
impl QuestionProvider for OfflineProvider {
    fn name(&self) -> &str {
        "offline"
    }

    async fn fetch_question(&self, request: &QuestionRequest) -> anyhow::Result<Question> {
        let request = request.clamped();
        Ok(fallback_question(request.mode, request.difficulty))
    }
}
