//! Client for a deployed quiz service exposing `/api/generate` and
//! `/api/attempt`.

use std::time::Duration;

use async_trait::async_trait;
use tracing::instrument;

use chemdrill_core::error::ProviderError;
use chemdrill_core::model::{AttemptRecord, Question, QuestionRequest};
use chemdrill_core::traits::{parse_question_output, AttemptSink, QuestionProvider};

use crate::http::{build_client, check_status, transport_error};

/// Question provider and attempt sink backed by a remote quiz service.
pub struct RemoteQuizService {
    base_url: String,
    token: Option<String>,
    timeout: Duration,
    client: reqwest::Client,
}

impl RemoteQuizService {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> anyhow::Result<Self> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            timeout,
            client: build_client(timeout)?,
        })
    }

    fn post(&self, route: &str) -> reqwest::RequestBuilder {
        let req = self
            .client
            .post(format!("{}{route}", self.base_url))
            .header("content-type", "application/json");
        match &self.token {
            Some(token) => req.header("Authorization", format!("Bearer {token}")),
            None => req,
        }
    }
}

#[async_trait]
impl QuestionProvider for RemoteQuizService {
    fn name(&self) -> &str {
        "remote"
    }

    #[instrument(skip(self, request), fields(mode = %request.mode, difficulty = request.difficulty))]
    async fn fetch_question(&self, request: &QuestionRequest) -> anyhow::Result<Question> {
        let request = request.clamped();
        let response = self
            .post("/api/generate")
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error(e, self.timeout))?;
        let response = check_status(response).await?;

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;
        Ok(parse_question_output(&body, &request))
    }
}

#[async_trait]
impl AttemptSink for RemoteQuizService {
    async fn record_attempt(&self, attempt: &AttemptRecord) -> anyhow::Result<()> {
        let response = self
            .post("/api/attempt")
            .json(attempt)
            .send()
            .await
            .map_err(|e| transport_error(e, self.timeout))?;
        check_status(response).await?;
        Ok(())
    }
}
