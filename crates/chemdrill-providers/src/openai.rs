//! OpenAI chat-completions question generator.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use chemdrill_core::error::ProviderError;
use chemdrill_core::model::{Mode, Question, QuestionRequest};
use chemdrill_core::traits::{parse_question_output, QuestionProvider};

use crate::http::{build_client, check_status, transport_error};

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
const TEMPERATURE: f64 = 0.2;
const MAX_TOKENS: u32 = 300;

const SYSTEM_PROMPT: &str = r#"You are a helpful chemistry question generator that outputs a single JSON object (no code block, no extra text). The JSON schema must be:
{
  "questionPrompt": string,
  "canonicalAnswer": string,
  "acceptedAnswers": [string],
  "explanation": string,
  "remediation": string,
  "difficulty": integer
}
questionPrompt is shown to the learner, canonicalAnswer is the short authoritative answer, acceptedAnswers are acceptable synonyms, explanation is 1-2 sentences, remediation is a one-sentence tip or follow-up mini-question, and difficulty repeats the requested level (6..12).
Be concise and ensure outputs are JSON-parseable."#;

/// Question provider backed by an OpenAI-compatible API.
pub struct OpenAiQuestionProvider {
    api_key: String,
    base_url: String,
    model: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl OpenAiQuestionProvider {
    pub fn new(
        api_key: &str,
        base_url: Option<String>,
        model: Option<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            api_key: api_key.to_string(),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            timeout,
            client: build_client(timeout)?,
        })
    }
}

/// The user message asking for one question of `request`'s kind.
pub fn user_prompt(request: &QuestionRequest) -> String {
    let topic = match request.mode {
        Mode::Acid => "Prefer real common acids.",
        Mode::Skeleton => "Prefer typical skeleton reactions.",
    };
    format!(
        "Generate ONE {} question at an educational level roughly matching US grade {}.\n\
         Return canonicalAnswer and at least 2 acceptedAnswers if possible.\n\
         {topic}\n\
         Keep questionPrompt short (one line). Keep explanation short (max 40 words). \
         Keep remediation to one sentence.",
        request.mode.describe(),
        request.difficulty,
    )
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    max_tokens: u32,
    temperature: f64,
    messages: Vec<ChatMessage>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl QuestionProvider for OpenAiQuestionProvider {
    fn name(&self) -> &str {
        "openai"
    }

    #[instrument(skip(self, request), fields(model = %self.model, mode = %request.mode))]
    async fn fetch_question(&self, request: &QuestionRequest) -> anyhow::Result<Question> {
        let request = request.clamped();

        let body = ChatRequest {
            model: self.model.clone(),
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_prompt(&request),
                },
            ],
        };

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| transport_error(e, self.timeout))?;
        let response = check_status(response).await?;

        let api_response: ChatResponse =
            response
                .json()
                .await
                .map_err(|e| ProviderError::ApiError {
                    status: 0,
                    message: format!("failed to parse response: {e}"),
                })?;

        let content = api_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        Ok(parse_question_output(&content, &request))
    }
}
