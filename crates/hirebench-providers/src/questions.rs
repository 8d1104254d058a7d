//! Question provider: backend call, extraction, validation, fallback.

use std::sync::Arc;

use tracing::instrument;

use hirebench_core::model::{QuestionSpec, QuizQuestion};
use hirebench_core::parser::{parse_coding_questions, parse_quiz_questions};
use hirebench_core::traits::{parse_first_json_array, GenerateRequest, TextGenerator};

use crate::fallback::{fallback_coding_questions, fallback_quiz_questions};
use crate::prompts::{coding_prompt, quiz_prompt};
use crate::retry::{retry_with_backoff, RetryPolicy, Sleeper, TokioSleeper};
use crate::ProviderError;

/// Fetches quiz and coding questions for a domain.
///
/// Every failure (missing credential, network, HTTP status after retries,
/// unparseable or mis-shaped output) is logged and answered with the static
/// fallback set, so callers always get usable questions.
pub struct QuestionProvider {
    generator: Option<Arc<dyn TextGenerator>>,
    retry: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl QuestionProvider {
    pub fn new(generator: Arc<dyn TextGenerator>, retry: RetryPolicy) -> Self {
        Self {
            generator: Some(generator),
            retry,
            sleeper: Arc::new(TokioSleeper),
        }
    }

    /// A provider with no backend; it always serves the fallback sets.
    pub fn offline() -> Self {
        Self {
            generator: None,
            retry: RetryPolicy::none(),
            sleeper: Arc::new(TokioSleeper),
        }
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Exactly twenty quiz questions for `domain`.
    #[instrument(skip(self))]
    pub async fn fetch_quiz_questions(&self, domain: &str) -> Vec<QuizQuestion> {
        match self.try_fetch_quiz(domain).await {
            Ok(questions) => questions,
            Err(e) => {
                tracing::error!("quiz generation failed, using fallback questions: {e}");
                fallback_quiz_questions()
            }
        }
    }

    /// Exactly one coding question for `domain`.
    #[instrument(skip(self))]
    pub async fn fetch_coding_questions(&self, domain: &str) -> Vec<QuestionSpec> {
        match self.try_fetch_coding(domain).await {
            Ok(questions) => questions,
            Err(e) => {
                tracing::error!("coding question generation failed, using fallback: {e}");
                fallback_coding_questions()
            }
        }
    }

    async fn try_fetch_quiz(&self, domain: &str) -> Result<Vec<QuizQuestion>, ProviderError> {
        let items = self.fetch_array(GenerateRequest::new(quiz_prompt(domain))).await?;
        parse_quiz_questions(&items)
    }

    async fn try_fetch_coding(&self, domain: &str) -> Result<Vec<QuestionSpec>, ProviderError> {
        let items = self
            .fetch_array(GenerateRequest::new(coding_prompt(domain)))
            .await?;
        parse_coding_questions(&items)
    }

    /// Send `request` with retries and return the first JSON array in the
    /// reply.
    async fn fetch_array(
        &self,
        request: GenerateRequest,
    ) -> Result<Vec<serde_json::Value>, ProviderError> {
        let generator = self
            .generator
            .as_ref()
            .ok_or_else(|| ProviderError::MissingCredential("no backend configured".into()))?;

        let request = &request;
        let response = retry_with_backoff(&self.retry, self.sleeper.as_ref(), move |_| {
            generator.generate(request)
        })
        .await?;

        tracing::debug!(
            backend = generator.name(),
            latency_ms = response.latency_ms,
            "backend responded"
        );

        parse_first_json_array(&response.text).ok_or_else(|| {
            ProviderError::MalformedResponse("no JSON array found in response".to_string())
        })
    }
}
