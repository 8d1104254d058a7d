//! JSON API handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use hirebench_core::model::{EvaluationResult, Language, QuestionSpec};
use hirebench_core::traits::{parse_first_json_array, GenerateRequest};
use hirebench_providers::prompts::{
    proxy_coding_prompt, proxy_quiz_prompt, CODING_PROXY_TEMPERATURE,
};
use hirebench_providers::ProviderError;

use crate::AppState;

/// An error answered as `{"error": message}` with the given status.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<ProviderError> for ApiError {
    fn from(e: ProviderError) -> Self {
        match &e {
            ProviderError::MalformedResponse(_) => {
                ApiError::new(StatusCode::BAD_GATEWAY, "Invalid AI response")
            }
            _ => match e.status().and_then(|s| StatusCode::from_u16(s).ok()) {
                Some(status) => ApiError::new(status, format!("Upstream error {}", status.as_u16())),
                None => ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DomainRequest {
    #[serde(default)]
    pub domain: String,
}

#[derive(Debug, Serialize)]
pub struct QuizResponse {
    pub questions: Value,
}

#[derive(Debug, Serialize)]
pub struct CodingResponse {
    pub question: Value,
}

#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    pub source: String,
    #[serde(default)]
    pub language: Language,
    pub question: QuestionSpec,
}

pub async fn health() -> Json<Value> {
    Json(json!({ "ok": true }))
}

/// Proxy a quiz prompt. The reply is passed through unvalidated.
pub async fn quiz_questions(
    State(state): State<AppState>,
    Json(req): Json<DomainRequest>,
) -> Result<Json<QuizResponse>, ApiError> {
    let request = GenerateRequest::new(proxy_quiz_prompt(&req.domain));
    let questions = proxy_array(&state, &request).await?;
    Ok(Json(QuizResponse {
        questions: Value::Array(questions),
    }))
}

/// Proxy a coding prompt and return the first question of the reply.
pub async fn coding_question(
    State(state): State<AppState>,
    Json(req): Json<DomainRequest>,
) -> Result<Json<CodingResponse>, ApiError> {
    let request = GenerateRequest::new(proxy_coding_prompt(&req.domain))
        .with_temperature(CODING_PROXY_TEMPERATURE);
    let mut items = proxy_array(&state, &request).await?;
    let question = if items.is_empty() {
        Value::Null
    } else {
        items.swap_remove(0)
    };
    Ok(Json(CodingResponse { question }))
}

/// Evaluate a submission against the question it was written for.
pub async fn evaluate(
    State(state): State<AppState>,
    Json(req): Json<EvaluateRequest>,
) -> Result<Json<EvaluationResult>, ApiError> {
    let evaluator = state.evaluator.clone();
    let EvaluateRequest {
        source,
        language,
        question,
    } = req;

    let result = tokio::task::spawn_blocking(move || {
        evaluator.evaluate_submission(&source, language, &question)
    })
    .await
    .map_err(|e| {
        tracing::error!("evaluation task failed: {e}");
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "evaluation failed")
    })?;

    Ok(Json(result))
}

/// One backend call, no retry, no fallback. Arrays are found the same way
/// the question provider finds them.
async fn proxy_array(state: &AppState, request: &GenerateRequest) -> Result<Vec<Value>, ApiError> {
    let generator = state.generator.as_ref().ok_or_else(|| {
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Missing GEMINI_API_KEY")
    })?;

    let response = generator.generate(request).await.map_err(|e| {
        tracing::warn!(backend = generator.name(), "proxy request failed: {e}");
        ApiError::from(e)
    })?;

    let items = parse_first_json_array(&response.text)
        .ok_or_else(|| ApiError::new(StatusCode::BAD_GATEWAY, "Invalid AI response"))?;
    Ok(items)
}
