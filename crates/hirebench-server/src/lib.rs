//! hirebench-server: optional HTTP proxy and evaluation endpoint.
//!
//! Keeps the backend API key on the server side, evaluates submissions, and
//! serves the static front end with an `index.html` fallback.

pub mod api;
pub mod assets;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{DefaultBodyLimit, Request};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{middleware, Router};

use hirebench_core::engine::{Evaluator, EvaluatorConfig};
use hirebench_core::traits::TextGenerator;
use hirebench_providers::HirebenchConfig;
use hirebench_runner::{JsLoader, JsLoaderConfig};

/// Request bodies larger than this are rejected.
const BODY_LIMIT_BYTES: usize = 2 * 1024 * 1024;

/// Shared state for all handlers.
#[derive(Clone)]
pub struct AppState {
    /// `None` when no API key is configured; proxy routes then answer 500.
    pub generator: Option<Arc<dyn TextGenerator>>,
    pub evaluator: Arc<Evaluator<JsLoader>>,
    pub static_dir: PathBuf,
}

impl AppState {
    pub fn from_config(config: &HirebenchConfig) -> Result<Self> {
        Ok(Self {
            generator: config.create_generator()?,
            evaluator: Arc::new(evaluator_from_config(config)),
            static_dir: config.server.static_dir.clone(),
        })
    }
}

/// An evaluator using the engine limits and time budget from `config`.
pub fn evaluator_from_config(config: &HirebenchConfig) -> Evaluator<JsLoader> {
    let loader = JsLoader::new(JsLoaderConfig {
        loop_iteration_limit: config.evaluation.loop_iteration_limit,
        recursion_limit: config.evaluation.recursion_limit,
    });
    Evaluator::new(
        loader,
        EvaluatorConfig {
            time_budget: config.evaluation.time_budget(),
            max_in_flight: config.evaluation.max_in_flight,
            ..EvaluatorConfig::default()
        },
    )
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(api::health))
        .route("/api/quiz-questions", post(api::quiz_questions))
        .route("/api/coding-question", post(api::coding_question))
        .route("/api/evaluate", post(api::evaluate))
        .fallback(assets::static_or_index)
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
        .layer(middleware::from_fn(cors))
        .with_state(state)
}

/// Allow any origin. Preflight requests are answered here, before routing,
/// since the API routes only accept GET or POST.
async fn cors(request: Request, next: Next) -> Response {
    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(request).await
    };

    let headers = response.headers_mut();
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static("GET, POST, OPTIONS"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("content-type"),
    );
    response
}

/// Bind to `port` on all interfaces and serve until the process ends.
pub async fn serve(state: AppState, port: u16) -> Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    if state.generator.is_none() {
        tracing::warn!("GEMINI_API_KEY is not set; question proxy routes will return 500");
    }
    tracing::info!(static_dir = %state.static_dir.display(), "Server running at http://127.0.0.1:{port}");

    axum::serve(listener, router(state))
        .await
        .context("server stopped with an error")
}
