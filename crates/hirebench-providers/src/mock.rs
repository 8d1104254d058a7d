//! Mock generator for testing.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use hirebench_core::traits::{GenerateRequest, GenerateResponse, TextGenerator};

use crate::ProviderError;

/// A scripted backend for exercising the provider without network calls.
///
/// Queued outcomes are returned first, in order; after that every call gets
/// the default response.
pub struct MockGenerator {
    queued: Mutex<VecDeque<Result<String, ProviderError>>>,
    default_response: String,
    call_count: AtomicU32,
    last_request: Mutex<Option<GenerateRequest>>,
}

impl MockGenerator {
    /// A mock that always answers with `response`.
    pub fn with_fixed_response(response: &str) -> Self {
        Self {
            queued: Mutex::new(VecDeque::new()),
            default_response: response.to_string(),
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Queue an outcome for the next unanswered call.
    pub fn then(self, outcome: Result<String, ProviderError>) -> Self {
        if let Ok(mut queued) = self.queued.lock() {
            queued.push_back(outcome);
        }
        self
    }

    /// Number of calls made to this generator.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// The last request received.
    pub fn last_request(&self) -> Option<GenerateRequest> {
        self.last_request.lock().ok().and_then(|r| r.clone())
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, ProviderError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut last) = self.last_request.lock() {
            *last = Some(request.clone());
        }

        let next = self.queued.lock().ok().and_then(|mut q| q.pop_front());
        let text = match next {
            Some(outcome) => outcome?,
            None => self.default_response.clone(),
        };

        Ok(GenerateResponse {
            text,
            model: "mock-model".to_string(),
            latency_ms: 1,
        })
    }
}
