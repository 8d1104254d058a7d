//! hirebench-providers: question generation backends.
//!
//! Talks to the Gemini `generateContent` API, retries transient failures,
//! and validates what comes back. When anything goes wrong the
//! [`QuestionProvider`] serves a static fallback set instead.

pub mod config;
pub mod fallback;
pub mod gemini;
pub mod mock;
pub mod prompts;
pub mod questions;
pub mod retry;

pub use config::{load_config, load_config_from, HirebenchConfig};
pub use hirebench_core::error::ProviderError;
pub use questions::QuestionProvider;
pub use retry::{retry_with_backoff, RetryPolicy};
