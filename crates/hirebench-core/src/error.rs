//! Error types shared across the workspace.
//!
//! `ProviderError` lives here so the retry wrapper and the question provider
//! can classify failures by variant instead of matching on message text.

use thiserror::Error;

/// Errors that can occur when talking to the generative-text backend.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The backend returned HTTP 429.
    #[error("rate limited (HTTP 429)")]
    RateLimited,

    /// The backend returned a 5xx status.
    #[error("server error (HTTP {status}): {message}")]
    Server { status: u16, message: String },

    /// The backend returned any other non-success status.
    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred before a response arrived.
    #[error("network error: {0}")]
    Network(String),

    /// The response arrived but did not contain what we asked for.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// No backend credential is configured.
    #[error("missing backend credential: {0}")]
    MissingCredential(String),
}

impl ProviderError {
    /// Returns `true` for failures worth retrying (HTTP 429 and 5xx).
    pub fn is_transient(&self) -> bool {
        matches!(self, ProviderError::RateLimited | ProviderError::Server { .. })
    }

    /// The HTTP status that produced this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ProviderError::RateLimited => Some(429),
            ProviderError::Server { status, .. } | ProviderError::Http { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// Build the error for a non-success HTTP status.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        match status {
            429 => ProviderError::RateLimited,
            500..=599 => ProviderError::Server {
                status,
                message: message.into(),
            },
            _ => ProviderError::Http {
                status,
                message: message.into(),
            },
        }
    }
}

/// Errors from turning source text into a callable function.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// The source could not be parsed.
    #[error("SyntaxError: {0}")]
    Syntax(String),

    /// No callable with the requested name exists after loading.
    #[error("Function {0} not found")]
    NotFound(String),

    /// Top-level code threw while the source was being evaluated.
    #[error("{0}")]
    Evaluation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_status_codes() {
        assert!(ProviderError::from_status(429, "").is_transient());
        assert!(ProviderError::from_status(500, "").is_transient());
        assert!(ProviderError::from_status(503, "unavailable").is_transient());
        assert!(!ProviderError::from_status(400, "bad").is_transient());
        assert!(!ProviderError::from_status(401, "").is_transient());
        assert!(!ProviderError::from_status(404, "").is_transient());
        assert_eq!(ProviderError::from_status(404, "").status(), Some(404));
    }

    #[test]
    fn non_http_errors_are_not_transient() {
        assert!(!ProviderError::Timeout(30).is_transient());
        assert!(!ProviderError::Network("refused".into()).is_transient());
        assert!(!ProviderError::MalformedResponse("no array".into()).is_transient());
        assert_eq!(ProviderError::Network("x".into()).status(), None);
    }

    #[test]
    fn load_error_messages() {
        assert_eq!(
            LoadError::NotFound("solve".into()).to_string(),
            "Function solve not found"
        );
        assert!(LoadError::Syntax("unexpected token".into())
            .to_string()
            .starts_with("SyntaxError"));
    }
}
