//! Core trait definitions for text backends and code loaders.
//!
//! `TextGenerator` is implemented by `hirebench-providers`; `CodeLoader` by
//! `hirebench-runner`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{LoadError, ProviderError};
use crate::model::Actual;

// ---------------------------------------------------------------------------
// Text generation backend
// ---------------------------------------------------------------------------

/// Trait for generative-text backends that answer a prompt with free text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Human-readable backend name (e.g. "gemini").
    fn name(&self) -> &str;

    /// Send one prompt and return the generated text.
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, ProviderError>;
}

/// Sampling parameters sent with every prompt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f64,
    pub top_k: u32,
    pub top_p: f64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.1,
            top_k: 1,
            top_p: 1.0,
        }
    }
}

/// A prompt for the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// The prompt text.
    pub prompt: String,
    /// Sampling parameters.
    #[serde(default)]
    pub config: GenerationConfig,
}

impl GenerateRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            config: GenerationConfig::default(),
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.config.temperature = temperature;
        self
    }
}

/// Text produced by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// The generated text.
    pub text: String,
    /// Model that produced the text.
    pub model: String,
    /// Latency in milliseconds.
    pub latency_ms: u64,
}

// ---------------------------------------------------------------------------
// Code loading
// ---------------------------------------------------------------------------

/// Turns candidate source text into a callable function.
pub trait CodeLoader: Send + Sync {
    /// The callable produced by a successful load.
    type Function: LoadedFunction;

    /// Evaluate the top-level declarations of `source` and resolve
    /// `function_name` among them.
    fn load(&self, source: &str, function_name: &str) -> Result<Self::Function, LoadError>;
}

/// A function resolved from candidate source.
pub trait LoadedFunction {
    /// The name the function was resolved by.
    fn name(&self) -> &str;

    /// Call the function with positional arguments. `None` is the absent
    /// sentinel (`undefined`). A thrown exception is returned as its message.
    fn call(&mut self, args: &[Option<Value>]) -> Result<Actual, String>;
}

// ---------------------------------------------------------------------------
// JSON array extraction
// ---------------------------------------------------------------------------

/// Find the first balanced top-level array literal in free text.
///
/// Backends tend to wrap the JSON they were asked for in prose or markdown
/// fences, so the whole response is never parsed directly. Brackets inside
/// double-quoted strings are ignored. Returns `None` if no `[` opens a
/// balanced span.
pub fn extract_json_array(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    let mut search_from = 0;

    while let Some(offset) = text[search_from..].find('[') {
        let start = search_from + offset;
        if let Some(end) = balanced_end(bytes, start) {
            return Some(&text[start..=end]);
        }
        search_from = start + 1;
    }
    None
}

/// Parse the first array literal in `text` that is valid JSON.
///
/// Unlike [`extract_json_array`], a balanced span that fails to parse (say a
/// bracketed word in the surrounding prose) is skipped and the search goes on.
pub fn parse_first_json_array(text: &str) -> Option<Vec<Value>> {
    let bytes = text.as_bytes();
    text.match_indices('[').find_map(|(start, _)| {
        let end = balanced_end(bytes, start)?;
        match serde_json::from_str::<Value>(&text[start..=end]) {
            Ok(Value::Array(items)) => Some(items),
            _ => None,
        }
    })
}

/// Index of the `]` that closes the `[` at `start`, if any.
fn balanced_end(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'[' => depth += 1,
            b']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_array_wrapped_in_prose() {
        let input = "Sure! Here are your questions:\n[{\"a\": 1}, {\"b\": [2, 3]}]\nGood luck.";
        assert_eq!(
            extract_json_array(input),
            Some("[{\"a\": 1}, {\"b\": [2, 3]}]")
        );
    }

    #[test]
    fn extract_array_from_markdown_fence() {
        let input = "```json\n[1, 2, 3]\n```";
        assert_eq!(extract_json_array(input), Some("[1, 2, 3]"));
    }

    #[test]
    fn extract_ignores_brackets_inside_strings() {
        let input = r#"[{"text": "What does arr[0] return?", "x": "]"}] trailing ]"#;
        assert_eq!(
            extract_json_array(input),
            Some(r#"[{"text": "What does arr[0] return?", "x": "]"}]"#)
        );
    }

    #[test]
    fn extract_handles_escaped_quotes() {
        let input = r#"[ "say \"hi]\"", 1 ]"#;
        assert_eq!(extract_json_array(input), Some(input));
    }

    #[test]
    fn extract_stops_at_first_balanced_array() {
        let input = "[1] and then [2]";
        assert_eq!(extract_json_array(input), Some("[1]"));
    }

    #[test]
    fn extract_unbalanced_returns_none() {
        assert_eq!(extract_json_array("[1, 2"), None);
        assert_eq!(extract_json_array("no arrays here"), None);
    }

    #[test]
    fn parse_skips_non_json_brackets() {
        let input = "Answer [see below]:\n[{\"id\": \"Q1\"}]";
        let items = parse_first_json_array(input).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["id"], "Q1");
    }

    #[test]
    fn parse_returns_none_without_valid_array() {
        assert!(parse_first_json_array("[not json] [also not]").is_none());
        assert!(parse_first_json_array("").is_none());
    }

    #[test]
    fn generation_config_serializes_camel_case() {
        let v = serde_json::to_value(GenerationConfig::default()).unwrap();
        assert_eq!(v["topK"], 1);
        assert_eq!(v["topP"], 1.0);
        assert_eq!(v["temperature"], 0.1);
    }
}
