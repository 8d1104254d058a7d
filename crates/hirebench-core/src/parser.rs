//! Question parsing and validation.
//!
//! Turns the JSON items extracted from a backend response into typed
//! questions, rejecting anything with the wrong shape, and loads and lints
//! question spec files for the CLI.

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{Map, Value};

use crate::error::ProviderError;
use crate::model::{
    Difficulty, QuestionSpec, QuizQuestion, QUIZ_OPTION_COUNT, QUIZ_QUESTION_COUNT,
};

/// Validate and convert extracted quiz items.
///
/// Requires exactly [`QUIZ_QUESTION_COUNT`] items, each with non-empty
/// `text`, `correctAnswer` and `difficulty`, and exactly
/// [`QUIZ_OPTION_COUNT`] string options one of which is the correct answer.
pub fn parse_quiz_questions(items: &[Value]) -> Result<Vec<QuizQuestion>, ProviderError> {
    if items.len() != QUIZ_QUESTION_COUNT {
        return Err(malformed(format!(
            "expected {QUIZ_QUESTION_COUNT} quiz questions, got {}",
            items.len()
        )));
    }

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            parse_quiz_question(item)
                .map_err(|reason| malformed(format!("invalid question at index {index}: {reason}")))
        })
        .collect()
}

fn parse_quiz_question(item: &Value) -> Result<QuizQuestion, String> {
    let obj = item.as_object().ok_or("not an object")?;

    let text = non_empty_str(obj, "text")?;
    let correct_answer = non_empty_str(obj, "correctAnswer")?;
    let difficulty: Difficulty = non_empty_str(obj, "difficulty")?.parse()?;

    let options = obj
        .get("options")
        .and_then(Value::as_array)
        .ok_or("missing options")?;
    if options.len() != QUIZ_OPTION_COUNT {
        return Err(format!(
            "expected {QUIZ_OPTION_COUNT} options, got {}",
            options.len()
        ));
    }
    let options = options
        .iter()
        .map(|o| o.as_str().map(str::to_string).ok_or("option is not a string"))
        .collect::<Result<Vec<_>, _>>()?;

    if !options.contains(&correct_answer) {
        return Err("correctAnswer is not one of the options".into());
    }

    Ok(QuizQuestion {
        text,
        options,
        correct_answer,
        difficulty,
    })
}

/// Validate and convert extracted coding items.
///
/// Each item needs a non-empty `functionName`, a `parameters` list of
/// strings, and both `sampleInput` and `sampleOutput` present (null counts as
/// present). Only the first question is kept.
pub fn parse_coding_questions(items: &[Value]) -> Result<Vec<QuestionSpec>, ProviderError> {
    let first = items
        .first()
        .ok_or_else(|| malformed("expected 1 coding question, got 0".to_string()))?;

    let spec = parse_coding_question(first)
        .map_err(|reason| malformed(format!("invalid coding question: {reason}")))?;
    Ok(vec![spec])
}

fn parse_coding_question(item: &Value) -> Result<QuestionSpec, String> {
    let obj = item.as_object().ok_or("not an object")?;

    let function_name = non_empty_str(obj, "functionName")?;
    let parameters = obj
        .get("parameters")
        .and_then(Value::as_array)
        .ok_or("parameters must be a list")?
        .iter()
        .map(|p| p.as_str().map(str::to_string).ok_or("parameter name is not a string"))
        .collect::<Result<Vec<_>, _>>()?;

    let sample_input = obj.get("sampleInput").cloned().ok_or("missing sampleInput")?;
    let sample_output = obj
        .get("sampleOutput")
        .cloned()
        .ok_or("missing sampleOutput")?;

    let optional = |key: &str| {
        obj.get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    Ok(QuestionSpec {
        id: optional("id"),
        description: optional("description"),
        function_name,
        parameters,
        starter_code: optional("starterCode"),
        sample_input,
        sample_output,
    })
}

fn non_empty_str(obj: &Map<String, Value>, key: &str) -> Result<String, String> {
    match obj.get(key).and_then(Value::as_str) {
        Some(s) if !s.trim().is_empty() => Ok(s.to_string()),
        _ => Err(format!("missing {key}")),
    }
}

fn malformed(message: String) -> ProviderError {
    ProviderError::MalformedResponse(message)
}

/// Whether `name` is a plain JavaScript identifier.
///
/// Function names are spliced into loader code, so anything else is refused.
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// A validation warning for a question spec.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question id (if known).
    pub question_id: Option<String>,
    /// The warning message.
    pub message: String,
}

/// Load a question spec from a JSON file.
///
/// The file may hold a single question object or an array of them, in which
/// case the first is used.
pub fn load_question_spec(path: &Path) -> Result<QuestionSpec> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read question file: {}", path.display()))?;
    parse_question_spec_str(&content)
        .with_context(|| format!("failed to parse question file: {}", path.display()))
}

/// Parse a question spec from JSON text (useful for testing).
pub fn parse_question_spec_str(content: &str) -> Result<QuestionSpec> {
    let value: Value = serde_json::from_str(content).context("invalid JSON")?;
    let item = match value {
        Value::Array(mut items) => {
            anyhow::ensure!(!items.is_empty(), "question array is empty");
            items.swap_remove(0)
        }
        other => other,
    };
    parse_coding_question(&item).map_err(|reason| anyhow::anyhow!("{reason}"))
}

/// Check a question spec for problems that would make every submission fail.
pub fn validate_question_spec(spec: &QuestionSpec) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();
    let question_id = (!spec.id.is_empty()).then(|| spec.id.clone());
    let mut warn = |message: String| {
        warnings.push(ValidationWarning {
            question_id: question_id.clone(),
            message,
        })
    };

    if !is_identifier(&spec.function_name) {
        warn(format!(
            "functionName '{}' is not a valid identifier",
            spec.function_name
        ));
    }

    if spec.description.trim().is_empty() {
        warn("description is empty".into());
    }

    if !spec.starter_code.is_empty() && !spec.starter_code.contains(&spec.function_name) {
        warn(format!(
            "starterCode does not declare '{}'",
            spec.function_name
        ));
    }

    let mut seen = std::collections::HashSet::new();
    for p in &spec.parameters {
        if !seen.insert(p.as_str()) {
            warn(format!("parameter '{p}' is listed more than once"));
        }
    }

    if let Value::Object(input) = &spec.sample_input {
        if spec.parameters.is_empty() {
            warn("sampleInput is an object but no parameters are listed; it will be passed as one argument".into());
        } else {
            for p in &spec.parameters {
                if !input.contains_key(p) {
                    warn(format!("sampleInput has no key for parameter '{p}'"));
                }
            }
            for key in input.keys() {
                if !spec.parameters.contains(key) {
                    warn(format!("sampleInput key '{key}' is not a parameter"));
                }
            }
        }
    }

    warnings
}
