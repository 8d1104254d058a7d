//! Core data model types for hirebench.
//!
//! Question specifications come from the question provider (or its static
//! fallbacks) and are immutable for the rest of a session. Evaluation results
//! are built fresh on every run and are never persisted by the core.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Number of multiple-choice questions in one quiz session.
pub const QUIZ_QUESTION_COUNT: usize = 20;

/// Number of options every quiz question carries.
pub const QUIZ_OPTION_COUNT: usize = 4;

/// A coding exercise: one function to implement and one sample case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionSpec {
    /// Unique identifier (e.g. "Q1").
    #[serde(default)]
    pub id: String,
    /// Problem statement shown to the candidate.
    #[serde(default)]
    pub description: String,
    /// Name of the top-level function the candidate must declare.
    pub function_name: String,
    /// Parameter names, in positional order.
    #[serde(default)]
    pub parameters: Vec<String>,
    /// Code the editor starts with.
    #[serde(default)]
    pub starter_code: String,
    /// The single sample input.
    pub sample_input: Value,
    /// The expected output for `sample_input`.
    pub sample_output: Value,
}

/// One multiple-choice quiz question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    /// The question text.
    pub text: String,
    /// Exactly four answer options.
    pub options: Vec<String>,
    /// The correct option; equal to one of `options`.
    pub correct_answer: String,
    /// How hard the question is; also drives the countdown length.
    pub difficulty: Difficulty,
}

/// Quiz question difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// Languages a candidate may write a submission in.
///
/// Only JavaScript is executed; the others are stored as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    JavaScript,
    Python,
    Cpp,
}

impl Language {
    /// Whether submissions in this language can be run by the evaluator.
    pub fn is_executable(&self) -> bool {
        matches!(self, Language::JavaScript)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::JavaScript => write!(f, "javascript"),
            Language::Python => write!(f, "python"),
            Language::Cpp => write!(f, "cpp"),
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "javascript" | "js" => Ok(Language::JavaScript),
            "python" | "py" => Ok(Language::Python),
            "cpp" | "c++" => Ok(Language::Cpp),
            other => Err(format!("unknown language: {other}")),
        }
    }
}

/// The value a candidate function produced.
///
/// JavaScript distinguishes `undefined` from `null`, and some results
/// (functions, cyclic objects, non-finite numbers) have no JSON form at all.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Actual {
    /// No value (`undefined`), also used when execution failed.
    #[default]
    Undefined,
    /// A JSON-representable value.
    Value(Value),
    /// A value with no JSON form, with a short description of it.
    Unserializable(String),
}

impl Actual {
    pub fn is_undefined(&self) -> bool {
        matches!(self, Actual::Undefined)
    }

    /// The JSON value, if there is one.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Actual::Value(v) => Some(v),
            _ => None,
        }
    }
}

impl From<Value> for Actual {
    fn from(value: Value) -> Self {
        Actual::Value(value)
    }
}

impl Serialize for Actual {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Actual::Undefined => serializer.serialize_none(),
            Actual::Value(v) => v.serialize(serializer),
            Actual::Unserializable(desc) => serializer.serialize_str(desc),
        }
    }
}

impl<'de> Deserialize<'de> for Actual {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // A missing field is handled by `#[serde(default)]`; an explicit null
        // is a real value.
        Value::deserialize(deserializer).map(Actual::Value)
    }
}

/// The outcome of judging one sample case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseResult {
    /// The sample input exactly as shown to the candidate.
    pub input: Value,
    /// The expected output.
    pub expected: Value,
    /// What the candidate function returned.
    #[serde(default, skip_serializing_if = "Actual::is_undefined")]
    pub actual: Actual,
    /// Whether `actual` matched `expected`.
    pub pass: bool,
    /// Wall-clock duration of the call in milliseconds.
    pub duration_ms: f64,
    /// Why the case failed to run, if it did.
    #[serde(default)]
    pub error: Option<String>,
}

/// The outcome of one run/submit of candidate code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    /// Number of passing cases.
    pub passed_tests: u32,
    /// Number of judged cases (one in the current scope).
    pub total_tests: u32,
    /// Short human-readable summary (e.g. "Passed 1/1").
    pub output: String,
    /// Per-case results.
    pub cases: Vec<CaseResult>,
    /// Top-level failure cause, if any.
    pub error: Option<String>,
    /// Average call duration across cases.
    pub avg_runtime_ms: Option<f64>,
}

impl EvaluationResult {
    /// A result with no cases that reports a failure before anything ran.
    pub fn setup_failure(total_tests: u32, error: impl Into<String>) -> Self {
        let error = error.into();
        Self {
            passed_tests: 0,
            total_tests,
            output: error.clone(),
            cases: Vec::new(),
            error: Some(error),
            avg_runtime_ms: None,
        }
    }

    /// Whether every judged case passed (and at least one was judged).
    pub fn all_passed(&self) -> bool {
        self.total_tests > 0 && self.passed_tests == self.total_tests
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn language_display_and_parse() {
        assert_eq!(Language::JavaScript.to_string(), "javascript");
        assert_eq!("js".parse::<Language>().unwrap(), Language::JavaScript);
        assert_eq!("C++".parse::<Language>().unwrap(), Language::Cpp);
        assert_eq!("Python".parse::<Language>().unwrap(), Language::Python);
        assert!("java".parse::<Language>().is_err());
        assert!(Language::JavaScript.is_executable());
        assert!(!Language::Python.is_executable());
    }

    #[test]
    fn difficulty_parse() {
        assert_eq!("Hard".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert!("extreme".parse::<Difficulty>().is_err());
    }

    #[test]
    fn question_spec_uses_camel_case_keys() {
        let spec: QuestionSpec = serde_json::from_value(json!({
            "id": "Q1",
            "description": "Add two numbers",
            "functionName": "add",
            "parameters": ["a", "b"],
            "starterCode": "function add(a, b) {}",
            "sampleInput": {"a": 1, "b": 2},
            "sampleOutput": 3
        }))
        .unwrap();
        assert_eq!(spec.function_name, "add");
        assert_eq!(spec.parameters, vec!["a", "b"]);

        let back = serde_json::to_value(&spec).unwrap();
        assert_eq!(back["functionName"], "add");
        assert_eq!(back["sampleOutput"], 3);
    }

    #[test]
    fn undefined_actual_is_omitted() {
        let case = CaseResult {
            input: json!([1]),
            expected: json!(1),
            actual: Actual::Undefined,
            pass: false,
            duration_ms: 0.0,
            error: Some("boom".into()),
        };
        let v = serde_json::to_value(&case).unwrap();
        assert!(v.get("actual").is_none());
        assert_eq!(v["durationMs"], 0.0);

        let back: CaseResult = serde_json::from_value(v).unwrap();
        assert!(back.actual.is_undefined());
    }

    #[test]
    fn null_actual_round_trips_as_value() {
        let case = CaseResult {
            input: json!(null),
            expected: json!(null),
            actual: Actual::Value(Value::Null),
            pass: true,
            duration_ms: 0.25,
            error: None,
        };
        let v = serde_json::to_value(&case).unwrap();
        assert_eq!(v["actual"], Value::Null);

        let back: CaseResult = serde_json::from_value(v).unwrap();
        assert_eq!(back.actual, Actual::Value(Value::Null));
    }

    #[test]
    fn setup_failure_has_no_cases() {
        let r = EvaluationResult::setup_failure(1, "Invalid question spec");
        assert!(r.cases.is_empty());
        assert_eq!(r.error.as_deref(), Some("Invalid question spec"));
        assert!(!r.all_passed());
    }
}
