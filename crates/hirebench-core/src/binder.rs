//! Argument binding: sample input → positional arguments.

use serde_json::Value;

/// Positional arguments for one call, plus the input as shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundArguments {
    /// Arguments in call order. `None` is the absent sentinel (`undefined`).
    pub positional: Vec<Option<Value>>,
    /// The original sample input, untouched.
    pub display: Value,
}

/// Map a sample input onto positional arguments.
///
/// In priority order:
/// 1. an object with a non-empty parameter list yields one argument per
///    parameter name, in that order; missing keys become `None`;
/// 2. an array is spread, its elements becoming the arguments;
/// 3. anything else is passed as the single argument.
pub fn bind(parameter_names: &[String], sample_input: &Value) -> BoundArguments {
    let positional = match sample_input {
        Value::Object(map) if !parameter_names.is_empty() => parameter_names
            .iter()
            .map(|name| map.get(name).cloned())
            .collect(),
        Value::Array(items) => items.iter().cloned().map(Some).collect(),
        other => vec![Some(other.clone())],
    };

    BoundArguments {
        positional,
        display: sample_input.clone(),
    }
}
