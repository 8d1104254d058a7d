//! Output judging by canonical JSON text.
//!
//! Two values are equal iff their canonical serializations are identical.
//! Object key order is significant: `{"a":1,"b":2}` and `{"b":2,"a":1}` are
//! different answers. Numbers follow `JSON.stringify` formatting for
//! integral floats, so `1.0` and `1` compare equal.

use serde_json::{Number, Value};

use crate::model::Actual;

/// Largest magnitude at which an integral float is still printed as an
/// integer (beyond it `JSON.stringify` switches to exponent notation).
const MAX_PLAIN_INTEGER: f64 = 1e21;

/// Judge an actual result against the expected output.
///
/// `undefined` never equals a JSON value, and values with no JSON form
/// (functions, cycles, non-finite numbers) are never equal to anything.
pub fn evaluate(actual: &Actual, expected: &Value) -> bool {
    match actual {
        Actual::Value(value) => {
            std::ptr::eq(value, expected) || canonical_json(value) == canonical_json(expected)
        }
        Actual::Undefined | Actual::Unserializable(_) => false,
    }
}

/// Serialize a value the way `JSON.stringify` would, preserving key order.
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value);
    out
}

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => write_number(out, n),
        Value::String(s) => write_string(out, s),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(out, item);
            }
            out.push(']');
        }
        Value::Object(map) => {
            out.push('{');
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_string(out, key);
                out.push(':');
                write_value(out, item);
            }
            out.push('}');
        }
    }
}

fn write_number(out: &mut String, n: &Number) {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < MAX_PLAIN_INTEGER => {
            if f == 0.0 {
                // -0 prints as 0.
                out.push('0');
            } else {
                out.push_str(&format!("{f}"));
            }
        }
        _ => out.push_str(&n.to_string()),
    }
}

fn write_string(out: &mut String, s: &str) {
    // serde_json's string escaping matches JSON.stringify for valid UTF-8.
    match serde_json::to_string(s) {
        Ok(escaped) => out.push_str(&escaped),
        Err(_) => out.push_str("\"\""),
    }
}
