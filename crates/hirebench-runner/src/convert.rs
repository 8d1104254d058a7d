//! Moving values and errors across the engine boundary.

use boa_engine::{Context, JsError, JsObject, JsResult, JsValue};
use serde_json::Value;

use hirebench_core::model::Actual;

/// Convert a bound argument into an engine value. `None` becomes `undefined`.
pub(crate) fn to_js(arg: Option<&Value>, context: &mut Context) -> JsResult<JsValue> {
    match arg {
        Some(value) => JsValue::from_json(value, context),
        None => Ok(JsValue::undefined()),
    }
}

/// Convert a returned engine value into an [`Actual`].
///
/// `serializer` is the sandbox's JSON helper. Values it cannot represent
/// (functions, symbols, cycles, bigints, non-finite numbers) are reported as
/// [`Actual::Unserializable`] rather than being coerced to `null`.
pub(crate) fn to_actual(value: &JsValue, serializer: &JsObject, context: &mut Context) -> Actual {
    if value.is_undefined() {
        return Actual::Undefined;
    }

    let text = match serializer.call(&JsValue::undefined(), &[value.clone()], context) {
        Ok(text) => text,
        Err(e) => return Actual::Unserializable(describe_error(&e, context)),
    };

    let Some(text) = text.as_string() else {
        return Actual::Unserializable(format!("[{}]", value.type_of()));
    };

    match serde_json::from_str::<Value>(&text.to_std_string_escaped()) {
        Ok(json) => Actual::Value(json),
        Err(e) => Actual::Unserializable(format!("invalid JSON from engine: {e}")),
    }
}

/// Render a thrown value as `Kind: message`, the way a console prints an
/// uncaught error. Non-error throwables are rendered with their string form.
pub(crate) fn describe_error(error: &JsError, context: &mut Context) -> String {
    if let Ok(native) = error.try_native(context) {
        return native.to_string();
    }
    match error.as_opaque() {
        Some(thrown) => match thrown.to_string(context) {
            Ok(text) => text.to_std_string_escaped(),
            Err(_) => thrown.display().to_string(),
        },
        None => error.to_string(),
    }
}
