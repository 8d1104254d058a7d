//! An isolated JavaScript realm for one submission.

use boa_engine::{Context, JsError, JsNativeErrorKind, JsObject, JsValue, Script, Source};

use hirebench_core::error::LoadError;

use crate::convert::describe_error;
use crate::JsLoaderConfig;

/// Installed before candidate code runs. The engine has no host console, and
/// starter code commonly logs.
const PRELUDE: &str = r#"
globalThis.console = {
  log: function () {},
  info: function () {},
  warn: function () {},
  error: function () {},
  debug: function () {}
};
"#;

/// Serializes a value to JSON text inside the engine. Throws for values that
/// `JSON.stringify` would silently turn into `null`.
const SERIALIZER: &str = r#"
(function (stringify) {
  return function (value) {
    return stringify(value, function (key, v) {
      if (typeof v === 'number' && !isFinite(v)) {
        throw new TypeError('non-finite number ' + v);
      }
      return v;
    });
  };
})(JSON.stringify)
"#;

/// A fresh engine context with runtime limits and the prelude applied.
///
/// Nothing survives between sandboxes: each load starts from an empty global
/// scope with no filesystem, network or timer APIs.
pub struct Sandbox {
    pub(crate) context: Context,
    pub(crate) serializer: JsObject,
}

impl Sandbox {
    pub fn new(config: &JsLoaderConfig) -> Result<Self, LoadError> {
        let mut context = Context::default();
        let limits = context.runtime_limits_mut();
        limits.set_loop_iteration_limit(config.loop_iteration_limit);
        limits.set_recursion_limit(config.recursion_limit);

        let setup = |context: &mut Context| -> Result<JsObject, JsError> {
            context.eval(Source::from_bytes(PRELUDE))?;
            let serializer = context.eval(Source::from_bytes(SERIALIZER))?;
            serializer
                .as_callable()
                .cloned()
                .ok_or_else(|| JsError::from_opaque(JsValue::undefined()))
        };

        match setup(&mut context) {
            Ok(serializer) => Ok(Self {
                context,
                serializer,
            }),
            Err(e) => Err(LoadError::Evaluation(format!(
                "failed to prepare script engine: {}",
                describe_error(&e, &mut context)
            ))),
        }
    }

    /// Parse and run `source` as a classic script.
    ///
    /// Parse failures and early errors become [`LoadError::Syntax`]; anything
    /// thrown by top-level code becomes [`LoadError::Evaluation`].
    pub fn run_script(&mut self, source: &str) -> Result<(), LoadError> {
        let script = match Script::parse(Source::from_bytes(source), None, &mut self.context) {
            Ok(script) => script,
            Err(e) => return Err(LoadError::Syntax(syntax_message(&e, &mut self.context))),
        };

        match script.evaluate(&mut self.context) {
            Ok(_) => Ok(()),
            Err(e) => {
                let is_syntax = e
                    .try_native(&mut self.context)
                    .is_ok_and(|native| matches!(native.kind, JsNativeErrorKind::Syntax));
                if is_syntax {
                    Err(LoadError::Syntax(syntax_message(&e, &mut self.context)))
                } else {
                    Err(LoadError::Evaluation(describe_error(&e, &mut self.context)))
                }
            }
        }
    }

    /// Look up `name` in the global scope, including `let`, `const` and
    /// `class` bindings, and return it if it is callable.
    ///
    /// `name` must already be a valid identifier.
    pub fn resolve_function(&mut self, name: &str) -> Result<JsObject, LoadError> {
        let lookup = format!(
            "(function () {{ try {{ return {name}; }} catch (e) {{ return undefined; }} }})()"
        );
        let value = self
            .context
            .eval(Source::from_bytes(&lookup))
            .map_err(|_| LoadError::NotFound(name.to_string()))?;

        value
            .as_callable()
            .cloned()
            .ok_or_else(|| LoadError::NotFound(name.to_string()))
    }
}

/// The message of a syntax error without its `SyntaxError:` prefix.
fn syntax_message(error: &JsError, context: &mut Context) -> String {
    match error.try_native(context) {
        Ok(native) => native.message().to_string(),
        Err(_) => error.to_string(),
    }
}
