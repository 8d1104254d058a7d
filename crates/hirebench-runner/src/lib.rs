//! hirebench-runner: JavaScript code loading on an embedded engine.
//!
//! Each load gets its own [`sandbox::Sandbox`], so submissions never see
//! each other's globals. Loops and recursion are bounded by engine limits.

mod convert;
pub mod sandbox;

use boa_engine::{JsObject, JsValue};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use hirebench_core::error::LoadError;
use hirebench_core::model::Actual;
use hirebench_core::parser::is_identifier;
use hirebench_core::traits::{CodeLoader, LoadedFunction};

use crate::convert::{describe_error, to_actual, to_js};
use crate::sandbox::Sandbox;

/// Engine limits applied to every sandbox.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JsLoaderConfig {
    /// Maximum iterations of any single loop before it is aborted.
    pub loop_iteration_limit: u64,
    /// Maximum call depth.
    pub recursion_limit: usize,
}

impl Default for JsLoaderConfig {
    fn default() -> Self {
        Self {
            loop_iteration_limit: 10_000_000,
            recursion_limit: 512,
        }
    }
}

/// Loads candidate JavaScript and resolves a named function from it.
#[derive(Debug, Clone, Default)]
pub struct JsLoader {
    config: JsLoaderConfig,
}

impl JsLoader {
    pub fn new(config: JsLoaderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &JsLoaderConfig {
        &self.config
    }
}

impl CodeLoader for JsLoader {
    type Function = JsFunction;

    fn load(&self, source: &str, function_name: &str) -> Result<JsFunction, LoadError> {
        if !is_identifier(function_name) {
            return Err(LoadError::NotFound(function_name.to_string()));
        }

        let mut sandbox = Sandbox::new(&self.config)?;
        sandbox.run_script(source)?;
        let function = sandbox.resolve_function(function_name)?;

        tracing::debug!(function = function_name, "loaded candidate function");
        Ok(JsFunction {
            name: function_name.to_string(),
            function,
            sandbox,
        })
    }
}

/// A candidate function bound to the sandbox it was loaded into.
pub struct JsFunction {
    name: String,
    function: JsObject,
    sandbox: Sandbox,
}

impl LoadedFunction for JsFunction {
    fn name(&self) -> &str {
        &self.name
    }

    fn call(&mut self, args: &[Option<Value>]) -> Result<Actual, String> {
        let Sandbox {
            context,
            serializer,
        } = &mut self.sandbox;

        let mut js_args = Vec::with_capacity(args.len());
        for arg in args {
            match to_js(arg.as_ref(), context) {
                Ok(value) => js_args.push(value),
                Err(e) => return Err(describe_error(&e, context)),
            }
        }

        match self.function.call(&JsValue::undefined(), &js_args, context) {
            Ok(value) => Ok(to_actual(&value, serializer, context)),
            Err(e) => Err(describe_error(&e, context)),
        }
    }
}
