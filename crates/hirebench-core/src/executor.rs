//! Invoking a loaded function with timing and fault capture.

use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};

use serde_json::Value;

use crate::model::Actual;
use crate::traits::LoadedFunction;

/// What happened when a loaded function was called.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionOutcome {
    /// The returned value; `Undefined` when the call failed.
    pub value: Actual,
    /// The failure cause, if the call threw or ran over budget.
    pub error: Option<String>,
    /// Wall-clock duration of the call in milliseconds (3 decimals).
    pub duration_ms: f64,
}

/// Call `function` with positional `args`.
///
/// Time is measured with the monotonic clock. A thrown exception, or a panic
/// inside the engine, is turned into `error`; nothing escapes to the caller.
/// If `time_budget` is set and the call took longer, the outcome is marked as
/// failed even though the call completed.
pub fn run<F>(function: &mut F, args: &[Option<Value>], time_budget: Option<Duration>) -> ExecutionOutcome
where
    F: LoadedFunction + ?Sized,
{
    let start = Instant::now();
    let result = panic::catch_unwind(AssertUnwindSafe(|| function.call(args)));
    let elapsed = start.elapsed();
    let duration_ms = to_millis(elapsed);

    let (value, error) = match result {
        Ok(Ok(value)) => (value, None),
        Ok(Err(message)) => (Actual::Undefined, Some(message)),
        Err(payload) => (Actual::Undefined, Some(panic_message(payload.as_ref()))),
    };

    if let Some(budget) = time_budget {
        if elapsed > budget && error.is_none() {
            tracing::warn!(
                function = function.name(),
                duration_ms,
                budget_ms = budget.as_millis() as u64,
                "call exceeded its time budget"
            );
            return ExecutionOutcome {
                value: Actual::Undefined,
                error: Some(budget_exceeded_message(budget)),
                duration_ms,
            };
        }
    }

    ExecutionOutcome {
        value,
        error,
        duration_ms,
    }
}

/// Error text used when a call runs past its budget.
pub fn budget_exceeded_message(budget: Duration) -> String {
    format!(
        "Execution exceeded the time budget of {}ms",
        budget.as_millis()
    )
}

/// Milliseconds rounded to three decimals; always finite and non-negative.
pub fn to_millis(elapsed: Duration) -> f64 {
    elapsed.as_micros() as f64 / 1000.0
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    format!("internal engine error: {detail}")
}
