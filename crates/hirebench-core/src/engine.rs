//! Evaluation orchestrator.
//!
//! Composes the loader, argument binder, executor and judge into a single
//! `evaluate(source, spec)` call that always returns a well-formed
//! [`EvaluationResult`].

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Semaphore;

use crate::binder;
use crate::executor::{self, to_millis};
use crate::judge;
use crate::model::{Actual, CaseResult, EvaluationResult, Language, QuestionSpec};
use crate::parser::is_identifier;
use crate::traits::CodeLoader;

/// Message returned for submissions in languages that are stored but not run.
pub const NOT_EXECUTABLE_MESSAGE: &str =
    "Only JavaScript can be executed. Switch to JavaScript or submit code as-is.";

/// Message returned for empty submissions.
pub const EMPTY_SOURCE_MESSAGE: &str = "Please write some code before running.";

/// Error reported when every worker slot is still held.
pub const BUSY_MESSAGE: &str =
    "Too many evaluations are still running. Please try again shortly.";

/// Configuration for the evaluator.
#[derive(Debug, Clone)]
pub struct EvaluatorConfig {
    /// Maximum duration of the candidate call. When set, evaluation runs on a
    /// worker thread and is abandoned if it does not finish in time.
    pub time_budget: Option<Duration>,
    /// Extra time the watchdog allows for loading the source.
    pub load_grace: Duration,
    /// Maximum number of worker threads alive at once, counting workers the
    /// watchdog has abandoned but which are still running.
    pub max_in_flight: usize,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            time_budget: Some(Duration::from_secs(5)),
            load_grace: Duration::from_secs(1),
            max_in_flight: 4,
        }
    }
}

impl EvaluatorConfig {
    /// Run on the caller's thread with no time limit.
    pub fn unbounded() -> Self {
        Self {
            time_budget: None,
            ..Self::default()
        }
    }
}

/// The evaluation orchestrator.
///
/// An abandoned worker keeps its slot until its thread really exits, so
/// runaway submissions cannot pile up beyond `max_in_flight` threads.
pub struct Evaluator<L> {
    loader: Arc<L>,
    config: EvaluatorConfig,
    workers: Arc<Semaphore>,
}

impl<L> Evaluator<L>
where
    L: CodeLoader + 'static,
{
    pub fn new(loader: L, config: EvaluatorConfig) -> Self {
        let workers = Arc::new(Semaphore::new(config.max_in_flight.max(1)));
        Self {
            loader: Arc::new(loader),
            config,
            workers,
        }
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Evaluate `source` against the single sample case of `spec`.
    ///
    /// Never fails: load and runtime errors become a failed case, and a
    /// malformed spec yields a result with no cases and a top-level error.
    pub fn evaluate(&self, source: &str, spec: &QuestionSpec) -> EvaluationResult {
        if let Err(reason) = check_spec(spec) {
            tracing::warn!(id = %spec.id, "rejecting question spec: {reason}");
            return EvaluationResult::setup_failure(1, reason);
        }

        tracing::debug!(
            id = %spec.id,
            function = %spec.function_name,
            "evaluating submission"
        );

        let case = match self.config.time_budget {
            Some(budget) => self.run_with_watchdog(source, spec, budget),
            None => run_case(self.loader.as_ref(), source, spec, None),
        };

        let result = wrap_case(case);
        tracing::debug!(
            id = %spec.id,
            passed = result.passed_tests,
            total = result.total_tests,
            "evaluation finished"
        );
        result
    }

    /// Evaluate a submission in any language.
    ///
    /// Empty sources and non-executable languages short-circuit with an
    /// explanatory result and `total_tests = 0`.
    pub fn evaluate_submission(
        &self,
        source: &str,
        language: Language,
        spec: &QuestionSpec,
    ) -> EvaluationResult {
        if source.trim().is_empty() {
            return EvaluationResult::setup_failure(0, EMPTY_SOURCE_MESSAGE);
        }
        if !language.is_executable() {
            return EvaluationResult {
                output: "Language not supported".to_string(),
                ..EvaluationResult::setup_failure(0, NOT_EXECUTABLE_MESSAGE)
            };
        }
        self.evaluate(source, spec)
    }

    fn run_with_watchdog(&self, source: &str, spec: &QuestionSpec, budget: Duration) -> CaseResult {
        let Ok(permit) = Arc::clone(&self.workers).try_acquire_owned() else {
            tracing::warn!(
                function = %spec.function_name,
                max_in_flight = self.config.max_in_flight,
                "no free evaluation worker"
            );
            return failed_case(spec, BUSY_MESSAGE.to_string(), 0.0);
        };

        let (tx, rx) = mpsc::channel();
        let loader = Arc::clone(&self.loader);
        let worker_source = source.to_string();
        let worker_spec = spec.clone();

        let spawned = std::thread::Builder::new()
            .name("hirebench-eval".into())
            .spawn(move || {
                let _permit = permit;
                let case = run_case(loader.as_ref(), &worker_source, &worker_spec, Some(budget));
                // The receiver is gone if the watchdog already gave up.
                let _ = tx.send(case);
            });

        if let Err(e) = spawned {
            tracing::error!("failed to spawn evaluation worker: {e}");
            return failed_case(spec, format!("failed to start evaluation: {e}"), 0.0);
        }

        let start = Instant::now();
        let deadline = budget + self.config.load_grace;
        match rx.recv_timeout(deadline) {
            Ok(case) => case,
            Err(mpsc::RecvTimeoutError::Timeout) => {
                tracing::warn!(
                    function = %spec.function_name,
                    budget_ms = budget.as_millis() as u64,
                    "evaluation timed out; abandoning worker"
                );
                failed_case(
                    spec,
                    executor::budget_exceeded_message(budget),
                    to_millis(start.elapsed()),
                )
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                tracing::error!("evaluation worker stopped without a result");
                failed_case(
                    spec,
                    "evaluation worker stopped unexpectedly".to_string(),
                    to_millis(start.elapsed()),
                )
            }
        }
    }
}

/// Load, bind, run and judge one sample case.
fn run_case<L>(loader: &L, source: &str, spec: &QuestionSpec, budget: Option<Duration>) -> CaseResult
where
    L: CodeLoader + ?Sized,
{
    let bound = binder::bind(&spec.parameters, &spec.sample_input);

    let loaded = panic::catch_unwind(AssertUnwindSafe(|| {
        loader.load(source, &spec.function_name)
    }));

    let (actual, error, duration_ms) = match loaded {
        Ok(Ok(mut function)) => {
            let outcome = executor::run(&mut function, &bound.positional, budget);
            (outcome.value, outcome.error, outcome.duration_ms)
        }
        Ok(Err(e)) => {
            tracing::debug!(function = %spec.function_name, "load failed: {e}");
            (Actual::Undefined, Some(e.to_string()), 0.0)
        }
        Err(_) => (
            Actual::Undefined,
            Some("internal engine error while loading source".to_string()),
            0.0,
        ),
    };

    let pass = error.is_none() && judge::evaluate(&actual, &spec.sample_output);

    CaseResult {
        input: bound.display,
        expected: spec.sample_output.clone(),
        actual,
        pass,
        duration_ms,
        error,
    }
}

fn failed_case(spec: &QuestionSpec, error: String, duration_ms: f64) -> CaseResult {
    CaseResult {
        input: spec.sample_input.clone(),
        expected: spec.sample_output.clone(),
        actual: Actual::Undefined,
        pass: false,
        duration_ms,
        error: Some(error),
    }
}

fn wrap_case(case: CaseResult) -> EvaluationResult {
    let passed_tests = u32::from(case.pass);
    let output = if case.pass {
        "Passed 1/1".to_string()
    } else {
        "Failed 0/1".to_string()
    };
    EvaluationResult {
        passed_tests,
        total_tests: 1,
        output,
        error: case.error.clone(),
        avg_runtime_ms: Some(case.duration_ms),
        cases: vec![case],
    }
}

fn check_spec(spec: &QuestionSpec) -> Result<(), String> {
    if spec.function_name.trim().is_empty() {
        return Err("Invalid question spec: functionName is empty".to_string());
    }
    if !is_identifier(&spec.function_name) {
        return Err(format!(
            "Invalid question spec: functionName '{}' is not an identifier",
            spec.function_name
        ));
    }
    Ok(())
}
