//! End-to-end evaluation of JavaScript submissions.

use std::time::{Duration, Instant};

use serde_json::{json, Value};

use hirebench_core::engine::{Evaluator, EvaluatorConfig, BUSY_MESSAGE, NOT_EXECUTABLE_MESSAGE};
use hirebench_core::model::{Actual, Language, QuestionSpec};
use hirebench_runner::{JsLoader, JsLoaderConfig};

fn filter_products_spec(sample_input: Value, sample_output: Value) -> QuestionSpec {
    QuestionSpec {
        id: "Q1".into(),
        description: "Filter products by name and price".into(),
        function_name: "filterProducts".into(),
        parameters: vec![
            "products".into(),
            "query".into(),
            "minPrice".into(),
            "maxPrice".into(),
        ],
        starter_code: "function filterProducts(products, query, minPrice, maxPrice) {\n}\n".into(),
        sample_input,
        sample_output,
    }
}

fn evaluator() -> Evaluator<JsLoader> {
    Evaluator::new(JsLoader::default(), EvaluatorConfig::default())
}

const NAME_ONLY: &str = "function filterProducts(products, query, minPrice, maxPrice) { \
    return products.filter(p => p.name.toLowerCase().includes(query.toLowerCase())); }";

const FULL: &str = r#"
function filterProducts(products, query, minPrice, maxPrice) {
  const q = query.toLowerCase();
  return products.filter(function (p) {
    if (!p.name.toLowerCase().includes(q)) return false;
    if (typeof minPrice === 'number' && p.price < minPrice) return false;
    if (typeof maxPrice === 'number' && p.price > maxPrice) return false;
    return true;
  });
}
"#;

#[test]
fn name_filter_with_null_bounds_passes() {
    let spec = filter_products_spec(
        json!({
            "products": [{"name": "Mouse", "price": 499}, {"name": "House", "price": 9999}],
            "query": "ou",
            "minPrice": null,
            "maxPrice": null
        }),
        json!([{"name": "Mouse", "price": 499}, {"name": "House", "price": 9999}]),
    );

    let result = evaluator().evaluate(NAME_ONLY, &spec);
    assert_eq!(result.passed_tests, 1);
    assert_eq!(result.total_tests, 1);
    assert!(result.error.is_none());
    assert!(result.cases[0].pass);
    assert!(result.cases[0].duration_ms.is_finite());
    assert!(result.cases[0].duration_ms >= 0.0);
}

#[test]
fn fallback_question_sample_passes_with_full_solution() {
    let spec = filter_products_spec(
        json!({
            "products": [
                {"name": "Mouse", "price": 499},
                {"name": "Keyboard", "price": 1299},
                {"name": "House", "price": 9999}
            ],
            "query": "ou",
            "minPrice": 300,
            "maxPrice": 2000
        }),
        json!([{"name": "Mouse", "price": 499}]),
    );

    assert!(evaluator().evaluate(FULL, &spec).all_passed());

    // Ignoring the price bounds returns House as well.
    let partial = evaluator().evaluate(NAME_ONLY, &spec);
    assert_eq!(partial.passed_tests, 0);
    assert!(partial.error.is_none());
    assert_eq!(
        partial.cases[0].actual,
        Actual::Value(json!([
            {"name": "Mouse", "price": 499},
            {"name": "House", "price": 9999}
        ]))
    );
}

#[test]
fn syntax_error_fails_the_case() {
    let spec = filter_products_spec(json!({}), json!([]));
    let result = evaluator().evaluate("function filterProducts( {", &spec);
    assert_eq!(result.passed_tests, 0);
    assert_eq!(result.total_tests, 1);
    assert!(!result.cases[0].pass);
    assert!(result.error.as_deref().unwrap().starts_with("SyntaxError"));
}

#[test]
fn missing_function_is_reported() {
    let spec = filter_products_spec(json!({}), json!([]));
    let result = evaluator().evaluate("function somethingElse() {}", &spec);
    assert_eq!(result.error.as_deref(), Some("Function filterProducts not found"));
}

#[test]
fn key_order_changes_the_verdict() {
    let mut spec = filter_products_spec(json!([]), json!({"a": 1, "b": 2}));
    spec.function_name = "build".into();
    spec.parameters.clear();

    let ordered = evaluator().evaluate("function build() { return { a: 1, b: 2 }; }", &spec);
    assert!(ordered.all_passed());

    let reversed = evaluator().evaluate("function build() { return { b: 2, a: 1 }; }", &spec);
    assert!(!reversed.all_passed());
}

#[test]
fn undefined_result_does_not_match_null() {
    let mut spec = filter_products_spec(json!([]), Value::Null);
    spec.function_name = "nothing".into();
    let result = evaluator().evaluate("function nothing() {}", &spec);
    assert!(!result.cases[0].pass);
    assert!(result.cases[0].actual.is_undefined());
}

#[test]
fn runaway_loop_is_stopped() {
    let mut spec = filter_products_spec(json!([]), json!(1));
    spec.function_name = "spin".into();
    let evaluator = Evaluator::new(
        JsLoader::new(JsLoaderConfig {
            loop_iteration_limit: 100_000,
            ..JsLoaderConfig::default()
        }),
        EvaluatorConfig {
            time_budget: Some(Duration::from_secs(10)),
            ..EvaluatorConfig::default()
        },
    );
    let result = evaluator.evaluate("function spin() { for (;;) {} }", &spec);
    assert!(!result.cases[0].pass);
    assert!(result.error.is_some());
}

#[test]
fn call_per_iteration_is_cut_off_by_the_watchdog() {
    // Loop counters are per call frame, so no single loop reaches the limit.
    let source = r#"
function inner() { for (let i = 0; i < 9e6; i++) {} }
function spin() { for (let i = 0; i < 9e6; i++) inner(); }
"#;
    let mut spec = filter_products_spec(json!([]), json!(1));
    spec.function_name = "spin".into();
    let evaluator = Evaluator::new(
        JsLoader::default(),
        EvaluatorConfig {
            time_budget: Some(Duration::from_millis(200)),
            load_grace: Duration::from_millis(200),
            max_in_flight: 1,
        },
    );

    let start = Instant::now();
    let result = evaluator.evaluate(source, &spec);
    assert!(start.elapsed() < Duration::from_secs(3));
    assert_eq!(result.passed_tests, 0);
    assert!(!result.cases[0].pass);
    assert!(result.error.as_deref().unwrap().contains("time budget"));

    // The abandoned worker is still spinning and keeps its slot.
    let busy = evaluator.evaluate(source, &spec);
    assert_eq!(busy.error.as_deref(), Some(BUSY_MESSAGE));
}

#[test]
fn python_submission_is_not_run() {
    let spec = filter_products_spec(json!({}), json!([]));
    let result = evaluator().evaluate_submission("def filter_products(): pass", Language::Python, &spec);
    assert_eq!(result.total_tests, 0);
    assert_eq!(result.error.as_deref(), Some(NOT_EXECUTABLE_MESSAGE));
}
