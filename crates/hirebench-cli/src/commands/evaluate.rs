//! The `hirebench evaluate` command.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use hirebench_core::model::{Actual, EvaluationResult, Language, QuestionSpec};
use hirebench_core::parser::load_question_spec;
use hirebench_providers::load_config_from;
use hirebench_server::evaluator_from_config;

pub fn execute(
    question_path: PathBuf,
    source_path: PathBuf,
    language: Language,
    format: String,
    fail_on_failure: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    if format != "table" && format != "json" {
        bail!("unknown format: {format} (expected table or json)");
    }

    let config = load_config_from(config_path.as_deref())?;
    let spec = load_question_spec(&question_path)?;
    let source = std::fs::read_to_string(&source_path)
        .with_context(|| format!("failed to read source file: {}", source_path.display()))?;

    let evaluator = evaluator_from_config(&config);
    let result = evaluator.evaluate_submission(&source, language, &spec);

    tracing::info!(
        function = %spec.function_name,
        passed = result.passed_tests,
        total = result.total_tests,
        "evaluation finished"
    );

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_table(&spec, &result);
    }

    if fail_on_failure && !result.all_passed() {
        bail!(
            "{}/{} tests passed",
            result.passed_tests,
            result.total_tests
        );
    }

    Ok(())
}

fn print_table(spec: &QuestionSpec, result: &EvaluationResult) {
    use comfy_table::{Cell, Table};

    println!("Question: {} ({})", spec.function_name, display_id(spec));

    if !result.cases.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["Input", "Expected", "Actual", "Result", "Time"]);

        for case in &result.cases {
            table.add_row(vec![
                Cell::new(case.input.to_string()),
                Cell::new(case.expected.to_string()),
                Cell::new(display_actual(&case.actual)),
                Cell::new(if case.pass { "PASS" } else { "FAIL" }),
                Cell::new(format!("{:.2}ms", case.duration_ms)),
            ]);
        }
        println!("{table}");
    }

    println!("{}", result.output);
    if let Some(error) = result.error.as_deref().filter(|e| *e != result.output) {
        println!("Error: {error}");
    }
}

fn display_id(spec: &QuestionSpec) -> &str {
    if spec.id.is_empty() {
        "no id"
    } else {
        &spec.id
    }
}

fn display_actual(actual: &Actual) -> String {
    match actual {
        Actual::Undefined => "undefined".to_string(),
        Actual::Value(v) => v.to_string(),
        Actual::Unserializable(desc) => desc.clone(),
    }
}
