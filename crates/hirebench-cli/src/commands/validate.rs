//! The `hirebench validate` command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use hirebench_core::parser::{load_question_spec, validate_question_spec};

pub fn execute(question_path: PathBuf) -> Result<()> {
    let files = if question_path.is_dir() {
        question_files(&question_path)?
    } else {
        vec![question_path]
    };

    let mut total_warnings = 0;

    for file in &files {
        let spec = load_question_spec(file)?;
        println!(
            "Question: {} ({} parameters) in {}",
            spec.function_name,
            spec.parameters.len(),
            file.display()
        );

        let warnings = validate_question_spec(&spec);
        for w in &warnings {
            let prefix = w
                .question_id
                .as_ref()
                .map(|id| format!("  [{id}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All questions valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}

/// `*.json` files directly inside `dir`, sorted by name.
fn question_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))?;
    for entry in entries {
        let path = entry?.path();
        if path.extension().is_some_and(|e| e == "json") {
            files.push(path);
        }
    }
    files.sort();
    anyhow::ensure!(
        !files.is_empty(),
        "no question files found in {}",
        dir.display()
    );
    Ok(files)
}
