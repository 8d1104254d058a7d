//! The `hirebench questions` command.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use serde::Serialize;

use hirebench_core::model::{QuestionSpec, QuizQuestion};
use hirebench_providers::load_config_from;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeneratedQuestions {
    domain: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    quiz: Option<Vec<QuizQuestion>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    coding: Option<Vec<QuestionSpec>>,
}

pub async fn execute(
    domain: String,
    kind: String,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let (want_quiz, want_coding) = match kind.as_str() {
        "quiz" => (true, false),
        "coding" => (false, true),
        "all" => (true, true),
        other => bail!("unknown kind: {other} (expected quiz, coding or all)"),
    };

    let config = load_config_from(config_path.as_deref())?;
    let provider = config.question_provider()?;

    let quiz = if want_quiz {
        Some(provider.fetch_quiz_questions(&domain).await)
    } else {
        None
    };
    let coding = if want_coding {
        Some(provider.fetch_coding_questions(&domain).await)
    } else {
        None
    };

    let generated = GeneratedQuestions {
        domain,
        quiz,
        coding,
    };
    let json = serde_json::to_string_pretty(&generated)?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            std::fs::write(&path, json)
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("Questions saved to: {}", path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}
