//! hirebench CLI: generate questions, judge submissions locally, run the proxy.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use hirebench_core::model::Language;

mod commands;

#[derive(Parser)]
#[command(
    name = "hirebench",
    version,
    about = "Candidate assessment: generated questions and in-process JavaScript judging"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Judge a submission against a coding question
    Evaluate {
        /// Path to the question JSON file
        #[arg(long)]
        question: PathBuf,

        /// Path to the candidate's source file
        #[arg(long)]
        source: PathBuf,

        /// Submission language: javascript, python, cpp
        #[arg(long, default_value = "javascript")]
        language: Language,

        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,

        /// Exit code 1 unless every case passes
        #[arg(long)]
        fail_on_failure: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Generate quiz and coding questions for a domain
    Questions {
        /// Job domain the questions target (e.g. "Web Development")
        #[arg(long)]
        domain: String,

        /// Which set to generate: quiz, coding, all
        #[arg(long, default_value = "all")]
        kind: String,

        /// Write the JSON here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate question JSON files
    Validate {
        /// Path to a question file or a directory of them
        #[arg(long)]
        question: PathBuf,
    },

    /// Run the HTTP proxy and evaluation server
    Serve {
        /// Port to listen on (default from config, else 8000)
        #[arg(long)]
        port: Option<u16>,

        /// Directory holding the static front end
        #[arg(long)]
        static_dir: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and an example question
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("hirebench=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Evaluate {
            question,
            source,
            language,
            format,
            fail_on_failure,
            config,
        } => commands::evaluate::execute(
            question,
            source,
            language,
            format,
            fail_on_failure,
            config,
        ),
        Commands::Questions {
            domain,
            kind,
            output,
            config,
        } => commands::questions::execute(domain, kind, output, config).await,
        Commands::Validate { question } => commands::validate::execute(question),
        Commands::Serve {
            port,
            static_dir,
            config,
        } => commands::serve::execute(port, static_dir, config).await,
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
