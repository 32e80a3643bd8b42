use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use derive_more::From;
use keytrace::{TargetText, TextError};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::config::{ConfigError, Settings};
use crate::replay::{ReplayError, ReplayScript};

mod config;
mod replay;

const LOG_ENV: &str = "KEYTRACE_LOG";

/// Headless driver for the keytrace typing-test engine
#[derive(Parser, Debug)]
#[command(name = "keytrace", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a recorded keystroke script and print the session report
    Replay {
        /// Path to the TOML replay script
        script: PathBuf,
        /// Configuration directory (defaults to the platform's config directory)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Output as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show the word containing a character index
    Segment {
        /// Target text
        text: String,
        /// Character index, clamped to the end of the text
        index: usize,
    },
}

#[derive(Debug, From, Error)]
enum CliError {
    #[error(transparent)]
    Config(ConfigError),

    #[error(transparent)]
    Replay(ReplayError),

    #[error("Invalid text: {0}")]
    Text(TextError),

    #[error("Failed to serialize report: {0}")]
    Json(serde_json::Error),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Replay {
            script,
            config,
            json,
        } => {
            let settings = Settings::get(config)?;
            let report = ReplayScript::load(&script)?.run(&settings.session)?;

            if json || settings.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{report}");
            }
        }
        Command::Segment { text, index } => {
            let text = TargetText::new(&text)?;
            let window = text.word_bounds(index);
            let word: String = if window.is_empty() {
                String::new()
            } else {
                text[window.start..=window.end].iter().collect()
            };

            println!("{}..={} {word:?}", window.start, window.end);
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    init_tracing();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("Error: {error}");
            ExitCode::FAILURE
        }
    }
}
