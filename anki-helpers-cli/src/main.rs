mod commands;
mod settings;

use anki_helpers_core::{AnkiConnect, AnkiError, RED_FLAG_QUERY};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use settings::Overrides;

#[derive(Parser)]
#[command(
    name = "anki-helpers",
    about = "Anki Helpers - A CLI tool to help with Anki flashcards.",
    version
)]
struct Cli {
    /// AnkiConnect host (default: 127.0.0.1)
    #[arg(long, global = true)]
    host: Option<String>,

    /// AnkiConnect port (default: 8765)
    #[arg(long, global = true)]
    port: Option<u16>,

    /// Protocol version sent to AnkiConnect
    #[arg(long, global = true)]
    api_version: Option<u32>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Log every AnkiConnect action to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, PartialEq, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand, Debug, PartialEq)]
enum Command {
    /// List all deck names
    Decks,

    /// List flagged notes, furthest due date first
    Flagged {
        /// Show at most this many notes (0 shows all)
        #[arg(short = 'n', long, allow_negative_numbers = true)]
        limit: Option<i64>,
    },

    /// List flagged cards with intervals, note fields and tags
    Cards {
        /// Anki search selecting the notes whose cards are listed
        #[arg(short, long, default_value = RED_FLAG_QUERY)]
        query: String,
        /// Also bucket notes due within the next 14 days and list those first
        #[arg(long)]
        due_buckets: bool,
    },

    /// Generate example sentences for flagged notes
    GenerateExamples {
        /// Use at most this many notes (0 uses all)
        #[arg(short = 'n', long, allow_negative_numbers = true)]
        limit: Option<i64>,
        /// Directory receiving input-words.md and results.md
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,
    },

    /// Check that AnkiConnect is reachable
    Check,

    /// Show the version of Anki Helpers
    Version,
}

fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    if cli.command == Command::Version {
        println!("Anki Helpers version {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let settings = settings::load_settings();
    let overrides = Overrides {
        host: cli.host,
        port: cli.port,
        api_version: cli.api_version,
    };
    let env = |key: &str| std::env::var(key).ok();
    let anki = AnkiConnect::new(settings::connector_config(&settings, &overrides, env))?;

    match cli.command {
        Command::Decks => commands::decks::run(&anki, &cli.format)?,
        Command::Flagged { limit } => commands::flagged::run(&anki, limit, &cli.format)?,
        Command::Cards { query, due_buckets } => {
            commands::cards::run(&anki, &query, due_buckets, &cli.format)?
        }
        Command::GenerateExamples { limit, output_dir } => {
            let generator_config = settings::generator_config(&settings, env);
            commands::generate::run(&anki, generator_config, limit, &output_dir, &cli.format)?
        }
        Command::Check => commands::check::run(&anki, &cli.format)?,
        Command::Version => {}
    }
    Ok(())
}

/// One-line description of a failure for stderr.
fn describe(err: &anyhow::Error) -> String {
    match err.downcast_ref::<AnkiError>() {
        Some(e) => e.user_message(),
        None => format!("{err:#}"),
    }
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", describe(&err));
            ExitCode::FAILURE
        }
    }
}
