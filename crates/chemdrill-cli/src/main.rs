//! chemdrill CLI: adaptive chemistry practice in the terminal.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

const DEFAULT_LOG_FILTER: &str = "chemdrill=info,chemdrill_core=warn,chemdrill_providers=warn";

#[derive(Parser)]
#[command(name = "chemdrill", version, about = "Adaptive chemistry practice")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Practice interactively: type answers, or :help for controls
    Play {
        /// Practice mode: acid or skeleton
        #[arg(long)]
        mode: Option<String>,

        /// Starting difficulty (clamped to the configured grade range)
        #[arg(long)]
        difficulty: Option<u32>,

        /// Use the built-in questions instead of the configured provider
        #[arg(long)]
        offline: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Apply one difficulty transition
    Step {
        /// Current difficulty
        #[arg(long)]
        difficulty: u32,

        /// Current streak
        #[arg(long, default_value = "0")]
        streak: u32,

        /// The answer was correct
        #[arg(long, conflicts_with = "wrong")]
        correct: bool,

        /// The answer was wrong
        #[arg(long)]
        wrong: bool,

        /// Consecutive correct answers needed to promote
        #[arg(long, default_value = "2")]
        up_threshold: u32,

        /// Lowest difficulty
        #[arg(long, default_value = "6")]
        min_grade: u32,

        /// Highest difficulty
        #[arg(long, default_value = "12")]
        max_grade: u32,
    },

    /// Replay a sequence of outcomes and print each state
    Simulate {
        /// Comma-separated outcomes, e.g. "c,c,w,c"
        #[arg(long)]
        outcomes: String,

        /// Starting difficulty
        #[arg(long, default_value = "6")]
        difficulty: u32,

        /// Starting streak
        #[arg(long, default_value = "0")]
        streak: u32,
    },

    /// Grade one answer and show the normalized forms
    Grade {
        /// The learner's answer
        #[arg(long)]
        answer: String,

        /// The canonical answer
        #[arg(long)]
        canonical: String,

        /// An accepted synonym (repeatable)
        #[arg(long = "accept")]
        accepted: Vec<String>,
    },

    /// Create a starter config
    Init,
}

#[tokio::main]
async fn main() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Play {
            mode,
            difficulty,
            offline,
            config,
        } => commands::play::execute(mode, difficulty, offline, config).await,
        Commands::Step {
            difficulty,
            streak,
            correct,
            wrong,
            up_threshold,
            min_grade,
            max_grade,
        } => commands::step::execute(
            difficulty,
            streak,
            correct,
            wrong,
            up_threshold,
            min_grade,
            max_grade,
        ),
        Commands::Simulate {
            outcomes,
            difficulty,
            streak,
        } => commands::simulate::execute(&outcomes, difficulty, streak),
        Commands::Grade {
            answer,
            canonical,
            accepted,
        } => commands::grade::execute(answer, canonical, accepted),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
