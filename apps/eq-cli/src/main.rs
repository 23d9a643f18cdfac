//! # eq-cli
//!
//! Command-line interface for Eternal Quest.
//!
//! - `quest add simple|eternal|checklist|negative` — create a goal
//! - `quest list` — show goals with completion markers
//! - `quest record <n>` — record an event on goal `n`
//! - `quest score` — show score, level, and progress
//! - `quest init` — start a quest with the sample goals
//! - `quest shell` — numbered interactive menu (the default)

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use eq_goal::{QuestConfig, QuestSettings};
use tracing_subscriber::EnvFilter;

/// Eternal Quest — track goals, earn points, level up.
#[derive(Parser)]
#[command(name = "quest", version, about)]
struct Cli {
    /// Directory holding the `.quest/` folder (defaults to current directory).
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Save file to use instead of `.quest/goals.txt`.
    #[arg(long)]
    file: Option<PathBuf>,

    /// Log goal and save-file activity to stderr.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new goal.
    Add {
        #[command(subcommand)]
        goal: commands::goal::AddCommands,
    },
    /// List all goals.
    List,
    /// Record an event on a goal by its listed number.
    Record {
        /// Goal number as shown by `quest list`.
        ordinal: usize,
    },
    /// Show score, level, and progress to the next level.
    Score,
    /// Create a save file seeded with sample goals.
    Init,
    /// Interactive numbered menu.
    Shell,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so they don't mix with menu output on stdout.
    let level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(format!("eq_goal={level}").parse()?)
                .add_directive(format!("eq_cli={level}").parse()?),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let root = cli.root.canonicalize().unwrap_or(cli.root);
    let mut config = QuestConfig::for_root(&root);
    if let Some(file) = cli.file {
        config = config.with_save_file(file);
    }
    let settings = QuestSettings::load_or_default(&config.settings_file)?;
    tracing::debug!(save_file = %config.save_file.display(), "quest config resolved");

    let mut stdout = std::io::stdout().lock();
    match cli.command.unwrap_or(Commands::Shell) {
        Commands::Add { goal } => commands::goal::add(&config, &settings, goal, &mut stdout),
        Commands::List => commands::goal::list(&config, &settings, &mut stdout),
        Commands::Record { ordinal } => {
            commands::goal::record(&config, &settings, ordinal, &mut stdout)
        }
        Commands::Score => commands::goal::score(&config, &settings, &mut stdout),
        Commands::Init => commands::goal::init(&config, &mut stdout),
        Commands::Shell => {
            let mut stdin = std::io::stdin().lock();
            commands::shell::run(&config, &settings, &mut stdin, &mut stdout)
        }
    }
}
