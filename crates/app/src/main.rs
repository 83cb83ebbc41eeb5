//! `exam`: timed multiple-choice exam in the terminal.

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

use exam_core::Clock;
use exam_core::model::TimeLimit;
use exam_services::ExamLoopService;
use exam_storage::JsonQuestionBank;

mod commands;
mod config;
mod render;
mod runner;

#[derive(Parser, Debug)]
#[command(name = "exam", version, about = "Timed multiple-choice exam")]
struct Cli {
    /// Path to the JSON question bank
    #[arg(long, env = "EXAM_BANK")]
    bank: Option<PathBuf>,

    /// Number of questions per exam
    #[arg(long, env = "EXAM_SIZE")]
    size: Option<u32>,

    /// Time limit: 15, 30, 60, unlimited (or `<n>s`)
    #[arg(long, env = "EXAM_TIME_LIMIT")]
    time_limit: Option<TimeLimit>,

    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Never include the special question
    #[arg(long)]
    no_special: bool,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("EXAM_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let file = match &cli.config {
        Some(path) => config::load_file(path)?,
        None => config::FileConfig::default(),
    };
    let resolved = config::resolve(
        file,
        config::Overrides {
            bank: cli.bank,
            exam_size: cli.size,
            time_limit: cli.time_limit,
            no_special: cli.no_special,
        },
    )?;

    let repo = JsonQuestionBank::new(&resolved.bank);
    let mut svc = ExamLoopService::load(&repo, Clock::system(), resolved.settings)
        .await
        .with_context(|| format!("failed to load question bank {}", resolved.bank.display()))?;

    let stdin = BufReader::new(tokio::io::stdin());
    runner::run(&mut svc, stdin).await
}
