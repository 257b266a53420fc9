//! CLI application for receipt reconciliation.

mod commands;
mod providers;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{cycle, parse, vendors};

/// Receipt reconciliation - parse vendor receipts and reconcile them against
/// an accounting ledger
#[derive(Parser)]
#[command(name = "ledgermatch")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a single receipt file
    Parse(parse::ParseArgs),

    /// Run one reconcile cycle over a local inbox and JSON ledger
    Cycle(cycle::CycleArgs),

    /// List known vendor profiles
    Vendors,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Parse(args) => parse::run(args, cli.config.as_deref()),
        Commands::Cycle(args) => cycle::run(args, cli.config.as_deref()),
        Commands::Vendors => vendors::run(),
    }
}
