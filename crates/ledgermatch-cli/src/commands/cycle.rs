//! Cycle command - run one reconcile cycle over a local inbox directory and
//! a JSON-file ledger.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use ledgermatch_core::decode::{OcrEngine, OcrHandle, PureOcrEngine};
use ledgermatch_core::error::OcrError;
use ledgermatch_core::pipeline::ReconcilePipeline;

use super::load_config;
use crate::providers::{DirSource, JsonLedger};

/// Arguments for the cycle command.
#[derive(Args)]
pub struct CycleArgs {
    /// Directory of unprocessed receipt files
    #[arg(required = true)]
    inbox: PathBuf,

    /// JSON ledger file (created if missing)
    #[arg(short, long)]
    ledger: PathBuf,

    /// Directory receipts are written to (default: <inbox>/receipts)
    #[arg(short, long)]
    receipts: Option<PathBuf>,

    /// Job/project name receipts bill to
    #[arg(short, long)]
    job: Option<String>,
}

pub fn run(args: CycleArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let mut config = load_config(config_path)?;
    if let Some(job) = args.job {
        config.sync.default_job = job;
    }

    let source = DirSource::new(&args.inbox)?;
    let ledger = JsonLedger::load(&args.ledger)?;

    let model_dir = config.ocr.model_dir.clone();
    let ocr = OcrHandle::new(
        &config.ocr,
        Box::new(move || -> Result<Box<dyn OcrEngine>, OcrError> {
            Ok(Box::new(PureOcrEngine::from_dir(&model_dir)?))
        }),
    );

    let mut pipeline = ReconcilePipeline::new(config, source, ledger, ocr);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    spinner.set_message("reconciling receipts...");
    spinner.tick();

    let outcome = pipeline.run_cycle()?;
    spinner.finish_and_clear();

    let (_, ledger) = pipeline.shutdown();
    ledger.save()?;

    if !outcome.ran {
        println!("{}", style("a cycle is already running, nothing to do").yellow());
        return Ok(());
    }

    let receipts_dir = args
        .receipts
        .unwrap_or_else(|| args.inbox.join("receipts"));
    if !outcome.receipts.is_empty() {
        fs::create_dir_all(&receipts_dir)?;
        for receipt in &outcome.receipts {
            let path = receipts_dir.join(format!("{}.json", receipt.id));
            fs::write(&path, serde_json::to_string_pretty(receipt)?)?;
        }
        info!("wrote {} receipts to {}", outcome.receipts.len(), receipts_dir.display());
    }

    println!(
        "{} {} fetched, {} matched, {} synced, {} parse misses, {} skipped, {} failed",
        style("cycle complete:").green().bold(),
        outcome.fetched,
        outcome.matched,
        outcome.synced,
        outcome.parse_miss,
        outcome.decode_skipped,
        outcome.failed
    );
    if let Some(reason) = &outcome.aborted {
        println!("{} {reason}", style("batch aborted:").red().bold());
    }

    Ok(())
}
