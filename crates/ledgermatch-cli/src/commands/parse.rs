//! Parse command - extract fields from a single receipt file.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use ledgermatch_core::decode::{
    DecodedArtifact, HtmlDecoder, OcrEngine, OcrHandle, PdfDecoder, PureOcrEngine,
};
use ledgermatch_core::error::OcrError;
use ledgermatch_core::models::{EngineConfig, ParsedReceipt};
use ledgermatch_core::parse::parse_artifact;
use ledgermatch_core::vendor::{detect, profile_by_name, VendorProfile};

use super::load_config;

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Input file (PDF, HTML, text, or image)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Force a vendor profile by id (e.g. home_depot)
    #[arg(long)]
    vendor: Option<String>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// Plain text summary
    Text,
}

pub fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("input file not found: {}", args.input.display());
    }

    let extension = args
        .input
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    info!("parsing file: {}", args.input.display());

    let (artifact, markup) = decode_file(&args.input, &extension, &config)?;

    let profile = match &args.vendor {
        Some(name) => Some(
            profile_by_name(name)
                .ok_or_else(|| anyhow::anyhow!("unknown vendor id: {name}"))?,
        ),
        None => detect_from_file(&args.input, &artifact),
    };

    if let Some(profile) = profile {
        info!("vendor: {}", profile.display_name);
    }

    let parsed = parse_artifact(&artifact, markup.as_deref(), profile);
    let Some(parsed) = parsed else {
        anyhow::bail!("no parser produced a usable result for this file");
    };

    let rendered = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&parsed)?,
        OutputFormat::Text => render_text(&parsed, profile),
    };

    match &args.output {
        Some(path) => fs::write(path, rendered)?,
        None => println!("{rendered}"),
    }

    Ok(())
}

fn decode_file(
    input: &PathBuf,
    extension: &str,
    config: &EngineConfig,
) -> anyhow::Result<(DecodedArtifact, Option<String>)> {
    match extension {
        "pdf" => {
            let artifact = PdfDecoder::new(&config.pdf).decode(&fs::read(input)?)?;
            Ok((artifact, None))
        }
        "html" | "htm" => {
            let markup = fs::read_to_string(input)?;
            Ok((HtmlDecoder::new().decode(&markup), Some(markup)))
        }
        "png" | "jpg" | "jpeg" | "tiff" | "bmp" => {
            let model_dir = config.ocr.model_dir.clone();
            let mut handle = OcrHandle::new(
                &config.ocr,
                Box::new(move || -> Result<Box<dyn OcrEngine>, OcrError> {
                    Ok(Box::new(PureOcrEngine::from_dir(&model_dir)?))
                }),
            );
            let artifact = handle.decode(&fs::read(input)?)?;
            handle.shutdown();
            Ok((artifact, None))
        }
        _ => {
            let text = fs::read_to_string(input)?;
            Ok((DecodedArtifact::from_text(text), None))
        }
    }
}

/// With no sender metadata for a local file, detect from the file name and
/// the leading content.
fn detect_from_file(input: &PathBuf, artifact: &DecodedArtifact) -> Option<&'static VendorProfile> {
    let name = input
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    let snippet: String = artifact.text.chars().take(400).collect();
    detect("", name, &snippet)
}

fn render_text(parsed: &ParsedReceipt, profile: Option<&'static VendorProfile>) -> String {
    let mut out = String::new();

    if let Some(profile) = profile {
        out.push_str(&format!(
            "{}  {}\n",
            style("Vendor:").bold(),
            profile.display_name
        ));
    }
    if let Some(total) = parsed.total {
        out.push_str(&format!("{}   ${total}\n", style("Total:").bold()));
    }
    if let Some(date) = parsed.transaction_date {
        out.push_str(&format!("{}    {date}\n", style("Date:").bold()));
    }
    if let Some(order) = &parsed.order_number {
        out.push_str(&format!("{}   {order}\n", style("Order:").bold()));
    }
    if let Some(card) = &parsed.card_last4 {
        out.push_str(&format!("{}    **** {card}\n", style("Card:").bold()));
    }
    if !parsed.line_items.is_empty() {
        out.push_str(&format!(
            "{}   {} line items\n",
            style("Items:").bold(),
            parsed.line_items.len()
        ));
    }
    out.push_str(&format!(
        "{} {:?}\n",
        style("Confidence:").bold(),
        parsed.confidence
    ));

    out
}
