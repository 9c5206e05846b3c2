use crate::config::ConvertConfig;
use crate::convert::{self as pipeline, LoadedOrders};
use crate::core::grouper::item_count;
use crate::error::ConvertResult;
use crate::types::{SchemaVariant, Target};
use colored::Colorize;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, warn};

/// Which documents `convert` writes for each input file
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Bulk-import workbook (<name>_AO.xlsx)
    Xlsx,
    /// NMEXML sales orders (<name>_AD.xml)
    Xml,
    /// Both documents
    Both,
}

impl OutputFormat {
    pub fn targets(&self) -> Vec<Target> {
        match self {
            OutputFormat::Xlsx => vec![Target::Spreadsheet],
            OutputFormat::Xml => vec![Target::Xml],
            OutputFormat::Both => vec![Target::Spreadsheet, Target::Xml],
        }
    }
}

/// Outcome of a `convert` run over several files
#[derive(Debug, Default)]
pub struct ConvertSummary {
    pub written: Vec<PathBuf>,
    pub failed: Vec<PathBuf>,
}

/// Build the effective configuration: defaults, then profile, then flags
fn resolve_config(
    profile: Option<&Path>,
    variant: Option<SchemaVariant>,
    skip_rows: Option<usize>,
) -> ConvertResult<ConvertConfig> {
    let mut config = match profile {
        Some(path) => ConvertConfig::from_file(path)?,
        None => ConvertConfig::default(),
    };
    if let Some(variant) = variant {
        config = config.with_variant(variant);
    }
    if let Some(skip_rows) = skip_rows {
        config = config.with_skip_rows(skip_rows);
    }
    Ok(config)
}

/// Where the output for `input` is written
fn output_path(input: &Path, out_dir: Option<&Path>, target: Target) -> PathBuf {
    let name = target.output_file_name(input);
    match out_dir {
        Some(dir) => dir.join(name),
        None => input.with_file_name(name),
    }
}

/// Execute the convert command
pub fn convert(
    files: Vec<PathBuf>,
    format: OutputFormat,
    variant: Option<SchemaVariant>,
    skip_rows: Option<usize>,
    profile: Option<PathBuf>,
    out_dir: Option<PathBuf>,
    verbose: bool,
) -> ConvertResult<ConvertSummary> {
    println!("{}", "📦 OrderBridge - Converting order ledgers".bold().green());

    let config = resolve_config(profile.as_deref(), variant, skip_rows)?;
    config.validate()?;

    if verbose {
        println!(
            "   Variant: {:?} | Skip rows: {} | Branch: {}",
            config.variant, config.skip_rows, config.branch_code
        );
    }
    println!();

    if let Some(dir) = &out_dir {
        fs::create_dir_all(dir)?;
    }

    let mut summary = ConvertSummary::default();

    for file in &files {
        println!("   {} {}", "📖".cyan(), file.display());
        match convert_file(file, &config, format, out_dir.as_deref(), verbose) {
            Ok(written) => summary.written.extend(written),
            Err(e) => {
                error!(file = %file.display(), error = %e, "conversion failed");
                println!("      {} {}", "❌ Failed:".bold().red(), e);
                summary.failed.push(file.clone());
            }
        }
    }

    println!();
    if summary.failed.is_empty() {
        println!(
            "{} {} file(s) written",
            "✅ Conversion complete:".bold().green(),
            summary.written.len()
        );
    } else {
        println!(
            "{} {} of {} input file(s) failed",
            "⚠️  Conversion finished with errors:".bold().yellow(),
            summary.failed.len(),
            files.len()
        );
    }

    Ok(summary)
}

/// Convert one input file to every requested target.
///
/// The ledger is loaded once and every document is built in memory before
/// anything is written. If a write fails, outputs already written for this
/// file are removed, so a failing file never leaves a partial set behind.
fn convert_file(
    file: &Path,
    config: &ConvertConfig,
    format: OutputFormat,
    out_dir: Option<&Path>,
    verbose: bool,
) -> ConvertResult<Vec<PathBuf>> {
    let input = fs::read(file)?;
    let loaded = pipeline::load_orders(&input, config)?;

    for warning in &loaded.warnings {
        println!("      {} {}", "⚠️ ".yellow(), warning.to_string().yellow());
    }
    if verbose {
        println!(
            "      {} orders, {} line items",
            loaded.orders.len().to_string().bold(),
            item_count(&loaded.orders).to_string().bold()
        );
    }

    let mut documents = Vec::new();
    for target in format.targets() {
        let bytes = pipeline::emit(&loaded.orders, config, target)?;
        documents.push((target, bytes));
    }

    let mut written: Vec<PathBuf> = Vec::new();
    for (target, bytes) in documents {
        let path = output_path(file, out_dir, target);
        if let Err(e) = fs::write(&path, &bytes) {
            for done in &written {
                if let Err(cleanup) = fs::remove_file(done) {
                    warn!(path = %done.display(), error = %cleanup, "could not remove partial output");
                }
            }
            return Err(e.into());
        }
        println!(
            "      {} {} ({})",
            "→".green(),
            path.display(),
            target.mime_type()
        );
        written.push(path);
    }

    Ok(written)
}

/// One order as shown by `inspect`
#[derive(Debug, Serialize)]
struct OrderSummary {
    order_no: String,
    posted_date: String,
    customer_code: String,
    items: usize,
}

/// Execute the inspect command - show how a ledger groups into orders
pub fn inspect(
    file: PathBuf,
    skip_rows: Option<usize>,
    profile: Option<PathBuf>,
    json: bool,
) -> ConvertResult<()> {
    let config = resolve_config(profile.as_deref(), None, skip_rows)?;
    let input = fs::read(&file)?;
    let loaded = pipeline::load_orders(&input, &config)?;

    if json {
        let summaries = summarize(&loaded);
        let text = serde_json::to_string_pretty(&summaries)?;
        println!("{}", text);
        return Ok(());
    }

    println!("{}", "🔍 OrderBridge - Ledger Inspection".bold().green());
    println!("   File: {}", file.display());
    println!("   Skip rows: {}\n", config.skip_rows);

    for warning in &loaded.warnings {
        println!("   {} {}", "⚠️ ".yellow(), warning.to_string().yellow());
    }

    for summary in summarize(&loaded) {
        println!(
            "   {} {}  {}  {} item(s)",
            summary.order_no.bright_blue().bold(),
            summary.posted_date,
            summary.customer_code.cyan(),
            summary.items
        );
    }

    println!(
        "\n   {} orders, {} rows dropped (no order number)",
        loaded.orders.len().to_string().bold(),
        loaded.dropped_rows
    );
    Ok(())
}

fn summarize(loaded: &LoadedOrders) -> Vec<OrderSummary> {
    loaded
        .orders
        .iter()
        .map(|order| OrderSummary {
            order_no: order.key(),
            posted_date: order.posted_date.to_field_string(),
            customer_code: order.customer_code.to_field_string(),
            items: order.items.len(),
        })
        .collect()
}

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;
