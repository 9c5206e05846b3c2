use anyhow::bail;
use clap::{Parser, Subcommand};
use orderbridge::cli::{self, OutputFormat};
use orderbridge::types::SchemaVariant;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "orderbridge")]
#[command(about = "Convert order-ledger exports into accounting import files.")]
#[command(long_about = "OrderBridge - order ledger → accounting import files

Reads a sales-order ledger export (.xlsx with cover rows above the column
headers), groups its rows by Order No and writes:

  <name>_AO.xlsx  - bulk-import workbook (HEADER / ITEM rows)
  <name>_AD.xml   - NMEXML sales-order transactions

COMMANDS:
  convert   - Convert one or more ledgers
  inspect   - Show how a ledger groups into orders

EXAMPLES:
  orderbridge convert january.xlsx --to both
  orderbridge convert *.xlsx --to xml --variant extended --out-dir converted/
  orderbridge inspect january.xlsx --json")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(long_about = "Convert order ledgers into import files.

Each input is processed on its own. A file that fails (unreadable, or no
'Order No' column at the expected row) is reported and skipped; nothing is
written for it. The command exits non-zero if any file failed.

PROFILES:
  A YAML profile can fix the layout and envelope values:

  skip_rows: 5
  variant: extended
  branch_code: \"2040822216\"
  currency: IDR

  Command-line flags override profile values.")]
    /// Convert order ledgers into import files
    Convert {
        /// Ledger export files (.xlsx)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Documents to produce
        #[arg(short = 't', long = "to", value_enum, default_value = "both")]
        format: OutputFormat,

        /// Field-set variant for both documents
        #[arg(long, value_enum)]
        variant: Option<SchemaVariant>,

        /// Rows above the column-header row
        #[arg(short, long)]
        skip_rows: Option<usize>,

        /// YAML conversion profile
        #[arg(short, long, env = "ORDERBRIDGE_PROFILE")]
        profile: Option<PathBuf>,

        /// Write outputs here instead of next to each input
        #[arg(short, long)]
        out_dir: Option<PathBuf>,

        /// Show verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show how a ledger groups into orders
    Inspect {
        /// Ledger export file (.xlsx)
        file: PathBuf,

        /// Rows above the column-header row
        #[arg(short, long)]
        skip_rows: Option<usize>,

        /// YAML conversion profile
        #[arg(short, long, env = "ORDERBRIDGE_PROFILE")]
        profile: Option<PathBuf>,

        /// Print orders as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "orderbridge=debug"
    } else {
        "orderbridge=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Convert {
            files,
            format,
            variant,
            skip_rows,
            profile,
            out_dir,
            verbose,
        } => {
            init_tracing(verbose);
            let total = files.len();
            let summary =
                cli::convert(files, format, variant, skip_rows, profile, out_dir, verbose)?;
            if !summary.failed.is_empty() {
                bail!("{} of {} file(s) failed to convert", summary.failed.len(), total);
            }
            Ok(())
        }

        Commands::Inspect {
            file,
            skip_rows,
            profile,
            json,
        } => {
            init_tracing(false);
            cli::inspect(file, skip_rows, profile, json)?;
            Ok(())
        }
    }
}
