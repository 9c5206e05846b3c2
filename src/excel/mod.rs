//! Excel import/export for order ledgers
//!
//! - Import: ledger export (.xlsx) → rows
//! - Export: grouped orders → bulk-import worksheet (.xlsx)

pub mod exporter;
mod importer;

pub use exporter::OrderSheetExporter;
pub use importer::{LedgerImporter, LoadedLedger};
