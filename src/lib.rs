//! OrderBridge - order ledger to accounting import converter
//!
//! This library reads a sales-order ledger export (an `.xlsx` sheet with a
//! few cover rows above its column headers), groups the flat rows into
//! orders with nested line items, and writes them out in two formats:
//!
//! - a bulk-import workbook with tagged `HEADER` / `ITEM` rows
//! - an NMEXML document of `SALESORDER` transactions
//!
//! Every conversion is a pure bytes-in, bytes-out call.
//!
//! # Example
//!
//! ```no_run
//! use orderbridge::{convert, ConvertConfig, SchemaVariant, Target};
//!
//! let input = std::fs::read("january.xlsx")?;
//! let config = ConvertConfig::default().with_variant(SchemaVariant::Extended);
//!
//! let result = convert(&input, &config, Target::Xml)?;
//! println!("{} orders, {} bytes", result.orders, result.bytes.len());
//! std::fs::write(Target::Xml.output_file_name("january.xlsx".as_ref()), &result.bytes)?;
//! # Ok::<(), orderbridge::error::ConvertError>(())
//! ```

pub mod cli;
pub mod config;
pub mod convert;
pub mod core;
pub mod error;
pub mod excel;
pub mod types;
pub mod xml;

// Re-export commonly used types
pub use config::ConvertConfig;
pub use convert::{convert, load_orders, Conversion, LoadedOrders};
pub use error::{ConvertError, ConvertResult, ConvertWarning};
pub use types::{CellValue, LineItem, Order, RawRow, SchemaVariant, Target};
