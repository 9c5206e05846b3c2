//! One-call conversion pipeline
//!
//! Loader → Grouper → {workbook | NMEXML}. Each call owns its input and
//! output buffers; nothing is shared between calls.

use tracing::{info, warn};

use crate::config::ConvertConfig;
use crate::core::grouper::{group_orders, item_count};
use crate::error::{ConvertResult, ConvertWarning};
use crate::excel::{LedgerImporter, OrderSheetExporter};
use crate::types::{Order, Target};
use crate::xml::SalesOrderXmlWriter;

/// Grouped orders plus the non-fatal findings of loading them
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedOrders {
    pub orders: Vec<Order>,
    pub dropped_rows: usize,
    pub warnings: Vec<ConvertWarning>,
}

/// A finished conversion ready to hand to the caller
#[derive(Debug, Clone)]
pub struct Conversion {
    pub target: Target,
    pub bytes: Vec<u8>,
    pub orders: usize,
    pub items: usize,
    pub warnings: Vec<ConvertWarning>,
}

impl Conversion {
    pub fn mime_type(&self) -> &'static str {
        self.target.mime_type()
    }
}

/// Load and group a ledger workbook without emitting anything
pub fn load_orders(input: &[u8], config: &ConvertConfig) -> ConvertResult<LoadedOrders> {
    let ledger = LedgerImporter::new(config.skip_rows).load(input)?;
    let orders = group_orders(&ledger.rows);

    let mut warnings = Vec::new();
    if !ledger.missing_columns.is_empty() {
        warnings.push(ConvertWarning::MissingColumns(ledger.missing_columns));
    }
    if orders.is_empty() {
        warn!("no rows with an order number survived loading");
        warnings.push(ConvertWarning::EmptyResult);
    }

    Ok(LoadedOrders {
        orders,
        dropped_rows: ledger.dropped,
        warnings,
    })
}

/// Emit already-grouped orders in the requested format
pub fn emit(orders: &[Order], config: &ConvertConfig, target: Target) -> ConvertResult<Vec<u8>> {
    match target {
        Target::Spreadsheet => OrderSheetExporter::new(orders, config.variant).to_buffer(),
        Target::Xml => SalesOrderXmlWriter::new(orders, config).to_buffer(),
    }
}

/// Convert ledger workbook bytes into one output buffer
pub fn convert(input: &[u8], config: &ConvertConfig, target: Target) -> ConvertResult<Conversion> {
    config.validate()?;
    let loaded = load_orders(input, config)?;
    let bytes = emit(&loaded.orders, config, target)?;

    let conversion = Conversion {
        target,
        bytes,
        orders: loaded.orders.len(),
        items: item_count(&loaded.orders),
        warnings: loaded.warnings,
    };

    info!(
        target = ?target,
        variant = ?config.variant,
        orders = conversion.orders,
        items = conversion.items,
        dropped_rows = loaded.dropped_rows,
        "conversion complete"
    );
    Ok(conversion)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConvertError;

    #[test]
    fn test_emit_empty_orders_is_valid() {
        let config = ConvertConfig::default();
        let xml = emit(&[], &config, Target::Xml).unwrap();
        assert!(String::from_utf8(xml).unwrap().contains("NMEXML"));
        let xlsx = emit(&[], &config, Target::Spreadsheet).unwrap();
        assert_eq!(&xlsx[..2], b"PK");
    }

    #[test]
    fn test_convert_rejects_garbage() {
        let result = convert(b"garbage", &ConvertConfig::default(), Target::Xml);
        assert!(matches!(result, Err(ConvertError::Excel(_))));
    }

    #[test]
    fn test_convert_rejects_invalid_config() {
        let config = ConvertConfig {
            eximid: String::new(),
            ..ConvertConfig::default()
        };
        let result = convert(b"garbage", &config, Target::Xml);
        assert!(matches!(result, Err(ConvertError::Config(_))));
    }
}
