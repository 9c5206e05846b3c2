use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use crate::core::dates;

//==============================================================================
// Source columns
//==============================================================================

/// Column labels of the order ledger export, matched after trimming.
pub mod columns {
    pub const ORDER_NO: &str = "Order No";
    pub const POSTED_DATE: &str = "Posted Date";
    pub const CUSTOMER_CODE: &str = "Customer Code";
    pub const ADDRESS: &str = "Address";
    pub const DISTRICT: &str = "District";
    pub const ITEM_CODE: &str = "Item Code";
    pub const ITEM_NAME: &str = "Item Name";
    pub const QUANTITY: &str = "Quantity";
    pub const UOM: &str = "UOM";
    pub const UNIT_PRICE: &str = "Unit Price";
    pub const DISCOUNT: &str = "Discount";

    /// Every column the converter reads, in ledger order.
    pub const EXPECTED: [&str; 11] = [
        ORDER_NO,
        POSTED_DATE,
        CUSTOMER_CODE,
        ADDRESS,
        DISTRICT,
        ITEM_CODE,
        ITEM_NAME,
        QUANTITY,
        UOM,
        UNIT_PRICE,
        DISCOUNT,
    ];
}

//==============================================================================
// Cell values
//==============================================================================

/// A scalar read from one worksheet cell
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    Date(NaiveDateTime),
}

static EMPTY_CELL: CellValue = CellValue::Empty;

impl CellValue {
    /// True for missing cells and whitespace-only text
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            CellValue::Number(n) => n.is_nan(),
            _ => false,
        }
    }

    /// Render the value the way both output formats expect it.
    ///
    /// Missing values become `""`, never a textual null marker. Dates are
    /// normalized to `DD/MM/YYYY`; text passes through unchanged.
    pub fn to_field_string(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Bool(b) => (if *b { "TRUE" } else { "FALSE" }).to_string(),
            CellValue::Date(dt) => dates::format_ddmmyyyy(dt),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Number(n) if n.is_finite() => serializer.serialize_f64(*n),
            CellValue::Bool(b) => serializer.serialize_bool(*b),
            other => serializer.serialize_str(&other.to_field_string()),
        }
    }
}

/// Format a number without a trailing `.0` for integral values
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return String::new();
    }
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

//==============================================================================
// Rows and orders
//==============================================================================

/// One ledger row keyed by trimmed column label
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRow {
    cells: HashMap<String, CellValue>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: impl Into<String>, value: CellValue) {
        self.cells.insert(column.into(), value);
    }

    /// Value of a column, `Empty` when the column is absent
    pub fn get(&self, column: &str) -> &CellValue {
        self.cells.get(column).unwrap_or(&EMPTY_CELL)
    }

    pub fn with(mut self, column: &str, value: impl Into<CellValue>) -> Self {
        self.insert(column, value.into());
        self
    }
}

/// A sales order and the line items that share its order number
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    pub order_no: CellValue,
    pub posted_date: CellValue,
    pub customer_code: CellValue,
    pub address: CellValue,
    pub district: CellValue,
    pub items: Vec<LineItem>,
}

impl Order {
    /// Start an order from the first row that carries its number
    pub fn from_first_row(row: &RawRow) -> Self {
        Self {
            order_no: row.get(columns::ORDER_NO).clone(),
            posted_date: row.get(columns::POSTED_DATE).clone(),
            customer_code: row.get(columns::CUSTOMER_CODE).clone(),
            address: row.get(columns::ADDRESS).clone(),
            district: row.get(columns::DISTRICT).clone(),
            items: Vec::new(),
        }
    }

    pub fn key(&self) -> String {
        self.order_no.to_field_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineItem {
    pub item_code: CellValue,
    pub item_name: CellValue,
    pub quantity: CellValue,
    pub uom: CellValue,
    pub unit_price: CellValue,
    pub discount: CellValue,
}

impl LineItem {
    pub fn from_row(row: &RawRow) -> Self {
        Self {
            item_code: row.get(columns::ITEM_CODE).clone(),
            item_name: row.get(columns::ITEM_NAME).clone(),
            quantity: row.get(columns::QUANTITY).clone(),
            uom: row.get(columns::UOM).clone(),
            unit_price: row.get(columns::UNIT_PRICE).clone(),
            discount: row.get(columns::DISCOUNT).clone(),
        }
    }
}

//==============================================================================
// Output selection
//==============================================================================

/// Field-set variant shared by both emitters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SchemaVariant {
    /// Core fields only
    #[default]
    Minimal,
    /// Core fields plus legend rows and every placeholder the importer knows
    Extended,
}

impl FromStr for SchemaVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "minimal" => Ok(SchemaVariant::Minimal),
            "extended" => Ok(SchemaVariant::Extended),
            other => Err(format!(
                "unknown schema variant '{}' (expected 'minimal' or 'extended')",
                other
            )),
        }
    }
}

/// Downstream format of a conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// Bulk-import workbook for the online accounting system
    Spreadsheet,
    /// NMEXML transaction document for the desktop accounting application
    Xml,
}

impl Target {
    pub fn mime_type(&self) -> &'static str {
        match self {
            Target::Spreadsheet => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            Target::Xml => "application/xml",
        }
    }

    pub fn suffix(&self) -> &'static str {
        match self {
            Target::Spreadsheet => "_AO.xlsx",
            Target::Xml => "_AD.xml",
        }
    }

    /// `<basename>_AO.xlsx` or `<basename>_AD.xml` for an input path
    pub fn output_file_name(&self, input: &Path) -> String {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".to_string());
        format!("{}{}", stem, self.suffix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::path::PathBuf;

    #[test]
    fn test_format_number_integral() {
        assert_eq!(format_number(2.0), "2");
        assert_eq!(format_number(-15.0), "-15");
        assert_eq!(format_number(0.0), "0");
    }

    #[test]
    fn test_format_number_fractional() {
        assert_eq!(format_number(12.5), "12.5");
        assert_eq!(format_number(0.1), "0.1");
    }

    #[test]
    fn test_missing_values_render_empty() {
        assert_eq!(CellValue::Empty.to_field_string(), "");
        assert_eq!(CellValue::Number(f64::NAN).to_field_string(), "");
        assert!(CellValue::Number(f64::NAN).is_blank());
    }

    #[test]
    fn test_date_renders_ddmmyyyy() {
        let dt = NaiveDate::from_ymd_opt(2024, 3, 7)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(CellValue::Date(dt).to_field_string(), "07/03/2024");
    }

    #[test]
    fn test_text_date_passes_through() {
        let value = CellValue::from("2024-03-07");
        assert_eq!(value.to_field_string(), "2024-03-07");
    }

    #[test]
    fn test_whitespace_text_is_blank() {
        assert!(CellValue::from("   ").is_blank());
        assert!(!CellValue::from("SO-1").is_blank());
        assert!(!CellValue::Number(0.0).is_blank());
    }

    #[test]
    fn test_raw_row_missing_column_is_empty() {
        let row = RawRow::new().with(columns::ORDER_NO, "SO-1");
        assert_eq!(row.get(columns::ORDER_NO), &CellValue::from("SO-1"));
        assert_eq!(row.get(columns::DISCOUNT), &CellValue::Empty);
    }

    #[test]
    fn test_schema_variant_from_str() {
        assert_eq!("minimal".parse::<SchemaVariant>(), Ok(SchemaVariant::Minimal));
        assert_eq!(" Extended ".parse::<SchemaVariant>(), Ok(SchemaVariant::Extended));
        assert!("full".parse::<SchemaVariant>().is_err());
    }

    #[test]
    fn test_target_file_names() {
        let input = PathBuf::from("/data/uploads/march orders.xlsx");
        assert_eq!(
            Target::Spreadsheet.output_file_name(&input),
            "march orders_AO.xlsx"
        );
        assert_eq!(Target::Xml.output_file_name(&input), "march orders_AD.xml");
    }

    #[test]
    fn test_target_mime_types() {
        assert_eq!(Target::Xml.mime_type(), "application/xml");
        assert!(Target::Spreadsheet.mime_type().ends_with("spreadsheetml.sheet"));
    }

    #[test]
    fn test_cell_value_serializes() {
        let json = serde_json::to_string(&vec![
            CellValue::from("SO-1"),
            CellValue::Number(3.0),
            CellValue::Empty,
        ])
        .unwrap();
        assert_eq!(json, r#"["SO-1",3.0,""]"#);
    }
}
