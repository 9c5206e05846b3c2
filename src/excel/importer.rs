//! Ledger importer - order ledger export (.xlsx) → rows

use crate::core::dates;
use crate::error::{ConvertError, ConvertResult};
use crate::types::{columns, format_number, CellValue, RawRow};
use calamine::{Data, Range, Reader, Xlsx};
use std::collections::HashMap;
use std::io::Cursor;
use tracing::{debug, warn};

/// Rows read from a ledger, with what was dropped or missing along the way
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadedLedger {
    /// Rows that carry an order number, in sheet order
    pub rows: Vec<RawRow>,
    /// Data rows skipped for lacking an order number
    pub dropped: usize,
    /// Expected columns not present in the header row
    pub missing_columns: Vec<String>,
}

/// Reads the first worksheet of a ledger export into `RawRow`s
pub struct LedgerImporter {
    skip_rows: usize,
}

impl LedgerImporter {
    /// Create an importer whose column-header row sits below `skip_rows` cover rows
    pub fn new(skip_rows: usize) -> Self {
        Self { skip_rows }
    }

    /// Load rows from workbook bytes
    pub fn load(&self, bytes: &[u8]) -> ConvertResult<LoadedLedger> {
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))
            .map_err(|e| ConvertError::Excel(format!("Failed to open Excel file: {}", e)))?;

        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| ConvertError::InputFormat("workbook has no worksheets".to_string()))?
            .map_err(|e| ConvertError::Excel(format!("Failed to read worksheet: {}", e)))?;

        self.load_range(&range)
    }

    /// Load rows from an already-read worksheet range
    pub fn load_range(&self, range: &Range<Data>) -> ConvertResult<LoadedLedger> {
        if range.is_empty() {
            return Err(ConvertError::InputFormat("worksheet is empty".to_string()));
        }

        // calamine ranges begin at the first used cell, not at A1
        let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);
        if self.skip_rows < first_row {
            return Err(self.header_error(&[]));
        }

        let mut rows = range.rows().skip(self.skip_rows - first_row);
        let header_cells = rows.next().ok_or_else(|| self.header_error(&[]))?;
        let header = Self::read_header(header_cells);

        if !header.contains_key(columns::ORDER_NO) {
            let mut found: Vec<&str> = header.keys().map(String::as_str).collect();
            found.sort_unstable();
            return Err(self.header_error(&found));
        }

        let missing_columns: Vec<String> = columns::EXPECTED
            .iter()
            .filter(|name| !header.contains_key(**name))
            .map(|name| name.to_string())
            .collect();
        if !missing_columns.is_empty() {
            warn!(missing = ?missing_columns, "expected ledger columns not found");
        }

        let mut loaded = LoadedLedger {
            missing_columns,
            ..LoadedLedger::default()
        };

        for cells in rows {
            let mut row = RawRow::new();
            for (name, &col) in &header {
                let value = cells.get(col).map(Self::convert_cell).unwrap_or_default();
                row.insert(name.clone(), value);
            }

            if row.get(columns::ORDER_NO).is_blank() {
                loaded.dropped += 1;
                continue;
            }
            loaded.rows.push(row);
        }

        debug!(
            kept = loaded.rows.len(),
            dropped = loaded.dropped,
            "loaded ledger rows"
        );
        Ok(loaded)
    }

    /// Map trimmed header labels to column positions; the first duplicate wins
    fn read_header(cells: &[Data]) -> HashMap<String, usize> {
        let mut header = HashMap::new();
        for (col, cell) in cells.iter().enumerate() {
            let name = match cell {
                Data::String(s) => s.trim().to_string(),
                Data::Int(i) => i.to_string(),
                Data::Float(f) => format_number(*f),
                _ => continue,
            };
            if name.is_empty() {
                continue;
            }
            header.entry(name).or_insert(col);
        }
        header
    }

    /// Convert a calamine cell to a `CellValue`
    fn convert_cell(cell: &Data) -> CellValue {
        match cell {
            Data::Empty => CellValue::Empty,
            Data::String(s) => CellValue::Text(s.clone()),
            Data::Float(f) => CellValue::Number(*f),
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Bool(b) => CellValue::Bool(*b),
            // as_datetime honours the workbook's 1900/1904 date system
            Data::DateTime(dt) => dt
                .as_datetime()
                .map(CellValue::Date)
                .unwrap_or(CellValue::Number(dt.as_f64())),
            Data::DateTimeIso(s) => dates::parse_iso(s)
                .map(CellValue::Date)
                .unwrap_or_else(|| CellValue::Text(s.clone())),
            Data::DurationIso(s) => CellValue::Text(s.clone()),
            Data::Error(e) => {
                debug!(error = ?e, "treating error cell as empty");
                CellValue::Empty
            }
        }
    }

    fn header_error(&self, found: &[&str]) -> ConvertError {
        let found = if found.is_empty() {
            "nothing".to_string()
        } else {
            found.join(", ")
        };
        ConvertError::InputFormat(format!(
            "column '{}' not found in row {} (after skipping {} rows); found {}",
            columns::ORDER_NO,
            self.skip_rows + 1,
            self.skip_rows,
            found
        ))
    }
}
