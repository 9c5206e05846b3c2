//! Bulk-import workbook exporter
//!
//! Writes grouped orders as one flat worksheet in the layout the online
//! accounting system imports: a column-header row, optional legend rows,
//! then a `HEADER` row per order followed by one `ITEM` row per line item.
//! The first cell of every data row is the row-type tag.

use crate::error::{ConvertError, ConvertResult};
use crate::types::{CellValue, Order, SchemaVariant};
use rust_xlsxwriter::{Color, Format, FormatPattern, Workbook, Worksheet};
use tracing::debug;

/// Cells per row in every variant
pub const COLUMN_COUNT: usize = 16;

pub const HEADER_TAG: &str = "HEADER";
pub const ITEM_TAG: &str = "ITEM";
pub const EXPENSE_TAG: &str = "EXPENSE";

pub const HEADER_COLOR: u32 = 0x7CE086;
pub const ITEM_COLOR: u32 = 0x7BA9E1;
pub const EXPENSE_COLOR: u32 = 0xFFA500;

/// Column-header row, describing the HEADER row fields
pub const HEADER_COLUMNS: [&str; COLUMN_COUNT] = [
    HEADER_TAG,
    "No Form",
    "Tgl Pesanan",
    "No Pelanggan",
    "No PO",
    "Alamat",
    "Kena PPN",
    "Total Termasuk PPN",
    "Diskon Pesanan (%)",
    "Diskon Pesanan (Rp)",
    "Keterangan",
    "Nama Cabang",
    "Pengiriman",
    "Tgl Pengiriman",
    "FOB",
    "Syarat Pembayaran",
];

/// Legend row describing the full ITEM field set (extended variant)
pub const ITEM_LEGEND: [&str; COLUMN_COUNT] = [
    ITEM_TAG,
    "Kode Barang",
    "Nama Barang",
    "Kuantitas",
    "Satuan",
    "Harga Satuan",
    "Diskon Barang (%)",
    "Diskon Barang (Rp)",
    "Catatan Barang",
    "Nama Dept Barang",
    "No Proyek Barang",
    "Nama Gudang",
    "ID Salesman",
    "Kustom Karakter 1",
    "Kustom Karakter 2",
    "Kustom Karakter 3",
];

/// Legend row describing the EXPENSE field set (extended variant)
pub const EXPENSE_LEGEND: [&str; COLUMN_COUNT] = [
    EXPENSE_TAG,
    "No Biaya",
    "Nama Biaya",
    "Nilai Biaya",
    "Catatan Biaya",
    "Nama Dept Biaya",
    "No Proyek Biaya",
    "",
    "",
    "",
    "",
    "",
    "",
    "",
    "",
    "",
];

/// Role of a worksheet row, which decides its shading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    ColumnHeader,
    ItemLegend,
    ExpenseLegend,
    Header,
    Item,
}

impl RowKind {
    /// Solid fill colour (RGB) for this kind of row
    pub fn fill_color(&self) -> u32 {
        match self {
            RowKind::ColumnHeader | RowKind::Header => HEADER_COLOR,
            RowKind::ItemLegend | RowKind::Item => ITEM_COLOR,
            RowKind::ExpenseLegend => EXPENSE_COLOR,
        }
    }

    /// Reference rows are shaded across; data rows only on the tag cell
    pub fn shades_whole_row(&self) -> bool {
        matches!(
            self,
            RowKind::ColumnHeader | RowKind::ItemLegend | RowKind::ExpenseLegend
        )
    }
}

/// One worksheet row before it is written
#[derive(Debug, Clone, PartialEq)]
pub struct SheetRow {
    pub kind: RowKind,
    pub cells: Vec<CellValue>,
}

impl SheetRow {
    fn labels(kind: RowKind, labels: &[&str; COLUMN_COUNT]) -> Self {
        Self {
            kind,
            cells: labels
                .iter()
                .map(|l| if l.is_empty() { CellValue::Empty } else { CellValue::from(*l) })
                .collect(),
        }
    }

    /// Whitespace-only and NaN values are written as blank cells, as in the XML
    fn data(kind: RowKind, cells: Vec<CellValue>) -> Self {
        let mut cells: Vec<CellValue> = cells
            .into_iter()
            .map(|cell| if cell.is_blank() { CellValue::Empty } else { cell })
            .collect();
        cells.resize(COLUMN_COUNT, CellValue::Empty);
        Self { kind, cells }
    }
}

/// Exporter for the tagged bulk-import worksheet
pub struct OrderSheetExporter<'a> {
    orders: &'a [Order],
    variant: SchemaVariant,
}

impl<'a> OrderSheetExporter<'a> {
    pub fn new(orders: &'a [Order], variant: SchemaVariant) -> Self {
        Self { orders, variant }
    }

    /// Lay out every row of the worksheet
    pub fn build_rows(&self) -> Vec<SheetRow> {
        let mut rows = vec![SheetRow::labels(RowKind::ColumnHeader, &HEADER_COLUMNS)];

        if self.variant == SchemaVariant::Extended {
            rows.push(SheetRow::labels(RowKind::ItemLegend, &ITEM_LEGEND));
            rows.push(SheetRow::labels(RowKind::ExpenseLegend, &EXPENSE_LEGEND));
        }

        for order in self.orders {
            rows.push(SheetRow::data(
                RowKind::Header,
                vec![
                    CellValue::from(HEADER_TAG),
                    order.order_no.clone(),
                    date_cell(&order.posted_date),
                    order.customer_code.clone(),
                    CellValue::Empty, // No PO
                    order.address.clone(),
                ],
            ));

            for item in &order.items {
                rows.push(SheetRow::data(
                    RowKind::Item,
                    vec![
                        CellValue::from(ITEM_TAG),
                        item.item_code.clone(),
                        item.item_name.clone(),
                        item.quantity.clone(),
                        item.uom.clone(),
                        item.unit_price.clone(),
                        item.discount.clone(),
                    ],
                ));
            }
        }

        rows
    }

    /// Column widths: longest rendered cell plus two
    pub fn column_widths(rows: &[SheetRow]) -> Vec<usize> {
        (0..COLUMN_COUNT)
            .map(|col| {
                rows.iter()
                    .filter_map(|row| row.cells.get(col))
                    .filter(|cell| !cell.is_blank())
                    .map(|cell| cell.to_field_string().chars().count())
                    .max()
                    .unwrap_or(0)
                    + 2
            })
            .collect()
    }

    /// Write the worksheet and return the .xlsx bytes
    pub fn to_buffer(&self) -> ConvertResult<Vec<u8>> {
        let rows = self.build_rows();
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();

        for (row_idx, row) in rows.iter().enumerate() {
            let fmt = fill(row.kind.fill_color());
            let shade_all = row.kind.shades_whole_row();

            for (col_idx, cell) in row.cells.iter().enumerate() {
                let format = if shade_all || col_idx == 0 { Some(&fmt) } else { None };
                Self::write_cell(worksheet, row_idx as u32, col_idx as u16, cell, format)?;
            }
        }

        for (col_idx, width) in Self::column_widths(&rows).into_iter().enumerate() {
            worksheet
                .set_column_width(col_idx as u16, width as f64)
                .map_err(|e| ConvertError::Export(format!("Failed to set column width: {}", e)))?;
        }

        let buffer = workbook
            .save_to_buffer()
            .map_err(|e| ConvertError::Export(format!("Failed to save Excel file: {}", e)))?;

        debug!(
            orders = self.orders.len(),
            rows = rows.len(),
            bytes = buffer.len(),
            "wrote bulk-import worksheet"
        );
        Ok(buffer)
    }

    /// Write a single cell, keeping numbers numeric
    fn write_cell(
        worksheet: &mut Worksheet,
        row: u32,
        col: u16,
        cell: &CellValue,
        format: Option<&Format>,
    ) -> ConvertResult<()> {
        let result = match (cell, format) {
            (CellValue::Empty, None) => return Ok(()),
            (CellValue::Empty, Some(f)) => worksheet.write_blank(row, col, f),
            (CellValue::Number(n), _) if n.is_nan() => return Ok(()),
            (CellValue::Number(n), None) => worksheet.write_number(row, col, *n),
            (CellValue::Number(n), Some(f)) => worksheet.write_number_with_format(row, col, *n, f),
            (CellValue::Bool(b), None) => worksheet.write_boolean(row, col, *b),
            (CellValue::Bool(b), Some(f)) => worksheet.write_boolean_with_format(row, col, *b, f),
            (other, None) => worksheet.write_string(row, col, other.to_field_string()),
            (other, Some(f)) => {
                worksheet.write_string_with_format(row, col, other.to_field_string(), f)
            }
        };
        result
            .map(|_| ())
            .map_err(|e| ConvertError::Export(format!("Failed to write cell: {}", e)))
    }
}

fn fill(color: u32) -> Format {
    Format::new()
        .set_background_color(Color::RGB(color))
        .set_pattern(FormatPattern::Solid)
}

/// Posting dates are written as `DD/MM/YYYY` text
fn date_cell(value: &CellValue) -> CellValue {
    match value {
        CellValue::Date(_) => CellValue::Text(value.to_field_string()),
        other => other.clone(),
    }
}
