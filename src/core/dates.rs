//! Date normalization for ledger cells
//!
//! Ledger exports carry posting dates either as native Excel date cells
//! (converted by calamine, which knows the workbook's date system) or as
//! text. Native dates are rendered `DD/MM/YYYY`; text is left alone by the
//! caller.

use chrono::{NaiveDate, NaiveDateTime};

/// Render a date the way both accounting importers expect it
pub fn format_ddmmyyyy(dt: &NaiveDateTime) -> String {
    dt.format("%d/%m/%Y").to_string()
}

/// Parse an ISO-8601 date or date-time string as produced by some readers
pub fn parse_iso(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_format_pads_day_and_month() {
        assert_eq!(format_ddmmyyyy(&ymd(2024, 1, 5)), "05/01/2024");
        assert_eq!(format_ddmmyyyy(&ymd(2023, 12, 31)), "31/12/2023");
    }

    #[test]
    fn test_parse_iso_variants() {
        assert_eq!(parse_iso("2024-02-29"), Some(ymd(2024, 2, 29)));
        assert_eq!(parse_iso("2024-02-29T00:00:00"), Some(ymd(2024, 2, 29)));
        assert_eq!(parse_iso("29/02/2024"), None);
    }
}
