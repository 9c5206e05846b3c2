//! Group flat ledger rows into sales orders.
//!
//! ```text
//! Ledger rows (flat)                 Orders (grouped)
//! ┌──────────────────────────┐       ┌──────────────────────────┐
//! │ SO-1 | 05/01 | C01 | A-1 │       │ SO-1  05/01  C01         │
//! │ SO-1 | 05/01 | C01 | B-7 │  →    │   items: [A-1, B-7]      │
//! │ SO-2 | 06/01 | C02 | A-1 │       ├──────────────────────────┤
//! └──────────────────────────┘       │ SO-2  06/01  C02         │
//!                                    │   items: [A-1]           │
//!                                    └──────────────────────────┘
//! ```
//!
//! Orders come out in first-seen order of their number; items keep input
//! order. Header fields are taken from the first row of each order.

use std::collections::HashMap;

use tracing::debug;

use crate::types::{columns, LineItem, Order, RawRow};

/// Partition rows by `Order No`, preserving first-appearance order.
///
/// Rows without an order number are skipped.
pub fn group_orders(rows: &[RawRow]) -> Vec<Order> {
    let mut orders: Vec<Order> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let order_no = row.get(columns::ORDER_NO);
        if order_no.is_blank() {
            continue;
        }

        let key = order_no.to_field_string();
        let slot = *index.entry(key).or_insert_with(|| {
            orders.push(Order::from_first_row(row));
            orders.len() - 1
        });
        orders[slot].items.push(LineItem::from_row(row));
    }

    debug!(
        rows = rows.len(),
        orders = orders.len(),
        "grouped ledger rows into orders"
    );
    orders
}

/// Total line items across all orders
pub fn item_count(orders: &[Order]) -> usize {
    orders.iter().map(|o| o.items.len()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CellValue;
    use pretty_assertions::assert_eq;

    fn row(order_no: &str, customer: &str, item: &str) -> RawRow {
        RawRow::new()
            .with(columns::ORDER_NO, order_no)
            .with(columns::CUSTOMER_CODE, customer)
            .with(columns::ITEM_CODE, item)
            .with(columns::QUANTITY, 1.0)
    }

    #[test]
    fn test_key_is_the_rendered_order_number() {
        let rows = vec![
            RawRow::new().with(columns::ORDER_NO, "10045"),
            RawRow::new().with(columns::ORDER_NO, 10045.0),
            row("SO-1", "C01", "A"),
            row("so-1", "C01", "B"),
            row(" SO-1", "C01", "C"),
        ];

        let orders = group_orders(&rows);
        let keys: Vec<String> = orders.iter().map(Order::key).collect();
        // Text and numeric cells showing the same number are one order;
        // otherwise keys match exactly, with no case folding or trimming
        assert_eq!(keys, vec!["10045", "SO-1", "so-1", " SO-1"]);
        assert_eq!(orders[0].items.len(), 2);
    }

    #[test]
    fn test_groups_preserve_first_seen_order() {
        let rows = vec![
            row("SO-2", "C02", "A"),
            row("SO-1", "C01", "B"),
            row("SO-2", "C02", "C"),
            row("SO-3", "C03", "D"),
            row("SO-1", "C01", "E"),
        ];

        let orders = group_orders(&rows);
        let keys: Vec<String> = orders.iter().map(Order::key).collect();
        assert_eq!(keys, vec!["SO-2", "SO-1", "SO-3"]);

        let items: Vec<String> = orders[0]
            .items
            .iter()
            .map(|i| i.item_code.to_field_string())
            .collect();
        assert_eq!(items, vec!["A", "C"]);
        assert_eq!(orders[1].items.len(), 2);
        assert_eq!(orders[2].items.len(), 1);
        assert_eq!(item_count(&orders), 5);
    }

    #[test]
    fn test_header_fields_come_from_first_row() {
        let rows = vec![row("SO-1", "FIRST", "A"), row("SO-1", "SECOND", "B")];

        let orders = group_orders(&rows);
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].customer_code, CellValue::from("FIRST"));
        assert_eq!(orders[0].items.len(), 2);
    }

    #[test]
    fn test_blank_order_numbers_are_skipped() {
        let rows = vec![
            row("SO-1", "C01", "A"),
            row("", "", "TOTAL"),
            RawRow::new().with(columns::ITEM_CODE, "orphan"),
            row("   ", "", "X"),
        ];

        let orders = group_orders(&rows);
        assert_eq!(orders.len(), 1);
        assert_eq!(item_count(&orders), 1);
    }

    #[test]
    fn test_keys_match_exactly() {
        let rows = vec![row("SO-1", "C", "A"), row("so-1", "C", "B")];
        assert_eq!(group_orders(&rows).len(), 2);
    }

    #[test]
    fn test_numeric_order_numbers_group_together() {
        let rows = vec![
            RawRow::new().with(columns::ORDER_NO, 1001.0),
            RawRow::new().with(columns::ORDER_NO, 1001.0),
        ];

        let orders = group_orders(&rows);
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].order_no, CellValue::Number(1001.0));
        assert_eq!(orders[0].key(), "1001");
    }

    #[test]
    fn test_empty_input() {
        assert!(group_orders(&[]).is_empty());
    }
}
