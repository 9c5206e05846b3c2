//! NMEXML sales-order field tables
//!
//! The desktop importer matches elements by tag name but expects them in a
//! fixed order, and treats an absent value as an element with empty text.
//! Each variant is therefore a fixed, ordered list of tags, each bound to
//! the source value it carries (or to nothing).

use crate::types::SchemaVariant;

pub const ROOT: &str = "NMEXML";
pub const TRANSACTIONS: &str = "TRANSACTIONS";
pub const SALES_ORDER: &str = "SALESORDER";
pub const ITEM_LINE: &str = "ITEMLINE";
pub const TRANSACTION_ID: &str = "TRANSACTIONID";

/// Value carried by an `ITEMLINE` child
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemSource {
    /// Zero-based position of the line within its order
    KeyId,
    ItemCode,
    Quantity,
    Uom,
    ItemName,
    UnitPrice,
    Discount,
    Blank,
}

/// Value carried by a `SALESORDER` child after the item lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderSource {
    OrderNo,
    PostedDate,
    CustomerCode,
    Address,
    District,
    Currency,
    Blank,
}

const fn item(tag: &'static str, source: ItemSource) -> (&'static str, ItemSource) {
    (tag, source)
}

const fn order(tag: &'static str, source: OrderSource) -> (&'static str, OrderSource) {
    (tag, source)
}

const MINIMAL_ITEM_FIELDS: &[(&str, ItemSource)] = &[
    item("KeyID", ItemSource::KeyId),
    item("ITEMNO", ItemSource::ItemCode),
    item("QUANTITY", ItemSource::Quantity),
    item("ITEMUNIT", ItemSource::Uom),
    item("ITEMOVDESC", ItemSource::ItemName),
    item("UNITPRICE", ItemSource::UnitPrice),
];

const EXTENDED_ITEM_FIELDS: &[(&str, ItemSource)] = &[
    item("KeyID", ItemSource::KeyId),
    item("ITEMNO", ItemSource::ItemCode),
    item("QUANTITY", ItemSource::Quantity),
    item("ITEMUNIT", ItemSource::Uom),
    item("UNITRATIO", ItemSource::Blank),
    item("ITEMRESERVED1", ItemSource::Blank),
    item("ITEMRESERVED2", ItemSource::Blank),
    item("ITEMRESERVED3", ItemSource::Blank),
    item("ITEMRESERVED4", ItemSource::Blank),
    item("ITEMRESERVED5", ItemSource::Blank),
    item("ITEMRESERVED6", ItemSource::Blank),
    item("ITEMRESERVED7", ItemSource::Blank),
    item("ITEMRESERVED8", ItemSource::Blank),
    item("ITEMRESERVED9", ItemSource::Blank),
    item("ITEMRESERVED10", ItemSource::Blank),
    item("ITEMOVDESC", ItemSource::ItemName),
    item("UNITPRICE", ItemSource::UnitPrice),
    item("DISCPC", ItemSource::Discount),
    item("TAXCODES", ItemSource::Blank),
    item("GROUPSEQ", ItemSource::Blank),
    item("QTYSHIPPED", ItemSource::Blank),
    item("DEPTID", ItemSource::Blank),
    item("PROJECTID", ItemSource::Blank),
];

const MINIMAL_ORDER_FIELDS: &[(&str, OrderSource)] = &[
    order("SONO", OrderSource::OrderNo),
    order("SODATE", OrderSource::PostedDate),
    order("CUSTOMERID", OrderSource::CustomerCode),
    order("CURRENCYNAME", OrderSource::Currency),
];

const EXTENDED_ORDER_FIELDS: &[(&str, OrderSource)] = &[
    order("SONO", OrderSource::OrderNo),
    order("SODATE", OrderSource::PostedDate),
    order("TAX1ID", OrderSource::Blank),
    order("TAX1CODE", OrderSource::Blank),
    order("TAX2CODE", OrderSource::Blank),
    order("TAX1RATE", OrderSource::Blank),
    order("TAX2RATE", OrderSource::Blank),
    order("RATE", OrderSource::Blank),
    order("INCLUSIVETAX", OrderSource::Blank),
    order("CUSTOMERISTAXABLE", OrderSource::Blank),
    order("CASHDISCOUNT", OrderSource::Blank),
    order("CASHDISCPC", OrderSource::Blank),
    order("FREIGHT", OrderSource::Blank),
    order("TERMSID", OrderSource::Blank),
    order("SHIPVIAID", OrderSource::Blank),
    order("FOB", OrderSource::Blank),
    order("ESTSHIPDATE", OrderSource::Blank),
    order("DESCRIPTION", OrderSource::Blank),
    order("SHIPTO1", OrderSource::Address),
    order("SHIPTO2", OrderSource::District),
    order("SHIPTO3", OrderSource::Blank),
    order("SHIPTO4", OrderSource::Blank),
    order("SHIPTO5", OrderSource::Blank),
    order("DP", OrderSource::Blank),
    order("DPACCOUNTID", OrderSource::Blank),
    order("DPUSED", OrderSource::Blank),
    order("CUSTOMERID", OrderSource::CustomerCode),
    order("PONO", OrderSource::Blank),
    order("SALESMANID", OrderSource::Blank),
    order("CURRENCYNAME", OrderSource::Currency),
];

/// `ITEMLINE` children in document order
pub fn item_fields(variant: SchemaVariant) -> &'static [(&'static str, ItemSource)] {
    match variant {
        SchemaVariant::Minimal => MINIMAL_ITEM_FIELDS,
        SchemaVariant::Extended => EXTENDED_ITEM_FIELDS,
    }
}

/// `SALESORDER` children that follow the item lines, in document order
pub fn order_fields(variant: SchemaVariant) -> &'static [(&'static str, OrderSource)] {
    match variant {
        SchemaVariant::Minimal => MINIMAL_ORDER_FIELDS,
        SchemaVariant::Extended => EXTENDED_ORDER_FIELDS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn tags<T>(fields: &[(&'static str, T)]) -> Vec<&'static str> {
        fields.iter().map(|(tag, _)| *tag).collect()
    }

    #[test]
    fn test_minimal_item_order() {
        assert_eq!(
            tags(item_fields(SchemaVariant::Minimal)),
            vec!["KeyID", "ITEMNO", "QUANTITY", "ITEMUNIT", "ITEMOVDESC", "UNITPRICE"]
        );
    }

    #[test]
    fn test_minimal_order_fields() {
        assert_eq!(
            tags(order_fields(SchemaVariant::Minimal)),
            vec!["SONO", "SODATE", "CUSTOMERID", "CURRENCYNAME"]
        );
    }

    #[test]
    fn test_extended_is_superset_of_minimal() {
        for variant_pair in [
            (tags(item_fields(SchemaVariant::Minimal)), tags(item_fields(SchemaVariant::Extended))),
            (tags(order_fields(SchemaVariant::Minimal)), tags(order_fields(SchemaVariant::Extended))),
        ] {
            let (minimal, extended) = variant_pair;
            let extended: HashSet<_> = extended.into_iter().collect();
            assert!(minimal.iter().all(|t| extended.contains(t)));
        }
    }

    #[test]
    fn test_extended_placeholder_count() {
        let extra = item_fields(SchemaVariant::Extended).len()
            - item_fields(SchemaVariant::Minimal).len()
            + order_fields(SchemaVariant::Extended).len()
            - order_fields(SchemaVariant::Minimal).len();
        assert!(extra >= 20, "extended variant adds {} fields", extra);
    }

    #[test]
    fn test_tags_are_unique() {
        for variant in [SchemaVariant::Minimal, SchemaVariant::Extended] {
            let items = tags(item_fields(variant));
            let unique: HashSet<_> = items.iter().collect();
            assert_eq!(unique.len(), items.len());

            let orders = tags(order_fields(variant));
            let unique: HashSet<_> = orders.iter().collect();
            assert_eq!(unique.len(), orders.len());
        }
    }

    #[test]
    fn test_extended_carries_discount_and_address() {
        let items = item_fields(SchemaVariant::Extended);
        assert!(items.contains(&("DISCPC", ItemSource::Discount)));
        let orders = order_fields(SchemaVariant::Extended);
        assert!(orders.contains(&("SHIPTO1", OrderSource::Address)));
        assert!(orders.contains(&("SHIPTO2", OrderSource::District)));
    }
}
