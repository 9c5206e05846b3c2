//! Sales-order XML writer - orders → NMEXML

use crate::config::ConvertConfig;
use crate::error::{ConvertError, ConvertResult};
use crate::types::{CellValue, LineItem, Order};
use crate::xml::schema::{self, ItemSource, OrderSource};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use tracing::debug;

const INDENT_SIZE: usize = 4;

/// Writes grouped orders as an NMEXML transaction document
pub struct SalesOrderXmlWriter<'a> {
    orders: &'a [Order],
    config: &'a ConvertConfig,
}

impl<'a> SalesOrderXmlWriter<'a> {
    pub fn new(orders: &'a [Order], config: &'a ConvertConfig) -> Self {
        Self { orders, config }
    }

    /// Serialize the document as indented UTF-8
    pub fn to_buffer(&self) -> ConvertResult<Vec<u8>> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT_SIZE);

        emit(
            &mut writer,
            Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
        )?;

        let mut root = BytesStart::new(schema::ROOT);
        root.push_attribute(("EximID", self.config.eximid.as_str()));
        root.push_attribute(("BranchCode", self.config.branch_code.as_str()));
        root.push_attribute(("ACCOUNTANTCOPYID", self.config.accountant_copy_id.as_str()));
        emit(&mut writer, Event::Start(root))?;

        let mut transactions = BytesStart::new(schema::TRANSACTIONS);
        transactions.push_attribute(("OnError", "CONTINUE"));
        if self.orders.is_empty() {
            emit(&mut writer, Event::Empty(transactions))?;
        } else {
            emit(&mut writer, Event::Start(transactions))?;
            for order in self.orders {
                self.write_sales_order(&mut writer, order)?;
            }
            emit(&mut writer, Event::End(BytesEnd::new(schema::TRANSACTIONS)))?;
        }

        emit(&mut writer, Event::End(BytesEnd::new(schema::ROOT)))?;

        let mut buffer = writer.into_inner();
        buffer.push(b'\n');

        debug!(
            orders = self.orders.len(),
            bytes = buffer.len(),
            "wrote sales-order XML"
        );
        Ok(buffer)
    }

    fn write_sales_order(&self, writer: &mut Writer<Vec<u8>>, order: &Order) -> ConvertResult<()> {
        let mut element = BytesStart::new(schema::SALES_ORDER);
        element.push_attribute(("operation", "Add"));
        element.push_attribute(("REQUESTID", "1"));
        emit(writer, Event::Start(element))?;

        write_field(writer, schema::TRANSACTION_ID, "")?;

        for (key_id, item) in order.items.iter().enumerate() {
            self.write_item_line(writer, key_id, item)?;
        }

        for (tag, source) in schema::order_fields(self.config.variant) {
            let value = match source {
                OrderSource::OrderNo => safe_str(&order.order_no),
                OrderSource::PostedDate => safe_str(&order.posted_date),
                OrderSource::CustomerCode => safe_str(&order.customer_code),
                OrderSource::Address => safe_str(&order.address),
                OrderSource::District => safe_str(&order.district),
                OrderSource::Currency => self.config.currency.clone(),
                OrderSource::Blank => String::new(),
            };
            write_field(writer, tag, &value)?;
        }

        emit(writer, Event::End(BytesEnd::new(schema::SALES_ORDER)))
    }

    fn write_item_line(
        &self,
        writer: &mut Writer<Vec<u8>>,
        key_id: usize,
        item: &LineItem,
    ) -> ConvertResult<()> {
        let mut element = BytesStart::new(schema::ITEM_LINE);
        element.push_attribute(("operation", "Add"));
        emit(writer, Event::Start(element))?;

        for (tag, source) in schema::item_fields(self.config.variant) {
            let value = match source {
                ItemSource::KeyId => key_id.to_string(),
                ItemSource::ItemCode => safe_str(&item.item_code),
                ItemSource::Quantity => safe_str(&item.quantity),
                ItemSource::Uom => safe_str(&item.uom),
                ItemSource::ItemName => safe_str(&item.item_name),
                ItemSource::UnitPrice => safe_str(&item.unit_price),
                ItemSource::Discount => safe_str(&item.discount),
                ItemSource::Blank => String::new(),
            };
            write_field(writer, tag, &value)?;
        }

        emit(writer, Event::End(BytesEnd::new(schema::ITEM_LINE)))
    }
}

/// Render a source value as element text; missing values become `""`
pub fn safe_str(value: &CellValue) -> String {
    if value.is_blank() {
        String::new()
    } else {
        value.to_field_string()
    }
}

/// Write `<tag>value</tag>`, or `<tag/>` when the value is empty
fn write_field(writer: &mut Writer<Vec<u8>>, tag: &str, value: &str) -> ConvertResult<()> {
    if value.is_empty() {
        return emit(writer, Event::Empty(BytesStart::new(tag)));
    }
    emit(writer, Event::Start(BytesStart::new(tag)))?;
    emit(writer, Event::Text(BytesText::new(value)))?;
    emit(writer, Event::End(BytesEnd::new(tag)))
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> ConvertResult<()> {
    writer
        .write_event(event)
        .map_err(|e| ConvertError::Xml(format!("Failed to write XML event: {}", e)))
}
