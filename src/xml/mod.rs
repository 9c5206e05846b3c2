//! NMEXML export for the desktop accounting application
//!
//! Grouped orders become one `SALESORDER` transaction each inside a single
//! `NMEXML/TRANSACTIONS` envelope.

pub mod schema;
mod writer;

pub use writer::SalesOrderXmlWriter;
