//! Core transformation: date normalization and row grouping

pub mod dates;
pub mod grouper;

pub use grouper::group_orders;
