//! CLI command handlers

pub mod commands;

pub use commands::{convert, inspect, ConvertSummary, OutputFormat};
