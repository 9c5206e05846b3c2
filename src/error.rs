use std::fmt;

use thiserror::Error;

pub type ConvertResult<T> = Result<T, ConvertError>;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Profile parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Excel read error: {0}")]
    Excel(String),

    #[error("Input format error: {0}")]
    InputFormat(String),

    #[error("Excel export error: {0}")]
    Export(String),

    #[error("XML export error: {0}")]
    Xml(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Non-fatal conditions reported next to a finished conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConvertWarning {
    /// No row carried an order number; the output holds only the fixed frame.
    EmptyResult,
    /// Expected columns missing from the header row; their fields are emitted empty.
    MissingColumns(Vec<String>),
}

impl fmt::Display for ConvertWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConvertWarning::EmptyResult => {
                write!(f, "no rows with an order number were found; output contains no orders")
            }
            ConvertWarning::MissingColumns(columns) => {
                write!(f, "missing columns emitted as empty: {}", columns.join(", "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_format_message() {
        let err = ConvertError::InputFormat("column 'Order No' not found in row 6".to_string());
        assert_eq!(
            err.to_string(),
            "Input format error: column 'Order No' not found in row 6"
        );
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.xlsx");
        let err: ConvertError = io.into();
        assert!(matches!(err, ConvertError::Io(_)));
    }

    #[test]
    fn test_json_error_converts() {
        let json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ConvertError = json.into();
        assert!(matches!(err, ConvertError::Json(_)));
        assert!(err.to_string().starts_with("JSON error:"));
    }

    #[test]
    fn test_warning_display() {
        assert!(ConvertWarning::EmptyResult.to_string().contains("no rows"));
        let missing = ConvertWarning::MissingColumns(vec!["UOM".to_string(), "Discount".to_string()]);
        assert_eq!(missing.to_string(), "missing columns emitted as empty: UOM, Discount");
    }
}
