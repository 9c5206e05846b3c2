//! Conversion profile
//!
//! A profile fixes the ledger layout (how many cover rows precede the
//! column-header row) and the output variant, plus the envelope constants
//! of the NMEXML document. Profiles are optional YAML files; every key
//! falls back to its default.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{ConvertError, ConvertResult};
use crate::types::SchemaVariant;

/// Cover/title rows in a standard ledger export
pub const DEFAULT_SKIP_ROWS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConvertConfig {
    /// Rows above the column-header row
    pub skip_rows: usize,
    pub variant: SchemaVariant,
    /// `EximID` attribute of the NMEXML root
    pub eximid: String,
    /// `BranchCode` attribute of the NMEXML root
    pub branch_code: String,
    /// `ACCOUNTANTCOPYID` attribute of the NMEXML root
    pub accountant_copy_id: String,
    /// `CURRENCYNAME` of every sales order
    pub currency: String,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            skip_rows: DEFAULT_SKIP_ROWS,
            variant: SchemaVariant::Minimal,
            eximid: "13".to_string(),
            branch_code: "2040822216".to_string(),
            accountant_copy_id: String::new(),
            currency: "IDR".to_string(),
        }
    }
}

impl ConvertConfig {
    /// Load a profile from a YAML file
    pub fn from_file(path: &Path) -> ConvertResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    pub fn from_yaml_str(content: &str) -> ConvertResult<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: ConvertConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_variant(mut self, variant: SchemaVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_skip_rows(mut self, skip_rows: usize) -> Self {
        self.skip_rows = skip_rows;
        self
    }

    /// Reject values the downstream importers cannot accept
    pub fn validate(&self) -> ConvertResult<()> {
        if self.eximid.trim().is_empty() {
            return Err(ConvertError::Config("eximid must not be empty".to_string()));
        }
        if self.branch_code.trim().is_empty() {
            return Err(ConvertError::Config(
                "branch_code must not be empty".to_string(),
            ));
        }
        if self.currency.trim().is_empty() {
            return Err(ConvertError::Config("currency must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = ConvertConfig::default();
        assert_eq!(config.skip_rows, 5);
        assert_eq!(config.variant, SchemaVariant::Minimal);
        assert_eq!(config.eximid, "13");
        assert_eq!(config.branch_code, "2040822216");
        assert_eq!(config.accountant_copy_id, "");
        assert_eq!(config.currency, "IDR");
    }

    #[test]
    fn test_partial_profile_keeps_defaults() {
        let config = ConvertConfig::from_yaml_str("skip_rows: 3\nvariant: extended\n").unwrap();
        assert_eq!(config.skip_rows, 3);
        assert_eq!(config.variant, SchemaVariant::Extended);
        assert_eq!(config.branch_code, "2040822216");
    }

    #[test]
    fn test_empty_profile_is_default() {
        let config = ConvertConfig::from_yaml_str("  \n").unwrap();
        assert_eq!(config, ConvertConfig::default());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result = ConvertConfig::from_yaml_str("skip: 3\n");
        assert!(matches!(result, Err(ConvertError::Yaml(_))));
    }

    #[test]
    fn test_unknown_variant_rejected() {
        let result = ConvertConfig::from_yaml_str("variant: full\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_blank_branch_code_rejected() {
        let result = ConvertConfig::from_yaml_str("branch_code: ''\n");
        assert!(matches!(result, Err(ConvertError::Config(_))));
    }

    #[test]
    fn test_builder_overrides() {
        let config = ConvertConfig::default()
            .with_variant(SchemaVariant::Extended)
            .with_skip_rows(0);
        assert_eq!(config.variant, SchemaVariant::Extended);
        assert_eq!(config.skip_rows, 0);
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "currency: USD").unwrap();
        let config = ConvertConfig::from_file(file.path()).unwrap();
        assert_eq!(config.currency, "USD");
        assert_eq!(config.skip_rows, DEFAULT_SKIP_ROWS);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = ConvertConfig::from_file(Path::new("/nonexistent/profile.yaml"));
        assert!(matches!(result, Err(ConvertError::Io(_))));
    }
}
