use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::models::DocumentFormat;
use crate::processing::{FieldParser, GateMode, RetryPolicy};
use crate::utils::MrzError;

/// Settings for one detection session. Every field has a default, so a
/// config file only needs the values it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    pub format: DocumentFormat,
    pub mode: GateMode,
    pub retry_policy: RetryPolicy,
    /// Strip characters outside the MRZ alphabet before classification.
    pub normalize_candidates: bool,
    /// How many ranked candidates per text region are considered (1 = top only).
    pub candidates_per_region: u32,
    /// Fixed date for century resolution; today when unset.
    pub reference_date: Option<NaiveDate>,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        ScannerConfig {
            format: DocumentFormat::TD3,
            mode: GateMode::SingleShot,
            retry_policy: RetryPolicy::RetainLines,
            normalize_candidates: true,
            candidates_per_region: 1,
            reference_date: None,
        }
    }
}

impl ScannerConfig {
    pub fn new(format: DocumentFormat) -> Self {
        ScannerConfig {
            format,
            ..Default::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, MrzError> {
        let config: ScannerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, MrzError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), MrzError> {
        if self.candidates_per_region == 0 {
            return Err(MrzError::ConfigError(
                "candidates_per_region must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn field_parser(&self) -> FieldParser {
        match self.reference_date {
            Some(date) => FieldParser::new(date),
            None => FieldParser::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = ScannerConfig::default();
        assert_eq!(config.format, DocumentFormat::TD3);
        assert_eq!(config.mode, GateMode::SingleShot);
        assert_eq!(config.retry_policy, RetryPolicy::RetainLines);
        assert!(config.normalize_candidates);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let config = ScannerConfig::from_json_str(r#"{"format": "td1", "mode": "continuous"}"#).unwrap();
        assert_eq!(config.format, DocumentFormat::TD1);
        assert_eq!(config.mode, GateMode::Continuous);
        assert_eq!(config.candidates_per_region, 1);
    }

    #[test]
    fn test_reference_date() {
        let config = ScannerConfig::from_json_str(r#"{"reference_date": "2024-03-01"}"#).unwrap();
        assert_eq!(
            config.field_parser().reference_date(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            ScannerConfig::from_json_str(r#"{"candidates_per_region": 0}"#),
            Err(MrzError::ConfigError(_))
        ));
        assert!(matches!(
            ScannerConfig::from_json_str(r#"{"format": "td2"}"#),
            Err(MrzError::SerializationError(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"retry_policy": "clear_on_reject", "normalize_candidates": false}}"#).unwrap();
        let config = ScannerConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.retry_policy, RetryPolicy::ClearOnReject);
        assert!(!config.normalize_candidates);
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            ScannerConfig::from_json_file("/nonexistent/mrzscan.json"),
            Err(MrzError::IoError(_))
        ));
    }
}
