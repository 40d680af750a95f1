use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::geometry::Region;
use crate::utils::MrzError;

/// Padding character used in every MRZ layout.
pub const FILLER: char = '<';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    TD1, // ID Card (85.6mm × 54.0mm)
    TD3, // Passport (125.0mm × 88.0mm)
}

impl DocumentFormat {
    pub fn mrz_lines(&self) -> usize {
        match self {
            DocumentFormat::TD1 => 3,
            DocumentFormat::TD3 => 2,
        }
    }

    pub fn mrz_chars_per_line(&self) -> usize {
        match self {
            DocumentFormat::TD1 => 30,
            DocumentFormat::TD3 => 44,
        }
    }

    /// Line roles that must all be present before a reading can be validated.
    pub fn roles(&self) -> &'static [LineRole] {
        match self {
            DocumentFormat::TD1 => &[LineRole::Line1, LineRole::Line2, LineRole::Line3],
            DocumentFormat::TD3 => &[LineRole::Line1, LineRole::Line2],
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DocumentFormat::TD1 => write!(f, "TD1"),
            DocumentFormat::TD3 => write!(f, "TD3"),
        }
    }
}

impl FromStr for DocumentFormat {
    type Err = MrzError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "td1" => Ok(DocumentFormat::TD1),
            "td3" => Ok(DocumentFormat::TD3),
            other => Err(MrzError::ConfigError(format!(
                "unknown document format '{}', expected TD1 or TD3",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineRole {
    Line1, // Document code, issuer, number (TD1) or names (TD3)
    Line2, // Dates, sex, nationality
    Line3, // Names (TD1 only)
}

impl LineRole {
    pub fn index(&self) -> usize {
        match self {
            LineRole::Line1 => 0,
            LineRole::Line2 => 1,
            LineRole::Line3 => 2,
        }
    }
}

impl fmt::Display for LineRole {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "line {}", self.index() + 1)
    }
}

/// One text candidate reported by the OCR engine for a detected text region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub text: String,
    /// 0 is the engine's top candidate for the region.
    #[serde(default)]
    pub confidence_rank: u32,
    #[serde(default)]
    pub region: Option<Region>,
}

impl Observation {
    pub fn new(text: impl Into<String>) -> Self {
        Observation {
            text: text.into(),
            confidence_rank: 0,
            region: None,
        }
    }

    pub fn with_region(mut self, region: Region) -> Self {
        self.region = Some(region);
        self
    }

    pub fn with_rank(mut self, rank: u32) -> Self {
        self.confidence_rank = rank;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineSlot {
    pub text: String,
    pub region: Option<Region>,
}

/// Lines collected so far for one detection attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct AccumulatedReading {
    pub format: DocumentFormat,
    pub line1: Option<LineSlot>,
    pub line2: Option<LineSlot>,
    pub line3: Option<LineSlot>,
}

impl AccumulatedReading {
    pub fn new(format: DocumentFormat) -> Self {
        AccumulatedReading {
            format,
            line1: None,
            line2: None,
            line3: None,
        }
    }

    pub fn slot(&self, role: LineRole) -> Option<&LineSlot> {
        match role {
            LineRole::Line1 => self.line1.as_ref(),
            LineRole::Line2 => self.line2.as_ref(),
            LineRole::Line3 => self.line3.as_ref(),
        }
    }

    pub fn slot_mut(&mut self, role: LineRole) -> &mut Option<LineSlot> {
        match role {
            LineRole::Line1 => &mut self.line1,
            LineRole::Line2 => &mut self.line2,
            LineRole::Line3 => &mut self.line3,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.format.roles().iter().all(|role| self.slot(*role).is_some())
    }

    pub fn missing_roles(&self) -> Vec<LineRole> {
        self.format
            .roles()
            .iter()
            .copied()
            .filter(|role| self.slot(*role).is_none())
            .collect()
    }
}

/// A complete MRZ whose check digits have all been verified.
///
/// Only `MrzValidator` constructs this type, so every line is known to have the
/// exact width of its format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidatedMrz {
    format: DocumentFormat,
    lines: Vec<String>,
}

impl ValidatedMrz {
    pub(crate) fn new(format: DocumentFormat, lines: Vec<String>) -> Self {
        ValidatedMrz { format, lines }
    }

    pub fn format(&self) -> DocumentFormat {
        self.format
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line(&self, role: LineRole) -> Option<&str> {
        self.lines.get(role.index()).map(String::as_str)
    }
}

impl fmt::Display for ValidatedMrz {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.lines.join("\n"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
    Unspecified,
}

impl Sex {
    pub fn from_code(code: char) -> Self {
        match code {
            'M' => Sex::Male,
            'F' => Sex::Female,
            _ => Sex::Unspecified,
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Sex::Male => write!(f, "male"),
            Sex::Female => write!(f, "female"),
            Sex::Unspecified => write!(f, "unspecified"),
        }
    }
}

/// Individually check-digited MRZ fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MrzField {
    DocumentNumber,
    DateOfBirth,
    DateOfExpiry,
    PersonalNumber,
}

impl fmt::Display for MrzField {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MrzField::DocumentNumber => write!(f, "document number"),
            MrzField::DateOfBirth => write!(f, "date of birth"),
            MrzField::DateOfExpiry => write!(f, "date of expiry"),
            MrzField::PersonalNumber => write!(f, "personal number"),
        }
    }
}

/// Structured content of an accepted MRZ.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentFields {
    pub format: DocumentFormat,
    pub document_type: String,
    pub document_number: String,
    pub issuing_country: String,
    pub nationality: String,
    pub surname: String,
    pub given_names: String,
    pub sex: Sex,
    pub date_of_birth: NaiveDate,
    pub date_of_expiry: NaiveDate,
    pub optional_data: Option<String>,
    pub optional_data_2: Option<String>,
}

impl DocumentFields {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.given_names, self.surname)
            .trim()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_dimensions() {
        assert_eq!(DocumentFormat::TD1.mrz_lines(), 3);
        assert_eq!(DocumentFormat::TD1.mrz_chars_per_line(), 30);
        assert_eq!(DocumentFormat::TD3.mrz_lines(), 2);
        assert_eq!(DocumentFormat::TD3.mrz_chars_per_line(), 44);
        assert_eq!(DocumentFormat::TD3.roles().len(), DocumentFormat::TD3.mrz_lines());
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("td3".parse::<DocumentFormat>().unwrap(), DocumentFormat::TD3);
        assert_eq!(" TD1 ".parse::<DocumentFormat>().unwrap(), DocumentFormat::TD1);
        assert!("td2".parse::<DocumentFormat>().is_err());
    }

    #[test]
    fn test_missing_roles() {
        let mut reading = AccumulatedReading::new(DocumentFormat::TD1);
        *reading.slot_mut(LineRole::Line2) = Some(LineSlot {
            text: "x".to_string(),
            region: None,
        });
        assert_eq!(reading.missing_roles(), vec![LineRole::Line1, LineRole::Line3]);
        assert!(!reading.is_complete());
    }

    #[test]
    fn test_sex_codes() {
        assert_eq!(Sex::from_code('M'), Sex::Male);
        assert_eq!(Sex::from_code('F'), Sex::Female);
        assert_eq!(Sex::from_code('<'), Sex::Unspecified);
        assert_eq!(Sex::from_code('X'), Sex::Unspecified);
    }
}
