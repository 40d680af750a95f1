use chrono::{Datelike, Local, NaiveDate};
use log::debug;
use std::ops::Range;

use crate::models::layout::{self, td1, td3};
use crate::models::{DocumentFields, DocumentFormat, LineRole, Sex, ValidatedMrz, FILLER};
use crate::utils::MrzError;

/// Which MRZ date is being read; decides how far into the future a two-digit
/// year may point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateKind {
    Birth,
    Expiry,
}

impl DateKind {
    pub fn forward_tolerance(&self) -> u32 {
        match self {
            DateKind::Birth => 0,
            DateKind::Expiry => 10,
        }
    }
}

/// Turns a validated MRZ into typed document fields.
#[derive(Debug, Clone, Copy)]
pub struct FieldParser {
    reference_date: NaiveDate,
}

impl Default for FieldParser {
    fn default() -> Self {
        FieldParser::new(Local::now().date_naive())
    }
}

impl FieldParser {
    /// `reference_date` anchors the century of two-digit years.
    pub fn new(reference_date: NaiveDate) -> Self {
        FieldParser { reference_date }
    }

    pub fn reference_date(&self) -> NaiveDate {
        self.reference_date
    }

    pub fn parse(&self, validated: &ValidatedMrz) -> Result<DocumentFields, MrzError> {
        let fields = match validated.format() {
            DocumentFormat::TD1 => self.parse_td1(validated)?,
            DocumentFormat::TD3 => self.parse_td3(validated)?,
        };
        debug!(
            "Parsed {} document {} ({})",
            fields.format, fields.document_number, fields.issuing_country
        );
        Ok(fields)
    }

    fn parse_td3(&self, validated: &ValidatedMrz) -> Result<DocumentFields, MrzError> {
        let line1 = line(validated, LineRole::Line1)?;
        let line2 = line(validated, LineRole::Line2)?;
        let (surname, given_names) = split_names(slice(line1, td3::NAMES)?);

        Ok(DocumentFields {
            format: DocumentFormat::TD3,
            document_type: clean_field(slice(line1, td3::DOCUMENT_CODE)?),
            document_number: clean_field(slice(line2, td3::DOCUMENT_NUMBER)?),
            issuing_country: clean_field(slice(line1, td3::ISSUING_STATE)?),
            nationality: clean_field(slice(line2, td3::NATIONALITY)?),
            surname,
            given_names,
            sex: Sex::from_code(char_at(line2, td3::SEX)?),
            date_of_birth: self.parse_date(slice(line2, td3::DATE_OF_BIRTH)?, DateKind::Birth)?,
            date_of_expiry: self.parse_date(slice(line2, td3::DATE_OF_EXPIRY)?, DateKind::Expiry)?,
            optional_data: non_empty(clean_field(slice(line2, td3::PERSONAL_NUMBER)?)),
            optional_data_2: None,
        })
    }

    fn parse_td1(&self, validated: &ValidatedMrz) -> Result<DocumentFields, MrzError> {
        let line1 = line(validated, LineRole::Line1)?;
        let line2 = line(validated, LineRole::Line2)?;
        let line3 = line(validated, LineRole::Line3)?;

        let number_with_check = td1::document_number_with_check(line1).ok_or_else(|| {
            MrzError::MrzParsingError("TD1 document number has no check digit".to_string())
        })?;
        let number = &number_with_check[..number_with_check.len() - 1];
        let optional = slice(line1, td1::OPTIONAL_DATA_1)?;
        // Long numbers spill into the optional data; skip the overflow and its check digit
        let optional = if number.len() > td1::DOCUMENT_NUMBER.len() {
            let overflow = number.len() - td1::DOCUMENT_NUMBER.len() + 1;
            optional.get(overflow..).unwrap_or("")
        } else {
            optional
        };
        let (surname, given_names) = split_names(slice(line3, td1::NAMES)?);

        Ok(DocumentFields {
            format: DocumentFormat::TD1,
            document_type: clean_field(slice(line1, td1::DOCUMENT_CODE)?),
            document_number: clean_field(number),
            issuing_country: clean_field(slice(line1, td1::ISSUING_STATE)?),
            nationality: clean_field(slice(line2, td1::NATIONALITY)?),
            surname,
            given_names,
            sex: Sex::from_code(char_at(line2, td1::SEX)?),
            date_of_birth: self.parse_date(slice(line2, td1::DATE_OF_BIRTH)?, DateKind::Birth)?,
            date_of_expiry: self.parse_date(slice(line2, td1::DATE_OF_EXPIRY)?, DateKind::Expiry)?,
            optional_data: non_empty(clean_field(optional)),
            optional_data_2: non_empty(clean_field(slice(line2, td1::OPTIONAL_DATA_2)?)),
        })
    }

    /// Parses a `YYMMDD` MRZ date.
    pub fn parse_date(&self, yymmdd: &str, kind: DateKind) -> Result<NaiveDate, MrzError> {
        let invalid = || MrzError::InvalidDate(format!("'{}' is not a YYMMDD date", yymmdd));
        if yymmdd.len() != 6 || !yymmdd.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let yy: u32 = yymmdd[0..2].parse().map_err(|_| invalid())?;
        let month: u32 = yymmdd[2..4].parse().map_err(|_| invalid())?;
        let day: u32 = yymmdd[4..6].parse().map_err(|_| invalid())?;

        let year = self.full_year(yy, kind);
        NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
    }

    /// Century pivot: `yy` lands in the reference century unless it lies more
    /// than the kind's tolerance past the reference year, in which case it
    /// belongs to the previous century.
    pub fn full_year(&self, yy: u32, kind: DateKind) -> i32 {
        let reference_year = self.reference_date.year();
        let current_yy = reference_year.rem_euclid(100) as u32;
        let century = reference_year - current_yy as i32;
        if yy > current_yy + kind.forward_tolerance() {
            century - 100 + yy as i32
        } else {
            century + yy as i32
        }
    }
}

fn line(validated: &ValidatedMrz, role: LineRole) -> Result<&str, MrzError> {
    validated
        .line(role)
        .ok_or_else(|| MrzError::MrzParsingError(format!("{} is missing", role)))
}

fn slice(line: &str, range: Range<usize>) -> Result<&str, MrzError> {
    let (start, end) = (range.start, range.end);
    layout::field(line, range).ok_or_else(|| {
        MrzError::MrzParsingError(format!("field {}..{} out of range in '{}'", start, end, line))
    })
}

fn char_at(line: &str, position: usize) -> Result<char, MrzError> {
    layout::char_at(line, position).ok_or_else(|| {
        MrzError::MrzParsingError(format!("position {} out of range in '{}'", position, line))
    })
}

/// Replaces filler with spaces, collapses runs of spaces and trims.
pub fn clean_field(raw: &str) -> String {
    raw.split(|c: char| c == FILLER || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Splits a name block on the first double filler into surname and given names.
pub fn split_names(block: &str) -> (String, String) {
    match block.split_once("<<") {
        Some((surname, given_names)) => (clean_field(surname), clean_field(given_names)),
        None => (clean_field(block), String::new()),
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
