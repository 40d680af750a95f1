use log::debug;
use std::ops::Range;
use thiserror::Error;

use super::check_digit::{compute_check_digit, is_valid_check_digit};
use crate::models::layout::{self, td1, td3};
use crate::models::{AccumulatedReading, DocumentFormat, LineRole, MrzField, ValidatedMrz, FILLER};

/// Why a complete-looking reading was not accepted. All of these are routine
/// outcomes of noisy OCR input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("reading is incomplete")]
    IncompleteReading,
    #[error("{0} has the wrong shape")]
    ShapeMismatch(LineRole),
    #[error("{0} check digit failed")]
    FieldChecksumFailed(MrzField),
    #[error("composite check digit failed")]
    CompositeChecksumFailed,
    /// Check digits passed but a field holds an impossible value, such as
    /// month 13.
    #[error("field could not be parsed: {0}")]
    FieldParseFailed(String),
}

/// Check-digit validation of a full set of MRZ lines.
pub struct MrzValidator;

impl MrzValidator {
    pub fn validate(reading: &AccumulatedReading) -> Result<ValidatedMrz, Rejection> {
        let format = reading.format;
        let lines = Self::collect_lines(reading)?;

        let result = match format {
            DocumentFormat::TD1 => Self::validate_td1(&lines[0], &lines[1]),
            DocumentFormat::TD3 => Self::validate_td3(&lines[1]),
        };
        if let Err(ref rejection) = result {
            debug!("{} reading rejected: {}", format, rejection);
        }
        result?;

        Ok(ValidatedMrz::new(format, lines))
    }

    fn collect_lines(reading: &AccumulatedReading) -> Result<Vec<String>, Rejection> {
        let width = reading.format.mrz_chars_per_line();
        reading
            .format
            .roles()
            .iter()
            .map(|role| {
                let slot = reading.slot(*role).ok_or(Rejection::IncompleteReading)?;
                if slot.text.len() != width || !slot.text.is_ascii() {
                    return Err(Rejection::ShapeMismatch(*role));
                }
                Ok(slot.text.clone())
            })
            .collect()
    }

    fn validate_td1(line1: &str, line2: &str) -> Result<(), Rejection> {
        let document_number = td1::document_number_with_check(line1)
            .ok_or(Rejection::FieldChecksumFailed(MrzField::DocumentNumber))?;
        if !is_valid_check_digit(&document_number) {
            return Err(Rejection::FieldChecksumFailed(MrzField::DocumentNumber));
        }
        Self::check_field(line2, td1::DATE_OF_BIRTH, MrzField::DateOfBirth)?;
        Self::check_field(line2, td1::DATE_OF_EXPIRY, MrzField::DateOfExpiry)?;

        let composite = [
            layout::field(line1, td1::COMPOSITE_LINE1),
            layout::field_with_check(line2, td1::DATE_OF_BIRTH),
            layout::field_with_check(line2, td1::DATE_OF_EXPIRY),
            layout::field(line2, td1::OPTIONAL_DATA_2),
        ];
        Self::check_composite(&composite, layout::char_at(line2, td1::COMPOSITE_CHECK))
    }

    fn validate_td3(line2: &str) -> Result<(), Rejection> {
        Self::check_field(line2, td3::DOCUMENT_NUMBER, MrzField::DocumentNumber)?;
        Self::check_field(line2, td3::DATE_OF_BIRTH, MrzField::DateOfBirth)?;
        Self::check_field(line2, td3::DATE_OF_EXPIRY, MrzField::DateOfExpiry)?;
        Self::check_personal_number(line2)?;

        let composite = td3::COMPOSITE_SPANS.map(|span| layout::field(line2, span));
        Self::check_composite(&composite, layout::char_at(line2, td3::COMPOSITE_CHECK))
    }

    fn check_field(line: &str, range: Range<usize>, field: MrzField) -> Result<(), Rejection> {
        match layout::field_with_check(line, range) {
            Some(value) if is_valid_check_digit(value) => Ok(()),
            _ => Err(Rejection::FieldChecksumFailed(field)),
        }
    }

    /// An entirely empty personal number may carry a filler instead of a digit.
    fn check_personal_number(line2: &str) -> Result<(), Rejection> {
        let failed = Rejection::FieldChecksumFailed(MrzField::PersonalNumber);
        let number = layout::field(line2, td3::PERSONAL_NUMBER).ok_or(failed.clone())?;
        match layout::char_at(line2, td3::PERSONAL_NUMBER_CHECK) {
            Some(FILLER) if number.chars().all(|c| c == FILLER) => Ok(()),
            _ => Self::check_field(line2, td3::PERSONAL_NUMBER, MrzField::PersonalNumber),
        }
    }

    fn check_composite(parts: &[Option<&str>], check: Option<char>) -> Result<(), Rejection> {
        let expected = check
            .and_then(|c| c.to_digit(10))
            .ok_or(Rejection::CompositeChecksumFailed)?;
        let mut composite = String::new();
        for part in parts {
            composite.push_str(part.ok_or(Rejection::CompositeChecksumFailed)?);
        }
        if u32::from(compute_check_digit(&composite)) == expected {
            Ok(())
        } else {
            Err(Rejection::CompositeChecksumFailed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LineSlot;

    fn reading(format: DocumentFormat, lines: &[&str]) -> AccumulatedReading {
        let mut reading = AccumulatedReading::new(format);
        for (role, text) in format.roles().iter().zip(lines) {
            *reading.slot_mut(*role) = Some(LineSlot {
                text: text.to_string(),
                region: None,
            });
        }
        reading
    }

    const GBR_LINE1: &str = "P<GBRPROCTOR<<DOUGLAS<JOHN<BEAUCHAMP<<<<<<<<";
    const GBR_LINE2: &str = "5189313767GBR8310213M2507064<<<<<<<<<<<<<<<4";
    const UTO_LINE1: &str = "P<UTOERIKSSON<<ANNA<MARIA<<<<<<<<<<<<<<<<<<<";
    const UTO_LINE2: &str = "L898902C36UTO7408122F1204159ZE184226B<<<<<10";

    #[test]
    fn test_valid_td3() {
        let validated = MrzValidator::validate(&reading(DocumentFormat::TD3, &[GBR_LINE1, GBR_LINE2])).unwrap();
        assert_eq!(validated.to_string(), format!("{}\n{}", GBR_LINE1, GBR_LINE2));
        assert_eq!(validated.lines().len(), 2);

        assert!(MrzValidator::validate(&reading(DocumentFormat::TD3, &[UTO_LINE1, UTO_LINE2])).is_ok());
    }

    #[test]
    fn test_valid_td1() {
        let lines = [
            "I<UTOD231458907<<<<<<<<<<<<<<<",
            "7408122F1204159UTO<<<<<<<<<<<6",
            "ERIKSSON<<ANNA<MARIA<<<<<<<<<<",
        ];
        assert!(MrzValidator::validate(&reading(DocumentFormat::TD1, &lines)).is_ok());
    }

    #[test]
    fn test_td1_long_document_number() {
        let lines = [
            "I<UTOD23145890<7349<<<<<<<<<<<",
            "7408122F1204159UTO<<<<<<<<<<<6",
            "ERIKSSON<<ANNA<MARIA<<<<<<<<<<",
        ];
        assert!(MrzValidator::validate(&reading(DocumentFormat::TD1, &lines)).is_ok());
    }

    #[test]
    fn test_incomplete() {
        assert_eq!(
            MrzValidator::validate(&reading(DocumentFormat::TD3, &[GBR_LINE1])),
            Err(Rejection::IncompleteReading)
        );
    }

    #[test]
    fn test_wrong_length_slot() {
        let short = &GBR_LINE2[..40];
        assert_eq!(
            MrzValidator::validate(&reading(DocumentFormat::TD3, &[GBR_LINE1, short])),
            Err(Rejection::ShapeMismatch(LineRole::Line2))
        );
    }

    #[test]
    fn test_field_checksum_failures() {
        let bad_number = GBR_LINE2.replacen("5189313767", "5189313768", 1);
        assert_eq!(
            MrzValidator::validate(&reading(DocumentFormat::TD3, &[GBR_LINE1, &bad_number])),
            Err(Rejection::FieldChecksumFailed(MrzField::DocumentNumber))
        );

        let bad_birth = GBR_LINE2.replacen("8310213", "8310223", 1);
        assert_eq!(
            MrzValidator::validate(&reading(DocumentFormat::TD3, &[GBR_LINE1, &bad_birth])),
            Err(Rejection::FieldChecksumFailed(MrzField::DateOfBirth))
        );

        let bad_expiry = GBR_LINE2.replacen("2507064", "2507074", 1);
        assert_eq!(
            MrzValidator::validate(&reading(DocumentFormat::TD3, &[GBR_LINE1, &bad_expiry])),
            Err(Rejection::FieldChecksumFailed(MrzField::DateOfExpiry))
        );

        let bad_personal = UTO_LINE2.replacen("ZE184226B<<<<<1", "ZE184226B<<<<<2", 1);
        assert_eq!(
            MrzValidator::validate(&reading(DocumentFormat::TD3, &[UTO_LINE1, &bad_personal])),
            Err(Rejection::FieldChecksumFailed(MrzField::PersonalNumber))
        );
    }

    #[test]
    fn test_letter_in_check_position_fails() {
        let misread = GBR_LINE2.replacen("5189313767", "518931376O", 1);
        assert_eq!(
            MrzValidator::validate(&reading(DocumentFormat::TD3, &[GBR_LINE1, &misread])),
            Err(Rejection::FieldChecksumFailed(MrzField::DocumentNumber))
        );
    }

    #[test]
    fn test_composite_failure() {
        let mut bad = GBR_LINE2.to_string();
        bad.replace_range(43..44, "5");
        assert_eq!(
            MrzValidator::validate(&reading(DocumentFormat::TD3, &[GBR_LINE1, &bad])),
            Err(Rejection::CompositeChecksumFailed)
        );
    }

    #[test]
    fn test_filler_personal_check_needs_empty_number() {
        let mut bad = UTO_LINE2.to_string();
        bad.replace_range(42..43, "<");
        assert_eq!(
            MrzValidator::validate(&reading(DocumentFormat::TD3, &[UTO_LINE1, &bad])),
            Err(Rejection::FieldChecksumFailed(MrzField::PersonalNumber))
        );
    }

    #[test]
    fn test_td1_composite_failure() {
        let lines = [
            "I<UTOD231458907<<<<<<<<<<<<<<<",
            "7408122F1204159UTO<<<<<<<<<<<5",
            "ERIKSSON<<ANNA<MARIA<<<<<<<<<<",
        ];
        assert_eq!(
            MrzValidator::validate(&reading(DocumentFormat::TD1, &lines)),
            Err(Rejection::CompositeChecksumFailed)
        );
    }
}
