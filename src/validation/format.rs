use log::trace;

use crate::models::layout::{td1, td3};
use crate::models::{DocumentFormat, LineRole, FILLER};

/// Structural classification of OCR candidates into MRZ line roles.
///
/// Checks are purely fixed-width and character-class based. Check digits are
/// left to `MrzValidator`, so a line with a misread digit is still accepted
/// here and may be replaced by a better read later.
pub struct LineClassifier;

impl LineClassifier {
    /// Returns the single role `text` can fill for `format`, or `None` when it
    /// fits no role or, ambiguously, more than one.
    pub fn classify(text: &str, format: DocumentFormat) -> Option<LineRole> {
        if text.chars().count() != format.mrz_chars_per_line() || !text.is_ascii() {
            trace!("Rejected candidate of wrong shape for {}: {:?}", format, text);
            return None;
        }

        let line = text.as_bytes();
        let mut matches = format
            .roles()
            .iter()
            .copied()
            .filter(|role| Self::matches_role(line, format, *role));

        let role = matches.next()?;
        if matches.next().is_some() {
            trace!("Candidate matches more than one {} line, ignoring: {}", format, text);
            return None;
        }
        Some(role)
    }

    fn matches_role(line: &[u8], format: DocumentFormat, role: LineRole) -> bool {
        match (format, role) {
            (DocumentFormat::TD1, LineRole::Line1) => Self::td1_line1(line),
            (DocumentFormat::TD1, LineRole::Line2) => Self::td1_line2(line),
            (DocumentFormat::TD1, LineRole::Line3) => all(line, is_name_char),
            (DocumentFormat::TD3, LineRole::Line1) => Self::td3_line1(line),
            (DocumentFormat::TD3, LineRole::Line2) => Self::td3_line2(line),
            (DocumentFormat::TD3, LineRole::Line3) => false,
        }
    }

    fn td1_line1(line: &[u8]) -> bool {
        matches!(line[0], b'I' | b'A' | b'C')
            && is_name_char(line[1])
            && is_country_code(&line[td1::ISSUING_STATE])
            && all(&line[td1::DOCUMENT_NUMBER], is_alnum_or_filler)
            && all(&line[td1::OPTIONAL_DATA_1], is_alnum_or_filler)
            && Self::td1_has_number_check(line)
    }

    /// The document number check digit sits at position 14, or for numbers
    /// longer than nine characters, ends the overflow in the optional data.
    /// Either way the line carries a digit, which keeps it apart from the
    /// name line.
    fn td1_has_number_check(line: &[u8]) -> bool {
        let check = line[td1::DOCUMENT_NUMBER_CHECK];
        if is_digit(check) {
            return true;
        }
        if check != FILLER_BYTE {
            return false;
        }
        let optional = &line[td1::OPTIONAL_DATA_1];
        let overflow_len = optional.iter().take_while(|b| **b != FILLER_BYTE).count();
        overflow_len > 0 && is_digit(optional[overflow_len - 1])
    }

    fn td1_line2(line: &[u8]) -> bool {
        all(&line[td1::DATE_OF_BIRTH], is_digit)
            && is_digit(line[td1::DATE_OF_BIRTH_CHECK])
            && is_sex_code(line[td1::SEX])
            && all(&line[td1::DATE_OF_EXPIRY], is_digit)
            && is_digit(line[td1::DATE_OF_EXPIRY_CHECK])
            && is_country_code(&line[td1::NATIONALITY])
            && all(&line[td1::OPTIONAL_DATA_2], is_alnum_or_filler)
            && is_digit(line[td1::COMPOSITE_CHECK])
    }

    fn td3_line1(line: &[u8]) -> bool {
        line[0] == b'P'
            && is_name_char(line[1])
            && is_country_code(&line[td3::ISSUING_STATE])
            && all(&line[td3::NAMES], is_name_char)
    }

    fn td3_line2(line: &[u8]) -> bool {
        all(&line[td3::DOCUMENT_NUMBER], is_alnum_or_filler)
            && is_digit(line[td3::DOCUMENT_NUMBER_CHECK])
            && is_country_code(&line[td3::NATIONALITY])
            && all(&line[td3::DATE_OF_BIRTH], is_digit)
            && is_digit(line[td3::DATE_OF_BIRTH_CHECK])
            && is_sex_code(line[td3::SEX])
            && all(&line[td3::DATE_OF_EXPIRY], is_digit)
            && is_digit(line[td3::DATE_OF_EXPIRY_CHECK])
            && all(&line[td3::PERSONAL_NUMBER], is_alnum_or_filler)
            && is_digit_or_filler(line[td3::PERSONAL_NUMBER_CHECK])
            && is_digit(line[td3::COMPOSITE_CHECK])
    }
}

const FILLER_BYTE: u8 = FILLER as u8;

fn all(bytes: &[u8], pred: fn(u8) -> bool) -> bool {
    bytes.iter().all(|b| pred(*b))
}

fn is_digit(b: u8) -> bool {
    b.is_ascii_digit()
}

fn is_digit_or_filler(b: u8) -> bool {
    b.is_ascii_digit() || b == FILLER_BYTE
}

fn is_name_char(b: u8) -> bool {
    b.is_ascii_uppercase() || b == FILLER_BYTE
}

fn is_alnum_or_filler(b: u8) -> bool {
    b.is_ascii_uppercase() || b.is_ascii_digit() || b == FILLER_BYTE
}

fn is_sex_code(b: u8) -> bool {
    matches!(b, b'M' | b'F' | b'X' | FILLER_BYTE)
}

/// Three letters, or letters followed by filler (`D<<` for Germany).
fn is_country_code(code: &[u8]) -> bool {
    let letters = code.iter().take_while(|b| b.is_ascii_uppercase()).count();
    letters > 0 && code[letters..].iter().all(|b| *b == FILLER_BYTE)
}
