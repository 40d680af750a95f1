//! Fixed-width field positions of the ICAO Doc 9303 MRZ layouts.
//!
//! Ranges are byte offsets into a single MRZ line. Lines are ASCII once they
//! have passed classification, so byte and character offsets coincide; the
//! helpers below still go through `str::get` and never panic.

use std::ops::Range;

/// TD1 (ID card): 3 lines of 30 characters.
pub mod td1 {
    use std::ops::Range;

    // Line 1
    pub const DOCUMENT_CODE: Range<usize> = 0..2;
    pub const ISSUING_STATE: Range<usize> = 2..5;
    pub const DOCUMENT_NUMBER: Range<usize> = 5..14;
    pub const DOCUMENT_NUMBER_CHECK: usize = 14;
    pub const OPTIONAL_DATA_1: Range<usize> = 15..30;
    /// Line 1 span covered by the composite check digit.
    pub const COMPOSITE_LINE1: Range<usize> = 5..30;

    // Line 2
    pub const DATE_OF_BIRTH: Range<usize> = 0..6;
    pub const DATE_OF_BIRTH_CHECK: usize = 6;
    pub const SEX: usize = 7;
    pub const DATE_OF_EXPIRY: Range<usize> = 8..14;
    pub const DATE_OF_EXPIRY_CHECK: usize = 14;
    pub const NATIONALITY: Range<usize> = 15..18;
    pub const OPTIONAL_DATA_2: Range<usize> = 18..29;
    pub const COMPOSITE_CHECK: usize = 29;

    // Line 3
    pub const NAMES: Range<usize> = 0..30;

    /// Document number followed by its check digit, read from line 1.
    ///
    /// Numbers longer than nine characters put a filler in the check position
    /// and continue in the optional data, where the overflow is followed by
    /// the real check digit and a filler.
    pub fn document_number_with_check(line1: &str) -> Option<String> {
        let head = line1.get(DOCUMENT_NUMBER)?;
        let check = super::char_at(line1, DOCUMENT_NUMBER_CHECK)?;
        if check != crate::models::FILLER {
            return Some(format!("{}{}", head, check));
        }
        let optional = line1.get(OPTIONAL_DATA_1)?;
        let overflow_len = optional
            .find(crate::models::FILLER)
            .unwrap_or(optional.len());
        if overflow_len == 0 {
            return None;
        }
        Some(format!("{}{}", head, &optional[..overflow_len]))
    }
}

/// TD3 (passport): 2 lines of 44 characters.
pub mod td3 {
    use std::ops::Range;

    // Line 1
    pub const DOCUMENT_CODE: Range<usize> = 0..2;
    pub const ISSUING_STATE: Range<usize> = 2..5;
    pub const NAMES: Range<usize> = 5..44;

    // Line 2
    pub const DOCUMENT_NUMBER: Range<usize> = 0..9;
    pub const DOCUMENT_NUMBER_CHECK: usize = 9;
    pub const NATIONALITY: Range<usize> = 10..13;
    pub const DATE_OF_BIRTH: Range<usize> = 13..19;
    pub const DATE_OF_BIRTH_CHECK: usize = 19;
    pub const SEX: usize = 20;
    pub const DATE_OF_EXPIRY: Range<usize> = 21..27;
    pub const DATE_OF_EXPIRY_CHECK: usize = 27;
    pub const PERSONAL_NUMBER: Range<usize> = 28..42;
    pub const PERSONAL_NUMBER_CHECK: usize = 42;
    pub const COMPOSITE_CHECK: usize = 43;
    /// Line 2 spans covered by the composite check digit.
    pub const COMPOSITE_SPANS: [Range<usize>; 3] = [0..10, 13..20, 21..43];
}

pub fn field(line: &str, range: Range<usize>) -> Option<&str> {
    line.get(range)
}

/// Field together with the check digit that immediately follows it.
pub fn field_with_check(line: &str, range: Range<usize>) -> Option<&str> {
    line.get(range.start..range.end + 1)
}

pub fn char_at(line: &str, position: usize) -> Option<char> {
    line.get(position..position + 1)
        .and_then(|s| s.chars().next())
}
