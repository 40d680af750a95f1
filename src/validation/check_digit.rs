//! ICAO Doc 9303 check digits: weighted modulo 10 over the character values.

use crate::models::FILLER;

const WEIGHTS: [u32; 3] = [7, 3, 1];

/// Numeric value of an MRZ character. Characters outside the MRZ alphabet
/// count as zero rather than failing.
pub fn char_value(c: char) -> u32 {
    match c {
        '0'..='9' => c as u32 - '0' as u32,
        'A'..='Z' => c as u32 - 'A' as u32 + 10,
        FILLER => 0,
        _ => 0,
    }
}

pub fn compute_check_digit(s: &str) -> u8 {
    let sum: u32 = s
        .chars()
        .enumerate()
        .map(|(i, c)| char_value(c) * WEIGHTS[i % WEIGHTS.len()])
        .sum();
    (sum % 10) as u8
}

/// True when the last character is a digit equal to the check digit of
/// everything before it. Empty input or a non-digit check position is `false`.
pub fn is_valid_check_digit(field_with_trailing_digit: &str) -> bool {
    let mut chars = field_with_trailing_digit.chars();
    let expected = match chars.next_back().and_then(|c| c.to_digit(10)) {
        Some(d) => d as u8,
        None => return false,
    };
    compute_check_digit(chars.as_str()) == expected
}
