use crate::models::FILLER;

/// Drops every character outside the MRZ alphabet (`A-Z`, `0-9`, `<`).
///
/// OCR engines often report stray whitespace or punctuation around MRZ text.
/// Characters inside the alphabet are never rewritten.
pub fn normalize_candidate(text: &str) -> String {
    text.chars().filter(|c| is_mrz_char(*c)).collect()
}

pub fn is_mrz_char(c: char) -> bool {
    c.is_ascii_uppercase() || c.is_ascii_digit() || c == FILLER
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_whitespace_and_noise() {
        assert_eq!(normalize_candidate("  P<GBR PROCTOR\n"), "P<GBRPROCTOR");
        assert_eq!(normalize_candidate("«L898902C3»"), "L898902C3");
    }

    #[test]
    fn test_keeps_alphabet_untouched() {
        let line = "L898902C36UTO7408122F1204159ZE184226B<<<<<10";
        assert_eq!(normalize_candidate(line), line);
        // lowercase is not silently upper-cased
        assert_eq!(normalize_candidate("o0O"), "0O");
    }
}
