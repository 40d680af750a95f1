pub mod check_digit;
pub mod expiry;
pub mod format;
pub mod mrz;

pub use check_digit::{compute_check_digit, is_valid_check_digit};
pub use expiry::{ExpiryValidationResult, ExpiryValidator};
pub use format::LineClassifier;
pub use mrz::{MrzValidator, Rejection};
