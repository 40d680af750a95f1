use chrono::NaiveDate;

use crate::models::DocumentFields;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpiryValidationResult {
    /// Not expired, and the expiry date falls after the date of birth.
    pub is_valid: bool,
    pub not_expired: bool,
    /// Negative once the document has expired.
    pub days_remaining: i64,
}

pub struct ExpiryValidator;

impl ExpiryValidator {
    // A document is still valid on its expiry date
    pub fn validate(fields: &DocumentFields, today: NaiveDate) -> ExpiryValidationResult {
        let days_remaining = (fields.date_of_expiry - today).num_days();
        let not_expired = days_remaining >= 0;
        let consistent = fields.date_of_expiry > fields.date_of_birth;

        ExpiryValidationResult {
            is_valid: not_expired && consistent,
            not_expired,
            days_remaining,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DocumentFormat, Sex};

    fn fields_expiring(date: NaiveDate) -> DocumentFields {
        DocumentFields {
            format: DocumentFormat::TD1,
            document_type: "I".to_string(),
            document_number: "D23145890".to_string(),
            issuing_country: "UTO".to_string(),
            nationality: "UTO".to_string(),
            surname: "ERIKSSON".to_string(),
            given_names: "ANNA MARIA".to_string(),
            sex: Sex::Female,
            date_of_birth: NaiveDate::from_ymd_opt(1974, 8, 12).unwrap(),
            date_of_expiry: date,
            optional_data: None,
            optional_data_2: None,
        }
    }

    #[test]
    fn test_expired() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let result = ExpiryValidator::validate(&fields_expiring(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()), today);
        assert!(!result.is_valid);
        assert_eq!(result.days_remaining, -9);
    }

    #[test]
    fn test_valid_on_expiry_day() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let result = ExpiryValidator::validate(&fields_expiring(today), today);
        assert!(result.not_expired);
        assert_eq!(result.days_remaining, 0);
    }

    #[test]
    fn test_expiry_before_birth_is_invalid() {
        let today = NaiveDate::from_ymd_opt(1960, 1, 1).unwrap();
        let result = ExpiryValidator::validate(&fields_expiring(NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()), today);
        assert!(result.not_expired);
        assert!(!result.is_valid);
    }
}
