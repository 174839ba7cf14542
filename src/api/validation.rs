use super::ApiError;
use crate::domain::{LoanDuration, LoanStatus, PaymentMethod, Role};

pub fn validate_id(resource: &str, id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid {resource} ID: {id}. ID must be a positive integer"
        )));
    }
    Ok(id)
}

pub fn parse_status(value: &str) -> Result<LoanStatus, ApiError> {
    value
        .parse()
        .map_err(|e: crate::domain::InvalidValue| ApiError::validation(e.to_string()))
}

pub fn parse_optional_status(value: Option<&str>) -> Result<Option<LoanStatus>, ApiError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_status(s).map(Some),
    }
}

pub fn parse_duration(value: &str) -> Result<LoanDuration, ApiError> {
    value
        .parse()
        .map_err(|e: crate::domain::InvalidValue| ApiError::validation(e.to_string()))
}

pub fn parse_payment_method(value: &str) -> Result<PaymentMethod, ApiError> {
    value
        .parse()
        .map_err(|e: crate::domain::InvalidValue| ApiError::validation(e.to_string()))
}

pub fn parse_role(value: &str) -> Result<Role, ApiError> {
    value
        .parse()
        .map_err(|e: crate::domain::UnknownRole| ApiError::validation(e.to_string()))
}

/// Calculator amount: unparsable or non-finite input becomes 0, which the
/// terms calculation turns into an all-zero quote.
#[must_use]
pub fn amount_from_query(amount: Option<&str>) -> f64 {
    amount
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Calculator duration: anything that is not a non-negative whole month
/// count becomes 0.
#[must_use]
pub fn months_from_query(duration: Option<&str>) -> u32 {
    duration
        .and_then(|v| v.trim().parse::<i64>().ok())
        .and_then(|d| u32::try_from(d).ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_id() {
        assert!(validate_id("loan", 1).is_ok());
        assert!(validate_id("loan", 0).is_err());
        assert!(validate_id("loan", -3).is_err());
    }

    #[test]
    fn test_parse_enums() {
        assert_eq!(parse_status("Approved").unwrap(), LoanStatus::Approved);
        assert!(parse_status("approved-ish").is_err());
        assert_eq!(parse_duration("6").unwrap(), LoanDuration::SixMonths);
        assert!(parse_duration("12").is_err());
        assert_eq!(parse_payment_method("bKash").unwrap(), PaymentMethod::BKash);
        assert!(parse_payment_method("PayPal").is_err());
        assert_eq!(parse_role("super_admin").unwrap(), Role::SuperAdmin);
        assert!(parse_role("root").is_err());
    }

    #[test]
    fn test_optional_status_blank_is_none() {
        assert_eq!(parse_optional_status(None).unwrap(), None);
        assert_eq!(parse_optional_status(Some("  ")).unwrap(), None);
        assert_eq!(
            parse_optional_status(Some("Paid")).unwrap(),
            Some(LoanStatus::Paid)
        );
    }

    #[test]
    fn test_months_from_query() {
        assert_eq!(months_from_query(Some("3")), 3);
        assert_eq!(months_from_query(Some(" 6 ")), 6);
        assert_eq!(months_from_query(Some("-6")), 0);
        assert_eq!(months_from_query(Some("six")), 0);
        assert_eq!(months_from_query(None), 0);
    }

    #[test]
    fn test_amount_from_query_is_lenient() {
        assert_eq!(amount_from_query(Some("10000")), 10_000.0);
        assert_eq!(amount_from_query(Some("1e307")), 1e307);
        assert_eq!(amount_from_query(Some("abc")), 0.0);
        assert_eq!(amount_from_query(Some("inf")), 0.0);
        assert_eq!(amount_from_query(Some("")), 0.0);
        assert_eq!(amount_from_query(None), 0.0);
    }
}
