//! Field checks shared by the entity `validate_*` functions.
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::errors::ModelError;

pub fn not_blank(field: &'static str, value: &str) -> Result<(), ModelError> {
    if common::validation::is_blank(value) {
        return Err(ModelError::field(field, format!("{} can not be empty or null", humanize(field))));
    }
    Ok(())
}

pub fn email(field: &'static str, value: &str) -> Result<(), ModelError> {
    not_blank(field, value)?;
    if !common::validation::is_valid_email(value) {
        return Err(ModelError::field(field, "email format is not valid"));
    }
    Ok(())
}

pub fn non_negative(field: &'static str, value: Decimal) -> Result<(), ModelError> {
    if value < Decimal::ZERO {
        return Err(ModelError::field(field, format!("{} must be positive number", humanize(field))));
    }
    Ok(())
}

pub fn at_least(field: &'static str, value: i32, min: i32) -> Result<(), ModelError> {
    if value < min {
        return Err(ModelError::field(field, format!("{} must be at least {}", humanize(field), min)));
    }
    Ok(())
}

pub fn not_in_future(field: &'static str, value: NaiveDate) -> Result<(), ModelError> {
    if value > Utc::now().date_naive() {
        return Err(ModelError::field(field, format!("{} must be in the past or today", humanize(field))));
    }
    Ok(())
}

fn humanize(field: &str) -> String {
    field.replace('_', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn blank_is_keyed_by_field() {
        match not_blank("bank_name", "  ") {
            Err(ModelError::Field { field, message }) => {
                assert_eq!(field, "bank_name");
                assert_eq!(message, "bank name can not be empty or null");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn negative_price_rejected() {
        assert!(non_negative("price", Decimal::new(-1, 2)).is_err());
        assert!(non_negative("price", Decimal::ZERO).is_ok());
        assert!(non_negative("price", Decimal::new(1000, 2)).is_ok());
    }

    #[test]
    fn future_dates_rejected() {
        let tomorrow = Utc::now().date_naive().succ_opt().unwrap();
        assert!(not_in_future("birthday", tomorrow).is_err());
        assert!(not_in_future("birthday", Utc::now().date_naive()).is_ok());
    }

    #[test]
    fn email_shape_checked() {
        assert!(email("email", "not-an-email").is_err());
        assert!(email("email", "ana@vrtic.rs").is_ok());
    }
}
