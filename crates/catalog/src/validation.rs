//! Input validation for registrations and vehicles.
//!
//! These checks run before anything reaches the store. The store itself only
//! enforces its NOT NULL, UNIQUE and CHECK constraints.

use catalog_core::ValidationError;
use chrono::Datelike;

pub use catalog_core::validate_email;

/// Number of digits in a CPF.
pub const CPF_LENGTH: usize = 11;

/// Year of the first production automobile.
pub const MIN_VEHICLE_YEAR: i32 = 1886;

fn invalid(field: &str, reason: impl Into<String>) -> ValidationError {
    ValidationError::Invalid {
        field: field.to_string(),
        reason: reason.into(),
    }
}

fn out_of_range(field: &str, reason: impl Into<String>) -> ValidationError {
    ValidationError::OutOfRange {
        field: field.to_string(),
        reason: reason.into(),
    }
}

/// Reject blank values for a required field.
pub fn validate_required(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty(field.to_string()));
    }
    Ok(())
}

/// A CPF is exactly eleven ASCII digits, no punctuation.
pub fn validate_cpf(cpf: &str) -> Result<(), ValidationError> {
    validate_required("cpf", cpf)?;

    if cpf.len() != CPF_LENGTH || !cpf.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid("cpf", format!("must be {} digits", CPF_LENGTH)));
    }

    Ok(())
}

/// Validate vehicle attributes.
pub fn validate_vehicle(
    brand: &str,
    model: &str,
    year: i32,
    price: f64,
    mileage: i32,
) -> Result<(), ValidationError> {
    validate_required("brand", brand)?;
    validate_required("model", model)?;

    let current_year = chrono::Local::now().year();
    if !(MIN_VEHICLE_YEAR..=current_year).contains(&year) {
        return Err(out_of_range(
            "year",
            format!("must be between {} and {}", MIN_VEHICLE_YEAR, current_year),
        ));
    }

    // NaN fails this too.
    if !(price > 0.0) {
        return Err(out_of_range("price", "must be greater than zero"));
    }

    if mileage < 0 {
        return Err(out_of_range("mileage", "cannot be negative"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_cpf() {
        assert!(validate_cpf("12345678900").is_ok());
        assert!(matches!(validate_cpf(""), Err(ValidationError::Empty(_))));
        assert!(validate_cpf("1234567890").is_err());
        assert!(validate_cpf("123.456.789-00").is_err());
        assert!(validate_cpf("1234567890a").is_err());
    }

    #[test]
    fn test_validate_email_valid() {
        assert!(validate_email("joao@email.com").is_ok());
        assert!(validate_email("admin@admin.com").is_ok());
        assert!(validate_email("  ana@mail.com.br  ").is_ok());
    }

    #[test]
    fn test_validate_email_invalid() {
        assert!(matches!(validate_email(""), Err(ValidationError::Empty(_))));
        assert!(validate_email("joaoemail.com").is_err());
        assert!(validate_email("joao@email").is_err());
        assert!(validate_email("@email.com").is_err());
        assert!(validate_email("joao@@email.com").is_err());
        assert!(validate_email("joao@.com").is_err());
    }

    #[test]
    fn test_validate_vehicle() {
        assert!(validate_vehicle("Toyota", "Corolla", 2020, 85000.0, 50000).is_ok());
        assert!(validate_vehicle("Fiat", "Uno", MIN_VEHICLE_YEAR, 1.0, 0).is_ok());

        assert!(matches!(
            validate_vehicle(" ", "Corolla", 2020, 85000.0, 50000),
            Err(ValidationError::Empty(_))
        ));
        assert!(matches!(
            validate_vehicle("Toyota", "Corolla", 1885, 85000.0, 50000),
            Err(ValidationError::OutOfRange { .. })
        ));
        let next_year = chrono::Local::now().year() + 1;
        assert!(validate_vehicle("Toyota", "Corolla", next_year, 85000.0, 50000).is_err());
        assert!(validate_vehicle("Toyota", "Corolla", 2020, 0.0, 50000).is_err());
        assert!(validate_vehicle("Toyota", "Corolla", 2020, f64::NAN, 50000).is_err());
        assert!(validate_vehicle("Toyota", "Corolla", 2020, 85000.0, -1).is_err());
    }
}
