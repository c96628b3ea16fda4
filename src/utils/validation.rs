//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! que complementan las reglas derivadas de `validator`.

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;
use validator::ValidationError;

lazy_static! {
    /// Formato de número de registro: alfanumérico con guiones o espacios
    /// internos, p.ej. "DHK-1234" o "KA 05 MH 1234"
    static ref REGISTRATION_NUMBER_RE: Regex =
        Regex::new(r"^(?i)[A-Z0-9][A-Z0-9 \-]{2,46}[A-Z0-9]$").expect("regex válida");
}

/// Validar que un valor sea positivo
pub fn validate_positive<T: PartialOrd + std::fmt::Display + num_traits::Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value <= T::zero() {
        let mut error = ValidationError::new("positive");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validar que un precio de renta diario sea positivo
pub fn validate_daily_rent_price(value: &Decimal) -> Result<(), ValidationError> {
    validate_positive(*value)
}

/// Validar formato de teléfono (básico)
pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    let clean_phone = value.chars().filter(|c| c.is_ascii_digit()).collect::<String>();
    if clean_phone.len() < 7 || clean_phone.len() > 15 {
        let mut error = ValidationError::new("phone");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar formato de número de registro de vehículo
pub fn validate_registration_number(value: &str) -> Result<(), ValidationError> {
    if !REGISTRATION_NUMBER_RE.is_match(value) {
        let mut error = ValidationError::new("registration_number");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive(5).is_ok());
        assert!(validate_positive(0).is_err());
        assert!(validate_positive(-5).is_err());
    }

    #[test]
    fn test_validate_daily_rent_price() {
        assert!(validate_daily_rent_price(&Decimal::new(5000, 2)).is_ok());
        assert!(validate_daily_rent_price(&Decimal::ZERO).is_err());
        assert!(validate_daily_rent_price(&Decimal::new(-100, 2)).is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("01712345678").is_ok());
        assert!(validate_phone("+880 1712-345678").is_ok());
        assert!(validate_phone("123").is_err());
        assert!(validate_phone("1234567890123456").is_err());
    }

    #[test]
    fn test_validate_registration_number() {
        assert!(validate_registration_number("DHK-1234").is_ok());
        assert!(validate_registration_number("ka 05 mh 1234").is_ok());
        assert!(validate_registration_number("A1").is_err());
        assert!(validate_registration_number("-BAD-").is_err());
    }
}
