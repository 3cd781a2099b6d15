//! Utilidades de validación
//!
//! Funciones helper para validar campos de formularios y requests.
//! Se usan tanto desde `#[validate(custom = ...)]` como desde el
//! validador de órdenes.

use chrono::NaiveDate;
use serde::Serialize;
use validator::ValidationError;

use super::rut::is_valid_rut_format;

/// Validar y convertir string a fecha
pub fn validate_date(value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        let mut error = ValidationError::new("date");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"YYYY-MM-DD".to_string());
        error
    })
}

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar formato de RUT (acepta puntos, se normaliza antes de enviar)
pub fn validate_rut(value: &str) -> Result<(), ValidationError> {
    if !is_valid_rut_format(value) {
        let mut error = ValidationError::new("rut");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"NNNNNNNN-X".to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar formato de teléfono chileno (básico)
pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    let clean_phone = value.chars().filter(|c| c.is_ascii_digit()).collect::<String>();
    if clean_phone.len() < 8 || clean_phone.len() > 12 {
        let mut error = ValidationError::new("phone");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar formato de coordenadas GPS
pub fn validate_coordinates(lat: f64, lng: f64) -> Result<(), ValidationError> {
    if !(-90.0..=90.0).contains(&lat) {
        let mut error = ValidationError::new("latitude");
        error.add_param("value".into(), &lat);
        error.add_param("range".into(), &"-90.0 to 90.0".to_string());
        return Err(error);
    }

    if !(-180.0..=180.0).contains(&lng) {
        let mut error = ValidationError::new("longitude");
        error.add_param("value".into(), &lng);
        error.add_param("range".into(), &"-180.0 to 180.0".to_string());
        return Err(error);
    }

    Ok(())
}

/// Validar par de coordenadas opcionales: ambas o ninguna
pub fn validate_coordinate_pair(lat: Option<f64>, lng: Option<f64>) -> Result<(), ValidationError> {
    match (lat, lng) {
        (None, None) => Ok(()),
        (Some(lat), Some(lng)) => validate_coordinates(lat, lng),
        _ => {
            let mut error = ValidationError::new("coordinates_pair");
            error.message = Some("latitud y longitud deben informarse juntas".into());
            Err(error)
        }
    }
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

/// Validar que un valor sea no negativo
pub fn validate_non_negative<T: PartialOrd + std::fmt::Display + num_traits::Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value < T::zero() {
        let mut error = ValidationError::new("non_negative");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_date() {
        assert!(validate_date("2024-01-15").is_ok());
        assert!(validate_date("2024/01/15").is_err());
        assert!(validate_date("15-01-2024").is_err());
    }

    #[test]
    fn test_validate_not_empty() {
        assert!(validate_not_empty("Acme").is_ok());
        assert!(validate_not_empty("   ").is_err());
    }

    #[test]
    fn test_validate_rut() {
        assert!(validate_rut("12.345.678-9").is_ok());
        assert!(validate_rut("7654321-k").is_ok());
        assert!(validate_rut("12345678").is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("+56 9 1234 5678").is_ok());
        assert!(validate_phone("123").is_err());
    }

    #[test]
    fn test_validate_coordinates() {
        assert!(validate_coordinates(-33.45, -70.66).is_ok());
        assert!(validate_coordinates(91.0, -70.0).is_err());
        assert!(validate_coordinates(-33.0, -181.0).is_err());
    }

    #[test]
    fn test_validate_coordinate_pair() {
        assert!(validate_coordinate_pair(None, None).is_ok());
        assert!(validate_coordinate_pair(Some(-33.4), Some(-70.6)).is_ok());
        assert!(validate_coordinate_pair(Some(-33.4), None).is_err());
        assert!(validate_coordinate_pair(None, Some(-70.6)).is_err());
        assert!(validate_coordinate_pair(Some(-95.0), Some(-70.6)).is_err());
    }

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive(5.0).is_ok());
        assert!(validate_positive(0.0).is_err());
        assert!(validate_non_negative(0.0).is_ok());
        assert!(validate_non_negative(-0.5).is_err());
    }
}
