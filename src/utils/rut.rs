//! Helpers de RUT
//!
//! El RUT se escribe con puntos en pantalla (`12.345.678-9`) pero la API
//! sólo acepta la forma sin separadores (`12345678-9`).

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref RUT_REGEX: Regex = Regex::new(r"^\d{7,8}-[\dkK]$").unwrap();
}

/// Quitar los puntos de un RUT y normalizar el dígito verificador
pub fn normalize_rut(rut: &str) -> String {
    rut.trim().replace('.', "").to_uppercase()
}

/// Verificar que el RUT tenga el formato `NNNNNNNN-X`
pub fn is_valid_rut_format(rut: &str) -> bool {
    RUT_REGEX.is_match(&normalize_rut(rut))
}

/// Tipos que llevan un RUT que debe normalizarse antes de transmitirse
pub trait NormalizeRut {
    fn normalize_rut(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_rut_strips_periods() {
        assert_eq!(normalize_rut("12.345.678-9"), "12345678-9");
        assert_eq!(normalize_rut(" 7.654.321-k "), "7654321-K");
        assert_eq!(normalize_rut("12345678-9"), "12345678-9");
    }

    #[test]
    fn test_rut_format() {
        assert!(is_valid_rut_format("12.345.678-9"));
        assert!(is_valid_rut_format("1234567-K"));
        assert!(!is_valid_rut_format("12.345.678"));
        assert!(!is_valid_rut_format("123-4"));
        assert!(!is_valid_rut_format("12345678-99"));
    }
}
