//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores, validación
//! y normalización de RUT.

pub mod errors;
pub mod rut;
pub mod validation;

pub use errors::{AppError, AppResult};
