//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del back-office y el texto
//! que se muestra al usuario en banners y toasts.

use reqwest::StatusCode;
use thiserror::Error;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Campos obligatorios faltantes: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("{0}")]
    FormValidation(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("No hay una sesión activa")]
    SessionMissing,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("API error ({status}): {message}")]
    Api { status: StatusCode, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("No se pudieron cargar los datos de referencia: {0}")]
    ReferenceDataUnavailable(String),
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Texto para mostrar en el banner de error
    pub fn user_message(&self) -> String {
        match self {
            AppError::MissingFields(_) | AppError::FormValidation(_) => self.to_string(),
            AppError::Validation(errors) => {
                let mut fields: Vec<&str> = errors.field_errors().keys().copied().collect();
                fields.sort_unstable();
                format!("Datos inválidos en: {}", fields.join(", "))
            }
            AppError::Unauthorized(_) | AppError::SessionMissing => {
                "Tu sesión expiró, vuelve a iniciar sesión".to_string()
            }
            AppError::NotFound(msg) | AppError::Conflict(msg) => msg.clone(),
            AppError::Api { message, .. } => message.clone(),
            AppError::Network(_) => "No se pudo conectar con el servidor".to_string(),
            AppError::ReferenceDataUnavailable(_) => {
                "Error al cargar los datos del formulario".to_string()
            }
            AppError::Serialization(_) | AppError::Config(_) => {
                "Ocurrió un error inesperado".to_string()
            }
        }
    }

    /// Errores que obligan a volver a la pantalla de login
    pub fn is_auth_error(&self) -> bool {
        matches!(self, AppError::Unauthorized(_) | AppError::SessionMissing)
    }

    /// Construir el error a partir de una respuesta no exitosa
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let message = extract_error_message(body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .map(str::to_string)
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
        });

        match status {
            StatusCode::UNAUTHORIZED => AppError::Unauthorized(message),
            StatusCode::NOT_FOUND => AppError::NotFound(message),
            StatusCode::CONFLICT => AppError::Conflict(message),
            _ => AppError::Api { status, message },
        }
    }
}

/// Extraer el mensaje de error del body (`message`, `error` o texto plano)
fn extract_error_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(value) => ["message", "error"]
            .iter()
            .filter_map(|key| value.get(*key))
            .find_map(|field| match field {
                serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
                serde_json::Value::Array(items) => {
                    let joined: Vec<&str> = items.iter().filter_map(|i| i.as_str()).collect();
                    (!joined.is_empty()).then(|| joined.join(", "))
                }
                _ => None,
            }),
        // Texto plano (p.ej. páginas de error del proxy)
        Err(_) if !trimmed.starts_with('<') => Some(trimmed.to_string()),
        Err(_) => None,
    }
}

/// Función helper para crear errores de formulario
pub fn form_error(message: impl Into<String>) -> AppError {
    AppError::FormValidation(message.into())
}

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: &str) -> AppError {
    AppError::NotFound(format!("{} con id '{}' no encontrado", resource, id))
}
