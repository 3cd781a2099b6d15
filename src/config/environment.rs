//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno. Todas las variables son
//! opcionales y tienen un valor por defecto razonable para desarrollo.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::CacheConfig;
use crate::utils::errors::{AppError, AppResult};

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub api_base_url: String,
    pub request_timeout: Duration,
    pub cache: CacheConfig,
    pub search_debounce: Duration,
    pub default_page_size: u32,
    pub log_level: String,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            api_base_url: "http://localhost:3000/api".to_string(),
            request_timeout: Duration::from_secs(30),
            cache: CacheConfig::default(),
            search_debounce: Duration::from_millis(400),
            default_page_size: 10,
            log_level: "info".to_string(),
        }
    }
}

impl EnvironmentConfig {
    /// Cargar la configuración desde variables de entorno
    pub fn from_env() -> AppResult<Self> {
        let defaults = Self::default();

        Ok(Self {
            environment: env::var("ENVIRONMENT").unwrap_or(defaults.environment),
            api_base_url: env::var("API_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base_url),
            request_timeout: parse_var::<u64>("REQUEST_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            cache: CacheConfig {
                ttl: parse_var::<u64>("CACHE_TTL_SECS")?
                    .map(Duration::from_secs)
                    .unwrap_or(defaults.cache.ttl),
            },
            search_debounce: parse_var::<u64>("SEARCH_DEBOUNCE_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.search_debounce),
            default_page_size: parse_var::<u32>("DEFAULT_PAGE_SIZE")?
                .unwrap_or(defaults.default_page_size),
            log_level: env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

fn parse_var<T: FromStr>(name: &str) -> AppResult<Option<T>> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| AppError::Config(format!("{} debe ser un número válido (valor: '{}')", name, raw))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EnvironmentConfig::default();
        assert!(config.is_development());
        assert!(!config.is_production());
        assert_eq!(config.default_page_size, 10);
        assert!(config.search_debounce >= Duration::from_millis(300));
        assert!(config.search_debounce <= Duration::from_millis(500));
    }

    #[test]
    fn test_from_env_rejects_invalid_number() {
        env::set_var("DEFAULT_PAGE_SIZE", "diez");
        let result = EnvironmentConfig::from_env();
        env::remove_var("DEFAULT_PAGE_SIZE");
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
