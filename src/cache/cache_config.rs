//! Configuración de cache
//!
//! Este módulo contiene la configuración para el cache en memoria y los
//! prefijos de clave de cada entidad.

use std::time::Duration;

/// Configuración del cache
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(300), // 5 minutos
        }
    }
}

/// Prefijos de clave por entidad, usados para invalidar después de escribir
pub mod prefixes {
    pub const ORDENES: &str = "ordenes";
    pub const CLIENTES: &str = "clientes";
    pub const CONTACTOS: &str = "contactos";
    pub const EMBARCADORES: &str = "embarcadores";
    pub const CARRIERS: &str = "carriers";
    pub const DIRECCIONES: &str = "direcciones";
    pub const PERFILES: &str = "profiles";
    pub const GEOGRAFIA: &str = "geografia";
    pub const REFERENCIAS: &str = "referencias";
}

/// Clave de listado: `<prefix>:list:<tenant>:<query>`
pub fn list_key(prefix: &str, tenant_id: &str, query: &str) -> String {
    format!("{}:list:{}:{}", prefix, tenant_id, query)
}

/// Clave de colección completa: `<prefix>:all:<tenant>`
pub fn all_key(prefix: &str, tenant_id: &str) -> String {
    format!("{}:all:{}", prefix, tenant_id)
}

/// Clave de detalle: `<prefix>:detail:<tenant>:<id>`
pub fn detail_key(prefix: &str, tenant_id: &str, id: impl std::fmt::Display) -> String {
    format!("{}:detail:{}:{}", prefix, tenant_id, id)
}

/// Prefijo para invalidar todas las claves de una entidad
pub fn entity_prefix(prefix: &str) -> String {
    format!("{}:", prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_shapes() {
        assert_eq!(all_key(prefixes::PERFILES, "t1"), "profiles:all:t1");
        assert_eq!(
            list_key(prefixes::CLIENTES, "t1", "search=acme&page=1&limit=10"),
            "clientes:list:t1:search=acme&page=1&limit=10"
        );
        assert_eq!(detail_key(prefixes::ORDENES, "t1", 7), "ordenes:detail:t1:7");
        assert_eq!(entity_prefix(prefixes::ORDENES), "ordenes:");
    }
}
