//! Geocodificación de direcciones
//!
//! El geocodificador es un colaborador externo expuesto por la API
//! (`GET /geocoding`). Se modela como trait para poder sustituirlo en
//! tests o por otro proveedor.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::clients::ApiGateway;
use crate::dto::filters::build_query_string;
use crate::models::EntityId;
use crate::utils::errors::{form_error, AppResult};
use crate::utils::validation::{validate_coordinates, validate_not_empty};

const BATCH_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeocodingResult {
    pub latitud: f64,
    pub longitud: f64,
    pub direccion_formateada: Option<String>,
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, direccion: &str, comuna_id: Option<EntityId>) -> AppResult<GeocodingResult>;
}

/// Geocodificador respaldado por la API REST
#[derive(Clone)]
pub struct GeocodingService {
    gateway: ApiGateway,
}

impl GeocodingService {
    pub fn new(gateway: ApiGateway) -> Self {
        Self { gateway }
    }

    /// Geocodificar varias direcciones, en lotes paralelos de 10
    pub async fn batch_geocode(&self, direcciones: Vec<(String, Option<EntityId>)>) -> Vec<AppResult<GeocodingResult>> {
        info!("🗺️ Geocodificando {} direcciones", direcciones.len());
        let mut results = Vec::with_capacity(direcciones.len());

        for chunk in direcciones.chunks(BATCH_SIZE) {
            let pending = chunk
                .iter()
                .map(|(direccion, comuna_id)| self.geocode(direccion, *comuna_id));

            for result in futures::future::join_all(pending).await {
                if let Err(e) = &result {
                    error!("❌ Error de geocodificación en lote: {}", e);
                }
                results.push(result);
            }
        }

        info!("✅ Geocodificación en lote completada: {} resultados", results.len());
        results
    }
}

#[async_trait]
impl Geocoder for GeocodingService {
    async fn geocode(&self, direccion: &str, comuna_id: Option<EntityId>) -> AppResult<GeocodingResult> {
        validate_not_empty(direccion).map_err(|_| form_error("La dirección a geocodificar está vacía"))?;
        info!("🗺️ Geocodificando: {}", direccion.trim());

        let mut pairs = vec![("direccion", direccion.trim().to_string())];
        if let Some(comuna_id) = comuna_id {
            pairs.push(("comunaId", comuna_id.to_string()));
        }

        let result: GeocodingResult = self
            .gateway
            .get_with_query("/geocoding", &build_query_string(&pairs))
            .await?;

        if validate_coordinates(result.latitud, result.longitud).is_err() {
            warn!(
                "⚠️ Coordenadas fuera de rango para '{}': ({}, {})",
                direccion, result.latitud, result.longitud
            );
            return Err(form_error("El geocodificador devolvió coordenadas fuera de rango"));
        }

        info!("✅ {} -> ({}, {})", direccion.trim(), result.latitud, result.longitud);
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_result_wire_format() {
        let result: GeocodingResult = serde_json::from_value(json!({
            "latitud": -33.45,
            "longitud": -70.66,
            "direccionFormateada": "Av. Matta 123, Santiago"
        }))
        .unwrap();
        assert_eq!(result.direccion_formateada.as_deref(), Some("Av. Matta 123, Santiago"));
    }
}
