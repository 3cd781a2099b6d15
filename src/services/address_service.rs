//! Servicio de direcciones
//!
//! Además del CRUD, registra cada reutilización de una dirección (la
//! frecuencia de uso ordena los selects), marca la principal y completa
//! coordenadas desde el geocodificador.

use serde_json::json;
use tracing::{debug, info};
use validator::Validate;

use super::geocoding_service::{Geocoder, GeocodingResult};
use crate::cache::{detail_key, entity_prefix, list_key, prefixes};
use crate::dto::{DireccionFilters, ListFilters, PaginatedResponse};
use crate::models::{Direccion, DireccionRequest, EntityId, OrigenDireccion};
use crate::state::AppContext;
use crate::utils::errors::AppResult;

#[derive(Clone)]
pub struct DireccionService {
    ctx: AppContext,
}

impl DireccionService {
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx }
    }

    pub async fn list(&self, filters: &DireccionFilters) -> AppResult<PaginatedResponse<Direccion>> {
        filters.validate()?;
        let tenant_id = self.ctx.tenant_id().await?;
        let query = filters.query_string();
        let key = list_key(prefixes::DIRECCIONES, &tenant_id, &query);

        self.ctx
            .cache
            .get_or_fetch(key, || self.ctx.gateway.get_with_query("/direcciones", &query))
            .await
    }

    pub async fn get(&self, id: EntityId) -> AppResult<Direccion> {
        let tenant_id = self.ctx.tenant_id().await?;
        let key = detail_key(prefixes::DIRECCIONES, &tenant_id, id);
        let path = format!("/direcciones/{}", id);

        self.ctx.cache.get_or_fetch(key, || self.ctx.gateway.get(&path)).await
    }

    pub async fn create(&self, request: &DireccionRequest) -> AppResult<Direccion> {
        request.validate()?;
        info!("📍 Creando dirección: {}", request.direccion);

        let direccion: Direccion = self.ctx.gateway.post("/direcciones", request).await?;
        self.invalidate().await;
        Ok(direccion)
    }

    pub async fn update(&self, id: EntityId, request: &DireccionRequest) -> AppResult<Direccion> {
        request.validate()?;
        info!("✏️ Actualizando dirección {}", id);

        let direccion: Direccion = self.ctx.gateway.put(&format!("/direcciones/{}", id), request).await?;
        self.invalidate().await;
        Ok(direccion)
    }

    /// Registrar que la dirección se reutilizó (incrementa la frecuencia)
    pub async fn register_use(&self, id: EntityId) -> AppResult<Direccion> {
        let direccion: Direccion = self
            .ctx
            .gateway
            .post(&format!("/direcciones/{}/uso", id), &json!({}))
            .await?;
        debug!("📈 Dirección {} usada {} veces", id, direccion.frecuencia_uso);
        self.invalidate().await;
        Ok(direccion)
    }

    pub async fn set_principal(&self, id: EntityId) -> AppResult<Direccion> {
        info!("⭐ Marcando dirección {} como principal", id);
        let direccion: Direccion = self
            .ctx
            .gateway
            .put(&format!("/direcciones/{}/principal", id), &json!({}))
            .await?;
        self.invalidate().await;
        Ok(direccion)
    }

    /// Completar las coordenadas del request con el geocodificador.
    /// Si el resultado no es válido el request queda sin cambios.
    pub async fn geocode_and_fill(
        &self,
        geocoder: &dyn Geocoder,
        request: &mut DireccionRequest,
    ) -> AppResult<GeocodingResult> {
        let result = geocoder.geocode(&request.direccion, request.comuna_id).await?;

        let mut candidate = request.clone();
        candidate.latitud = Some(result.latitud);
        candidate.longitud = Some(result.longitud);
        candidate.origen = OrigenDireccion::Api;
        candidate.validate()?;

        *request = candidate;
        Ok(result)
    }

    async fn invalidate(&self) {
        let removed = self.ctx.cache.clear_by_prefix(&entity_prefix(prefixes::DIRECCIONES)).await;
        debug!("🗑️ {} entradas de direcciones invalidadas", removed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EnvironmentConfig;
    use async_trait::async_trait;

    struct FixedGeocoder(f64, f64);

    #[async_trait]
    impl Geocoder for FixedGeocoder {
        async fn geocode(&self, direccion: &str, _comuna_id: Option<EntityId>) -> AppResult<GeocodingResult> {
            Ok(GeocodingResult {
                latitud: self.0,
                longitud: self.1,
                direccion_formateada: Some(direccion.to_uppercase()),
            })
        }
    }

    fn service() -> DireccionService {
        DireccionService::new(AppContext::new(EnvironmentConfig::default()).unwrap())
    }

    #[tokio::test]
    async fn test_geocode_and_fill_sets_coordinates_and_origin() {
        let mut request = DireccionRequest::manual("Av. Matta 123", Some(13101));
        service()
            .geocode_and_fill(&FixedGeocoder(-33.45, -70.66), &mut request)
            .await
            .unwrap();

        assert_eq!(request.latitud, Some(-33.45));
        assert_eq!(request.longitud, Some(-70.66));
        assert_eq!(request.origen, OrigenDireccion::Api);
    }

    #[tokio::test]
    async fn test_geocode_out_of_range_leaves_request_untouched() {
        let mut request = DireccionRequest::manual("Av. Matta 123", None);
        let result = service()
            .geocode_and_fill(&FixedGeocoder(95.0, -70.66), &mut request)
            .await;

        assert!(result.is_err());
        assert_eq!(request.latitud, None);
        assert_eq!(request.origen, OrigenDireccion::Manual);
    }

    #[tokio::test]
    async fn test_create_validates_before_sending() {
        let mut request = DireccionRequest::manual("Av. Matta 123", None);
        request.latitud = Some(-33.0);
        // sin sesión: si llegara a la red fallaría con SessionMissing
        let result = service().create(&request).await;
        assert!(matches!(result, Err(crate::utils::errors::AppError::Validation(_))));
    }
}
