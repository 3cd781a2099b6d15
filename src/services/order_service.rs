//! Servicio de órdenes de transporte
//!
//! Listados cacheados por tenant y filtros, detalle, alta, edición y
//! cancelación. Las órdenes nunca se eliminan: cancelar es un cambio de
//! estado. Toda escritura invalida el cache de órdenes.

use async_trait::async_trait;
use tracing::{debug, info};

use super::order_validation::{OrdenValidator, OtLookup, ValidationMode};
use crate::cache::{detail_key, entity_prefix, list_key, prefixes};
use crate::dto::api_response::ExistsResponse;
use crate::dto::{ListFilters, OrdenFilters, OrdenPayload, PaginatedResponse};
use crate::models::order::CambioEstadoRequest;
use crate::models::{EntityId, EstadoOrden, Orden};
use crate::state::AppContext;
use crate::utils::errors::{form_error, AppResult};

#[derive(Clone)]
pub struct OrdenService {
    ctx: AppContext,
}

impl OrdenService {
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx }
    }

    /// Validador ligado a este servicio para la unicidad del número OT
    pub fn validator(&self, mode: ValidationMode) -> OrdenValidator<'_, Self> {
        OrdenValidator::new(self, mode)
    }

    pub async fn list(&self, filters: &OrdenFilters) -> AppResult<PaginatedResponse<Orden>> {
        filters.validate()?;
        let tenant_id = self.ctx.tenant_id().await?;
        let query = filters.query_string();
        let key = list_key(prefixes::ORDENES, &tenant_id, &query);

        self.ctx
            .cache
            .get_or_fetch(key, || self.ctx.gateway.get_with_query("/ordenes", &query))
            .await
    }

    pub async fn get(&self, id: EntityId) -> AppResult<Orden> {
        let tenant_id = self.ctx.tenant_id().await?;
        let key = detail_key(prefixes::ORDENES, &tenant_id, id);
        let path = format!("/ordenes/{}", id);

        self.ctx.cache.get_or_fetch(key, || self.ctx.gateway.get(&path)).await
    }

    pub async fn create(&self, payload: &OrdenPayload) -> AppResult<Orden> {
        info!("📦 Creando orden {}", payload.numero_ot);
        let orden: Orden = self.ctx.gateway.post("/ordenes", payload).await?;
        self.invalidate().await;
        info!("✅ Orden creada: {} (id {})", orden.numero_ot, orden.id);
        Ok(orden)
    }

    pub async fn update(&self, id: EntityId, payload: &OrdenPayload) -> AppResult<Orden> {
        info!("✏️ Actualizando orden {}", id);
        let orden: Orden = self.ctx.gateway.put(&format!("/ordenes/{}", id), payload).await?;
        self.invalidate().await;
        Ok(orden)
    }

    /// Cancelar una orden; no aplica a órdenes ya entregadas o canceladas
    pub async fn cancel(&self, id: EntityId) -> AppResult<Orden> {
        // Estado fresco, no el cacheado
        let actual: Orden = self.ctx.gateway.get(&format!("/ordenes/{}", id)).await?;
        if actual.estado.is_terminal() {
            return Err(form_error(format!(
                "La orden {} está en estado {} y no puede cancelarse",
                actual.numero_ot,
                actual.estado.as_str()
            )));
        }

        info!("🚫 Cancelando orden {}", actual.numero_ot);
        let request = CambioEstadoRequest {
            estado: EstadoOrden::Cancelada,
        };
        let orden: Orden = self
            .ctx
            .gateway
            .put(&format!("/ordenes/{}/estado", id), &request)
            .await?;
        self.invalidate().await;
        Ok(orden)
    }

    pub async fn numero_ot_exists(&self, numero_ot: &str) -> AppResult<bool> {
        let query = format!("numeroOt={}", urlencoding::encode(numero_ot.trim()));
        let response: ExistsResponse = self.ctx.gateway.get_with_query("/ordenes/check-ot", &query).await?;
        debug!("🔍 Número OT '{}' existe: {}", numero_ot, response.exists);
        Ok(response.exists)
    }

    async fn invalidate(&self) {
        let removed = self.ctx.cache.clear_by_prefix(&entity_prefix(prefixes::ORDENES)).await;
        debug!("🗑️ {} entradas de órdenes invalidadas", removed);
    }
}

#[async_trait]
impl OtLookup for OrdenService {
    async fn numero_ot_exists(&self, numero_ot: &str) -> AppResult<bool> {
        OrdenService::numero_ot_exists(self, numero_ot).await
    }
}
