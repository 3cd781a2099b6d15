//! Servicio genérico de partes (clientes, contactos, embarcadores, carriers)
//!
//! Las cuatro entidades comparten el mismo contrato REST; cada una se
//! describe con un `PartyResource` (ruta, prefijo de cache, tipos). El RUT
//! se normaliza y el request se valida antes de enviarse. DELETE desactiva
//! en el backend; no hay borrado físico.

use std::marker::PhantomData;

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};
use validator::Validate;

use crate::cache::{detail_key, entity_prefix, list_key, prefixes};
use crate::dto::{ListFilters, PaginatedResponse, PartyFilters};
use crate::models::party::ActivacionRequest;
use crate::models::{Carrier, Cliente, Contacto, ContactoRequest, Embarcador, EntityId, PartyRequest};
use crate::state::AppContext;
use crate::utils::errors::AppResult;
use crate::utils::rut::NormalizeRut;

/// Descripción de una entidad de tipo parte
pub trait PartyResource: Send + Sync + 'static {
    type Entity: Serialize + DeserializeOwned + Clone + Send + Sync;
    type Request: Serialize + Validate + NormalizeRut + Clone + Send + Sync;

    /// Ruta base en la API (`/clientes`)
    const PATH: &'static str;
    const CACHE_PREFIX: &'static str;
    /// Nombre para logs
    const LABEL: &'static str;
}

pub struct ClienteResource;
pub struct ContactoResource;
pub struct EmbarcadorResource;
pub struct CarrierResource;

impl PartyResource for ClienteResource {
    type Entity = Cliente;
    type Request = PartyRequest;
    const PATH: &'static str = "/clientes";
    const CACHE_PREFIX: &'static str = prefixes::CLIENTES;
    const LABEL: &'static str = "cliente";
}

impl PartyResource for ContactoResource {
    type Entity = Contacto;
    type Request = ContactoRequest;
    const PATH: &'static str = "/contactos";
    const CACHE_PREFIX: &'static str = prefixes::CONTACTOS;
    const LABEL: &'static str = "contacto";
}

impl PartyResource for EmbarcadorResource {
    type Entity = Embarcador;
    type Request = PartyRequest;
    const PATH: &'static str = "/embarcadores";
    const CACHE_PREFIX: &'static str = prefixes::EMBARCADORES;
    const LABEL: &'static str = "embarcador";
}

impl PartyResource for CarrierResource {
    type Entity = Carrier;
    type Request = PartyRequest;
    const PATH: &'static str = "/carriers";
    const CACHE_PREFIX: &'static str = prefixes::CARRIERS;
    const LABEL: &'static str = "carrier";
}

pub type ClienteService = PartyService<ClienteResource>;
pub type ContactoService = PartyService<ContactoResource>;
pub type EmbarcadorService = PartyService<EmbarcadorResource>;
pub type CarrierService = PartyService<CarrierResource>;

pub struct PartyService<R: PartyResource> {
    ctx: AppContext,
    _resource: PhantomData<R>,
}

impl<R: PartyResource> Clone for PartyService<R> {
    fn clone(&self) -> Self {
        Self::new(self.ctx.clone())
    }
}

impl<R: PartyResource> PartyService<R> {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            _resource: PhantomData,
        }
    }

    pub async fn list(&self, filters: &PartyFilters) -> AppResult<PaginatedResponse<R::Entity>> {
        filters.validate()?;
        let tenant_id = self.ctx.tenant_id().await?;
        let query = filters.query_string();
        let key = list_key(R::CACHE_PREFIX, &tenant_id, &query);

        self.ctx
            .cache
            .get_or_fetch(key, || self.ctx.gateway.get_with_query(R::PATH, &query))
            .await
    }

    pub async fn get(&self, id: EntityId) -> AppResult<R::Entity> {
        let tenant_id = self.ctx.tenant_id().await?;
        let key = detail_key(R::CACHE_PREFIX, &tenant_id, id);
        let path = Self::item_path(id);

        self.ctx.cache.get_or_fetch(key, || self.ctx.gateway.get(&path)).await
    }

    pub async fn create(&self, request: R::Request) -> AppResult<R::Entity> {
        let request = Self::prepare(request)?;
        info!("➕ Creando {}", R::LABEL);

        let created: R::Entity = self.ctx.gateway.post(R::PATH, &request).await?;
        self.invalidate().await;
        Ok(created)
    }

    pub async fn update(&self, id: EntityId, request: R::Request) -> AppResult<R::Entity> {
        let request = Self::prepare(request)?;
        info!("✏️ Actualizando {} {}", R::LABEL, id);

        let updated: R::Entity = self.ctx.gateway.put(&Self::item_path(id), &request).await?;
        self.invalidate().await;
        Ok(updated)
    }

    /// Desactivación lógica (`activo = false`)
    pub async fn deactivate(&self, id: EntityId) -> AppResult<()> {
        info!("⏸️ Desactivando {} {}", R::LABEL, id);
        self.ctx
            .gateway
            .send_no_content(Method::DELETE, &Self::item_path(id), None::<&()>)
            .await?;
        self.invalidate().await;
        Ok(())
    }

    pub async fn reactivate(&self, id: EntityId) -> AppResult<R::Entity> {
        info!("▶️ Reactivando {} {}", R::LABEL, id);
        let reactivated: R::Entity = self
            .ctx
            .gateway
            .put(&Self::item_path(id), &ActivacionRequest { activo: true })
            .await?;
        self.invalidate().await;
        Ok(reactivated)
    }

    /// Normalizar el RUT y validar el request
    fn prepare(mut request: R::Request) -> AppResult<R::Request> {
        request.normalize_rut();
        request.validate()?;
        Ok(request)
    }

    fn item_path(id: EntityId) -> String {
        format!("{}/{}", R::PATH, id)
    }

    async fn invalidate(&self) {
        let removed = self.ctx.cache.clear_by_prefix(&entity_prefix(R::CACHE_PREFIX)).await;
        debug!("🗑️ {} entradas de {} invalidadas", removed, R::LABEL);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::errors::AppError;

    #[test]
    fn test_prepare_normalizes_rut() {
        let request = PartyRequest {
            rut: "12.345.678-9".to_string(),
            nombre: "Acme SpA".to_string(),
            ..Default::default()
        };
        let prepared = ClienteService::prepare(request).unwrap();
        assert_eq!(prepared.rut, "12345678-9");
    }

    #[test]
    fn test_prepare_rejects_invalid_request() {
        let request = ContactoRequest {
            rut: "123".to_string(),
            nombre: "A".to_string(),
            ..Default::default()
        };
        assert!(matches!(ContactoService::prepare(request), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_resource_paths() {
        assert_eq!(ClienteService::item_path(7), "/clientes/7");
        assert_eq!(EmbarcadorService::item_path(2), "/embarcadores/2");
        assert_eq!(CarrierService::item_path(3), "/carriers/3");
        assert_eq!(ContactoResource::CACHE_PREFIX, "contactos");
    }
}
