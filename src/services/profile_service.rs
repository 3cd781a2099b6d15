//! Perfiles y asignación de roles
//!
//! La asignación se hace en bloque: se compara la selección con los roles
//! ya asignados y sólo se envían los conjuntos no vacíos.

use reqwest::Method;
use tracing::{debug, info, warn};

use crate::cache::{all_key, entity_prefix, list_key, prefixes};
use crate::dto::{ListFilters, PaginatedResponse, PerfilFilters};
use crate::models::profile::RolesBulkRequest;
use crate::models::{EntityId, Perfil, Rol, RoleAssignmentDiff};
use crate::state::AppContext;
use crate::utils::errors::{AppError, AppResult};

#[derive(Default)]
struct BulkResult {
    applied: usize,
    error: Option<AppError>,
}

#[derive(Clone)]
pub struct PerfilService {
    ctx: AppContext,
}

impl PerfilService {
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx }
    }

    /// Todos los perfiles del tenant (cacheado en `profiles:all:<tenant>`)
    pub async fn list(&self) -> AppResult<Vec<Perfil>> {
        let tenant_id = self.ctx.tenant_id().await?;
        let key = all_key(prefixes::PERFILES, &tenant_id);

        self.ctx.cache.get_or_fetch(key, || self.ctx.gateway.get("/perfiles")).await
    }

    pub async fn search(&self, filters: &PerfilFilters) -> AppResult<PaginatedResponse<Perfil>> {
        let tenant_id = self.ctx.tenant_id().await?;
        let query = filters.query_string();
        let key = list_key(prefixes::PERFILES, &tenant_id, &query);

        self.ctx
            .cache
            .get_or_fetch(key, || self.ctx.gateway.get_with_query("/perfiles", &query))
            .await
    }

    /// Catálogo de roles disponibles
    pub async fn roles(&self) -> AppResult<Vec<Rol>> {
        self.ctx.gateway.get("/roles").await
    }

    pub async fn assigned_roles(&self, perfil_id: EntityId) -> AppResult<Vec<EntityId>> {
        let roles: Vec<Rol> = self.ctx.gateway.get(&format!("/perfiles/{}/roles", perfil_id)).await?;
        Ok(roles.into_iter().map(|r| r.id).collect())
    }

    /// Aplicar la selección de roles al perfil
    pub async fn sync_roles(
        &self,
        perfil_id: EntityId,
        previous: &[EntityId],
        selected: &[EntityId],
    ) -> AppResult<RoleAssignmentDiff> {
        let diff = RoleAssignmentDiff::compute(previous, selected);
        if diff.is_empty() {
            debug!("🔁 Perfil {} sin cambios de roles", perfil_id);
            return Ok(diff);
        }

        let result = self.apply_diff(perfil_id, &diff).await;

        // Basta con que un bloque se haya aplicado para que el cache quede viejo
        if result.applied > 0 {
            self.ctx.cache.clear_by_prefix(&entity_prefix(prefixes::PERFILES)).await;
        }
        if let Some(e) = result.error {
            warn!(
                "⚠️ Sincronización de roles del perfil {} incompleta ({} bloques aplicados): {}",
                perfil_id, result.applied, e
            );
            return Err(e);
        }
        Ok(diff)
    }

    async fn apply_diff(&self, perfil_id: EntityId, diff: &RoleAssignmentDiff) -> BulkResult {
        let mut result = BulkResult::default();
        let steps = [("assign", &diff.to_assign), ("unassign", &diff.to_unassign)];

        for (action, rol_ids) in steps {
            if rol_ids.is_empty() {
                continue;
            }
            info!("🔗 {} roles {:?} en perfil {}", action, rol_ids, perfil_id);
            match self.bulk(perfil_id, action, rol_ids).await {
                Ok(()) => result.applied += 1,
                Err(e) => {
                    result.error = Some(e);
                    break;
                }
            }
        }
        result
    }

    async fn bulk(&self, perfil_id: EntityId, action: &str, rol_ids: &[EntityId]) -> AppResult<()> {
        let body = RolesBulkRequest {
            rol_ids: rol_ids.to_vec(),
        };
        self.ctx
            .gateway
            .send_no_content(Method::POST, &format!("/perfiles/{}/roles/{}", perfil_id, action), Some(&body))
            .await
    }
}
