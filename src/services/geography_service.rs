//! Catálogo geográfico Región / Provincia / Comuna
//!
//! Se carga una vez por tenant y queda en cache; la aplicación nunca lo
//! modifica.

use tracing::info;

use crate::cache::{all_key, prefixes};
use crate::models::{Comuna, EntityId, GeografiaCatalog, Provincia, Region};
use crate::state::AppContext;
use crate::utils::errors::{not_found_error, AppResult};

#[derive(Clone)]
pub struct GeografiaService {
    ctx: AppContext,
}

impl GeografiaService {
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx }
    }

    pub async fn catalog(&self) -> AppResult<GeografiaCatalog> {
        let tenant_id = self.ctx.tenant_id().await?;
        let base = all_key(prefixes::GEOGRAFIA, &tenant_id);
        let cache = &self.ctx.cache;
        let gateway = &self.ctx.gateway;

        let (regiones, provincias, comunas): (Vec<Region>, Vec<Provincia>, Vec<Comuna>) = tokio::try_join!(
            cache.get_or_fetch(format!("{}:regiones", base), || gateway.get("/regiones")),
            cache.get_or_fetch(format!("{}:provincias", base), || gateway.get("/provincias")),
            cache.get_or_fetch(format!("{}:comunas", base), || gateway.get("/comunas")),
        )?;

        info!(
            "🗺️ Catálogo geográfico: {} regiones, {} provincias, {} comunas",
            regiones.len(),
            provincias.len(),
            comunas.len()
        );
        Ok(GeografiaCatalog::new(regiones, provincias, comunas))
    }

    /// Etiqueta "Comuna, Provincia, Región" para mostrar en la ficha de una dirección
    pub async fn comuna_label(&self, comuna_id: EntityId) -> AppResult<String> {
        self.catalog()
            .await?
            .display_label(comuna_id)
            .ok_or_else(|| not_found_error("Comuna", &comuna_id.to_string()))
    }
}
