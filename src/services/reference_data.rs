//! Datos de referencia del formulario de órdenes
//!
//! Clientes, direcciones, tipos de carga y tipos de servicio se piden en
//! paralelo. Si falla cualquiera, el formulario queda sin poder enviarse y
//! se muestra un único error genérico.

use tracing::{info, warn};

use super::address_service::DireccionService;
use super::party_service::ClienteService;
use crate::cache::{all_key, prefixes};
use crate::dto::filters::MAX_PAGE_SIZE;
use crate::dto::{DireccionFilters, PaginatedResponse, Pagination, PartyFilters};
use crate::models::{Cliente, Direccion, TipoCarga, TipoServicio};
use crate::state::AppContext;
use crate::utils::errors::{AppError, AppResult};

/// Opciones de los selects del formulario
#[derive(Debug, Clone, Default)]
pub struct OrderFormOptions {
    pub clientes: Vec<Cliente>,
    pub direcciones: Vec<Direccion>,
    pub tipos_carga: Vec<TipoCarga>,
    pub tipos_servicio: Vec<TipoServicio>,
}

#[derive(Debug, Clone)]
pub enum FormOptionsState {
    Loading,
    Ready(OrderFormOptions),
    Failed(String),
}

impl FormOptionsState {
    /// Sólo se habilita el envío con todas las opciones cargadas
    pub fn can_submit(&self) -> bool {
        matches!(self, FormOptionsState::Ready(_))
    }

    pub fn options(&self) -> Option<&OrderFormOptions> {
        match self {
            FormOptionsState::Ready(options) => Some(options),
            _ => None,
        }
    }
}

#[derive(Clone)]
pub struct ReferenceDataLoader {
    ctx: AppContext,
    clientes: ClienteService,
    direcciones: DireccionService,
}

impl ReferenceDataLoader {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            clientes: ClienteService::new(ctx.clone()),
            direcciones: DireccionService::new(ctx.clone()),
            ctx,
        }
    }

    pub async fn load_order_form_options(&self) -> AppResult<OrderFormOptions> {
        let pagination = Pagination::with_limit(MAX_PAGE_SIZE)?;
        let clientes_filter = PartyFilters {
            activo: Some(true),
            pagination,
            ..Default::default()
        };
        let direcciones_filter = DireccionFilters {
            pagination,
            ..Default::default()
        };

        let loaded = tokio::try_join!(
            self.clientes.list(&clientes_filter),
            self.direcciones.list(&direcciones_filter),
            self.tipos_carga(),
            self.tipos_servicio(),
        );

        match loaded {
            Ok((clientes, direcciones, tipos_carga, tipos_servicio)) => {
                warn_if_truncated("clientes", &clientes);
                warn_if_truncated("direcciones", &direcciones);
                info!(
                    "✅ Opciones de orden cargadas: {} clientes, {} direcciones",
                    clientes.data.len(),
                    direcciones.data.len()
                );
                Ok(OrderFormOptions {
                    clientes: clientes.data,
                    direcciones: direcciones.data,
                    tipos_carga,
                    tipos_servicio,
                })
            }
            // La sesión caída se propaga tal cual para el manejo global
            Err(e) if e.is_auth_error() => Err(e),
            Err(e) => {
                warn!("⚠️ Falló la carga de datos de referencia: {}", e);
                Err(AppError::ReferenceDataUnavailable(e.to_string()))
            }
        }
    }

    /// Lo mismo como estado para la pantalla
    pub async fn load_state(&self) -> FormOptionsState {
        match self.load_order_form_options().await {
            Ok(options) => FormOptionsState::Ready(options),
            Err(e) => FormOptionsState::Failed(e.user_message()),
        }
    }

    async fn tipos_carga(&self) -> AppResult<Vec<TipoCarga>> {
        let key = format!("{}:tipos-carga", all_key(prefixes::REFERENCIAS, &self.ctx.tenant_id().await?));
        self.ctx.cache.get_or_fetch(key, || self.ctx.gateway.get("/tipos-carga")).await
    }

    async fn tipos_servicio(&self) -> AppResult<Vec<TipoServicio>> {
        let key = format!("{}:tipos-servicio", all_key(prefixes::REFERENCIAS, &self.ctx.tenant_id().await?));
        self.ctx.cache.get_or_fetch(key, || self.ctx.gateway.get("/tipos-servicio")).await
    }
}

/// Los selects sólo muestran la primera página
fn warn_if_truncated<T>(label: &str, page: &PaginatedResponse<T>) {
    if page.has_next() {
        warn!(
            "⚠️ Select de {} truncado: se muestran {} de {} registros",
            label,
            page.data.len(),
            page.total
        );
    }
}
