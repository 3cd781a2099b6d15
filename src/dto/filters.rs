//! Filtros tipados de los listados
//!
//! Cada filtro emite sólo los parámetros definidos, en un orden fijo
//! (búsqueda primero, paginación al final). El query string resultante
//! también se usa como parte de la clave de cache.

use chrono::NaiveDate;

use crate::models::{EntityId, EstadoOrden, OrigenDireccion};
use crate::utils::errors::{form_error, AppResult};

pub const MAX_PAGE_SIZE: u32 = 100;

/// Página actual y tamaño de página
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: u32,
    limit: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self { page: 1, limit: 10 }
    }
}

impl Pagination {
    pub fn new(page: u32, limit: u32) -> AppResult<Self> {
        if page == 0 {
            return Err(form_error("La página debe ser mayor o igual a 1"));
        }
        if limit == 0 || limit > MAX_PAGE_SIZE {
            return Err(form_error(format!(
                "El tamaño de página debe estar entre 1 y {}",
                MAX_PAGE_SIZE
            )));
        }
        Ok(Self { page, limit })
    }

    pub fn with_limit(limit: u32) -> AppResult<Self> {
        Self::new(1, limit)
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    pub fn reset(&mut self) {
        self.page = 1;
    }

    fn push_pairs(&self, pairs: &mut Vec<(&'static str, String)>) {
        pairs.push(("page", self.page.to_string()));
        pairs.push(("limit", self.limit.to_string()));
    }
}

/// Comportamiento común de los filtros de listado
pub trait ListFilters: Clone + Send + Sync + 'static {
    /// Pares clave/valor definidos, en orden estable
    fn to_query_pairs(&self) -> Vec<(&'static str, String)>;

    fn pagination(&self) -> &Pagination;

    fn pagination_mut(&mut self) -> &mut Pagination;

    fn set_search(&mut self, search: Option<String>);

    /// Validación de coherencia antes de consultar
    fn validate(&self) -> AppResult<()> {
        Ok(())
    }

    fn query_string(&self) -> String {
        build_query_string(&self.to_query_pairs())
    }
}

/// Unir pares en `k=v&k2=v2` con valores codificados
pub fn build_query_string(pairs: &[(&'static str, String)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Texto de búsqueda: vacío o sólo espacios equivale a no definido
fn clean_search(search: Option<String>) -> Option<String> {
    search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn push_opt<T: ToString>(pairs: &mut Vec<(&'static str, String)>, key: &'static str, value: &Option<T>) {
    if let Some(value) = value {
        pairs.push((key, value.to_string()));
    }
}

/// Filtros para clientes, contactos, embarcadores y carriers
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartyFilters {
    pub search: Option<String>,
    pub activo: Option<bool>,
    pub comuna_id: Option<EntityId>,
    pub pagination: Pagination,
}

impl ListFilters for PartyFilters {
    fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_opt(&mut pairs, "search", &self.search);
        push_opt(&mut pairs, "activo", &self.activo);
        push_opt(&mut pairs, "comunaId", &self.comuna_id);
        self.pagination.push_pairs(&mut pairs);
        pairs
    }

    fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    fn pagination_mut(&mut self) -> &mut Pagination {
        &mut self.pagination
    }

    fn set_search(&mut self, search: Option<String>) {
        self.search = clean_search(search);
    }
}

/// Filtros del listado de órdenes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrdenFilters {
    pub search: Option<String>,
    pub estado: Option<EstadoOrden>,
    pub cliente_id: Option<EntityId>,
    pub fecha_desde: Option<NaiveDate>,
    pub fecha_hasta: Option<NaiveDate>,
    pub tipo_carga_id: Option<EntityId>,
    pub tipo_servicio_id: Option<EntityId>,
    pub remitente_id: Option<EntityId>,
    pub destinatario_id: Option<EntityId>,
    pub pagination: Pagination,
}

impl OrdenFilters {
    /// Fijar el rango de fechas verificando su orden
    pub fn with_date_range(mut self, desde: Option<NaiveDate>, hasta: Option<NaiveDate>) -> AppResult<Self> {
        self.fecha_desde = desde;
        self.fecha_hasta = hasta;
        ListFilters::validate(&self)?;
        Ok(self)
    }
}

impl ListFilters for OrdenFilters {
    fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_opt(&mut pairs, "search", &self.search);
        push_opt(&mut pairs, "estado", &self.estado.map(|e| e.as_str()));
        push_opt(&mut pairs, "clienteId", &self.cliente_id);
        push_opt(&mut pairs, "fechaDesde", &self.fecha_desde.map(|d| d.format("%Y-%m-%d")));
        push_opt(&mut pairs, "fechaHasta", &self.fecha_hasta.map(|d| d.format("%Y-%m-%d")));
        push_opt(&mut pairs, "tipoCargaId", &self.tipo_carga_id);
        push_opt(&mut pairs, "tipoServicioId", &self.tipo_servicio_id);
        push_opt(&mut pairs, "remitenteId", &self.remitente_id);
        push_opt(&mut pairs, "destinatarioId", &self.destinatario_id);
        self.pagination.push_pairs(&mut pairs);
        pairs
    }

    fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    fn pagination_mut(&mut self) -> &mut Pagination {
        &mut self.pagination
    }

    fn set_search(&mut self, search: Option<String>) {
        self.search = clean_search(search);
    }

    fn validate(&self) -> AppResult<()> {
        if let (Some(desde), Some(hasta)) = (self.fecha_desde, self.fecha_hasta) {
            if desde > hasta {
                return Err(form_error("La fecha desde no puede ser posterior a la fecha hasta"));
            }
        }
        Ok(())
    }
}

/// Filtros del listado de direcciones
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DireccionFilters {
    pub search: Option<String>,
    pub comuna_id: Option<EntityId>,
    pub cliente_id: Option<EntityId>,
    pub origen: Option<OrigenDireccion>,
    pub principal: Option<bool>,
    pub pagination: Pagination,
}

impl ListFilters for DireccionFilters {
    fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_opt(&mut pairs, "search", &self.search);
        push_opt(&mut pairs, "comunaId", &self.comuna_id);
        push_opt(&mut pairs, "clienteId", &self.cliente_id);
        push_opt(&mut pairs, "origen", &self.origen.map(|o| o.as_str()));
        push_opt(&mut pairs, "esPrincipal", &self.principal);
        self.pagination.push_pairs(&mut pairs);
        pairs
    }

    fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    fn pagination_mut(&mut self) -> &mut Pagination {
        &mut self.pagination
    }

    fn set_search(&mut self, search: Option<String>) {
        self.search = clean_search(search);
    }
}

/// Filtros del listado de perfiles
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerfilFilters {
    pub search: Option<String>,
    pub activo: Option<bool>,
    pub pagination: Pagination,
}

impl ListFilters for PerfilFilters {
    fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        push_opt(&mut pairs, "search", &self.search);
        push_opt(&mut pairs, "activo", &self.activo);
        self.pagination.push_pairs(&mut pairs);
        pairs
    }

    fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    fn pagination_mut(&mut self) -> &mut Pagination {
        &mut self.pagination
    }

    fn set_search(&mut self, search: Option<String>) {
        self.search = clean_search(search);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_filter_query_string() {
        let filters = PartyFilters {
            search: Some("acme".to_string()),
            activo: Some(true),
            comuna_id: None,
            pagination: Pagination::new(1, 10).unwrap(),
        };
        assert_eq!(filters.query_string(), "search=acme&activo=true&page=1&limit=10");
    }

    #[test]
    fn test_undefined_fields_are_omitted() {
        let filters = OrdenFilters::default();
        assert_eq!(filters.query_string(), "page=1&limit=10");
    }

    #[test]
    fn test_orden_filters_full_order() {
        let filters = OrdenFilters {
            search: Some("OT 55".to_string()),
            estado: Some(EstadoOrden::EnTransporte),
            cliente_id: Some(3),
            fecha_desde: NaiveDate::from_ymd_opt(2024, 1, 1),
            fecha_hasta: NaiveDate::from_ymd_opt(2024, 1, 31),
            tipo_carga_id: Some(4),
            tipo_servicio_id: Some(5),
            remitente_id: Some(6),
            destinatario_id: Some(7),
            pagination: Pagination::new(2, 20).unwrap(),
        };
        assert_eq!(
            filters.query_string(),
            "search=OT%2055&estado=EN_TRANSPORTE&clienteId=3&fechaDesde=2024-01-01&fechaHasta=2024-01-31\
             &tipoCargaId=4&tipoServicioId=5&remitenteId=6&destinatarioId=7&page=2&limit=20"
        );
    }

    #[test]
    fn test_blank_search_is_undefined() {
        let mut filters = PartyFilters::default();
        filters.set_search(Some("   ".to_string()));
        assert_eq!(filters.search, None);
        filters.set_search(Some("  acme ".to_string()));
        assert_eq!(filters.search.as_deref(), Some("acme"));
    }

    #[test]
    fn test_invalid_date_range() {
        let result = OrdenFilters::default().with_date_range(
            NaiveDate::from_ymd_opt(2024, 2, 1),
            NaiveDate::from_ymd_opt(2024, 1, 1),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_pagination_bounds() {
        assert!(Pagination::new(0, 10).is_err());
        assert!(Pagination::new(1, 0).is_err());
        assert!(Pagination::new(1, MAX_PAGE_SIZE + 1).is_err());
        assert!(Pagination::with_limit(25).is_ok());
    }
}
