//! Estado de un listado paginado
//!
//! Cada fetch recibe un ticket con una generación creciente. Al completar,
//! sólo se aplica el resultado del ticket más reciente; los demás se
//! descartan aunque lleguen después.

use std::future::Future;

use tracing::{debug, warn};

use crate::dto::{ListFilters, PaginatedResponse};
use crate::utils::errors::AppResult;

/// Triple loading / error / data que consume la pantalla
#[derive(Debug, Clone)]
pub struct ListState<T> {
    pub loading: bool,
    pub error: Option<String>,
    pub data: Option<PaginatedResponse<T>>,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self {
            loading: false,
            error: None,
            data: None,
        }
    }
}

/// Fetch en curso con los filtros que lo originaron
#[derive(Debug, Clone)]
pub struct FetchTicket<F> {
    generation: u64,
    filters: F,
}

impl<F> FetchTicket<F> {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn filters(&self) -> &F {
        &self.filters
    }
}

pub struct ListQuery<F: ListFilters, T> {
    filters: F,
    generation: u64,
    state: ListState<T>,
}

impl<F: ListFilters, T> ListQuery<F, T> {
    pub fn new(filters: F) -> Self {
        Self {
            filters,
            generation: 0,
            state: ListState::default(),
        }
    }

    pub fn filters(&self) -> &F {
        &self.filters
    }

    pub fn state(&self) -> &ListState<T> {
        &self.state
    }

    /// Modificar filtros; cualquier cambio vuelve a la página 1
    pub fn update_filters(&mut self, update: impl FnOnce(&mut F)) {
        update(&mut self.filters);
        self.filters.pagination_mut().reset();
    }

    /// Texto de búsqueda ya pasado por el debounce
    pub fn set_search(&mut self, search: Option<String>) {
        self.update_filters(|filters| filters.set_search(search));
    }

    pub fn set_page(&mut self, page: u32) {
        self.filters.pagination_mut().set_page(page);
    }

    pub fn begin_fetch(&mut self) -> FetchTicket<F> {
        self.generation += 1;
        self.state.loading = true;
        FetchTicket {
            generation: self.generation,
            filters: self.filters.clone(),
        }
    }

    /// Aplicar el resultado; `false` si el ticket quedó obsoleto
    pub fn complete(&mut self, ticket: FetchTicket<F>, result: AppResult<PaginatedResponse<T>>) -> bool {
        if ticket.generation != self.generation {
            debug!(
                "⏭️ Respuesta obsoleta descartada (generación {} < {})",
                ticket.generation, self.generation
            );
            return false;
        }

        self.state.loading = false;
        match result {
            Ok(page) => {
                self.state.data = Some(page);
                self.state.error = None;
            }
            Err(e) => {
                warn!("⚠️ Error al cargar listado: {}", e);
                self.state.error = Some(e.user_message());
            }
        }
        true
    }

    /// Fetch completo: filtros validados, llamada y aplicación del resultado.
    ///
    /// `run` retiene `&mut self` durante la espera, así que dos `run` sobre la
    /// misma consulta nunca se solapan. Si la pantalla dispara fetches en
    /// paralelo (búsqueda mientras se escribe) debe usar `begin_fetch`, soltar
    /// el lock durante la llamada y aplicar con `complete`.
    pub async fn run<Fut>(&mut self, fetcher: impl FnOnce(F) -> Fut) -> bool
    where
        Fut: Future<Output = AppResult<PaginatedResponse<T>>>,
    {
        let ticket = self.begin_fetch();
        let result = match ticket.filters.validate() {
            Ok(()) => fetcher(ticket.filters.clone()).await,
            Err(e) => Err(e),
        };
        self.complete(ticket, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dto::{OrdenFilters, PartyFilters};
    use crate::utils::errors::AppError;
    use chrono::NaiveDate;

    fn page_of(items: Vec<&str>, page: u32) -> PaginatedResponse<String> {
        PaginatedResponse {
            total: items.len() as u64,
            data: items.into_iter().map(String::from).collect(),
            page,
            limit: 10,
            total_pages: 1,
        }
    }

    #[test]
    fn test_filter_change_resets_page() {
        let mut query: ListQuery<PartyFilters, String> = ListQuery::new(PartyFilters::default());
        query.set_page(4);
        assert_eq!(query.filters().pagination().page(), 4);

        query.update_filters(|f| f.activo = Some(false));
        assert_eq!(query.filters().pagination().page(), 1);

        query.set_page(3);
        query.set_search(Some("acme".to_string()));
        assert_eq!(query.filters().pagination().page(), 1);
        assert_eq!(query.filters().search.as_deref(), Some("acme"));
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let mut query: ListQuery<PartyFilters, String> = ListQuery::new(PartyFilters::default());

        let old = query.begin_fetch();
        query.set_search(Some("acme".to_string()));
        let latest = query.begin_fetch();
        assert_eq!(latest.filters().search.as_deref(), Some("acme"));

        assert!(query.complete(latest, Ok(page_of(vec!["Acme SpA"], 1))));
        assert!(!query.complete(old, Ok(page_of(vec!["Viejo"], 1))));

        let data = query.state().data.as_ref().unwrap();
        assert_eq!(data.data, vec!["Acme SpA".to_string()]);
        assert!(!query.state().loading);
    }

    #[test]
    fn test_loading_until_latest_completes() {
        let mut query: ListQuery<PartyFilters, String> = ListQuery::new(PartyFilters::default());
        let first = query.begin_fetch();
        let _second = query.begin_fetch();

        query.complete(first, Ok(page_of(vec![], 1)));
        assert!(query.state().loading);
        assert!(query.state().data.is_none());
    }

    #[test]
    fn test_error_keeps_previous_data() {
        let mut query: ListQuery<PartyFilters, String> = ListQuery::new(PartyFilters::default());
        let ticket = query.begin_fetch();
        query.complete(ticket, Ok(page_of(vec!["Acme"], 1)));

        let ticket = query.begin_fetch();
        query.complete(ticket, Err(AppError::NotFound("caída".to_string())));

        assert!(query.state().error.is_some());
        assert!(query.state().data.is_some());
    }

    #[tokio::test]
    async fn test_run_passes_current_filters() {
        let mut query: ListQuery<PartyFilters, String> = ListQuery::new(PartyFilters::default());
        query.set_search(Some("acme".to_string()));

        let applied = query
            .run(|filters| async move {
                assert_eq!(filters.query_string(), "search=acme&page=1&limit=10");
                Ok(page_of(vec!["Acme"], 1))
            })
            .await;

        assert!(applied);
        assert_eq!(query.state().data.as_ref().unwrap().total, 1);
    }

    #[tokio::test]
    async fn test_run_rejects_invalid_filters_without_fetching() {
        let mut query: ListQuery<OrdenFilters, String> = ListQuery::new(OrdenFilters::default());
        query.update_filters(|f| {
            f.fecha_desde = NaiveDate::from_ymd_opt(2024, 5, 1);
            f.fecha_hasta = NaiveDate::from_ymd_opt(2024, 4, 1);
        });

        let mut fetched = false;
        let applied = query
            .run(|_| {
                fetched = true;
                async { Ok(page_of(vec![], 1)) }
            })
            .await;

        assert!(applied);
        assert!(!fetched);
        assert!(query.state().error.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_fetches_keep_latest_result() {
        use std::sync::Arc;
        use std::time::Duration;
        use tokio::sync::Mutex;

        let query = Arc::new(Mutex::new(ListQuery::<PartyFilters, String>::new(PartyFilters::default())));

        // Cada búsqueda toma el ticket con el lock y lo suelta durante la llamada
        let search = |text: &'static str, delay_ms: u64| {
            let query = query.clone();
            tokio::spawn(async move {
                let ticket = {
                    let mut query = query.lock().await;
                    query.set_search(Some(text.to_string()));
                    query.begin_fetch()
                };
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                let result = Ok(page_of(vec![text], 1));
                query.lock().await.complete(ticket, result)
            })
        };

        let lenta = search("ac", 300);
        tokio::time::sleep(Duration::from_millis(10)).await;
        let rapida = search("acme", 50);

        assert!(rapida.await.unwrap());
        assert!(!lenta.await.unwrap());

        let query = query.lock().await;
        assert_eq!(query.state().data.as_ref().unwrap().data, vec!["acme".to_string()]);
        assert_eq!(query.filters().search.as_deref(), Some("acme"));
    }
}
