//! Consultas de listados
//!
//! Este módulo une los filtros tipados con el gateway: búsqueda con
//! debounce, paginación y descarte explícito de respuestas obsoletas.

pub mod debounce;
pub mod list_query;

pub use debounce::Debouncer;
pub use list_query::{FetchTicket, ListQuery, ListState};
