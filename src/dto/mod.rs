//! DTOs intercambiados con la API y con los formularios

pub mod api_response;
pub mod auth_dto;
pub mod filters;
pub mod order_form;

pub use api_response::PaginatedResponse;
pub use filters::{DireccionFilters, ListFilters, OrdenFilters, Pagination, PartyFilters, PerfilFilters};
pub use order_form::{OrdenFormState, OrdenPayload};
