//! Services module
//!
//! Este módulo contiene la lógica de negocio del back-office. Cada servicio
//! recibe el `AppContext` y encapsula las llamadas REST, el cache y las
//! validaciones de su entidad.

pub mod address_service;
pub mod auth_service;
pub mod geocoding_service;
pub mod geography_service;
pub mod order_service;
pub mod order_validation;
pub mod party_service;
pub mod profile_service;
pub mod reference_data;

pub use address_service::DireccionService;
pub use auth_service::AuthService;
pub use geocoding_service::{Geocoder, GeocodingResult, GeocodingService};
pub use geography_service::GeografiaService;
pub use order_service::OrdenService;
pub use order_validation::{ConfirmationKind, OrdenValidator, OtLookup, ValidationMode, ValidationOutcome};
pub use party_service::{
    CarrierResource, CarrierService, ClienteResource, ClienteService, ContactoResource, ContactoService,
    EmbarcadorResource, EmbarcadorService, PartyResource, PartyService,
};
pub use profile_service::PerfilService;
pub use reference_data::{FormOptionsState, OrderFormOptions, ReferenceDataLoader};
