//! Modelos del sistema
//!
//! Este módulo contiene los modelos de datos tal como los expone la API
//! REST (JSON en camelCase).

pub mod address;
pub mod geography;
pub mod order;
pub mod party;
pub mod profile;
pub mod reference;

/// Identificador numérico de las entidades de la API
pub type EntityId = i64;

pub use address::{Direccion, DireccionRequest, OrigenDireccion};
pub use geography::{Comuna, GeografiaCatalog, Provincia, Region};
pub use order::{EstadoOrden, Orden, TipoTarifa};
pub use party::{Carrier, Cliente, Contacto, ContactoRequest, Embarcador, PartyRequest};
pub use profile::{Perfil, Rol, RoleAssignmentDiff};
pub use reference::{TipoCarga, TipoServicio};
