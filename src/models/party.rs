//! Modelos de partes: Cliente, Contacto, Embarcador y Carrier
//!
//! Todas se desactivan (`activo = false`) en vez de eliminarse y pueden
//! reactivarse. El RUT viaja siempre sin puntos.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::EntityId;
use crate::utils::rut::{normalize_rut, NormalizeRut};
use crate::utils::validation::{validate_phone, validate_rut};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cliente {
    pub id: EntityId,
    pub rut: String,
    pub nombre: String,
    pub giro: Option<String>,
    pub email: Option<String>,
    pub telefono: Option<String>,
    pub direccion: Option<String>,
    pub comuna_id: Option<EntityId>,
    pub activo: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Embarcador {
    pub id: EntityId,
    pub rut: String,
    pub nombre: String,
    pub email: Option<String>,
    pub telefono: Option<String>,
    pub direccion: Option<String>,
    pub comuna_id: Option<EntityId>,
    pub activo: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Carrier {
    pub id: EntityId,
    pub rut: String,
    pub nombre: String,
    pub email: Option<String>,
    pub telefono: Option<String>,
    pub direccion: Option<String>,
    pub comuna_id: Option<EntityId>,
    pub activo: bool,
}

/// Persona de contacto, opcionalmente asociada a un cliente
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contacto {
    pub id: EntityId,
    pub rut: String,
    pub nombre: String,
    pub cargo: Option<String>,
    pub email: Option<String>,
    pub telefono: Option<String>,
    pub direccion: Option<String>,
    pub comuna_id: Option<EntityId>,
    pub cliente_id: Option<EntityId>,
    pub activo: bool,
}

/// Request de creación/edición para Cliente, Embarcador y Carrier
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PartyRequest {
    #[validate(custom = "validate_rut")]
    pub rut: String,

    #[validate(length(min = 2, max = 150))]
    pub nombre: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 150))]
    pub giro: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email)]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom = "validate_phone")]
    pub telefono: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 250))]
    pub direccion: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub comuna_id: Option<EntityId>,
}

/// Request de creación/edición de Contacto
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ContactoRequest {
    #[validate(custom = "validate_rut")]
    pub rut: String,

    #[validate(length(min = 2, max = 150))]
    pub nombre: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 100))]
    pub cargo: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email)]
    pub email: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(custom = "validate_phone")]
    pub telefono: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub direccion: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub comuna_id: Option<EntityId>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cliente_id: Option<EntityId>,
}

impl NormalizeRut for PartyRequest {
    fn normalize_rut(&mut self) {
        self.rut = normalize_rut(&self.rut);
    }
}

impl NormalizeRut for ContactoRequest {
    fn normalize_rut(&mut self) {
        self.rut = normalize_rut(&self.rut);
    }
}

/// Body para reactivar una parte desactivada
#[derive(Debug, Clone, Serialize)]
pub struct ActivacionRequest {
    pub activo: bool,
}
