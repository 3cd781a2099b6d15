use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::EntityId;
use crate::utils::validation::validate_coordinate_pair;

/// Origen de la dirección
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrigenDireccion {
    Manual,
    Importacion,
    Api,
}

impl OrigenDireccion {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrigenDireccion::Manual => "MANUAL",
            OrigenDireccion::Importacion => "IMPORTACION",
            OrigenDireccion::Api => "API",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Direccion {
    pub id: EntityId,
    pub direccion: String,
    pub calle: Option<String>,
    pub numero: Option<String>,
    pub comuna_id: Option<EntityId>,
    pub latitud: Option<f64>,
    pub longitud: Option<f64>,
    #[serde(default)]
    pub frecuencia_uso: u32,
    #[serde(default)]
    pub es_principal: bool,
    pub origen: OrigenDireccion,
    pub cliente_id: Option<EntityId>,
    #[serde(default = "default_activo")]
    pub activo: bool,
}

fn default_activo() -> bool {
    true
}

impl Direccion {
    pub fn has_coordinates(&self) -> bool {
        self.latitud.is_some() && self.longitud.is_some()
    }

    /// Texto para mostrar en selects: "Av. Matta 123 (usada 4 veces)"
    pub fn display_label(&self) -> String {
        if self.frecuencia_uso > 0 {
            format!("{} (usada {} veces)", self.direccion, self.frecuencia_uso)
        } else {
            self.direccion.clone()
        }
    }
}

/// Request para crear/editar una dirección
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_direccion_coordinates", skip_on_field_errors = false))]
pub struct DireccionRequest {
    #[validate(length(min = 3, max = 250))]
    pub direccion: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub calle: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub numero: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub comuna_id: Option<EntityId>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitud: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitud: Option<f64>,

    pub es_principal: bool,

    pub origen: OrigenDireccion,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cliente_id: Option<EntityId>,
}

impl DireccionRequest {
    /// Dirección manual sin coordenadas
    pub fn manual(direccion: impl Into<String>, comuna_id: Option<EntityId>) -> Self {
        Self {
            direccion: direccion.into(),
            calle: None,
            numero: None,
            comuna_id,
            latitud: None,
            longitud: None,
            es_principal: false,
            origen: OrigenDireccion::Manual,
            cliente_id: None,
        }
    }
}

fn validate_direccion_coordinates(request: &DireccionRequest) -> Result<(), ValidationError> {
    validate_coordinate_pair(request.latitud, request.longitud)
}
