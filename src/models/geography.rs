//! Jerarquía geográfica Región → Provincia → Comuna
//!
//! Es de sólo lectura para la aplicación; se usa para mostrar y filtrar.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::EntityId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub id: EntityId,
    pub nombre: String,
    pub codigo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provincia {
    pub id: EntityId,
    pub nombre: String,
    pub region_id: EntityId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comuna {
    pub id: EntityId,
    pub nombre: String,
    pub provincia_id: EntityId,
}

/// Catálogo indexado de la jerarquía
#[derive(Debug, Clone, Default)]
pub struct GeografiaCatalog {
    regiones: HashMap<EntityId, Region>,
    provincias: HashMap<EntityId, Provincia>,
    comunas: HashMap<EntityId, Comuna>,
}

impl GeografiaCatalog {
    pub fn new(regiones: Vec<Region>, provincias: Vec<Provincia>, comunas: Vec<Comuna>) -> Self {
        Self {
            regiones: regiones.into_iter().map(|r| (r.id, r)).collect(),
            provincias: provincias.into_iter().map(|p| (p.id, p)).collect(),
            comunas: comunas.into_iter().map(|c| (c.id, c)).collect(),
        }
    }

    pub fn comuna(&self, comuna_id: EntityId) -> Option<&Comuna> {
        self.comunas.get(&comuna_id)
    }

    pub fn provincia_of(&self, comuna_id: EntityId) -> Option<&Provincia> {
        self.comuna(comuna_id)
            .and_then(|c| self.provincias.get(&c.provincia_id))
    }

    pub fn region_of(&self, comuna_id: EntityId) -> Option<&Region> {
        self.provincia_of(comuna_id)
            .and_then(|p| self.regiones.get(&p.region_id))
    }

    /// "Comuna, Provincia, Región"; si falta un nivel se omite
    pub fn display_label(&self, comuna_id: EntityId) -> Option<String> {
        let comuna = self.comuna(comuna_id)?;
        let mut parts = vec![comuna.nombre.as_str()];
        if let Some(provincia) = self.provincia_of(comuna_id) {
            parts.push(provincia.nombre.as_str());
        }
        if let Some(region) = self.region_of(comuna_id) {
            parts.push(region.nombre.as_str());
        }
        Some(parts.join(", "))
    }

    /// Comunas de una región, ordenadas por nombre
    pub fn comunas_in_region(&self, region_id: EntityId) -> Vec<&Comuna> {
        let mut comunas: Vec<&Comuna> = self
            .comunas
            .values()
            .filter(|c| {
                self.provincias
                    .get(&c.provincia_id)
                    .map(|p| p.region_id == region_id)
                    .unwrap_or(false)
            })
            .collect();
        comunas.sort_by(|a, b| a.nombre.cmp(&b.nombre));
        comunas
    }

    pub fn is_empty(&self) -> bool {
        self.comunas.is_empty()
    }
}
