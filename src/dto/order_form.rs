//! Estado del formulario de orden y payload normalizado
//!
//! El formulario guarda todo como texto (lo que escribió el usuario); el
//! payload es lo que se envía a la API, con ids y medidas ya convertidos.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{EntityId, Orden, TipoTarifa};

/// Campos del formulario de creación/edición de orden
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrdenFormState {
    pub numero_ot: String,
    pub fecha: String,
    pub fecha_entrega_estimada: String,
    pub cliente_id: String,
    pub remitente_id: String,
    pub destinatario_id: String,
    pub direccion_origen_id: String,
    pub direccion_destino_id: String,
    pub tipo_carga_id: String,
    pub tipo_servicio_id: String,
    pub tipo_tarifa: String,
    pub peso: String,
    pub volumen: String,
    pub alto: String,
    pub largo: String,
    pub ancho: String,
    pub observaciones: String,
}

impl OrdenFormState {
    /// Cargar el formulario de edición desde una orden existente
    pub fn from_orden(orden: &Orden) -> Self {
        fn num(value: Option<f64>) -> String {
            value.map(|v| v.to_string()).unwrap_or_default()
        }

        Self {
            numero_ot: orden.numero_ot.clone(),
            fecha: orden.fecha.format("%Y-%m-%d").to_string(),
            fecha_entrega_estimada: orden
                .fecha_entrega_estimada
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            cliente_id: orden.cliente_id.to_string(),
            remitente_id: orden.remitente_id.to_string(),
            destinatario_id: orden.destinatario_id.to_string(),
            direccion_origen_id: orden.direccion_origen_id.to_string(),
            direccion_destino_id: orden.direccion_destino_id.to_string(),
            tipo_carga_id: orden.tipo_carga_id.to_string(),
            tipo_servicio_id: orden.tipo_servicio_id.to_string(),
            tipo_tarifa: orden.tipo_tarifa.as_str().to_string(),
            peso: num(orden.peso),
            volumen: num(orden.volumen),
            alto: num(orden.alto),
            largo: num(orden.largo),
            ancho: num(orden.ancho),
            observaciones: orden.observaciones.clone().unwrap_or_default(),
        }
    }
}

/// Payload listo para POST/PUT de `/ordenes`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrdenPayload {
    pub numero_ot: String,
    pub fecha: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fecha_entrega_estimada: Option<NaiveDate>,
    pub cliente_id: EntityId,
    pub remitente_id: EntityId,
    pub destinatario_id: EntityId,
    pub direccion_origen_id: EntityId,
    pub direccion_destino_id: EntityId,
    pub tipo_carga_id: EntityId,
    pub tipo_servicio_id: EntityId,
    pub tipo_tarifa: TipoTarifa,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peso: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volumen: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alto: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub largo: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ancho: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observaciones: Option<String>,
}
