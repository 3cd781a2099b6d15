//! Modelo de Orden de transporte
//!
//! Una orden nunca se elimina: se cancela con una transición de estado.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::EntityId;

/// Estado del ciclo de vida de una orden
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EstadoOrden {
    Pendiente,
    Planificada,
    EnTransporte,
    Entregada,
    Cancelada,
}

impl EstadoOrden {
    pub fn as_str(&self) -> &'static str {
        match self {
            EstadoOrden::Pendiente => "PENDIENTE",
            EstadoOrden::Planificada => "PLANIFICADA",
            EstadoOrden::EnTransporte => "EN_TRANSPORTE",
            EstadoOrden::Entregada => "ENTREGADA",
            EstadoOrden::Cancelada => "CANCELADA",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim() {
            "PENDIENTE" => Some(EstadoOrden::Pendiente),
            "PLANIFICADA" => Some(EstadoOrden::Planificada),
            "EN_TRANSPORTE" => Some(EstadoOrden::EnTransporte),
            "ENTREGADA" => Some(EstadoOrden::Entregada),
            "CANCELADA" => Some(EstadoOrden::Cancelada),
            _ => None,
        }
    }

    /// Entregada y cancelada no admiten más cambios
    pub fn is_terminal(&self) -> bool {
        matches!(self, EstadoOrden::Entregada | EstadoOrden::Cancelada)
    }
}

/// Tipo de tarifa de la orden
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TipoTarifa {
    PesoVolumen,
    Equipo,
}

impl TipoTarifa {
    pub fn as_str(&self) -> &'static str {
        match self {
            TipoTarifa::PesoVolumen => "PESO_VOLUMEN",
            TipoTarifa::Equipo => "EQUIPO",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim() {
            "PESO_VOLUMEN" => Some(TipoTarifa::PesoVolumen),
            "EQUIPO" => Some(TipoTarifa::Equipo),
            _ => None,
        }
    }
}

/// Orden de transporte tal como la devuelve la API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Orden {
    pub id: EntityId,
    pub numero_ot: String,
    pub fecha: NaiveDate,
    pub fecha_entrega_estimada: Option<NaiveDate>,
    pub estado: EstadoOrden,
    pub tipo_tarifa: TipoTarifa,
    pub peso: Option<f64>,
    pub volumen: Option<f64>,
    pub alto: Option<f64>,
    pub largo: Option<f64>,
    pub ancho: Option<f64>,
    pub cliente_id: EntityId,
    pub remitente_id: EntityId,
    pub destinatario_id: EntityId,
    pub direccion_origen_id: EntityId,
    pub direccion_destino_id: EntityId,
    pub tipo_carga_id: EntityId,
    pub tipo_servicio_id: EntityId,
    pub observaciones: Option<String>,
}

/// Body para cambiar el estado de una orden
#[derive(Debug, Clone, Serialize)]
pub struct CambioEstadoRequest {
    pub estado: EstadoOrden,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_estado_wire_format() {
        assert_eq!(serde_json::to_value(EstadoOrden::EnTransporte).unwrap(), json!("EN_TRANSPORTE"));
        assert_eq!(
            serde_json::from_value::<EstadoOrden>(json!("PLANIFICADA")).unwrap(),
            EstadoOrden::Planificada
        );
        assert_eq!(EstadoOrden::from_str("CANCELADA"), Some(EstadoOrden::Cancelada));
        assert_eq!(EstadoOrden::from_str("BORRADA"), None);
    }

    #[test]
    fn test_terminal_states() {
        assert!(EstadoOrden::Entregada.is_terminal());
        assert!(EstadoOrden::Cancelada.is_terminal());
        assert!(!EstadoOrden::Pendiente.is_terminal());
        assert!(!EstadoOrden::EnTransporte.is_terminal());
    }

    #[test]
    fn test_tipo_tarifa() {
        assert_eq!(serde_json::to_value(TipoTarifa::PesoVolumen).unwrap(), json!("PESO_VOLUMEN"));
        assert_eq!(TipoTarifa::from_str("EQUIPO"), Some(TipoTarifa::Equipo));
        assert_eq!(TipoTarifa::Equipo.as_str(), "EQUIPO");
    }

    #[test]
    fn test_orden_deserialize() {
        let orden: Orden = serde_json::from_value(json!({
            "id": 12,
            "numeroOt": "OT-2024-001",
            "fecha": "2024-03-01",
            "fechaEntregaEstimada": null,
            "estado": "PENDIENTE",
            "tipoTarifa": "EQUIPO",
            "peso": null, "volumen": null, "alto": null, "largo": null, "ancho": null,
            "clienteId": 1, "remitenteId": 2, "destinatarioId": 3,
            "direccionOrigenId": 4, "direccionDestinoId": 5,
            "tipoCargaId": 6, "tipoServicioId": 7,
            "observaciones": null
        }))
        .unwrap();
        assert_eq!(orden.numero_ot, "OT-2024-001");
        assert_ne!(orden.direccion_origen_id, orden.direccion_destino_id);
    }
}
