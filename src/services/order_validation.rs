//! Validación del formulario de órdenes
//!
//! Los chequeos se ejecutan en orden y se detienen en el primer fallo:
//!
//! 1. campos obligatorios
//! 2. unicidad del número OT (se omite en edición si no cambió)
//! 3. origen distinto de destino
//! 4. remitente igual a destinatario → confirmación
//! 5. fecha estimada de entrega (no anterior; más de un año → confirmación)
//! 6. medidas numéricas no negativas
//! 7. tarifa PESO_VOLUMEN exige peso o volumen
//! 8. dimensiones completas y positivas
//! 9. volumen derivado de las dimensiones (cm³ → m³)

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{Months, NaiveDate};
use tracing::{debug, info};

use crate::dto::{OrdenFormState, OrdenPayload};
use crate::models::{EntityId, TipoTarifa};
use crate::utils::errors::{form_error, AppError, AppResult};
use crate::utils::validation::{validate_date, validate_non_negative, validate_positive};

const CM3_PER_M3: f64 = 1_000_000.0;

/// Consulta remota de existencia de un número OT
#[async_trait]
pub trait OtLookup: Send + Sync {
    async fn numero_ot_exists(&self, numero_ot: &str) -> AppResult<bool>;
}

/// Condiciones que no son error pero requieren confirmación del usuario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfirmationKind {
    SameSenderReceiver,
    DeliveryBeyondOneYear,
}

impl ConfirmationKind {
    pub fn message(&self) -> &'static str {
        match self {
            ConfirmationKind::SameSenderReceiver => {
                "El remitente y el destinatario son la misma entidad. ¿Desea continuar?"
            }
            ConfirmationKind::DeliveryBeyondOneYear => {
                "La fecha estimada de entrega supera en más de un año la fecha de la orden. ¿Desea continuar?"
            }
        }
    }
}

/// Creación o edición (con el número OT original)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationMode {
    Create,
    Edit { original_numero_ot: String },
}

/// Resultado de una validación sin errores
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    Ready(OrdenPayload),
    NeedsConfirmation(ConfirmationKind),
}

pub struct OrdenValidator<'a, L: OtLookup + ?Sized> {
    lookup: &'a L,
    mode: ValidationMode,
    acknowledged: HashSet<ConfirmationKind>,
}

impl<'a, L: OtLookup + ?Sized> OrdenValidator<'a, L> {
    pub fn new(lookup: &'a L, mode: ValidationMode) -> Self {
        Self {
            lookup,
            mode,
            acknowledged: HashSet::new(),
        }
    }

    /// Marcar una confirmación como aceptada por el usuario
    pub fn acknowledge(mut self, kind: ConfirmationKind) -> Self {
        self.acknowledged.insert(kind);
        self
    }

    pub async fn validate(&self, form: &OrdenFormState) -> AppResult<ValidationOutcome> {
        // 1. Campos obligatorios
        let missing: Vec<&'static str> = required_fields(form)
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(label, _)| label)
            .collect();
        if !missing.is_empty() {
            debug!("❌ Orden rechazada, faltan campos: {:?}", missing);
            return Err(AppError::MissingFields(missing));
        }

        // 2. Unicidad del número OT
        let numero_ot = form.numero_ot.trim().to_string();
        let unchanged = matches!(
            &self.mode,
            ValidationMode::Edit { original_numero_ot } if original_numero_ot.trim() == numero_ot
        );
        if !unchanged && self.lookup.numero_ot_exists(&numero_ot).await? {
            return Err(form_error(format!("El número OT '{}' ya existe", numero_ot)));
        }

        // 3. Origen distinto de destino
        let direccion_origen_id = parse_id("Dirección de origen", &form.direccion_origen_id)?;
        let direccion_destino_id = parse_id("Dirección de destino", &form.direccion_destino_id)?;
        if direccion_origen_id == direccion_destino_id {
            return Err(form_error("La dirección de origen y destino no pueden ser la misma"));
        }

        // 4. Remitente igual a destinatario
        let remitente_id = parse_id("Remitente", &form.remitente_id)?;
        let destinatario_id = parse_id("Destinatario", &form.destinatario_id)?;
        if remitente_id == destinatario_id && !self.is_acknowledged(ConfirmationKind::SameSenderReceiver) {
            return Ok(ValidationOutcome::NeedsConfirmation(ConfirmationKind::SameSenderReceiver));
        }

        // 5. Fechas
        let fecha = parse_date("Fecha", &form.fecha)?;
        let fecha_entrega_estimada = match form.fecha_entrega_estimada.trim() {
            "" => None,
            raw => Some(parse_date("Fecha estimada de entrega", raw)?),
        };
        if let Some(estimada) = fecha_entrega_estimada {
            if estimada < fecha {
                return Err(form_error(
                    "La fecha estimada de entrega no puede ser anterior a la fecha de la orden",
                ));
            }
            let one_year_later = fecha.checked_add_months(Months::new(12)).unwrap_or(NaiveDate::MAX);
            if estimada > one_year_later && !self.is_acknowledged(ConfirmationKind::DeliveryBeyondOneYear) {
                return Ok(ValidationOutcome::NeedsConfirmation(ConfirmationKind::DeliveryBeyondOneYear));
            }
        }

        // 6. Medidas numéricas
        let peso = parse_measure("Peso", &form.peso)?;
        let mut volumen = parse_measure("Volumen", &form.volumen)?;
        let alto = parse_measure("Alto", &form.alto)?;
        let largo = parse_measure("Largo", &form.largo)?;
        let ancho = parse_measure("Ancho", &form.ancho)?;

        // 7. Tarifa por peso/volumen
        let tipo_tarifa = TipoTarifa::from_str(&form.tipo_tarifa)
            .ok_or_else(|| form_error(format!("Tipo de tarifa inválido: '{}'", form.tipo_tarifa)))?;
        if tipo_tarifa == TipoTarifa::PesoVolumen
            && peso.unwrap_or(0.0) <= 0.0
            && volumen.unwrap_or(0.0) <= 0.0
        {
            return Err(form_error(
                "Para tarifa por peso/volumen debe informar un peso o un volumen mayor a cero",
            ));
        }

        // 8. Dimensiones completas
        let dimensions = [alto, largo, ancho];
        let provided = dimensions.iter().filter(|d| d.is_some()).count();
        if provided > 0 && provided < dimensions.len() {
            return Err(form_error("Si informa dimensiones debe completar alto, largo y ancho"));
        }
        if dimensions.iter().flatten().any(|d| validate_positive(*d).is_err()) {
            return Err(form_error("Las dimensiones deben ser mayores a cero"));
        }

        // 9. Volumen derivado
        if let (Some(a), Some(l), Some(w)) = (alto, largo, ancho) {
            if volumen.unwrap_or(0.0) == 0.0 {
                let derivado = a * l * w / CM3_PER_M3;
                debug!("📐 Volumen derivado de dimensiones: {} m³", derivado);
                volumen = Some(derivado);
            }
        }

        let payload = OrdenPayload {
            numero_ot,
            fecha,
            fecha_entrega_estimada,
            cliente_id: parse_id("Cliente", &form.cliente_id)?,
            remitente_id,
            destinatario_id,
            direccion_origen_id,
            direccion_destino_id,
            tipo_carga_id: parse_id("Tipo de carga", &form.tipo_carga_id)?,
            tipo_servicio_id: parse_id("Tipo de servicio", &form.tipo_servicio_id)?,
            tipo_tarifa,
            peso,
            volumen,
            alto,
            largo,
            ancho,
            observaciones: Some(form.observaciones.trim().to_string()).filter(|o| !o.is_empty()),
        };

        info!("✅ Orden '{}' validada", payload.numero_ot);
        Ok(ValidationOutcome::Ready(payload))
    }

    fn is_acknowledged(&self, kind: ConfirmationKind) -> bool {
        self.acknowledged.contains(&kind)
    }
}

/// Campos obligatorios con su etiqueta, en el orden del formulario
fn required_fields(form: &OrdenFormState) -> [(&'static str, &str); 10] {
    [
        ("Número OT", form.numero_ot.as_str()),
        ("Fecha", form.fecha.as_str()),
        ("Cliente", form.cliente_id.as_str()),
        ("Remitente", form.remitente_id.as_str()),
        ("Destinatario", form.destinatario_id.as_str()),
        ("Dirección de origen", form.direccion_origen_id.as_str()),
        ("Dirección de destino", form.direccion_destino_id.as_str()),
        ("Tipo de carga", form.tipo_carga_id.as_str()),
        ("Tipo de servicio", form.tipo_servicio_id.as_str()),
        ("Tipo de tarifa", form.tipo_tarifa.as_str()),
    ]
}

fn parse_id(label: &str, raw: &str) -> AppResult<EntityId> {
    raw.trim()
        .parse::<EntityId>()
        .map_err(|_| form_error(format!("{} inválido", label)))
}

fn parse_date(label: &str, raw: &str) -> AppResult<NaiveDate> {
    validate_date(raw).map_err(|_| form_error(format!("{} inválida, use el formato AAAA-MM-DD", label)))
}

/// Texto vacío → `None`; acepta coma decimal
fn parse_measure(label: &str, raw: &str) -> AppResult<Option<f64>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let value = trimmed
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| form_error(format!("{} debe ser un número", label)))?;

    validate_non_negative(value).map_err(|_| form_error(format!("{} no puede ser negativo", label)))?;
    Ok(Some(value))
}
