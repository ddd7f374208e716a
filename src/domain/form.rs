// Form schemas and draft validation
use super::collection::{Collection, EntityId};
use super::energy::PumpStatus;
use super::entity::Entity;
use super::water::FlowUnit;
use serde_json::{Map, Number, Value};
use std::collections::{BTreeMap, HashSet};

/// Plain field mapping sent to the gateway, keyed by wire name.
pub type Fields = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Date,
    DateTime,
    Choice(&'static [&'static str]),
    /// Id of a pump that must be present in the pump cache.
    PumpRef,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub wire: &'static str,
    pub kind: FieldKind,
    pub default: Option<&'static str>,
}

const fn field(name: &'static str, wire: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec {
        name,
        wire,
        kind,
        default: None,
    }
}

const PUMP_FORM: [FieldSpec; 4] = [
    field("reference", "reference", FieldKind::Text),
    field("powerKw", "puissance", FieldKind::Number),
    FieldSpec {
        default: Some("ACTIVE"),
        ..field("status", "statut", FieldKind::Choice(&PumpStatus::WIRE_VALUES))
    },
    field("serviceDate", "dateMiseEnService", FieldKind::Date),
];

const CONSUMPTION_FORM: [FieldSpec; 4] = [
    field("pumpId", "pompeId", FieldKind::PumpRef),
    field("energyUsedKwh", "energieUtilisee", FieldKind::Number),
    field("durationHours", "duree", FieldKind::Number),
    field("measuredAt", "dateMesure", FieldKind::DateTime),
];

const RESERVOIR_FORM: [FieldSpec; 4] = [
    field("name", "nom", FieldKind::Text),
    field("totalCapacityL", "capaciteTotale", FieldKind::Number),
    field("currentVolumeL", "volumeActuel", FieldKind::Number),
    field("location", "localisation", FieldKind::Text),
];

const FLOW_FORM: [FieldSpec; 4] = [
    field("pumpId", "pompeId", FieldKind::PumpRef),
    field("flowRate", "debit", FieldKind::Number),
    FieldSpec {
        default: Some("L/min"),
        ..field("unit", "unite", FieldKind::Choice(&FlowUnit::WIRE_VALUES))
    },
    field("measuredAt", "dateMesure", FieldKind::DateTime),
];

/// Every field of a form is required.
pub fn schema(collection: Collection) -> &'static [FieldSpec] {
    match collection {
        Collection::Pumps => &PUMP_FORM,
        Collection::Consumptions => &CONSUMPTION_FORM,
        Collection::Reservoirs => &RESERVOIR_FORM,
        Collection::FlowRecords => &FLOW_FORM,
    }
}

fn lookup(collection: Collection, name: &str) -> Option<&'static FieldSpec> {
    schema(collection).iter().find(|f| f.name == name)
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("field `{field}` {reason}")]
pub struct ValidationError {
    pub field: String,
    pub reason: String,
}

impl ValidationError {
    fn new(field: &str, reason: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Editable form values for one collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    collection: Collection,
    values: BTreeMap<&'static str, String>,
}

impl Draft {
    /// Blank form, with choice fields preset to their defaults.
    pub fn new(collection: Collection) -> Self {
        let values = schema(collection)
            .iter()
            .map(|f| (f.name, f.default.unwrap_or_default().to_string()))
            .collect();
        Self { collection, values }
    }

    pub fn from_entity(entity: &Entity) -> Self {
        let mut draft = Self::new(entity.collection());
        for (name, value) in entity.form_values() {
            draft.values.insert(name, value);
        }
        draft
    }

    pub fn collection(&self) -> Collection {
        self.collection
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) -> Result<(), ValidationError> {
        let spec = lookup(self.collection, name)
            .ok_or_else(|| ValidationError::new(name, "is not part of this form"))?;
        self.values.insert(spec.name, value.into());
        Ok(())
    }

    /// Check the draft and convert it to a request body.
    /// `known_pumps` is the pump cache used to resolve pump references.
    pub fn to_fields(&self, known_pumps: &HashSet<EntityId>) -> Result<Fields, ValidationError> {
        let mut fields = Fields::new();

        for spec in schema(self.collection) {
            let raw = self.get(spec.name).unwrap_or_default();
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Err(ValidationError::new(spec.name, "is required"));
            }

            let value = match spec.kind {
                FieldKind::Text | FieldKind::Date | FieldKind::DateTime => Value::String(raw.to_string()),
                FieldKind::Number => {
                    let parsed: f64 = trimmed
                        .parse()
                        .map_err(|_| ValidationError::new(spec.name, "must be a number"))?;
                    Number::from_f64(parsed)
                        .map(Value::Number)
                        .ok_or_else(|| ValidationError::new(spec.name, "must be a finite number"))?
                }
                FieldKind::Choice(options) => {
                    if !options.contains(&trimmed) {
                        return Err(ValidationError::new(
                            spec.name,
                            format!("must be one of {}", options.join(", ")),
                        ));
                    }
                    Value::String(trimmed.to_string())
                }
                FieldKind::PumpRef => {
                    let id: EntityId = trimmed
                        .parse()
                        .map_err(|_| ValidationError::new(spec.name, "must be a pump id"))?;
                    if !known_pumps.contains(&id) {
                        return Err(ValidationError::new(
                            spec.name,
                            format!("references unknown pump #{}", id),
                        ));
                    }
                    Value::from(id.0)
                }
            };

            fields.insert(spec.wire.to_string(), value);
        }

        Ok(fields)
    }
}
