// Entity record as held by the store, tagged by collection
use super::collection::{Collection, EntityId};
use super::energy::{ConsumptionRecord, Pump};
use super::timestamp::{format_date, format_local};
use super::water::{FlowRecord, Reservoir};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Pump(Pump),
    Consumption(ConsumptionRecord),
    Reservoir(Reservoir),
    Flow(FlowRecord),
}

impl Entity {
    /// Decode a gateway object as a member of `collection`.
    pub fn decode(collection: Collection, value: Value) -> Result<Self, serde_json::Error> {
        Ok(match collection {
            Collection::Pumps => Entity::Pump(serde_json::from_value(value)?),
            Collection::Consumptions => Entity::Consumption(serde_json::from_value(value)?),
            Collection::Reservoirs => Entity::Reservoir(serde_json::from_value(value)?),
            Collection::FlowRecords => Entity::Flow(serde_json::from_value(value)?),
        })
    }

    pub fn encode(&self) -> Result<Value, serde_json::Error> {
        match self {
            Entity::Pump(p) => serde_json::to_value(p),
            Entity::Consumption(c) => serde_json::to_value(c),
            Entity::Reservoir(r) => serde_json::to_value(r),
            Entity::Flow(f) => serde_json::to_value(f),
        }
    }

    pub fn id(&self) -> EntityId {
        match self {
            Entity::Pump(p) => p.id,
            Entity::Consumption(c) => c.id,
            Entity::Reservoir(r) => r.id,
            Entity::Flow(f) => f.id,
        }
    }

    pub fn collection(&self) -> Collection {
        match self {
            Entity::Pump(_) => Collection::Pumps,
            Entity::Consumption(_) => Collection::Consumptions,
            Entity::Reservoir(_) => Collection::Reservoirs,
            Entity::Flow(_) => Collection::FlowRecords,
        }
    }

    pub fn as_pump(&self) -> Option<&Pump> {
        match self {
            Entity::Pump(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_consumption(&self) -> Option<&ConsumptionRecord> {
        match self {
            Entity::Consumption(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_reservoir(&self) -> Option<&Reservoir> {
        match self {
            Entity::Reservoir(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_flow(&self) -> Option<&FlowRecord> {
        match self {
            Entity::Flow(f) => Some(f),
            _ => None,
        }
    }

    /// Form values for each field of the collection's form schema, in schema order.
    pub fn form_values(&self) -> Vec<(&'static str, String)> {
        match self {
            Entity::Pump(p) => vec![
                ("reference", p.reference.clone()),
                ("powerKw", p.power_kw.to_string()),
                ("status", p.status.as_wire().to_string()),
                (
                    "serviceDate",
                    p.service_date.as_ref().map(format_date).unwrap_or_default(),
                ),
            ],
            Entity::Consumption(c) => vec![
                ("pumpId", c.pump_id.to_string()),
                ("energyUsedKwh", c.energy_used_kwh.to_string()),
                ("durationHours", c.duration_hours.to_string()),
                ("measuredAt", c.measured_at.as_ref().map(format_local).unwrap_or_default()),
            ],
            Entity::Reservoir(r) => vec![
                ("name", r.name.clone()),
                ("totalCapacityL", r.total_capacity_l.to_string()),
                ("currentVolumeL", r.current_volume_l.to_string()),
                ("location", r.location.clone()),
            ],
            Entity::Flow(f) => vec![
                ("pumpId", f.pump_id.to_string()),
                ("flowRate", f.flow_rate.to_string()),
                ("unit", f.unit.as_wire().to_string()),
                ("measuredAt", f.measured_at.as_ref().map(format_local).unwrap_or_default()),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::energy::PumpStatus;
    use serde_json::json;

    #[test]
    fn test_decode_dispatches_on_collection() {
        let value = json!({"id": 5, "nom": "R", "capaciteTotale": 10.0, "volumeActuel": 4.0, "localisation": "x"});
        let entity = Entity::decode(Collection::Reservoirs, value.clone()).unwrap();
        assert_eq!(entity.id(), EntityId(5));
        assert_eq!(entity.collection(), Collection::Reservoirs);

        // A reservoir body is not a pump.
        assert!(Entity::decode(Collection::Pumps, value).is_err());
    }

    #[test]
    fn test_decode_pump_as_listed_by_energy_service() {
        let entity = Entity::decode(
            Collection::Pumps,
            json!({"id": 1, "reference": "PUMP-001", "puissance": 5.0, "statut": "ACTIVE",
                   "dateMiseEnService": "2024-01-01 08:30:00", "energyStatus": "Normal"}),
        )
        .unwrap();

        let pump = entity.as_pump().unwrap();
        assert_eq!(pump.service_date, chrono::NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(entity.form_values()[3], ("serviceDate", "2024-01-01".to_string()));
    }

    #[test]
    fn test_form_values_render_numbers_plainly() {
        let entity = Entity::Pump(Pump {
            id: EntityId(1),
            reference: "PUMP-001".to_string(),
            power_kw: 5.0,
            status: PumpStatus::Active,
            service_date: chrono::NaiveDate::from_ymd_opt(2024, 1, 1),
            energy_status: None,
        });

        let values = entity.form_values();
        assert_eq!(values[1], ("powerKw", "5".to_string()));
        assert_eq!(values[2], ("status", "ACTIVE".to_string()));
        assert_eq!(values[3], ("serviceDate", "2024-01-01".to_string()));
    }
}
