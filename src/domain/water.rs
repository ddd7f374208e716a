// Water domain models: reservoirs and measured flow rates
use super::collection::EntityId;
use super::timestamp;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservoir {
    pub id: EntityId,
    #[serde(rename = "nom")]
    pub name: String,
    #[serde(rename = "capaciteTotale", alias = "capacite")]
    pub total_capacity_l: f64,
    /// Not bounded by capacity; the services accept overfilled readings.
    #[serde(rename = "volumeActuel", alias = "niveauActuel")]
    pub current_volume_l: f64,
    #[serde(rename = "localisation", default)]
    pub location: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowUnit {
    #[serde(rename = "L/min")]
    LitresPerMinute,
    #[serde(rename = "L/h")]
    LitresPerHour,
    #[serde(rename = "m³/h", alias = "m3/h")]
    CubicMetresPerHour,
}

impl FlowUnit {
    pub const WIRE_VALUES: [&'static str; 3] = ["L/min", "L/h", "m³/h"];

    pub fn as_wire(self) -> &'static str {
        match self {
            FlowUnit::LitresPerMinute => "L/min",
            FlowUnit::LitresPerHour => "L/h",
            FlowUnit::CubicMetresPerHour => "m³/h",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowRecord {
    pub id: EntityId,
    #[serde(rename = "pompeId")]
    pub pump_id: EntityId,
    #[serde(rename = "debit")]
    pub flow_rate: f64,
    #[serde(rename = "unite")]
    pub unit: FlowUnit,
    #[serde(
        rename = "dateMesure",
        default,
        with = "timestamp::optional_local",
        skip_serializing_if = "Option::is_none"
    )]
    pub measured_at: Option<NaiveDateTime>,
}
