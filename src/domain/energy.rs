// Energy domain models: pumps and their electricity consumption
use super::collection::EntityId;
use super::timestamp;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PumpStatus {
    #[serde(alias = "ACTIF")]
    Active,
    #[serde(alias = "INACTIF")]
    Inactive,
    Maintenance,
}

impl PumpStatus {
    pub const WIRE_VALUES: [&'static str; 3] = ["ACTIVE", "INACTIVE", "MAINTENANCE"];

    pub fn as_wire(self) -> &'static str {
        match self {
            PumpStatus::Active => "ACTIVE",
            PumpStatus::Inactive => "INACTIVE",
            PumpStatus::Maintenance => "MAINTENANCE",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PumpStatus::Active => "Active",
            PumpStatus::Inactive => "Inactive",
            PumpStatus::Maintenance => "Maintenance",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pump {
    pub id: EntityId,
    pub reference: String,
    #[serde(rename = "puissance")]
    pub power_kw: f64,
    #[serde(rename = "statut")]
    pub status: PumpStatus,
    #[serde(
        rename = "dateMiseEnService",
        default,
        with = "timestamp::optional_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub service_date: Option<NaiveDate>,
    /// Set by the energy service when its alerting has flagged the pump.
    #[serde(rename = "energyStatus", default, skip_serializing_if = "Option::is_none")]
    pub energy_status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionRecord {
    pub id: EntityId,
    #[serde(rename = "pompeId")]
    pub pump_id: EntityId,
    #[serde(rename = "energieUtilisee")]
    pub energy_used_kwh: f64,
    #[serde(rename = "duree")]
    pub duration_hours: f64,
    #[serde(
        rename = "dateMesure",
        default,
        with = "timestamp::optional_local",
        skip_serializing_if = "Option::is_none"
    )]
    pub measured_at: Option<NaiveDateTime>,
}
