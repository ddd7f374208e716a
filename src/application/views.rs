// Display rows with derived columns, built from the entity store
use crate::application::entity_store::EntityStore;
use crate::domain::derivation::{
    average_flow_for_pump, energy_overconsumption, fill_percentage, fill_percentage_clamped,
    overconsumption_alerts, pump_energy_status, pump_energy_status_with_fallback,
    total_energy_for_pump, EnergyStatus, FillStatus, FillStatusPolicy, LevelBand, LevelBandPolicy,
    OverconsumptionAlert,
};
use crate::domain::energy::{ConsumptionRecord, Pump};
use crate::domain::water::{FlowRecord, Reservoir};
use serde::Deserialize;

/// Threshold policies for the two reservoir views.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct ViewPolicies {
    #[serde(default)]
    pub fill_status: FillStatusPolicy,
    #[serde(default)]
    pub level_band: LevelBandPolicy,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PumpRow<'a> {
    pub pump: &'a Pump,
    pub energy_status: EnergyStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConsumptionRow<'a> {
    pub record: &'a ConsumptionRecord,
    pub status: EnergyStatus,
}

/// Row of the editable management grid.
#[derive(Debug, Clone, PartialEq)]
pub struct ReservoirRow<'a> {
    pub reservoir: &'a Reservoir,
    pub fill_percentage: f64,
    pub fill_status: FillStatus,
}

/// Row of the read-only summary.
#[derive(Debug, Clone, PartialEq)]
pub struct ReservoirSummaryRow<'a> {
    pub reservoir: &'a Reservoir,
    pub level_percentage: f64,
    pub band: LevelBand,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlowRow<'a> {
    pub record: &'a FlowRecord,
    /// Reference of the pump when it is in the pump cache.
    pub pump_reference: Option<&'a str>,
}

/// Per-pump aggregate over the cached consumption and flow records.
#[derive(Debug, Clone, PartialEq)]
pub struct PumpUsageRow<'a> {
    pub pump: &'a Pump,
    pub total_energy_kwh: f64,
    pub average_flow: f64,
    pub energy_status: EnergyStatus,
}

pub fn pump_rows(store: &EntityStore) -> Vec<PumpRow<'_>> {
    store
        .pumps()
        .map(|pump| PumpRow {
            pump,
            energy_status: pump_energy_status(pump),
        })
        .collect()
}

pub fn consumption_rows(store: &EntityStore) -> Vec<ConsumptionRow<'_>> {
    store
        .consumptions()
        .map(|record| ConsumptionRow {
            record,
            status: energy_overconsumption(record.energy_used_kwh),
        })
        .collect()
}

pub fn reservoir_rows<'a>(store: &'a EntityStore, policy: &FillStatusPolicy) -> Vec<ReservoirRow<'a>> {
    store
        .reservoirs()
        .map(|reservoir| {
            let pct = fill_percentage(reservoir.current_volume_l, reservoir.total_capacity_l);
            ReservoirRow {
                reservoir,
                fill_percentage: pct,
                fill_status: policy.classify(pct),
            }
        })
        .collect()
}

pub fn reservoir_summary<'a>(store: &'a EntityStore, policy: &LevelBandPolicy) -> Vec<ReservoirSummaryRow<'a>> {
    store
        .reservoirs()
        .map(|reservoir| {
            let pct = fill_percentage_clamped(reservoir.current_volume_l, reservoir.total_capacity_l);
            ReservoirSummaryRow {
                reservoir,
                level_percentage: pct,
                band: policy.classify(pct),
            }
        })
        .collect()
}

pub fn flow_rows(store: &EntityStore) -> Vec<FlowRow<'_>> {
    store
        .flow_records()
        .map(|record| FlowRow {
            record,
            pump_reference: store
                .pumps()
                .find(|p| p.id == record.pump_id)
                .map(|p| p.reference.as_str()),
        })
        .collect()
}

pub fn pump_usage(store: &EntityStore) -> Vec<PumpUsageRow<'_>> {
    let consumptions: Vec<ConsumptionRecord> = store.consumptions().cloned().collect();
    let flows: Vec<FlowRecord> = store.flow_records().cloned().collect();

    store
        .pumps()
        .map(|pump| PumpUsageRow {
            pump,
            total_energy_kwh: total_energy_for_pump(&consumptions, pump.id),
            average_flow: average_flow_for_pump(&flows, pump.id),
            energy_status: pump_energy_status_with_fallback(pump, &consumptions),
        })
        .collect()
}

pub fn alerts(store: &EntityStore) -> Vec<OverconsumptionAlert> {
    let records: Vec<ConsumptionRecord> = store.consumptions().cloned().collect();
    overconsumption_alerts(&records)
}
