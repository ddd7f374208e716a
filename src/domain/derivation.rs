//! Derived display values: fill percentages, level classes and energy status.
//!
//! The management grid and the read-only summary classify reservoir levels with
//! their own thresholds. They are kept as two policies and must not be merged.

use super::collection::EntityId;
use super::energy::{ConsumptionRecord, Pump};
use super::water::FlowRecord;
use serde::Deserialize;

/// Consumption at or above this many kWh is shown as excessive.
pub const OVERCONSUMPTION_THRESHOLD_KWH: f64 = 150.0;

/// Value of the server-side `energyStatus` that marks a flagged pump.
pub const SERVER_OVERCONSUMPTION: &str = "Overconsumption";

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Fill level in percent with one decimal, as shown in the management grid.
/// Not clamped: an overfilled reservoir reads above 100.
pub fn fill_percentage(current: f64, capacity: f64) -> f64 {
    if capacity <= 0.0 {
        return 0.0;
    }
    round1(current / capacity * 100.0)
}

/// Fill level for the summary view, clamped to `[0, 100]`.
pub fn fill_percentage_clamped(current: f64, capacity: f64) -> f64 {
    fill_percentage(current, capacity).clamp(0.0, 100.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillStatus {
    High,
    Medium,
    Low,
}

/// Thresholds for the management grid. Bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct FillStatusPolicy {
    pub high_from: f64,
    pub medium_from: f64,
}

impl Default for FillStatusPolicy {
    fn default() -> Self {
        Self {
            high_from: 70.0,
            medium_from: 30.0,
        }
    }
}

impl FillStatusPolicy {
    pub fn classify(&self, percentage: f64) -> FillStatus {
        if percentage >= self.high_from {
            FillStatus::High
        } else if percentage >= self.medium_from {
            FillStatus::Medium
        } else {
            FillStatus::Low
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelBand {
    Good,
    Medium,
    Low,
}

/// Thresholds for the summary view. Bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct LevelBandPolicy {
    pub good_from: f64,
    pub medium_from: f64,
}

impl Default for LevelBandPolicy {
    fn default() -> Self {
        Self {
            good_from: 70.0,
            medium_from: 40.0,
        }
    }
}

impl LevelBandPolicy {
    pub fn classify(&self, percentage: f64) -> LevelBand {
        if percentage >= self.good_from {
            LevelBand::Good
        } else if percentage >= self.medium_from {
            LevelBand::Medium
        } else {
            LevelBand::Low
        }
    }
}

pub fn fill_status_class(percentage: f64) -> FillStatus {
    FillStatusPolicy::default().classify(percentage)
}

pub fn level_color_band(percentage: f64) -> LevelBand {
    LevelBandPolicy::default().classify(percentage)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnergyStatus {
    Normal,
    Excessive,
}

impl EnergyStatus {
    pub fn label(self) -> &'static str {
        match self {
            EnergyStatus::Normal => "Normal",
            EnergyStatus::Excessive => "Excessive",
        }
    }
}

pub fn energy_overconsumption(energy_used_kwh: f64) -> EnergyStatus {
    if energy_used_kwh >= OVERCONSUMPTION_THRESHOLD_KWH {
        EnergyStatus::Excessive
    } else {
        EnergyStatus::Normal
    }
}

/// Status reported by the energy service. A pump without one is `Normal`.
pub fn pump_energy_status(pump: &Pump) -> EnergyStatus {
    match pump.energy_status.as_deref() {
        Some(SERVER_OVERCONSUMPTION) => EnergyStatus::Excessive,
        _ => EnergyStatus::Normal,
    }
}

/// Server status when present, otherwise the local threshold applied to the pump's
/// cached consumption records. Display only; alerting never reads this.
pub fn pump_energy_status_with_fallback(pump: &Pump, records: &[ConsumptionRecord]) -> EnergyStatus {
    if pump.energy_status.is_some() {
        return pump_energy_status(pump);
    }
    let excessive = records
        .iter()
        .filter(|r| r.pump_id == pump.id)
        .any(|r| energy_overconsumption(r.energy_used_kwh) == EnergyStatus::Excessive);
    if excessive {
        EnergyStatus::Excessive
    } else {
        EnergyStatus::Normal
    }
}

pub fn total_energy_for_pump(records: &[ConsumptionRecord], pump_id: EntityId) -> f64 {
    records
        .iter()
        .filter(|r| r.pump_id == pump_id)
        .map(|r| r.energy_used_kwh)
        .sum()
}

/// Mean flow rate of a pump's records, `0` when it has none. Units are not converted.
pub fn average_flow_for_pump(records: &[FlowRecord], pump_id: EntityId) -> f64 {
    let rates: Vec<f64> = records
        .iter()
        .filter(|r| r.pump_id == pump_id)
        .map(|r| r.flow_rate)
        .collect();
    if rates.is_empty() {
        return 0.0;
    }
    rates.iter().sum::<f64>() / rates.len() as f64
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverconsumptionAlert {
    pub record_id: EntityId,
    pub pump_id: EntityId,
    pub energy_used_kwh: f64,
    pub threshold_kwh: f64,
    pub message: String,
}

/// One alert per cached consumption record at or above the threshold.
pub fn overconsumption_alerts(records: &[ConsumptionRecord]) -> Vec<OverconsumptionAlert> {
    records
        .iter()
        .filter(|r| energy_overconsumption(r.energy_used_kwh) == EnergyStatus::Excessive)
        .map(|r| OverconsumptionAlert {
            record_id: r.id,
            pump_id: r.pump_id,
            energy_used_kwh: r.energy_used_kwh,
            threshold_kwh: OVERCONSUMPTION_THRESHOLD_KWH,
            message: format!(
                "Pump #{} used {:.2} kWh (threshold {:.2} kWh)",
                r.pump_id, r.energy_used_kwh, OVERCONSUMPTION_THRESHOLD_KWH
            ),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::energy::PumpStatus;
    use crate::domain::water::FlowUnit;

    fn pump(id: i64, energy_status: Option<&str>) -> Pump {
        Pump {
            id: EntityId(id),
            reference: format!("PUMP-{:03}", id),
            power_kw: 5.0,
            status: PumpStatus::Active,
            service_date: None,
            energy_status: energy_status.map(str::to_string),
        }
    }

    fn consumption(id: i64, pump_id: i64, kwh: f64) -> ConsumptionRecord {
        ConsumptionRecord {
            id: EntityId(id),
            pump_id: EntityId(pump_id),
            energy_used_kwh: kwh,
            duration_hours: 1.0,
            measured_at: None,
        }
    }

    #[test]
    fn test_fill_percentage_rounds_to_one_decimal() {
        assert_eq!(fill_percentage(1.0, 3.0), 33.3);
        assert_eq!(fill_percentage(2.0, 3.0), 66.7);
        assert_eq!(fill_percentage(500.0, 1000.0), 50.0);
    }

    #[test]
    fn test_fill_percentage_zero_capacity() {
        assert_eq!(fill_percentage(42.0, 0.0), 0.0);
        assert_eq!(fill_percentage(42.0, -5.0), 0.0);
        assert_eq!(fill_percentage_clamped(42.0, 0.0), 0.0);
    }

    #[test]
    fn test_clamped_variant_stays_in_range() {
        assert_eq!(fill_percentage(1500.0, 1000.0), 150.0);
        assert_eq!(fill_percentage_clamped(1500.0, 1000.0), 100.0);
        assert_eq!(fill_percentage_clamped(-10.0, 1000.0), 0.0);

        for current in [0.0, 1.0, 333.0, 999.9, 1000.0] {
            let p = fill_percentage_clamped(current, 1000.0);
            assert!((0.0..=100.0).contains(&p), "{} out of range", p);
        }
    }

    #[test]
    fn test_fill_status_boundaries() {
        assert_eq!(fill_status_class(70.0), FillStatus::High);
        assert_eq!(fill_status_class(69.9), FillStatus::Medium);
        assert_eq!(fill_status_class(30.0), FillStatus::Medium);
        assert_eq!(fill_status_class(29.9), FillStatus::Low);
    }

    #[test]
    fn test_level_band_boundaries_differ_from_fill_status() {
        assert_eq!(level_color_band(70.0), LevelBand::Good);
        assert_eq!(level_color_band(40.0), LevelBand::Medium);
        assert_eq!(level_color_band(39.9), LevelBand::Low);

        // 35% sits in different bands under the two policies.
        assert_eq!(fill_status_class(35.0), FillStatus::Medium);
        assert_eq!(level_color_band(35.0), LevelBand::Low);
    }

    #[test]
    fn test_policies_are_independently_configurable() {
        let grid = FillStatusPolicy {
            high_from: 80.0,
            medium_from: 20.0,
        };
        assert_eq!(grid.classify(75.0), FillStatus::Medium);
        assert_eq!(LevelBandPolicy::default().classify(75.0), LevelBand::Good);
    }

    #[test]
    fn test_energy_overconsumption_threshold() {
        assert_eq!(energy_overconsumption(150.0), EnergyStatus::Excessive);
        assert_eq!(energy_overconsumption(149.99), EnergyStatus::Normal);
        assert_eq!(energy_overconsumption(0.0), EnergyStatus::Normal);
    }

    #[test]
    fn test_pump_energy_status_passes_server_value_through() {
        assert_eq!(pump_energy_status(&pump(1, Some("Overconsumption"))), EnergyStatus::Excessive);
        assert_eq!(pump_energy_status(&pump(1, Some("Normal"))), EnergyStatus::Normal);
        assert_eq!(pump_energy_status(&pump(1, Some("overconsumption"))), EnergyStatus::Normal);
        assert_eq!(pump_energy_status(&pump(1, None)), EnergyStatus::Normal);
    }

    #[test]
    fn test_fallback_only_applies_without_server_status() {
        let records = vec![consumption(1, 1, 200.0), consumption(2, 2, 10.0)];

        assert_eq!(
            pump_energy_status_with_fallback(&pump(1, None), &records),
            EnergyStatus::Excessive
        );
        assert_eq!(
            pump_energy_status_with_fallback(&pump(2, None), &records),
            EnergyStatus::Normal
        );
        // The server says normal; the local rule does not override it.
        assert_eq!(
            pump_energy_status_with_fallback(&pump(1, Some("Normal")), &records),
            EnergyStatus::Normal
        );
    }

    #[test]
    fn test_aggregations() {
        let records = vec![consumption(1, 1, 20.0), consumption(2, 1, 30.5), consumption(3, 2, 99.0)];
        assert_eq!(total_energy_for_pump(&records, EntityId(1)), 50.5);
        assert_eq!(total_energy_for_pump(&records, EntityId(9)), 0.0);

        let flows = vec![
            FlowRecord {
                id: EntityId(1),
                pump_id: EntityId(1),
                flow_rate: 10.0,
                unit: FlowUnit::LitresPerMinute,
                measured_at: None,
            },
            FlowRecord {
                id: EntityId(2),
                pump_id: EntityId(1),
                flow_rate: 20.0,
                unit: FlowUnit::LitresPerMinute,
                measured_at: None,
            },
        ];
        assert_eq!(average_flow_for_pump(&flows, EntityId(1)), 15.0);
        assert_eq!(average_flow_for_pump(&flows, EntityId(2)), 0.0);
    }

    #[test]
    fn test_overconsumption_alerts() {
        let records = vec![consumption(1, 4, 150.0), consumption(2, 4, 149.0)];
        let alerts = overconsumption_alerts(&records);
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].record_id, EntityId(1));
        assert_eq!(alerts[0].message, "Pump #4 used 150.00 kWh (threshold 150.00 kWh)");
    }
}
