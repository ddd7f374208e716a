// Console snapshot of every dashboard view
use std::sync::Arc;

use irrigation_dashboard::application::gateway::RemoteGateway;
use irrigation_dashboard::application::view_selector::ViewSelector;
use irrigation_dashboard::application::views;
use irrigation_dashboard::domain::collection::Collection;
use irrigation_dashboard::domain::timestamp::format_local;
use irrigation_dashboard::infrastructure::config::load_dashboard_config;
use irrigation_dashboard::infrastructure::http_gateway::HttpGateway;
use irrigation_dashboard::infrastructure::observability::init_tracing;

fn print_section(selector: &ViewSelector, collection: Collection) {
    let store = selector.store();
    let policies = selector.policies();

    println!("== {} ==", collection);
    match collection {
        Collection::Pumps => {
            for row in views::pump_rows(store) {
                let p = row.pump;
                println!(
                    "#{:<4} {:<12} {:>7.2} kW  {:<12} {}",
                    p.id,
                    p.reference,
                    p.power_kw,
                    p.status.label(),
                    row.energy_status.label()
                );
            }
            for usage in views::pump_usage(store) {
                println!(
                    "  {:<12} total {:.2} kWh, mean flow {:.2}",
                    usage.pump.reference, usage.total_energy_kwh, usage.average_flow
                );
            }
        }
        Collection::Consumptions => {
            for row in views::consumption_rows(store) {
                let r = row.record;
                println!(
                    "#{:<4} pump #{:<4} {:>8.2} kWh {:>6.2} h  {:<16} {}",
                    r.id,
                    r.pump_id,
                    r.energy_used_kwh,
                    r.duration_hours,
                    r.measured_at.as_ref().map(format_local).unwrap_or_default(),
                    row.status.label()
                );
            }
            for alert in views::alerts(store) {
                println!("  ! {}", alert.message);
            }
        }
        Collection::Reservoirs => {
            for row in views::reservoir_rows(store, &policies.fill_status) {
                let r = row.reservoir;
                println!(
                    "#{:<4} {:<16} {:>10.1} / {:<10.1} L {:>6.1}% {:?}",
                    r.id, r.name, r.current_volume_l, r.total_capacity_l, row.fill_percentage, row.fill_status
                );
            }
            for row in views::reservoir_summary(store, &policies.level_band) {
                println!(
                    "  {:<16} {:>5.1}% {:?}",
                    row.reservoir.name, row.level_percentage, row.band
                );
            }
        }
        Collection::FlowRecords => {
            for row in views::flow_rows(store) {
                let r = row.record;
                println!(
                    "#{:<4} {:<12} {:>8.2} {:<6} {}",
                    r.id,
                    row.pump_reference.unwrap_or("?"),
                    r.flow_rate,
                    r.unit.as_wire(),
                    r.measured_at.as_ref().map(format_local).unwrap_or_default()
                );
            }
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = load_dashboard_config()?;
    tracing::info!(base_url = %config.gateway.base_url, "starting irrigation dashboard");

    let gateway: Arc<dyn RemoteGateway> = Arc::new(HttpGateway::from_settings(&config.gateway)?);
    let mut selector = ViewSelector::new(gateway, config.policies, Collection::Pumps);

    let mut section = None;
    for collection in Collection::ALL {
        if section != Some(collection.section()) {
            section = Some(collection.section());
            println!("### {}", collection.section().label());
        }
        if let Err(e) = selector.switch_to(collection).await {
            tracing::error!(%collection, error = %e, "failed to load view");
            continue;
        }
        print_section(&selector, collection);
    }

    Ok(())
}
