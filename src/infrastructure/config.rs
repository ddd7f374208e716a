use crate::application::views::ViewPolicies;
use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError};
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_TIMEOUT_MS: i64 = 5000;

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    pub gateway: GatewaySettings,
    #[serde(default)]
    pub policies: ViewPolicies,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GatewaySettings {
    pub base_url: String,
    pub timeout_ms: u64,
}

impl GatewaySettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    config::Config::builder()
        .set_default("gateway.base_url", DEFAULT_BASE_URL)?
        .set_default("gateway.timeout_ms", DEFAULT_TIMEOUT_MS)
}

/// Defaults, then `config/dashboard.*` when present, then `DASHBOARD__*` variables
/// (for example `DASHBOARD__GATEWAY__BASE_URL`).
pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    let settings = with_defaults()?
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(
            config::Environment::with_prefix("DASHBOARD")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Parse a TOML document on top of the defaults.
pub fn parse_dashboard_config(toml: &str) -> anyhow::Result<DashboardConfig> {
    let settings = with_defaults()?
        .add_source(config::File::from_str(toml, config::FileFormat::Toml))
        .build()?;

    Ok(settings.try_deserialize()?)
}
