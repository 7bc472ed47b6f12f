use std::net::SocketAddr;

use crate::server::error::config::ConfigError;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";

/// URLs of the CSV files imported by `PATCH /territoires`.
///
/// A missing URL skips the matching import.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TerritorySources {
    pub regions_url: Option<String>,
    pub departements_url: Option<String>,
    pub epcis_url: Option<String>,
    pub communes_url: Option<String>,
}

pub struct Config {
    pub database_url: String,
    pub valkey_url: String,
    pub bind_address: SocketAddr,
    pub territory_sources: TerritorySources,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_address = optional_var("BIND_ADDRESS")
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidEnvValue {
                var: "BIND_ADDRESS".to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            database_url: required_var("DATABASE_URL")?,
            valkey_url: required_var("VALKEY_URL")?,
            bind_address,
            territory_sources: TerritorySources {
                regions_url: optional_var("TERRITORIES_REGIONS_URL"),
                departements_url: optional_var("TERRITORIES_DEPARTEMENTS_URL"),
                epcis_url: optional_var("TERRITORIES_EPCIS_URL"),
                communes_url: optional_var("TERRITORIES_COMMUNES_URL"),
            },
        })
    }
}

fn required_var(var: &str) -> Result<String, ConfigError> {
    std::env::var(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
}

fn optional_var(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|value| !value.is_empty())
}
