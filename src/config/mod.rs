//! Externally-supplied configuration.
//!
//! Playoff rosters and projected season statistics are data files, not code,
//! so seasons and projections are swappable without a rebuild. Endpoint
//! credentials come from the environment (or a TOML file), never from
//! literals.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::error::{OracleError, Result};
use crate::domain::ProjectedTeam;

/// Environment variable naming the inference endpoint URL.
pub const ENDPOINT_URL_VAR: &str = "ORACLE_ENDPOINT_URL";
/// Environment variable holding the endpoint bearer key.
pub const API_KEY_VAR: &str = "ORACLE_API_KEY";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EndpointConfig {
    pub url: String,
    pub api_key: String,
}

impl EndpointConfig {
    /// Read endpoint credentials from the environment.
    pub fn from_env() -> Result<Self> {
        let url = std::env::var(ENDPOINT_URL_VAR).map_err(|_| OracleError::Config {
            message: format!("{ENDPOINT_URL_VAR} is not set"),
        })?;
        let api_key = std::env::var(API_KEY_VAR).map_err(|_| OracleError::Config {
            message: format!("{API_KEY_VAR} is not set"),
        })?;
        Ok(Self { url, api_key })
    }

    /// Read endpoint credentials from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| OracleError::Config {
            message: format!(
                "failed to read endpoint config {}: {e}",
                path.as_ref().display()
            ),
        })?;
        Ok(toml::from_str(&content)?)
    }
}

/// Authoritative playoff rosters, keyed by the season's ending year.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PlayoffRosters {
    seasons: HashMap<u16, Vec<String>>,
}

impl PlayoffRosters {
    /// Load rosters from a JSON document of `{ "2024": ["Boston Celtics", ...] }`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| OracleError::Config {
            message: format!("failed to read rosters {}: {e}", path.as_ref().display()),
        })?;
        let seasons: HashMap<u16, Vec<String>> =
            serde_json::from_str(&content).map_err(|e| OracleError::Config {
                message: format!("failed to parse rosters {}: {e}", path.as_ref().display()),
            })?;
        Ok(Self { seasons })
    }

    /// Team set for one season; empty when the season is unknown.
    pub fn teams_for(&self, season: u16) -> HashSet<String> {
        self.seasons
            .get(&season)
            .map(|teams| teams.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn known_seasons(&self) -> Vec<u16> {
        let mut seasons: Vec<u16> = self.seasons.keys().copied().collect();
        seasons.sort_unstable();
        seasons
    }
}

/// Model description carried through to the prediction report.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelDescriptor {
    pub name: String,
    pub algorithm: String,
    pub accuracy: String,
    pub training_date: String,
}

/// A projection set: one season's projected team statistics plus the
/// metadata of the model that will score them.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProjectionSet {
    pub season: u16,
    pub model: ModelDescriptor,
    pub teams: Vec<ProjectedTeam>,
}

impl ProjectionSet {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| OracleError::Config {
            message: format!(
                "failed to read projections {}: {e}",
                path.as_ref().display()
            ),
        })?;
        let set: ProjectionSet =
            serde_json::from_str(&content).map_err(|e| OracleError::Config {
                message: format!(
                    "failed to parse projections {}: {e}",
                    path.as_ref().display()
                ),
            })?;
        if set.teams.is_empty() {
            return Err(OracleError::Config {
                message: "projection set contains no teams".to_string(),
            });
        }
        Ok(set)
    }
}
