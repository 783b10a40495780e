//! Run configuration loading and validation.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::protocol::{Heading, ResourceKind};
use crate::world::{Coord, GridIsland};

/// Parameters of a single run, loadable from YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Display name of the expedition/island.
    pub name: String,

    /// Seed for deterministic world derivation (landmark placement).
    pub seed: u64,

    /// Action-point budget shared by all actions.
    pub budget: u64,

    /// Crew size; fixed for the whole run, weights action costs.
    pub crew: u32,

    /// Wall-clock deadline for each explorer call, in milliseconds.
    pub timeout_ms: u64,

    /// Number of scoutable landmarks scattered from the seed.
    pub landmarks: usize,

    /// Starting position and heading.
    pub start: StartConfig,

    /// Resource kind -> required amount.
    pub contract: BTreeMap<String, u64>,

    /// The in-memory map description.
    pub map: MapConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StartConfig {
    pub x: i32,
    pub y: i32,
    pub heading: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub width: i32,
    pub height: i32,
    pub deposits: Vec<DepositConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepositConfig {
    pub resource: String,
    pub x: i32,
    pub y: i32,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            seed: 0,
            budget: default_budget(),
            crew: default_crew(),
            timeout_ms: default_timeout_ms(),
            landmarks: default_landmarks(),
            start: StartConfig::default(),
            contract: BTreeMap::new(),
            map: MapConfig::default(),
        }
    }
}

impl Default for StartConfig {
    fn default() -> Self {
        Self {
            x: 1,
            y: 1,
            heading: "EAST".to_string(),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: 30,
            height: 30,
            deposits: Vec::new(),
        }
    }
}

fn default_name() -> String {
    "Lian_Yu".to_string()
}
fn default_budget() -> u64 {
    7000
}
fn default_crew() -> u32 {
    15
}
fn default_timeout_ms() -> u64 {
    2000
}
fn default_landmarks() -> usize {
    10
}

/// Why a configuration cannot start a run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("contract cannot be empty")]
    EmptyContract,

    #[error("contract amount for {0} must be positive")]
    ZeroAmount(String),

    #[error("{0:?} is not a valid resource name")]
    BadResourceName(String),

    #[error("crew must be positive")]
    ZeroCrew,

    #[error("{0:?} is not a valid heading")]
    BadHeading(String),

    #[error("start position ({x}, {y}) is outside the {width}x{height} map")]
    StartOutsideMap {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },
}

impl RunConfig {
    /// Load a configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;
        Ok(config)
    }

    /// Check everything a run requires before the first turn.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.crew == 0 {
            return Err(ConfigError::ZeroCrew);
        }
        self.heading()?;
        self.contract_kinds()?;
        if self.start.x < 0
            || self.start.y < 0
            || self.start.x >= self.map.width
            || self.start.y >= self.map.height
        {
            return Err(ConfigError::StartOutsideMap {
                x: self.start.x,
                y: self.start.y,
                width: self.map.width,
                height: self.map.height,
            });
        }
        Ok(())
    }

    pub fn heading(&self) -> Result<Heading, ConfigError> {
        Heading::from_name(&self.start.heading)
            .ok_or_else(|| ConfigError::BadHeading(self.start.heading.clone()))
    }

    /// The contract with parsed resource kinds. Empty contracts and zero
    /// amounts are configuration errors.
    pub fn contract_kinds(&self) -> Result<BTreeMap<ResourceKind, u64>, ConfigError> {
        if self.contract.is_empty() {
            return Err(ConfigError::EmptyContract);
        }
        let mut contract = BTreeMap::new();
        for (name, amount) in &self.contract {
            let kind = ResourceKind::parse(name)
                .map_err(|_| ConfigError::BadResourceName(name.clone()))?;
            if *amount == 0 {
                return Err(ConfigError::ZeroAmount(kind.to_string()));
            }
            contract.insert(kind, *amount);
        }
        Ok(contract)
    }

    /// Build the in-memory island this configuration describes, with
    /// landmarks scattered from the seed.
    pub fn build_island(&self) -> Result<GridIsland, ConfigError> {
        let mut island = GridIsland::new(self.map.width, self.map.height);
        for deposit in &self.map.deposits {
            let kind = ResourceKind::parse(&deposit.resource)
                .map_err(|_| ConfigError::BadResourceName(deposit.resource.clone()))?;
            island.add_deposit(Coord::new(deposit.x, deposit.y), kind);
        }
        island.scatter_landmarks(self.seed, self.landmarks);
        Ok(island)
    }
}
