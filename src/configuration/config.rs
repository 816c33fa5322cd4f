//! Configuration types for loading simulation scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! simulation scenario. A scenario consists of:
//!
//! - [`EngineConfig`]     – which force evaluator to run, and how
//! - [`ParametersConfig`] – step count, step size and unit scaling
//! - initial conditions, given in exactly one of three ways:
//!   - `bodies`   – a list of [`BodyConfig`]
//!   - `rows`     – the raw `[x, y, z, vx, vy, vz, m]` table
//!   - `generate` – a [`GenerateConfig`] preset
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! # YAML format
//! ```yaml
//! engine:
//!   solver: "octree"          # or "direct"
//!   parallel: false           # direct solver only
//!   approximation: "far_field" # or "placeholder"
//!   octree_depth: 3
//!
//! parameters:
//!   num_time_steps: 365       # snapshots, including t = 0
//!   delta_t: 1.0              # days per step
//!
//! bodies:
//!   - x: [ 0.0, 0.0, 0.0 ]
//!     v: [ 0.0, 0.0, 0.0 ]
//!     m: 1.0e7
//!   - x: [ 1.0, 0.0, 0.0 ]
//!     v: [ 0.0, 1.0, 0.0 ]
//!     m: 1.0
//! ```
//!
//! `Scenario::build_scenario` validates this into a `Scenario`, and
//! `Scenario::into_system` turns that into a ready-to-run `System`.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Deserialize;

use crate::simulation::error::Result;

/// Which force evaluator a run uses. Fixed for the whole run.
/// `solver: "direct"` or `solver: "octree"`
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Solver {
    #[serde(rename = "direct")] // Exact O(N^2) pairwise summation
    Direct,

    #[serde(rename = "octree")] // Octree decomposition, then an approximate update
    Octree,
}

/// What the octree evaluator does with the decomposition
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Approximation {
    // single representative partner per body, parity-dependent sign
    #[serde(rename = "placeholder")]
    Placeholder,

    #[default]
    #[serde(rename = "far_field")] // exact near field, leaf centroids for the far field
    FarField,
}

/// Initial-condition presets
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerateKind {
    #[serde(rename = "sun_earth")]
    SunEarth,

    #[serde(rename = "random_cluster")]
    RandomCluster,
}

#[derive(Deserialize, Debug, Clone)]
pub struct EngineConfig {
    pub solver: Solver,
    #[serde(default)]
    pub parallel: bool, // direct solver: split the pair loop across threads
    #[serde(default)]
    pub approximation: Approximation,
    pub octree_depth: Option<usize>, // deepest layer, root is 0
}

#[derive(Deserialize, Debug, Clone)]
pub struct ParametersConfig {
    pub num_time_steps: usize,            // snapshots including the initial one
    pub delta_t: f64,                     // nominal step size (days)
    pub time_scaling_factor: Option<f64>, // step size scaling into simulation time
    pub force_factor: Option<f64>,        // scaling applied to G
}

/// One body's initial state
#[derive(Deserialize, Debug, Clone)]
pub struct BodyConfig {
    pub x: [f64; 3], // position (AU)
    pub v: [f64; 3], // velocity (AU per simulation time unit)
    pub m: f64,      // mass (Earth masses)
}

#[derive(Deserialize, Debug, Clone)]
pub struct GenerateConfig {
    pub kind: GenerateKind,
    #[serde(default)]
    pub count: usize, // random_cluster only
    #[serde(default)]
    pub seed: u64,
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone)]
pub struct ScenarioConfig {
    pub engine: EngineConfig,
    pub parameters: ParametersConfig,
    pub bodies: Option<Vec<BodyConfig>>,
    pub rows: Option<Vec<[f64; 7]>>,
    pub generate: Option<GenerateConfig>,
}

impl ScenarioConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        Ok(serde_yaml::from_reader(reader)?)
    }
}
