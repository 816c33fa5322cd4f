//! Build fully-initialized simulation scenarios from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces a runtime bundle
//! (`Scenario`) containing:
//! - engine settings (`Engine`)
//! - numerical parameters (`Parameters`)
//! - initial conditions (`Body` rows for t = 0)
//!
//! `Scenario::into_system` then hands those to a ready-to-run `System`.
//! The preset generators below produce the same kind of initial conditions
//! an external loader would.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::configuration::config::{BodyConfig, GenerateConfig, GenerateKind, ScenarioConfig};
use crate::simulation::engine::Engine;
use crate::simulation::error::{Result, SimError};
use crate::simulation::params::{
    adjusted_gravitational_constant, Parameters, DEFAULT_OCTREE_DEPTH, GRAVITATIONAL_FORCE_FACTOR,
    TIME_SCALING_FACTOR,
};
use crate::simulation::states::{Body, NVec3};
use crate::simulation::system::System;

pub const DEFAULT_MASS: f64 = 1.0;
pub const SUN_MASS: f64 = 1.0e7; // Earth masses

pub struct Scenario {
    pub engine: Engine,
    pub parameters: Parameters,
    pub bodies: Vec<Body>,
}

impl Scenario {
    pub fn build_scenario(cfg: ScenarioConfig) -> Result<Self> {
        // Initial conditions: exactly one source
        let sources = [cfg.bodies.is_some(), cfg.rows.is_some(), cfg.generate.is_some()];
        let bodies = match (cfg.bodies, cfg.rows, cfg.generate) {
            (Some(list), None, None) => list.iter().map(body_from_config).collect(),
            (None, Some(rows), None) => rows.into_iter().map(Body::from_row).collect(),
            (None, None, Some(gen)) => generate(&gen)?,
            _ => {
                let given = sources.iter().filter(|s| **s).count();
                return Err(SimError::InvalidScenario(format!(
                    "expected exactly one of `bodies`, `rows` or `generate`, found {given}"
                )));
            }
        };

        // Parameters (runtime) from ParametersConfig
        let p_cfg = cfg.parameters;
        let parameters = Parameters::with_scaling(
            p_cfg.num_time_steps,
            p_cfg.delta_t,
            p_cfg.time_scaling_factor.unwrap_or(TIME_SCALING_FACTOR),
            p_cfg.force_factor.unwrap_or(GRAVITATIONAL_FORCE_FACTOR),
            cfg.engine.octree_depth.unwrap_or(DEFAULT_OCTREE_DEPTH),
        )?;

        // Engine (runtime) from EngineConfig
        let engine = Engine {
            solver: cfg.engine.solver,
            parallel: cfg.engine.parallel,
            approximation: cfg.engine.approximation,
        };

        Ok(Self { engine, parameters, bodies })
    }

    pub fn into_system(self) -> Result<System> {
        System::new(&self.bodies, self.parameters, self.engine)
    }
}

fn body_from_config(bc: &BodyConfig) -> Body {
    Body::new(NVec3::from(bc.x), NVec3::from(bc.v), bc.m)
}

fn generate(cfg: &GenerateConfig) -> Result<Vec<Body>> {
    match cfg.kind {
        GenerateKind::SunEarth => Ok(sun_earth()),
        GenerateKind::RandomCluster if cfg.count == 0 => Err(SimError::InvalidScenario(
            "random_cluster needs a positive `count`".to_string(),
        )),
        GenerateKind::RandomCluster => Ok(random_cluster(cfg.count, cfg.seed)),
    }
}

/// Speed of a circular orbit of radius `r` around mass `m_central`, with the
/// default unit scaling.
pub fn circular_velocity(m_central: f64, r: f64) -> f64 {
    (adjusted_gravitational_constant(GRAVITATIONAL_FORCE_FACTOR) * m_central / r).sqrt()
}

/// A sun at rest at the origin and an Earth-mass body on a circular orbit at 1 AU.
pub fn sun_earth() -> Vec<Body> {
    vec![
        Body::new(NVec3::zeros(), NVec3::zeros(), SUN_MASS),
        Body::new(
            NVec3::new(1.0, 0.0, 0.0),
            NVec3::new(0.0, circular_velocity(SUN_MASS, 1.0), 0.0),
            DEFAULT_MASS,
        ),
    ]
}

/// `count` bodies with positions in [-5, 5)³, velocities in [-1, 1)³ and
/// masses in multiples of 1000 below 1e7 (never below `DEFAULT_MASS`).
/// The same seed always gives the same bodies.
pub fn random_cluster(count: usize, seed: u64) -> Vec<Body> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let x = NVec3::new(
                rng.random_range(-5.0..5.0),
                rng.random_range(-5.0..5.0),
                rng.random_range(-5.0..5.0),
            );
            let v = NVec3::new(
                rng.random_range(-1.0..1.0),
                rng.random_range(-1.0..1.0),
                rng.random_range(-1.0..1.0),
            );
            let m = (rng.random_range(0..10_000u32) as f64 * 1000.0).max(DEFAULT_MASS);
            Body::new(x, v, m)
        })
        .collect()
}
