//! Numerical and physical parameters for the simulation
//!
//! Simulation units: distance in astronomical units, time in days, mass in
//! Earth masses. The two scaling factors map those units onto the SI
//! gravitational constant.

use super::error::{Result, SimError};

pub const GRAVITATIONAL_CONSTANT: f64 = 6.67430e-11;
pub const TIME_SCALING_FACTOR: f64 = 1.723e-2;
pub const GRAVITATIONAL_FORCE_FACTOR: f64 = 1.4982e3;

pub const DEFAULT_TIME_STEPS: usize = 200; // 365 steps of 1.0 is one year
pub const DEFAULT_DELTA_T: f64 = 1.0; // one day per step

pub const OCTREE_ARITY: usize = 8;
pub const DEFAULT_OCTREE_DEPTH: usize = 3;
pub const MAX_OCTREE_DEPTH: usize = 7;

/// Padding added on every side of the bodies' bounding box before it
/// becomes the root region.
pub const BOUNDARY_BUFFER: f64 = 0.1;

/// Gravitational constant in simulation units.
pub fn adjusted_gravitational_constant(force_factor: f64) -> f64 {
    GRAVITATIONAL_CONSTANT * force_factor
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    pub num_time_steps: usize, // snapshots, including the initial condition
    pub delta_t: f64,          // nominal step size (days)
    pub actual_delta_t: f64,   // delta_t * time scaling factor
    pub g_adj: f64,            // G * force factor
    pub octree_depth: usize,   // deepest octree layer (root is 0)
}

impl Parameters {
    /// Parameters with the default unit scaling and octree depth.
    pub fn new(num_time_steps: usize, delta_t: f64) -> Result<Self> {
        Self::with_scaling(
            num_time_steps,
            delta_t,
            TIME_SCALING_FACTOR,
            GRAVITATIONAL_FORCE_FACTOR,
            DEFAULT_OCTREE_DEPTH,
        )
    }

    pub fn with_scaling(
        num_time_steps: usize,
        delta_t: f64,
        time_scaling_factor: f64,
        force_factor: f64,
        octree_depth: usize,
    ) -> Result<Self> {
        if num_time_steps == 0 {
            return Err(SimError::NonPositiveTimeSteps);
        }
        check_positive("delta_t", delta_t)?;
        check_positive("time_scaling_factor", time_scaling_factor)?;
        check_positive("force_factor", force_factor)?;
        check_depth(octree_depth)?;

        Ok(Self {
            num_time_steps,
            delta_t,
            actual_delta_t: delta_t * time_scaling_factor,
            g_adj: adjusted_gravitational_constant(force_factor),
            octree_depth,
        })
    }

    pub fn with_octree_depth(mut self, depth: usize) -> Result<Self> {
        check_depth(depth)?;
        self.octree_depth = depth;
        Ok(self)
    }

    /// Re-check values that may have been edited after construction.
    pub fn validate(&self) -> Result<()> {
        if self.num_time_steps == 0 {
            return Err(SimError::NonPositiveTimeSteps);
        }
        check_positive("delta_t", self.delta_t)?;
        check_positive("actual_delta_t", self.actual_delta_t)?;
        check_positive("g_adj", self.g_adj)?;
        check_depth(self.octree_depth)
    }
}

fn check_depth(depth: usize) -> Result<()> {
    if depth == 0 || depth > MAX_OCTREE_DEPTH {
        return Err(SimError::InvalidParameter {
            name: "octree_depth",
            value: format!("{depth} (expected 1..={MAX_OCTREE_DEPTH})"),
        });
    }
    Ok(())
}

fn check_positive(name: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(SimError::InvalidParameter { name, value: value.to_string() });
    }
    Ok(())
}
