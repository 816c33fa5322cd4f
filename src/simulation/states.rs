//! Core state types for the N-body simulation.
//!
//! - `Body` is one initial-condition row (position, velocity, mass)
//! - `Timeline` owns every snapshot of the run: one position and one
//!   velocity per body per time step, plus the mass array shared by all steps
//!
//! Snapshot 0 is the initial condition. Snapshot `t > 0` is only complete
//! once the controller has run carry-forward, the velocity update and the
//! position update for `t`, in that order.

use nalgebra::Vector3;

use super::error::{Result, SimError};

pub type NVec3 = Vector3<f64>;

/// Number of scalar fields in one initial-condition row: x, y, z, vx, vy, vz, mass.
pub const NUM_VALUES: usize = 7;

const FIELD_NAMES: [&str; NUM_VALUES] = ["x", "y", "z", "vx", "vy", "vz", "mass"];

#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub x: NVec3, // position
    pub v: NVec3, // velocity
    pub m: f64,   // mass
}

impl Body {
    pub fn new(x: NVec3, v: NVec3, m: f64) -> Self {
        Self { x, v, m }
    }

    /// Build a body from a `[x, y, z, vx, vy, vz, mass]` row.
    pub fn from_row(row: [f64; NUM_VALUES]) -> Self {
        Self {
            x: NVec3::new(row[0], row[1], row[2]),
            v: NVec3::new(row[3], row[4], row[5]),
            m: row[6],
        }
    }

    pub fn to_row(&self) -> [f64; NUM_VALUES] {
        [self.x.x, self.x.y, self.x.z, self.v.x, self.v.y, self.v.z, self.m]
    }
}

/// Borrowed view of one snapshot, split so an evaluator can read positions
/// and masses while writing velocities in place.
pub struct Frame<'a> {
    pub positions: &'a [NVec3],
    pub velocities: &'a mut [NVec3],
    pub masses: &'a [f64],
}

#[derive(Debug, Clone)]
pub struct Timeline {
    positions: Vec<Vec<NVec3>>,  // [step][body]
    velocities: Vec<Vec<NVec3>>, // [step][body]
    masses: Vec<f64>,            // [body], time invariant
    filled: usize,               // number of complete snapshots
    open: Option<usize>,         // step carried forward but not yet finished
}

impl Timeline {
    /// Reserve storage for `num_time_steps` snapshots of `num_bodies` bodies.
    pub fn new(num_time_steps: usize, num_bodies: usize) -> Self {
        Self {
            positions: vec![vec![NVec3::zeros(); num_bodies]; num_time_steps],
            velocities: vec![vec![NVec3::zeros(); num_bodies]; num_time_steps],
            masses: vec![0.0; num_bodies],
            filled: 0,
            open: None,
        }
    }

    /// Write snapshot 0 and the mass array.
    ///
    /// Fails if the row count does not match the body count this timeline was
    /// built for, if any field is not finite, or if any mass is not positive.
    /// Can only be called once.
    pub fn initialize(&mut self, bodies: &[Body]) -> Result<()> {
        if self.filled != 0 {
            return Err(SimError::StepOutOfOrder { step: 0, expected: self.filled });
        }
        if self.num_time_steps() == 0 {
            return Err(SimError::NonPositiveTimeSteps);
        }
        if bodies.len() != self.num_bodies() {
            return Err(SimError::BodyCountMismatch {
                expected: self.num_bodies(),
                found: bodies.len(),
            });
        }

        for (row, b) in bodies.iter().enumerate() {
            let values = b.to_row();
            if let Some(field) = values.iter().position(|v| !v.is_finite()) {
                return Err(SimError::NonFiniteInitialCondition { row, field: FIELD_NAMES[field] });
            }
            if b.m <= 0.0 {
                return Err(SimError::NonPositiveMass { row, mass: b.m });
            }
        }

        for (i, b) in bodies.iter().enumerate() {
            self.positions[0][i] = b.x;
            self.velocities[0][i] = b.v;
            self.masses[i] = b.m;
        }
        self.filled = 1;
        Ok(())
    }

    /// Copy positions and velocities of step `step - 1` into `step` verbatim.
    pub fn carry_forward(&mut self, step: usize) -> Result<()> {
        self.check_range(step)?;
        if step == 0 || step != self.filled || self.open.is_some() {
            return Err(SimError::StepOutOfOrder { step, expected: self.filled });
        }

        let (done, rest) = self.positions.split_at_mut(step);
        rest[0].copy_from_slice(&done[step - 1]);
        let (done, rest) = self.velocities.split_at_mut(step);
        rest[0].copy_from_slice(&done[step - 1]);

        self.open = Some(step);
        Ok(())
    }

    /// Finish `step`: `x_t = x_{t-1} + v_t * dt`.
    ///
    /// Uses the velocity already updated for `step` (symplectic Euler), so it
    /// must run after the force update.
    pub fn advance_positions(&mut self, step: usize, dt: f64) -> Result<()> {
        self.check_range(step)?;
        if self.open != Some(step) {
            return Err(SimError::StepOutOfOrder { step, expected: self.filled });
        }

        let (done, rest) = self.positions.split_at_mut(step);
        let prev = &done[step - 1];
        let v = &self.velocities[step];
        for ((x, x_prev), v) in rest[0].iter_mut().zip(prev.iter()).zip(v.iter()) {
            *x = x_prev + v * dt;
        }

        self.open = None;
        self.filled = step + 1;
        Ok(())
    }

    /// Mutable view of the step currently being processed.
    pub fn frame_mut(&mut self, step: usize) -> Result<Frame<'_>> {
        self.check_range(step)?;
        if self.open != Some(step) {
            return Err(SimError::StepOutOfOrder { step, expected: self.filled });
        }
        Ok(Frame {
            positions: &self.positions[step],
            velocities: &mut self.velocities[step],
            masses: &self.masses,
        })
    }

    pub fn positions(&self, step: usize) -> &[NVec3] {
        &self.positions[step]
    }

    pub fn velocities(&self, step: usize) -> &[NVec3] {
        &self.velocities[step]
    }

    pub fn masses(&self) -> &[f64] {
        &self.masses
    }

    pub fn num_bodies(&self) -> usize {
        self.masses.len()
    }

    pub fn num_time_steps(&self) -> usize {
        self.positions.len()
    }

    /// Number of snapshots that are complete (0 before `initialize`).
    pub fn steps_filled(&self) -> usize {
        self.filled
    }

    pub fn total_mass(&self) -> f64 {
        self.masses.iter().sum()
    }

    /// Mass-weighted sum of velocities at `step`.
    pub fn total_momentum(&self, step: usize) -> NVec3 {
        self.velocities[step]
            .iter()
            .zip(self.masses.iter())
            .fold(NVec3::zeros(), |acc, (v, m)| acc + v * *m)
    }

    pub fn center_of_mass(&self, step: usize) -> NVec3 {
        let total = self.total_mass();
        if total == 0.0 {
            return NVec3::zeros();
        }
        let weighted = self.positions[step]
            .iter()
            .zip(self.masses.iter())
            .fold(NVec3::zeros(), |acc, (x, m)| acc + x * *m);
        weighted / total
    }

    fn check_range(&self, step: usize) -> Result<()> {
        if step >= self.num_time_steps() {
            return Err(SimError::StepOutOfRange { step, len: self.num_time_steps() });
        }
        Ok(())
    }
}
