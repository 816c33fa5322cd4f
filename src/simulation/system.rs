//! Simulation controller
//!
//! A `System` owns the timeline, the octree and the evaluator chosen for the
//! run, and drives the steps in order:
//! `Initialized -> Stepping* -> Done`. A finished run cannot be resumed or
//! replayed; build a new `System` instead.

use std::time::Instant;

use log::{debug, info, warn};

use super::engine::Engine;
use super::error::{Result, SimError};
use super::forces::VelocityUpdate;
use super::integrator::symplectic_euler_step;
use super::octree::Octree;
use super::params::Parameters;
use super::states::{Body, Timeline};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Initialized,                   // snapshot 0 written
    Stepping { completed: usize }, // last finished step
    Done,
}

/// What a call to [`System::solve`] did.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub solver: &'static str,
    pub steps_computed: usize,
    pub elapsed_secs: f64,
}

pub struct System {
    timeline: Timeline,
    octree: Octree,
    parameters: Parameters,
    engine: Engine,
    forces: Box<dyn VelocityUpdate + Send + Sync>,
    state: RunState,
}

impl System {
    /// Validate the inputs and write snapshot 0.
    ///
    /// Every configuration error is reported here, before any step runs.
    pub fn new(bodies: &[Body], parameters: Parameters, engine: Engine) -> Result<Self> {
        parameters.validate()?;

        let mut timeline = Timeline::new(parameters.num_time_steps, bodies.len());
        timeline.initialize(bodies)?;

        let forces = engine.build_forces(parameters.g_adj);
        // the direct solver never reads the tree, keep only the root
        let depth = if forces.uses_octree() { parameters.octree_depth } else { 0 };
        let octree = Octree::new(depth);

        Ok(Self {
            timeline,
            octree,
            parameters,
            engine,
            forces,
            state: RunState::Initialized,
        })
    }

    /// Like [`System::new`], checking the row count against `num_bodies`.
    pub fn with_body_count(
        bodies: &[Body],
        num_bodies: usize,
        parameters: Parameters,
        engine: Engine,
    ) -> Result<Self> {
        if bodies.len() != num_bodies {
            return Err(SimError::BodyCountMismatch {
                expected: num_bodies,
                found: bodies.len(),
            });
        }
        Self::new(bodies, parameters, engine)
    }

    /// Compute the next step and return its index.
    pub fn step(&mut self) -> Result<usize> {
        if self.state == RunState::Done {
            return Err(SimError::RunFinished);
        }

        let step = self.timeline.steps_filled();
        if step >= self.timeline.num_time_steps() {
            self.state = RunState::Done;
            return Err(SimError::RunFinished);
        }

        symplectic_euler_step(
            step,
            &mut self.timeline,
            &mut self.octree,
            self.forces.as_ref(),
            &self.parameters,
        )?;

        self.state = if step + 1 == self.timeline.num_time_steps() {
            RunState::Done
        } else {
            RunState::Stepping { completed: step }
        };
        debug!("[{}] finished step {step}", self.forces.name());
        Ok(step)
    }

    /// Run every remaining step.
    pub fn solve(&mut self) -> Result<RunSummary> {
        if self.state == RunState::Done {
            return Err(SimError::RunFinished);
        }

        let solver = self.forces.name();
        let remaining = self.timeline.num_time_steps() - self.timeline.steps_filled();
        if remaining == 0 {
            warn!("[{solver}] no additional time steps to solve for");
            self.state = RunState::Done;
            return Ok(RunSummary { solver, steps_computed: 0, elapsed_secs: 0.0 });
        }

        info!("[{solver}] solving for {remaining} additional time steps");
        let start = Instant::now();
        for _ in 0..remaining {
            self.step()?;
        }
        let elapsed_secs = start.elapsed().as_secs_f64();
        info!("[{solver}] done in {elapsed_secs:.6} s");

        Ok(RunSummary { solver, steps_computed: remaining, elapsed_secs })
    }

    /// Human-readable state of one body at one step.
    pub fn describe_body(&self, body: usize, step: usize) -> String {
        let x = self.timeline.positions(step)[body];
        let v = self.timeline.velocities(step)[body];
        let m = self.timeline.masses()[body];
        format!(
            "body {body} at step {step}: position ({:.6}, {:.6}, {:.6}), \
             velocity ({:.6}, {:.6}, {:.6}), mass {m}",
            x.x, x.y, x.z, v.x, v.y, v.z
        )
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn octree(&self) -> &Octree {
        &self.octree
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn run_state(&self) -> RunState {
        self.state
    }

    pub fn num_bodies(&self) -> usize {
        self.timeline.num_bodies()
    }

    pub fn num_time_steps(&self) -> usize {
        self.timeline.num_time_steps()
    }
}
