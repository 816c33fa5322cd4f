//! High-level runtime engine settings
//!
//! Selects the force evaluator for a run. The choice is made once, when the
//! `System` is built, so strategies can never be mixed within a run.

use crate::configuration::config::{Approximation, Solver};
use crate::simulation::forces::{DirectGravity, OctreeGravity, VelocityUpdate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Engine {
    pub solver: Solver,               // direct or octree
    pub parallel: bool,               // direct solver: rayon pair loop
    pub approximation: Approximation, // octree solver: what to do with the tree
}

impl Engine {
    pub fn direct() -> Self {
        Self {
            solver: Solver::Direct,
            parallel: false,
            approximation: Approximation::default(),
        }
    }

    pub fn direct_parallel() -> Self {
        Self { parallel: true, ..Self::direct() }
    }

    pub fn octree(approximation: Approximation) -> Self {
        Self {
            solver: Solver::Octree,
            parallel: false,
            approximation,
        }
    }

    /// The velocity-update strategy for this engine.
    pub fn build_forces(&self, g_adj: f64) -> Box<dyn VelocityUpdate + Send + Sync> {
        match self.solver {
            Solver::Direct => Box::new(DirectGravity {
                g_adj,
                parallel: self.parallel,
            }),
            Solver::Octree => Box::new(OctreeGravity {
                g_adj,
                approximation: self.approximation,
            }),
        }
    }
}
