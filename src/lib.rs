pub mod simulation;
pub mod configuration;
pub mod output;
pub mod benchmark;

pub use simulation::error::{Result, SimError};
pub use simulation::states::{Body, Frame, Timeline, NVec3};
pub use simulation::params::Parameters;
pub use simulation::engine::Engine;
pub use simulation::forces::{gravitational_force, VelocityUpdate, DirectGravity, OctreeGravity};
pub use simulation::octree::{Octree, OctreeNode};
pub use simulation::system::{System, RunState, RunSummary};
pub use simulation::scenario::{Scenario, sun_earth, random_cluster};

pub use configuration::config::{
    ScenarioConfig, EngineConfig, ParametersConfig, BodyConfig, Solver, Approximation,
};

pub use output::trajectory::{Trajectory, export_trajectory, write_trajectory_yaml};

pub use benchmark::benchmark::bench_solvers;
