//! Error type shared by the whole simulation core.
//!
//! Everything that is not explicitly tolerated (coincident bodies give a zero
//! force and never end up here) is fatal to the run.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("expected {expected} initial-condition rows, found {found}")]
    BodyCountMismatch { expected: usize, found: usize },

    #[error("number of time steps must be at least 1")]
    NonPositiveTimeSteps,

    #[error("invalid parameter `{name}`: {value}")]
    InvalidParameter { name: &'static str, value: String },

    #[error("initial condition row {row}: field `{field}` is not finite")]
    NonFiniteInitialCondition { row: usize, field: &'static str },

    #[error("initial condition row {row}: mass must be positive, got {mass}")]
    NonPositiveMass { row: usize, mass: f64 },

    #[error("time step {step} is out of range (timeline holds {len} steps)")]
    StepOutOfRange { step: usize, len: usize },

    #[error("time step {step} cannot run before step {expected}")]
    StepOutOfOrder { step: usize, expected: usize },

    #[error("run already finished; build a new System to run again")]
    RunFinished,

    #[error("invalid scenario: {0}")]
    InvalidScenario(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SimError>;
