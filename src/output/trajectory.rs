//! Trajectory export
//!
//! The data handed to an external writer: every position of every body at
//! every step, plus the static mass array. Velocities stay inside the
//! `System`.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::simulation::error::Result;
use crate::simulation::system::System;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Trajectory {
    pub positions: Vec<Vec<[f64; 3]>>, // [step][body]
    pub masses: Vec<f64>,              // [body]
}

impl Trajectory {
    pub fn num_time_steps(&self) -> usize {
        self.positions.len()
    }

    pub fn num_bodies(&self) -> usize {
        self.masses.len()
    }
}

/// Copy the trajectory out of a system. Steps not computed yet are exported
/// as they are (zero for a fresh system).
pub fn export_trajectory(system: &System) -> Trajectory {
    let timeline = system.timeline();
    let positions = (0..timeline.num_time_steps())
        .map(|step| {
            timeline
                .positions(step)
                .iter()
                .map(|p| [p.x, p.y, p.z])
                .collect()
        })
        .collect();

    Trajectory {
        positions,
        masses: timeline.masses().to_vec(),
    }
}

pub fn write_trajectory_yaml(trajectory: &Trajectory, path: impl AsRef<Path>) -> Result<()> {
    let file = File::create(path)?;
    serde_yaml::to_writer(BufWriter::new(file), trajectory)?;
    Ok(())
}
