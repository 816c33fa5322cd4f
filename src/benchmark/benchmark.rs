use std::time::Instant;

use crate::configuration::config::Approximation;
use crate::simulation::engine::Engine;
use crate::simulation::error::Result;
use crate::simulation::params::Parameters;
use crate::simulation::states::{Body, NVec3};
use crate::simulation::system::System;

/// Compare per-step cost of the solvers for a range of body counts
pub fn bench_solvers() -> Result<()> {
    let ns = [200, 400, 800, 1600, 3200];
    let steps = 3; // steps timed per solver, after the initial condition

    for n in ns {
        let bodies = make_bodies(n);

        let direct = time_per_step(&bodies, steps, Engine::direct())?;
        let parallel = time_per_step(&bodies, steps, Engine::direct_parallel())?;
        let octree = time_per_step(&bodies, steps, Engine::octree(Approximation::FarField))?;

        println!(
            "N = {n:5}, direct = {direct:8.6} s, direct (rayon) = {parallel:8.6} s, \
             octree = {octree:8.6} s"
        );
    }
    Ok(())
}

/// Same comparison as CSV over a finer range of N
/// Paste output directly into a spreadsheet to graph
pub fn bench_solvers_curve() -> Result<()> {
    println!("N,direct_ms,octree_ms");

    for n in (200..=6400).step_by(200) {
        // Large n: only 1 step to avoid minutes of runtime
        let steps = if n <= 1600 { 3 } else { 1 };
        let bodies = make_bodies(n);

        let ms_direct = time_per_step(&bodies, steps, Engine::direct())? * 1000.0;
        let octree = Engine::octree(Approximation::FarField);
        let ms_octree = time_per_step(&bodies, steps, octree)? * 1000.0;

        println!("{n},{ms_direct:.6},{ms_octree:.6}");
    }
    Ok(())
}

fn time_per_step(bodies: &[Body], steps: usize, engine: Engine) -> Result<f64> {
    let params = Parameters::new(steps + 1, 1.0)?;
    let mut system = System::new(bodies, params, engine)?;

    let t0 = Instant::now();
    system.solve()?;
    Ok(t0.elapsed().as_secs_f64() / steps as f64)
}

/// Helper to build `n` bodies, deterministic positions, no rand needed
fn make_bodies(n: usize) -> Vec<Body> {
    (0..n)
        .map(|i| {
            let i_f = i as f64;
            let x = NVec3::new(
                (i_f * 0.37).sin() * 5.0,
                (i_f * 0.13).cos() * 5.0,
                (i_f * 0.07).sin() * 5.0,
            );
            Body::new(x, NVec3::zeros(), 1.0)
        })
        .collect()
}
