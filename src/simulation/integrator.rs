//! Fixed-step time integrator for the N-body system
//!
//! One step of semi-implicit (symplectic) Euler: velocities are kicked with
//! the forces at the carried-forward positions, then positions drift with
//! the new velocities.

use log::debug;

use super::error::Result;
use super::forces::VelocityUpdate;
use super::octree::Octree;
use super::params::Parameters;
use super::states::Timeline;

/// Advance the timeline from `step - 1` to `step`.
///
/// Order is fixed: carry forward, decompose (octree evaluators only), kick
/// velocities at `step`, then `x_t = x_{t-1} + v_t dt`. Fails without
/// touching the timeline if `step` is not the next step to compute.
pub fn symplectic_euler_step(
    step: usize,
    timeline: &mut Timeline,
    tree: &mut Octree,
    forces: &dyn VelocityUpdate,
    params: &Parameters,
) -> Result<()> {
    let dt = params.actual_delta_t;

    // Carry: x_t = x_{t-1}, v_t = v_{t-1}
    timeline.carry_forward(step)?;

    if forces.uses_octree() {
        tree.decompose(timeline.positions(step), timeline.masses());
        debug!(
            "step {step}: decomposed {} bodies into {} leaves",
            timeline.num_bodies(),
            tree.leaves().len()
        );
    }

    // Kick: v_t += F(x_t) / m dt
    let frame = timeline.frame_mut(step)?;
    forces.update_velocities(step, frame, tree, dt);

    // Drift: x_t = x_{t-1} + v_t dt
    timeline.advance_positions(step, dt)
}
