//! Gravitational force and velocity-update strategies
//!
//! Defines the pairwise force law and the [`VelocityUpdate`] trait, with a
//! direct O(N²) evaluator and an octree-based one

use rayon::prelude::*;

use crate::configuration::config::Approximation;
use crate::simulation::octree::Octree;
use crate::simulation::states::{Frame, NVec3};

/// Newtonian force exerted on body 2 by body 1.
///
/// `F = g_adj * m1 * m2 / r²`, pointing from `x2` towards `x1`. Coincident
/// bodies give the zero vector instead of dividing by zero.
///
/// `m1 * m2` is formed before scaling by `g_adj`, so swapping the two bodies
/// returns the exact negation.
pub fn gravitational_force(x1: &NVec3, x2: &NVec3, m1: f64, m2: f64, g_adj: f64) -> NVec3 {
    let d = x1 - x2;
    let r2 = d.dot(&d);
    let r = r2.sqrt();
    if r == 0.0 {
        return NVec3::zeros();
    }

    let magnitude = g_adj * (m1 * m2) / r2;
    d * (magnitude / r)
}

/// A strategy that updates the velocities of the step being processed.
///
/// The frame holds positions already carried forward to `step`; the
/// implementation writes the new velocities in place.
pub trait VelocityUpdate {
    fn name(&self) -> &'static str;

    /// Whether the controller must decompose the octree before calling
    /// [`VelocityUpdate::update_velocities`].
    fn uses_octree(&self) -> bool {
        false
    }

    fn update_velocities(&self, step: usize, frame: Frame<'_>, tree: &Octree, dt: f64);
}

// =========================================================================================
// Direct evaluator
// =========================================================================================

/// Exact pairwise gravity, every unordered pair once
pub struct DirectGravity {
    pub g_adj: f64,
    pub parallel: bool, // split across rayon workers, one body per task
}

impl VelocityUpdate for DirectGravity {
    fn name(&self) -> &'static str {
        "direct"
    }

    fn update_velocities(&self, _step: usize, frame: Frame<'_>, _tree: &Octree, dt: f64) {
        if self.parallel {
            update_velocities_direct_parallel(frame, self.g_adj, dt);
        } else {
            update_velocities_direct(frame, self.g_adj, dt);
        }
    }
}

/// For every pair `(i, j)` with `i < j`: `v_i -= F/m_i dt`, `v_j += F/m_j dt`
/// where `F` is the force on `j` from `i`. Equal and opposite, so total
/// momentum is conserved.
pub fn update_velocities_direct(frame: Frame<'_>, g_adj: f64, dt: f64) {
    let Frame { positions, velocities, masses } = frame;
    let n = positions.len();

    for i in 0..n {
        for j in (i + 1)..n {
            let f = gravitational_force(&positions[i], &positions[j], masses[i], masses[j], g_adj);

            velocities[i] -= f / masses[i] * dt;
            velocities[j] += f / masses[j] * dt;
        }
    }
}

/// Same update as [`update_velocities_direct`], one task per body.
///
/// Each task owns its body's velocity and walks the partners in ascending
/// index order, applying the same terms in the same order as the sequential
/// loop, so both give identical results.
pub fn update_velocities_direct_parallel(frame: Frame<'_>, g_adj: f64, dt: f64) {
    let Frame { positions, velocities, masses } = frame;

    velocities.par_iter_mut().enumerate().for_each(|(i, v)| {
        for j in 0..positions.len() {
            if j < i {
                let f =
                    gravitational_force(&positions[j], &positions[i], masses[j], masses[i], g_adj);
                *v += f / masses[i] * dt;
            } else if j > i {
                let f =
                    gravitational_force(&positions[i], &positions[j], masses[i], masses[j], g_adj);
                *v -= f / masses[i] * dt;
            }
        }
    });
}

// =========================================================================================
// Octree evaluator
// =========================================================================================

/// Gravity evaluated against the octree decomposition of the current step
pub struct OctreeGravity {
    pub g_adj: f64,
    pub approximation: Approximation,
}

impl VelocityUpdate for OctreeGravity {
    fn name(&self) -> &'static str {
        match self.approximation {
            Approximation::Placeholder => "octree (placeholder)",
            Approximation::FarField => "octree (far field)",
        }
    }

    fn uses_octree(&self) -> bool {
        true
    }

    fn update_velocities(&self, step: usize, frame: Frame<'_>, tree: &Octree, dt: f64) {
        update_velocities_hierarchical(step, frame, tree, self.approximation, self.g_adj, dt);
    }
}

pub fn update_velocities_hierarchical(
    step: usize,
    frame: Frame<'_>,
    tree: &Octree,
    approximation: Approximation,
    g_adj: f64,
    dt: f64,
) {
    match approximation {
        Approximation::Placeholder => update_velocities_placeholder(step, frame, g_adj, dt),
        Approximation::FarField => update_velocities_far_field(frame, tree, g_adj, dt),
    }
}

/// Partner chosen for body `i` by the placeholder evaluator:
/// `trunc(i * vy) mod n`, always a valid index.
pub fn representative_index(i: usize, vy: f64, n: usize) -> usize {
    if n == 0 {
        return 0;
    }
    let raw = (i as f64 * vy).trunc() as i64; // saturates, NaN -> 0
    raw.rem_euclid(n as i64) as usize
}

/// One force per body against a single representative, with a sign that
/// flips with step parity. Kept for parity runs; it does not approximate
/// the direct result.
fn update_velocities_placeholder(step: usize, frame: Frame<'_>, g_adj: f64, dt: f64) {
    let Frame { positions, velocities, masses } = frame;
    let n = positions.len();
    let sign = if step % 2 == 0 { 1.0 } else { -1.0 };

    for i in 0..n {
        // reads the y velocity as already modified earlier in this loop
        let other = representative_index(i, velocities[i].y, n);
        let f =
            gravitational_force(&positions[i], &positions[other], masses[i], masses[other], g_adj);

        velocities[i] += sign * f / masses[i] * dt;
        velocities[other] -= sign * f / masses[other] * dt;
    }
}

/// Near field exact, far field by leaf centroid.
///
/// For each non-empty leaf `L`, bodies in `L` and in its one-away neighbours
/// interact pairwise; every other non-empty leaf is replaced by a point mass
/// at its centroid. Only the target body is kicked, so momentum is conserved
/// approximately rather than exactly.
fn update_velocities_far_field(frame: Frame<'_>, tree: &Octree, g_adj: f64, dt: f64) {
    let Frame { positions, velocities, masses } = frame;
    let occupied: Vec<usize> = tree
        .leaves()
        .iter()
        .copied()
        .filter(|&id| !tree.node(id).bodies.is_empty())
        .collect();

    let mut kicks = vec![NVec3::zeros(); positions.len()];

    for &leaf in &occupied {
        let mut near = tree.neighbors(leaf);
        near.push(leaf);

        let far: Vec<usize> = occupied
            .iter()
            .copied()
            .filter(|id| !near.contains(id))
            .collect();

        for &i in &tree.node(leaf).bodies {
            let (xi, mi) = (&positions[i], masses[i]);
            let mut f_total = NVec3::zeros();

            for &id in &near {
                for &j in &tree.node(id).bodies {
                    if j != i {
                        f_total += gravitational_force(&positions[j], xi, masses[j], mi, g_adj);
                    }
                }
            }
            for &id in &far {
                let node = tree.node(id);
                f_total += gravitational_force(&node.centroid, xi, node.mass, mi, g_adj);
            }

            kicks[i] = f_total / mi * dt;
        }
    }

    for (v, dv) in velocities.iter_mut().zip(kicks.iter()) {
        *v += dv;
    }
}
