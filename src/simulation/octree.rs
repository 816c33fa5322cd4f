//! # Fixed-depth octree (3D)
//!
//! This module implements the **spatial decomposition** used by the octree
//! force evaluator. Unlike an adaptive Barnes–Hut tree, the shape here is
//! fixed: every node down to `depth` has exactly 8 children, so the tree is
//! allocated once and only its contents change from one time step to the
//! next.
//!
//! ## Core Concepts
//!
//! - The simulation space (bounding box of all bodies, padded by
//!   [`BOUNDARY_BUFFER`]) is recursively bisected into 8 octants per level.
//! - Every body is assigned to exactly one node per layer, forming a
//!   containment chain from the root down to a leaf.
//! - Each node stores:
//!   - its bounding box and midpoint
//!   - the total mass of the bodies assigned to it
//!   - the mass-weighted centroid of those bodies
//!   - the indices of those bodies
//!
//! Nodes live in a single arena (`Vec<OctreeNode>`) and refer to each other by
//! index: a node owns nothing directly, it records its parent index and the
//! indices of its 8 children.

use crate::simulation::params::{BOUNDARY_BUFFER, OCTREE_ARITY};
use crate::simulation::states::NVec3;

/// A single node of the fixed-depth octree.
///
/// `cell` is the integer grid coordinate of the node within its layer: at
/// layer `l` the root box is split into `2^l` slabs per axis and `cell[k]`
/// says which slab the node occupies along axis `k`.
#[derive(Debug, Clone)]
pub struct OctreeNode {
    pub layer: usize,                            // 0 is the root
    pub layer_idx: usize,                        // octant among its siblings (0-7)
    pub parent: Option<usize>,                   // None for the root
    pub children: Option<[usize; OCTREE_ARITY]>, // None for leaves
    pub cell: [usize; 3],
    pub bbox_min: NVec3,
    pub bbox_max: NVec3,
    pub mid: NVec3,
    pub mass: f64,
    pub centroid: NVec3,
    pub bodies: Vec<usize>, // indices into the timeline
}

impl OctreeNode {
    fn empty(layer: usize, layer_idx: usize, parent: Option<usize>, cell: [usize; 3]) -> Self {
        Self {
            layer,
            layer_idx,
            parent,
            children: None,
            cell,
            bbox_min: NVec3::zeros(),
            bbox_max: NVec3::zeros(),
            mid: NVec3::zeros(),
            mass: 0.0,
            centroid: NVec3::zeros(),
            bodies: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Closed-box containment test.
    pub fn contains(&self, p: &NVec3) -> bool {
        (0..3).all(|k| p[k] >= self.bbox_min[k] && p[k] <= self.bbox_max[k])
    }
}

/// A complete fixed-depth octree.
///
/// This structure owns:
/// - every node (`nodes`), root at index 0
/// - the node indices of every layer, in creation order (`layers`)
/// - the leaf each body landed in during the last decomposition (`leaf_of`)
#[derive(Debug, Clone)]
pub struct Octree {
    nodes: Vec<OctreeNode>,
    root: usize,
    depth: usize,
    layers: Vec<Vec<usize>>,
    leaf_of: Vec<usize>,
}

impl Octree {
    /// Allocate the full tree shape down to `depth`.
    ///
    /// Layer `l` holds `8^l` nodes, so the whole tree has
    /// `(8^(depth+1) - 1) / 7` nodes. Bounds and contents are left empty until
    /// the first call to [`Octree::decompose`].
    pub fn new(depth: usize) -> Self {
        let root = 0;
        let mut nodes = vec![OctreeNode::empty(0, 0, None, [0, 0, 0])];
        let mut layers = vec![vec![root]];

        for layer in 0..depth {
            let mut next = Vec::with_capacity(layers[layer].len() * OCTREE_ARITY);
            for &parent in &layers[layer] {
                let parent_cell = nodes[parent].cell;
                let mut children = [0; OCTREE_ARITY];
                for (octant, child) in children.iter_mut().enumerate() {
                    let cell = [
                        parent_cell[0] * 2 + (octant & 1),
                        parent_cell[1] * 2 + ((octant >> 1) & 1),
                        parent_cell[2] * 2 + ((octant >> 2) & 1),
                    ];
                    *child = nodes.len();
                    nodes.push(OctreeNode::empty(layer + 1, octant, Some(parent), cell));
                    next.push(*child);
                }
                nodes[parent].children = Some(children);
            }
            layers.push(next);
        }

        Self {
            nodes,
            root,
            depth,
            layers,
            leaf_of: Vec::new(),
        }
    }

    /// Rebuild the contents of the tree from one snapshot.
    ///
    /// This:
    /// 1. Computes the axis-aligned bounding box of `positions`.
    /// 2. Pads it by [`BOUNDARY_BUFFER`] on every side.
    /// 3. Re-derives the bounds of every node top-down, clearing body lists,
    ///    masses and centroids.
    /// 4. Walks every body from the root to a leaf, choosing the octant by
    ///    comparing against the node midpoint on x, then y, then z. The body
    ///    is recorded, and its mass accumulated, at every node on the path.
    ///
    /// Calling it twice on the same snapshot gives the same assignment.
    ///
    /// # Parameters
    /// - `positions`: Body positions for the step being decomposed.
    /// - `masses`   : Body masses, same length as `positions`.
    pub fn decompose(&mut self, positions: &[NVec3], masses: &[f64]) {
        let (min, max) = compute_global_bbox(positions);
        let buffer = NVec3::repeat(BOUNDARY_BUFFER);

        self.reset_recursive(self.root, min - buffer, max + buffer);

        self.leaf_of.clear();
        self.leaf_of.reserve(positions.len());
        for (i, (p, &m)) in positions.iter().zip(masses.iter()).enumerate() {
            let leaf = self.add_body(i, p, m);
            self.leaf_of.push(leaf);
        }

        // centroid holds the mass-weighted position sum until here
        for node in self.nodes.iter_mut() {
            if node.mass > 0.0 {
                node.centroid /= node.mass;
            }
        }
    }

    pub fn root(&self) -> usize {
        self.root
    }

    /// Deepest layer (the leaves).
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn node(&self, id: usize) -> &OctreeNode {
        &self.nodes[id]
    }

    pub fn nodes(&self) -> &[OctreeNode] {
        &self.nodes
    }

    pub fn nodes_at_layer(&self, layer: usize) -> &[usize] {
        &self.layers[layer]
    }

    pub fn leaves(&self) -> &[usize] {
        &self.layers[self.depth]
    }

    /// Leaf holding `body` after the last decomposition.
    pub fn leaf_of(&self, body: usize) -> usize {
        self.leaf_of[body]
    }

    /// Containment chain of `body`, root first.
    pub fn path_of(&self, body: usize) -> Vec<usize> {
        let mut path = Vec::with_capacity(self.depth + 1);
        let mut current = Some(self.leaf_of[body]);
        while let Some(id) = current {
            path.push(id);
            current = self.nodes[id].parent;
        }
        path.reverse();
        path
    }

    /// Find the node at `layer` occupying grid cell `cell`.
    ///
    /// Descends from the root, reading one bit of each cell coordinate per
    /// layer (most significant first) to pick the octant. Returns `None` when
    /// the layer does not exist or the cell lies outside the grid.
    pub fn node_at(&self, layer: usize, cell: [usize; 3]) -> Option<usize> {
        if layer > self.depth {
            return None;
        }
        let side = 1usize << layer;
        if cell.iter().any(|&c| c >= side) {
            return None;
        }

        let mut id = self.root;
        for shift in (0..layer).rev() {
            let octant = ((cell[0] >> shift) & 1)
                | (((cell[1] >> shift) & 1) << 1)
                | (((cell[2] >> shift) & 1) << 2);
            id = self.nodes[id].children?[octant];
        }
        Some(id)
    }

    /// One-away neighbours of a node: every other node on the same layer
    /// whose cell differs by at most one along each axis (up to 26).
    pub fn neighbors(&self, id: usize) -> Vec<usize> {
        let node = &self.nodes[id];
        let side = 1isize << node.layer;
        let mut out = Vec::with_capacity(26);

        for dz in -1isize..=1 {
            for dy in -1isize..=1 {
                for dx in -1isize..=1 {
                    if dx == 0 && dy == 0 && dz == 0 {
                        continue;
                    }
                    let cell = [
                        node.cell[0] as isize + dx,
                        node.cell[1] as isize + dy,
                        node.cell[2] as isize + dz,
                    ];
                    if cell.iter().any(|&c| c < 0 || c >= side) {
                        continue;
                    }
                    let cell = [cell[0] as usize, cell[1] as usize, cell[2] as usize];
                    if let Some(n) = self.node_at(node.layer, cell) {
                        out.push(n);
                    }
                }
            }
        }
        out
    }

    // helpers ==============================================================================

    /// Set the bounds of `node_idx` and, recursively, of its whole subtree,
    /// clearing per-step contents on the way down.
    fn reset_recursive(&mut self, node_idx: usize, bbox_min: NVec3, bbox_max: NVec3) {
        let mid = (bbox_min + bbox_max) * 0.5;

        let node = &mut self.nodes[node_idx];
        node.bbox_min = bbox_min;
        node.bbox_max = bbox_max;
        node.mid = mid;
        node.mass = 0.0;
        node.centroid = NVec3::zeros();
        node.bodies.clear();

        if let Some(children) = node.children {
            for (octant, child) in children.into_iter().enumerate() {
                let (cmin, cmax) = child_bbox(&bbox_min, &bbox_max, &mid, octant);
                self.reset_recursive(child, cmin, cmax);
            }
        }
    }

    /// Record body `i` in every node from the root down to a leaf and return
    /// the leaf.
    fn add_body(&mut self, i: usize, p: &NVec3, m: f64) -> usize {
        let mut id = self.root;
        loop {
            let node = &mut self.nodes[id];
            node.bodies.push(i);
            node.mass += m;
            node.centroid += p * m;

            match node.children {
                Some(children) => id = children[child_index_for_point(p, &node.mid)],
                None => return id,
            }
        }
    }
}

// helpers ===========================================================================

/// Axis-aligned bounding box of all positions (single pass).
///
/// An empty slice gives a zero-extent box at the origin.
fn compute_global_bbox(positions: &[NVec3]) -> (NVec3, NVec3) {
    let Some(first) = positions.first() else {
        return (NVec3::zeros(), NVec3::zeros());
    };

    let mut min = *first;
    let mut max = *first;
    for p in &positions[1..] {
        min = min.inf(p);
        max = max.sup(p);
    }
    (min, max)
}

/// Octant of `p` relative to a node midpoint.
///
/// The index is encoded using 3 bits, each set when the coordinate is
/// greater than or equal to the midpoint on that axis:
///
/// - Bit 0 (value 1): X axis
/// - Bit 1 (value 2): Y axis
/// - Bit 2 (value 4): Z axis
fn child_index_for_point(p: &NVec3, mid: &NVec3) -> usize {
    let mut idx = 0;

    if p.x >= mid.x { idx |= 1; } // bit 0
    if p.y >= mid.y { idx |= 2; } // bit 1
    if p.z >= mid.z { idx |= 4; } // bit 2

    idx
}

/// Bounding box of octant `child_idx` of the parent box, split at `mid`.
/// Uses the same bit encoding as [`child_index_for_point`].
fn child_bbox(
    parent_min: &NVec3,
    parent_max: &NVec3,
    mid: &NVec3,
    child_idx: usize,
) -> (NVec3, NVec3) {
    let mut min = *parent_min;
    let mut max = *parent_max;

    for axis in 0..3 {
        if (child_idx >> axis) & 1 == 0 {
            max[axis] = mid[axis];
        } else {
            min[axis] = mid[axis];
        }
    }

    (min, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_has_expected_node_count() {
        let tree = Octree::new(3);
        assert_eq!(tree.nodes().len(), 1 + 8 + 64 + 512);
        assert_eq!(tree.leaves().len(), 512);
        assert!(tree.leaves().iter().all(|&id| tree.node(id).is_leaf()));
    }

    #[test]
    fn midpoint_goes_to_upper_octant() {
        let mid = NVec3::new(1.0, 2.0, 3.0);
        assert_eq!(child_index_for_point(&mid, &mid), 7);
        assert_eq!(child_index_for_point(&NVec3::new(0.0, 2.0, 0.0), &mid), 2);
        assert_eq!(child_index_for_point(&NVec3::new(1.0, 0.0, 3.5), &mid), 5);
    }

    #[test]
    fn child_boxes_tile_parent() {
        let min = NVec3::new(-1.0, -2.0, -4.0);
        let max = NVec3::new(1.0, 2.0, 4.0);
        let mid = (min + max) * 0.5;
        let volume: f64 = (0..8)
            .map(|i| {
                let (cmin, cmax) = child_bbox(&min, &max, &mid, i);
                let e = cmax - cmin;
                e.x * e.y * e.z
            })
            .sum();
        assert_eq!(volume, 2.0 * 4.0 * 8.0);

        let (cmin, cmax) = child_bbox(&min, &max, &mid, 6);
        assert_eq!(cmin, NVec3::new(-1.0, 0.0, 0.0));
        assert_eq!(cmax, NVec3::new(0.0, 2.0, 4.0));
    }

    #[test]
    fn bbox_of_single_point_is_degenerate() {
        let p = NVec3::new(3.0, -1.0, 0.5);
        let (min, max) = compute_global_bbox(&[p]);
        assert_eq!(min, p);
        assert_eq!(max, p);
    }

    #[test]
    fn node_at_matches_cells() {
        let tree = Octree::new(2);
        for layer in 0..=2 {
            for &id in tree.nodes_at_layer(layer) {
                assert_eq!(tree.node_at(layer, tree.node(id).cell), Some(id));
            }
        }
        assert_eq!(tree.node_at(1, [2, 0, 0]), None);
        assert_eq!(tree.node_at(3, [0, 0, 0]), None);
    }
}
