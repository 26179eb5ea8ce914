//! Per-tetrahedron hyperplane intersection
//!
//! Each tetrahedron is handled on its own: transform its four vertices,
//! classify them against the hyperplane, interpolate a point on every edge
//! whose endpoints fall on different sides, and write the result into the
//! tetrahedron's fixed block of output slots.
//!
//! Signed distances within `snap_epsilon` of zero are snapped to exactly
//! zero and counted with the non-negative side. With two classes the number
//! of crossing edges is `k * (4 - k)` for `k` non-negative vertices, so only
//! 0, 3 or 4 crossings can occur. A vertex lying on the hyperplane is
//! reported as the crossing point of each of its crossing edges.

use polychora_core::Transform4D;
use polychora_math::shape::{QUAD_FAN, TETRA_EDGES};
use polychora_math::{Hyperplane, Vec4};

use crate::ordering::order_quad;
use crate::types::{DrawCommand, SliceVertex, MAX_VERTICES_PER_SLICE};

/// Default snapping tolerance for signed distances
pub const DEFAULT_SNAP_EPSILON: f32 = 1e-6;

/// Shape of one tetrahedron's cross-section
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SliceKind {
    /// Entirely on one side
    Empty,
    Triangle,
    /// Two fan triangles
    Quad,
    /// Any other crossing count; nothing is emitted
    Degenerate(usize),
}

impl SliceKind {
    pub fn vertex_count(self) -> u32 {
        match self {
            SliceKind::Triangle => 3,
            SliceKind::Quad => 6,
            SliceKind::Empty | SliceKind::Degenerate(_) => 0,
        }
    }
}

/// Crossing points of one tetrahedron, in edge discovery order
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CrossSection {
    points: [Vec4; 4],
    count: usize,
}

impl CrossSection {
    pub fn points(&self) -> &[Vec4] {
        &self.points[..self.count.min(4)]
    }

    pub fn kind(&self) -> SliceKind {
        match self.count {
            0 => SliceKind::Empty,
            3 => SliceKind::Triangle,
            4 => SliceKind::Quad,
            n => SliceKind::Degenerate(n),
        }
    }
}

/// Everything needed to slice one batch: the hyperplane and the batch's
/// transform. Cheap to copy into every work item.
#[derive(Clone, Copy, Debug)]
pub struct SliceKernel {
    pub hyperplane: Hyperplane,
    pub transform: Transform4D,
    pub snap_epsilon: f32,
}

impl SliceKernel {
    pub fn new(hyperplane: Hyperplane, transform: Transform4D) -> Self {
        Self {
            hyperplane,
            transform,
            snap_epsilon: DEFAULT_SNAP_EPSILON,
        }
    }

    pub fn with_snap_epsilon(mut self, snap_epsilon: f32) -> Self {
        self.snap_epsilon = snap_epsilon;
        self
    }

    #[inline]
    fn snapped_distance(&self, p: Vec4) -> f32 {
        let s = self.hyperplane.signed_distance(p);
        if s.abs() <= self.snap_epsilon {
            0.0
        } else {
            s
        }
    }

    /// Transform the vertices and collect every edge crossing
    pub fn intersect(&self, vertices: [Vec4; 4]) -> CrossSection {
        let world = vertices.map(|v| self.transform.transform_point(v));
        let s = world.map(|v| self.snapped_distance(v));

        let mut section = CrossSection { points: [Vec4::ZERO; 4], count: 0 };
        // Touching the plane from below at a vertex or an edge has no area.
        // A face lying on the plane is kept and emitted by the tetrahedron
        // below it only.
        let on_plane = s.iter().filter(|&&d| d == 0.0).count();
        if s.iter().all(|&d| d <= 0.0) && on_plane < 3 {
            return section;
        }
        for (i, j) in TETRA_EDGES {
            if (s[i] >= 0.0) == (s[j] >= 0.0) {
                continue;
            }
            let point = world[i].lerp(world[j], s[i] / (s[i] - s[j]));
            // More than four crossings cannot happen with two classes
            if section.count < section.points.len() {
                section.points[section.count] = point;
            }
            section.count += 1;
        }
        section
    }

    /// Slice a tetrahedron and fill its output slots.
    ///
    /// `slots` is the tetrahedron's own block of [`MAX_VERTICES_PER_SLICE`]
    /// vertices; slots past the emitted vertex count are zeroed so the block
    /// is fully rewritten on every call. `command` is the tetrahedron's draw
    /// record.
    pub fn write(
        &self,
        index: usize,
        vertices: [Vec4; 4],
        slots: &mut [SliceVertex],
        command: &mut DrawCommand,
    ) -> SliceKind {
        debug_assert_eq!(slots.len(), MAX_VERTICES_PER_SLICE);

        let section = self.intersect(vertices);
        let kind = section.kind();
        let emitted = match kind {
            SliceKind::Triangle => {
                for (slot, p) in slots.iter_mut().zip(section.points()) {
                    *slot = SliceVertex::new(*p);
                }
                3
            }
            SliceKind::Quad => {
                let order = order_quad(&section.points, self.hyperplane.normal());
                for (slot, &k) in slots.iter_mut().zip(QUAD_FAN.iter()) {
                    *slot = SliceVertex::new(section.points[order[k]]);
                }
                6
            }
            SliceKind::Empty | SliceKind::Degenerate(_) => 0,
        };
        for slot in slots.iter_mut().skip(emitted) {
            *slot = SliceVertex::default();
        }

        *command = DrawCommand::for_tetrahedron(index, kind.vertex_count());
        kind
    }
}
