//! Data-parallel slice dispatch
//!
//! Output is statically partitioned: tetrahedron `i` owns vertex slots
//! `i*6 .. i*6+6` and draw command `i`. Work items never share an output
//! location, so the whole mesh is sliced without locks or atomics, and
//! re-slicing one batch cannot touch another batch's buffers.
//!
//! With the `parallel` feature (on by default) work items run on the rayon
//! thread pool; without it they run in order on the calling thread.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use thiserror::Error;

use crate::kernel::{SliceKernel, SliceKind};
use crate::types::{DrawCommand, GpuTetrahedron, SliceVertex, MAX_VERTICES_PER_SLICE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("slice buffers sized for {buffers} tetrahedra, but {tetrahedra} were dispatched")]
    BufferSizeMismatch { tetrahedra: usize, buffers: usize },
}

/// Output of one batch's slice dispatch
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SliceBuffers {
    vertices: Vec<SliceVertex>,
    commands: Vec<DrawCommand>,
}

impl SliceBuffers {
    /// Zeroed buffers for `tetrahedra` work items; never resized afterwards
    pub fn new(tetrahedra: usize) -> Self {
        Self {
            vertices: vec![SliceVertex::default(); tetrahedra * MAX_VERTICES_PER_SLICE],
            commands: (0..tetrahedra).map(|i| DrawCommand::for_tetrahedron(i, 0)).collect(),
        }
    }

    pub fn tetrahedron_count(&self) -> usize {
        self.commands.len()
    }

    pub fn vertices(&self) -> &[SliceVertex] {
        &self.vertices
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// The vertex slots owned by tetrahedron `index`
    pub fn region(&self, index: usize) -> &[SliceVertex] {
        let start = index * MAX_VERTICES_PER_SLICE;
        &self.vertices[start..start + MAX_VERTICES_PER_SLICE]
    }

    /// Commands that draw something
    pub fn draws(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter().filter(|c| !c.is_empty())
    }

    /// Emitted vertices only, in tetrahedron order
    pub fn emitted_vertices(&self) -> impl Iterator<Item = &SliceVertex> {
        self.draws().flat_map(move |c| {
            let start = c.first_vertex as usize;
            &self.vertices[start..start + c.vertex_count as usize]
        })
    }
}

/// Per-dispatch tally of cross-section shapes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub empty: usize,
    pub triangles: usize,
    pub quads: usize,
    pub degenerate: usize,
}

impl DispatchStats {
    fn of(kind: SliceKind) -> Self {
        let mut stats = Self::default();
        match kind {
            SliceKind::Empty => stats.empty = 1,
            SliceKind::Triangle => stats.triangles = 1,
            SliceKind::Quad => stats.quads = 1,
            SliceKind::Degenerate(_) => stats.degenerate = 1,
        }
        stats
    }

    pub fn merge(self, other: Self) -> Self {
        Self {
            empty: self.empty + other.empty,
            triangles: self.triangles + other.triangles,
            quads: self.quads + other.quads,
            degenerate: self.degenerate + other.degenerate,
        }
    }

    pub fn total(&self) -> usize {
        self.empty + self.triangles + self.quads + self.degenerate
    }

    /// Vertices emitted across all draw commands
    pub fn emitted_vertices(&self) -> usize {
        self.triangles * 3 + self.quads * 6
    }
}

/// Slice every tetrahedron into its own block of `buffers`.
///
/// Runs to completion and overwrites every slot and command; the caller is
/// responsible for making the result visible to a renderer.
pub fn dispatch(
    kernel: &SliceKernel,
    tetrahedra: &[GpuTetrahedron],
    buffers: &mut SliceBuffers,
) -> Result<DispatchStats, DispatchError> {
    if buffers.tetrahedron_count() != tetrahedra.len()
        || buffers.vertices.len() != tetrahedra.len() * MAX_VERTICES_PER_SLICE
    {
        return Err(DispatchError::BufferSizeMismatch {
            tetrahedra: tetrahedra.len(),
            buffers: buffers.tetrahedron_count(),
        });
    }

    let work = |(index, ((slots, command), tet)): (usize, ((&mut [SliceVertex], &mut DrawCommand), &GpuTetrahedron))| {
        DispatchStats::of(kernel.write(index, tet.to_vec4s(), slots, command))
    };

    #[cfg(feature = "parallel")]
    let stats = buffers
        .vertices
        .par_chunks_mut(MAX_VERTICES_PER_SLICE)
        .zip(buffers.commands.par_iter_mut())
        .zip(tetrahedra.par_iter())
        .enumerate()
        .map(work)
        .reduce(DispatchStats::default, DispatchStats::merge);

    #[cfg(not(feature = "parallel"))]
    let stats = buffers
        .vertices
        .chunks_mut(MAX_VERTICES_PER_SLICE)
        .zip(buffers.commands.iter_mut())
        .zip(tetrahedra.iter())
        .enumerate()
        .map(work)
        .fold(DispatchStats::default(), DispatchStats::merge);

    log::debug!(
        "Sliced {} tetrahedra: {} empty, {} triangles, {} quads",
        stats.total(),
        stats.empty,
        stats.triangles,
        stats.quads
    );
    if stats.degenerate > 0 {
        log::warn!("{} tetrahedra had a degenerate crossing count and were skipped", stats.degenerate);
    }
    Ok(stats)
}
