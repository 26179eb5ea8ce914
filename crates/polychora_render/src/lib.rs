//! 4D Slicing Library
//!
//! This crate turns tetrahedral meshes of 4D polytopes into 3D
//! cross-section geometry and hands the result to an external renderer.
//!
//! ## Key Components
//!
//! - [`kernel::SliceKernel`] - Intersects one tetrahedron with a hyperplane
//! - [`dispatch::dispatch`] - Runs the kernel over a whole mesh into fixed slots
//! - [`slicer::Slicer`] - Batches, dirty tracking and render submission
//! - [`camera4d::Camera4D`] - 4D look-at camera and projection uniforms
//!
//! Each tetrahedron owns six output slots and one indirect draw command, so
//! tetrahedra can be sliced in any order or in parallel with no shared state.

pub mod camera4d;
pub mod dispatch;
pub mod kernel;
pub mod ordering;
pub mod slicer;
pub mod types;

pub use camera4d::Camera4D;
pub use dispatch::{dispatch, DispatchError, DispatchStats, SliceBuffers};
pub use kernel::{CrossSection, SliceKernel, SliceKind, DEFAULT_SNAP_EPSILON};
pub use slicer::{Batch, BatchKey, DirtyFlags, DisplayMode, LineDraw, RenderBackend, SliceDraw, Slicer};
pub use types::{
    DrawCommand, GpuTetrahedron, ProjectionUniforms, SliceParams, SliceVertex, MAX_VERTICES_PER_SLICE,
};

// Re-export core types for convenience
pub use polychora_core::{TetrahedronMesh, Transform4D};
pub use polychora_math::{Hyperplane, Vec4};
