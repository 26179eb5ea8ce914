//! GPU-compatible data types for the slicing pipeline
//!
//! These types mirror the layouts a rendering backend uploads verbatim.
//! All types derive Pod and Zeroable for safe byte casting.

use bytemuck::{Pod, Zeroable};
use polychora_core::Transform4D;
use polychora_math::{mat4, Hyperplane, Mat4, Vec4};

/// Every tetrahedron owns this many output vertex slots: a quadrilateral
/// cross-section fanned into two triangles
pub const MAX_VERTICES_PER_SLICE: usize = 6;

/// Work items per group when the kernel runs as a compute dispatch
pub const WORKGROUP_SIZE: u32 = 128;

/// Number of workgroups needed to cover `tetrahedra` work items
pub fn workgroup_count(tetrahedra: usize) -> u32 {
    (tetrahedra as u32).div_ceil(WORKGROUP_SIZE)
}

/// A cross-section vertex in world space
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct SliceVertex {
    pub position: [f32; 4],
}

impl SliceVertex {
    pub fn new(position: Vec4) -> Self {
        Self { position: position.to_array() }
    }

    pub fn position(&self) -> Vec4 {
        Vec4::from_array(self.position)
    }
}

/// Indirect draw record, laid out like `DrawArraysIndirectCommand`
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct DrawCommand {
    /// 0, 3 or 6
    pub vertex_count: u32,
    pub instance_count: u32,
    pub first_vertex: u32,
    pub base_instance: u32,
}

impl DrawCommand {
    /// The command for tetrahedron `index` emitting `vertex_count` vertices
    pub fn for_tetrahedron(index: usize, vertex_count: u32) -> Self {
        Self {
            vertex_count,
            instance_count: 1,
            first_vertex: (index * MAX_VERTICES_PER_SLICE) as u32,
            base_instance: index as u32,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.vertex_count == 0
    }
}

/// One tetrahedron's four vertices, flattened for upload
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct GpuTetrahedron {
    pub vertices: [[f32; 4]; 4],
}

impl GpuTetrahedron {
    pub fn new(vertices: [Vec4; 4]) -> Self {
        Self { vertices: vertices.map(Vec4::to_array) }
    }

    pub fn to_vec4s(&self) -> [Vec4; 4] {
        self.vertices.map(Vec4::from_array)
    }
}

/// Uniforms for one slice dispatch of one batch
/// Layout: 112 bytes total
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct SliceParams {
    /// Unit hyperplane normal
    pub normal: [f32; 4],
    pub displacement: f32,
    pub snap_epsilon: f32,
    /// Padding for 16-byte alignment
    pub _padding: [f32; 2],
    /// Batch rotation (column-major)
    pub model_rotation: [[f32; 4]; 4],
    pub model_translation: [f32; 4],
}

impl SliceParams {
    pub fn new(hyperplane: &Hyperplane, transform: &Transform4D, snap_epsilon: f32) -> Self {
        Self {
            normal: hyperplane.normal().to_array(),
            displacement: hyperplane.displacement(),
            snap_epsilon,
            _padding: [0.0; 2],
            model_rotation: transform.rotation,
            model_translation: transform.translation.to_array(),
        }
    }
}

impl Default for SliceParams {
    fn default() -> Self {
        Self::new(&Hyperplane::w_axis(0.0), &Transform4D::identity(), 0.0)
    }
}

/// Uniforms for the external 4D -> 3D projection step
/// Layout: 224 bytes total
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct ProjectionUniforms {
    /// Camera eye point
    pub four_from: [f32; 4],
    /// Model translation; zero for sliced geometry, which is already in world space
    pub four_translation: [f32; 4],
    pub four_model: Mat4,
    pub four_view: Mat4,
    pub four_projection: Mat4,
}

impl Default for ProjectionUniforms {
    fn default() -> Self {
        Self {
            four_from: [0.0; 4],
            four_translation: [0.0; 4],
            four_model: mat4::IDENTITY,
            four_view: mat4::IDENTITY,
            four_projection: mat4::IDENTITY,
        }
    }
}
