//! Batches of sliceable meshes and their render submission
//!
//! A [`Slicer`] owns one batch per displayed polychoron. Each batch carries
//! its mesh, its 4D transform, the static buffers derived from the mesh
//! (flattened tetrahedra, per-slot colours, wireframe and skeleton indices)
//! and the slice output that is rewritten whenever the hyperplane or the
//! batch transform changes.
//!
//! Cross-section winding is not consistent between tetrahedra, so a backend
//! must draw sliced geometry with back-face culling disabled.

use std::sync::Arc;

use bitflags::bitflags;
use polychora_core::{TetrahedronMesh, Transform4D};
use polychora_math::{mat4, Hyperplane, Vec4};
use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};

use crate::camera4d::Camera4D;
use crate::dispatch::{dispatch, DispatchError, DispatchStats, SliceBuffers};
use crate::kernel::{SliceKernel, DEFAULT_SNAP_EPSILON};
use crate::types::{DrawCommand, GpuTetrahedron, ProjectionUniforms, SliceParams, SliceVertex, MAX_VERTICES_PER_SLICE};

new_key_type! {
    /// Generational handle to a batch
    pub struct BatchKey;
}

bitflags! {
    /// Why a batch's slice output is stale
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct DirtyFlags: u8 {
        const NONE = 0;
        const TRANSFORM = 1 << 0;
        const HYPERPLANE = 1 << 1;
        /// Newly added, never sliced
        const MESH = 1 << 2;
        const ALL = Self::TRANSFORM.bits() | Self::HYPERPLANE.bits() | Self::MESH.bits();
    }
}

/// Which kernel output a backend should draw
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Hyperplane cross-sections
    #[default]
    Slice,
    /// Wireframe of every tetrahedron, unsliced
    Tetrahedra,
    /// Unique skeleton edges, unsliced
    Edges,
}

pub struct Batch {
    mesh: Arc<TetrahedronMesh>,
    transform: Transform4D,
    tetrahedra: Vec<GpuTetrahedron>,
    /// Facet normal of each tetrahedron, repeated for each of its slots
    colors: Vec<[f32; 4]>,
    wireframe_indices: Vec<u32>,
    skeleton_indices: Vec<u32>,
    buffers: SliceBuffers,
    dirty: DirtyFlags,
}

impl Batch {
    fn new(mesh: Arc<TetrahedronMesh>, transform: Transform4D) -> Self {
        let tetrahedra = (0..mesh.tetrahedron_count())
            .map(|i| GpuTetrahedron::new(mesh.tetrahedron_vertices(i)))
            .collect();
        let colors = mesh
            .facet_normals()
            .iter()
            .flat_map(|n| [n.to_array(); MAX_VERTICES_PER_SLICE])
            .collect();
        let wireframe_indices = mesh.wireframe_indices();
        let skeleton_indices = mesh.skeleton_indices();
        let buffers = SliceBuffers::new(mesh.tetrahedron_count());

        Self {
            mesh,
            transform,
            tetrahedra,
            colors,
            wireframe_indices,
            skeleton_indices,
            buffers,
            dirty: DirtyFlags::ALL,
        }
    }

    pub fn mesh(&self) -> &Arc<TetrahedronMesh> {
        &self.mesh
    }

    pub fn transform(&self) -> &Transform4D {
        &self.transform
    }

    pub fn tetrahedra(&self) -> &[GpuTetrahedron] {
        &self.tetrahedra
    }

    pub fn colors(&self) -> &[[f32; 4]] {
        &self.colors
    }

    pub fn buffers(&self) -> &SliceBuffers {
        &self.buffers
    }

    pub fn dirty(&self) -> DirtyFlags {
        self.dirty
    }

    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty()
    }
}

/// One sliced batch handed to a backend
pub struct SliceDraw<'a> {
    pub key: BatchKey,
    pub vertices: &'a [SliceVertex],
    pub colors: &'a [[f32; 4]],
    pub commands: &'a [DrawCommand],
    pub uniforms: ProjectionUniforms,
}

impl SliceDraw<'_> {
    /// One indirect draw per tetrahedron that produced geometry
    pub fn draws(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter().filter(|c| !c.is_empty())
    }
}

/// One unsliced batch (wireframe or skeleton) handed to a backend
pub struct LineDraw<'a> {
    pub key: BatchKey,
    pub vertices: &'a [Vec4],
    pub indices: &'a [u32],
    pub uniforms: ProjectionUniforms,
}

/// The external renderer. Buffer upload, draw calls and the barrier
/// between a slice dispatch and the draws that read it are its job.
pub trait RenderBackend {
    fn draw_slice(&mut self, draw: SliceDraw<'_>);
    fn draw_tetrahedra(&mut self, draw: LineDraw<'_>);
    fn draw_edges(&mut self, draw: LineDraw<'_>);
}

pub struct Slicer {
    batches: SlotMap<BatchKey, Batch>,
    hyperplane: Hyperplane,
    snap_epsilon: f32,
}

impl Slicer {
    pub fn new(hyperplane: Hyperplane) -> Self {
        Self {
            batches: SlotMap::with_key(),
            hyperplane,
            snap_epsilon: DEFAULT_SNAP_EPSILON,
        }
    }

    pub fn with_snap_epsilon(mut self, snap_epsilon: f32) -> Self {
        self.snap_epsilon = snap_epsilon;
        self
    }

    pub fn hyperplane(&self) -> &Hyperplane {
        &self.hyperplane
    }

    pub fn add_batch(&mut self, mesh: Arc<TetrahedronMesh>, transform: Transform4D) -> BatchKey {
        let key = self.batches.insert(Batch::new(mesh, transform));
        log::debug!("Added batch {:?} ({} tetrahedra)", key, self.batches[key].tetrahedra.len());
        key
    }

    pub fn remove_batch(&mut self, key: BatchKey) -> Option<Arc<TetrahedronMesh>> {
        self.batches.remove(key).map(|b| b.mesh)
    }

    pub fn batch(&self, key: BatchKey) -> Option<&Batch> {
        self.batches.get(key)
    }

    pub fn batches(&self) -> impl Iterator<Item = (BatchKey, &Batch)> {
        self.batches.iter()
    }

    pub fn len(&self) -> usize {
        self.batches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    /// Returns false if `key` is not a live batch
    pub fn set_transform(&mut self, key: BatchKey, transform: Transform4D) -> bool {
        match self.batches.get_mut(key) {
            Some(batch) => {
                if batch.transform != transform {
                    batch.transform = transform;
                    batch.dirty |= DirtyFlags::TRANSFORM;
                }
                true
            }
            None => false,
        }
    }

    /// Give every batch the same transform
    pub fn set_transforms(&mut self, transform: Transform4D) {
        let keys: Vec<BatchKey> = self.batches.keys().collect();
        for key in keys {
            self.set_transform(key, transform);
        }
    }

    pub fn set_hyperplane(&mut self, hyperplane: Hyperplane) {
        self.hyperplane = hyperplane;
        for batch in self.batches.values_mut() {
            batch.dirty |= DirtyFlags::HYPERPLANE;
        }
    }

    fn kernel_for(&self, batch: &Batch) -> SliceKernel {
        SliceKernel::new(self.hyperplane, batch.transform).with_snap_epsilon(self.snap_epsilon)
    }

    /// Uniform block for slicing a batch on an external compute device
    pub fn slice_params(&self, key: BatchKey) -> Option<SliceParams> {
        self.batches
            .get(key)
            .map(|b| SliceParams::new(&self.hyperplane, &b.transform, self.snap_epsilon))
    }

    fn slice_one(&mut self, key: BatchKey) -> Result<DispatchStats, DispatchError> {
        let Some(batch) = self.batches.get(key) else {
            return Ok(DispatchStats::default());
        };
        let kernel = self.kernel_for(batch);
        let batch = &mut self.batches[key];
        let stats = dispatch(&kernel, &batch.tetrahedra, &mut batch.buffers)?;
        batch.dirty = DirtyFlags::NONE;
        log::debug!(
            "Batch {:?}: {} triangles, {} quads, {} empty",
            key,
            stats.triangles,
            stats.quads,
            stats.empty
        );
        Ok(stats)
    }

    /// Re-slice one batch regardless of its dirty state
    pub fn slice_batch(&mut self, key: BatchKey) -> Result<DispatchStats, DispatchError> {
        self.slice_one(key)
    }

    /// Re-slice only the batches whose hyperplane or transform changed
    pub fn reslice(&mut self) -> Result<DispatchStats, DispatchError> {
        let dirty: Vec<BatchKey> = self
            .batches
            .iter()
            .filter(|(_, b)| b.is_dirty())
            .map(|(k, _)| k)
            .collect();
        let mut total = DispatchStats::default();
        for key in dirty {
            total = total.merge(self.slice_one(key)?);
        }
        Ok(total)
    }

    /// Re-slice every batch
    pub fn slice_all(&mut self) -> Result<DispatchStats, DispatchError> {
        let keys: Vec<BatchKey> = self.batches.keys().collect();
        let mut total = DispatchStats::default();
        for key in keys {
            total = total.merge(self.slice_one(key)?);
        }
        Ok(total)
    }

    /// Hand every batch to `backend` for the given display mode.
    ///
    /// Slice mode passes world-space cross-sections, so the model transform
    /// in its uniforms is the identity. The unsliced modes pass mesh-space
    /// vertices with the batch transform.
    pub fn submit<B: RenderBackend>(&self, mode: DisplayMode, camera: &Camera4D, backend: &mut B) {
        for (key, batch) in &self.batches {
            match mode {
                DisplayMode::Slice => {
                    if batch.is_dirty() {
                        log::warn!("Submitting stale slice output for batch {:?}", key);
                    }
                    backend.draw_slice(SliceDraw {
                        key,
                        vertices: batch.buffers.vertices(),
                        colors: &batch.colors,
                        commands: batch.buffers.commands(),
                        uniforms: camera.uniforms(mat4::IDENTITY, Vec4::ZERO),
                    });
                }
                DisplayMode::Tetrahedra | DisplayMode::Edges => {
                    let draw = LineDraw {
                        key,
                        vertices: batch.mesh.vertices(),
                        indices: if mode == DisplayMode::Tetrahedra {
                            &batch.wireframe_indices
                        } else {
                            &batch.skeleton_indices
                        },
                        uniforms: camera.uniforms(batch.transform.rotation, batch.transform.translation),
                    };
                    if mode == DisplayMode::Tetrahedra {
                        backend.draw_tetrahedra(draw);
                    } else {
                        backend.draw_edges(draw);
                    }
                }
            }
        }
    }
}
