//! Tetrahedral meshes built from convex hull output
//!
//! A mesh is immutable once built. Each tetrahedron keeps the normal of the
//! hull facet it came from, which the renderer uses as a flat colour.

use std::collections::BTreeSet;

use polychora_math::{Tetrahedron, Vec4};

use crate::error::BuildError;
use crate::hull::HullResult;

#[derive(Clone, Debug, PartialEq)]
pub struct TetrahedronMesh {
    vertices: Vec<Vec4>,
    tetrahedra: Vec<Tetrahedron>,
    facet_normals: Vec<Vec4>,
    edges: Vec<[usize; 2]>,
}

/// Round a facet normal to the nearest tenth per component, then renormalize.
///
/// Removes the numerical noise qhull leaves in the normals so that coplanar
/// facets share exactly the same colour.
pub fn round_normal(n: Vec4) -> Vec4 {
    n.round_to(0.1).normalized()
}

impl TetrahedronMesh {
    /// Validate a hull result and turn each facet into a tetrahedron.
    ///
    /// Every facet must have exactly four distinct, in-range vertex indices,
    /// and there must be one normal per facet.
    pub fn from_hull(hull: &HullResult, round_normals: bool) -> Result<Self, BuildError> {
        if hull.facets.len() != hull.normals.len() {
            return Err(BuildError::NormalCountMismatch {
                facets: hull.facets.len(),
                normals: hull.normals.len(),
            });
        }

        let mut tetrahedra = Vec::with_capacity(hull.facets.len());
        for (facet, indices) in hull.facets.iter().enumerate() {
            let indices: [usize; 4] = indices.as_slice().try_into().map_err(|_| {
                BuildError::NonSimplicialFacet {
                    facet,
                    vertex_count: indices.len(),
                }
            })?;
            if let Some(&index) = indices.iter().find(|&&i| i >= hull.vertices.len()) {
                return Err(BuildError::IndexOutOfRange {
                    facet,
                    index,
                    vertex_count: hull.vertices.len(),
                });
            }
            let tet = Tetrahedron::new(indices);
            if !tet.is_proper() {
                return Err(BuildError::RepeatedVertex { facet });
            }
            tetrahedra.push(tet);
        }

        let facet_normals = hull
            .normals
            .iter()
            .map(|&n| if round_normals { round_normal(n) } else { n })
            .collect();

        Ok(Self::from_parts(hull.vertices.clone(), tetrahedra, facet_normals))
    }

    /// Assemble a mesh from already validated parts, deriving the skeleton
    /// edges from the tetrahedra.
    pub fn from_parts(
        vertices: Vec<Vec4>,
        tetrahedra: Vec<Tetrahedron>,
        facet_normals: Vec<Vec4>,
    ) -> Self {
        let edges: BTreeSet<[usize; 2]> = tetrahedra
            .iter()
            .flat_map(|t| t.edges())
            .map(|(a, b)| [a.min(b), a.max(b)])
            .collect();

        Self {
            vertices,
            tetrahedra,
            facet_normals,
            edges: edges.into_iter().collect(),
        }
    }

    pub fn vertices(&self) -> &[Vec4] {
        &self.vertices
    }

    pub fn tetrahedra(&self) -> &[Tetrahedron] {
        &self.tetrahedra
    }

    pub fn facet_normals(&self) -> &[Vec4] {
        &self.facet_normals
    }

    /// Unique skeleton edges, each as `[low, high]`
    pub fn edges(&self) -> &[[usize; 2]] {
        &self.edges
    }

    pub fn tetrahedron_count(&self) -> usize {
        self.tetrahedra.len()
    }

    /// The four vertex positions of a tetrahedron
    pub fn tetrahedron_vertices(&self, index: usize) -> [Vec4; 4] {
        self.tetrahedra[index].indices.map(|i| self.vertices[i])
    }

    /// Flattened vertex positions, four per tetrahedron
    pub fn flattened_vertices(&self) -> Vec<Vec4> {
        (0..self.tetrahedra.len())
            .flat_map(|i| self.tetrahedron_vertices(i))
            .collect()
    }

    /// Index buffer for the tetrahedra wireframe: the six edges of every
    /// tetrahedron as pairs of shared vertex indices (12 per tetrahedron)
    pub fn wireframe_indices(&self) -> Vec<u32> {
        self.tetrahedra
            .iter()
            .flat_map(|t| t.edges())
            .flat_map(|(a, b)| [a as u32, b as u32])
            .collect()
    }

    /// Index buffer for the unique skeleton edges (2 per edge)
    pub fn skeleton_indices(&self) -> Vec<u32> {
        self.edges
            .iter()
            .flat_map(|e| [e[0] as u32, e[1] as u32])
            .collect()
    }
}
