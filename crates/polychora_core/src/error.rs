//! Error types for polychoron construction

use thiserror::Error;

use crate::hull::HullError;

/// Why a single polychoron could not be built.
///
/// These are local to one object: the builder reports them and moves on to
/// the next polychoron.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("orbit point has {len} coordinates, expected 4")]
    MalformedTuple { len: usize },

    #[error("seed set produced no points")]
    EmptyOrbit,

    #[error("hull facet {facet} has {vertex_count} vertices, expected a tetrahedron")]
    NonSimplicialFacet { facet: usize, vertex_count: usize },

    #[error("hull facet {facet} repeats a vertex index")]
    RepeatedVertex { facet: usize },

    #[error("hull facet {facet} references vertex {index}, but the hull has {vertex_count} vertices")]
    IndexOutOfRange {
        facet: usize,
        index: usize,
        vertex_count: usize,
    },

    #[error("hull has {facets} facets but {normals} normals")]
    NormalCountMismatch { facets: usize, normals: usize },

    #[error(transparent)]
    Hull(#[from] HullError),
}
