//! Core types for building sliceable 4D polychora
//!
//! - [`combinatorics`] - symmetric vertex orbits from permutation seeds
//! - [`Polychoron`] - registry of known polychora and their seeds
//! - [`ConvexHull`] - seam to the external hull solver, with [`QhullCommand`]
//! - [`TetrahedronMesh`] - validated tetrahedral decomposition of a hull
//! - [`PolychoronBuilder`] - the whole pipeline, one isolated object at a time
//! - [`Transform4D`] - per-object rotation and translation

pub mod combinatorics;
mod builder;
mod error;
pub mod hull;
mod mesh;
mod polychoron;
mod transform;

pub use builder::PolychoronBuilder;
pub use combinatorics::{OrbitSet, Parity, PermutationSeed};
pub use error::BuildError;
pub use hull::{ConvexHull, HullError, HullResult, QhullCommand};
pub use mesh::{round_normal, TetrahedronMesh};
pub use polychoron::{Polychoron, PHI};
pub use transform::Transform4D;

// Re-export commonly used math types for convenience
pub use polychora_math::{Hyperplane, RotationAngles, RotationPlane, Tetrahedron, Vec4};
