//! 4D Mathematics Library
//!
//! Vector, matrix and rotation types used to place, rotate and slice
//! four-dimensional polytopes.
//!
//! ## Core Types
//!
//! - [`Vec4`] - 4D vector with x, y, z, w components
//! - [`Vec3`] - 3D vector used once a cross-section has been projected down
//! - [`Mat4`] - 4x4 column-major matrix
//! - [`RotationPlane`] - one of the six coordinate planes of 4D rotation
//! - [`Hyperplane`] - unit normal plus signed displacement
//!
//! ## Shape Types
//!
//! - [`Tetrahedron`] - A 3-simplex defined by vertex indices

mod vec3;
mod vec4;
pub mod hyperplane;
pub mod mat4;
pub mod rotation;
pub mod shape;

pub use hyperplane::{Hyperplane, HyperplaneError};
pub use mat4::Mat4;
pub use rotation::{
    cross4, double_rotation, isoclinic_rotation, simple_rotation, RotationAngles, RotationPlane,
};
pub use shape::Tetrahedron;
pub use vec3::Vec3;
pub use vec4::Vec4;
