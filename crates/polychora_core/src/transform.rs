//! 4D affine transform (rotation matrix + translation)
//!
//! Every batch of tetrahedra carries one of these; the slice kernel applies it
//! to each vertex before classifying it against the hyperplane.

use polychora_math::mat4::{self, Mat4};
use polychora_math::{RotationAngles, Vec4};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform4D {
    /// Column-major rotation matrix
    pub rotation: Mat4,
    pub translation: Vec4,
}

impl Default for Transform4D {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform4D {
    pub const fn identity() -> Self {
        Self {
            rotation: mat4::IDENTITY,
            translation: Vec4::ZERO,
        }
    }

    pub fn new(rotation: Mat4, translation: Vec4) -> Self {
        Self { rotation, translation }
    }

    pub fn from_translation(translation: Vec4) -> Self {
        Self {
            rotation: mat4::IDENTITY,
            translation,
        }
    }

    /// Composite plane rotation from six angles, followed by `translation`
    pub fn from_angles(angles: &RotationAngles, translation: Vec4) -> Self {
        Self {
            rotation: angles.to_matrix(),
            translation,
        }
    }

    /// `R * p + t`
    #[inline]
    pub fn transform_point(&self, p: Vec4) -> Vec4 {
        mat4::transform(self.rotation, p) + self.translation
    }

    /// Rotation only
    #[inline]
    pub fn transform_direction(&self, d: Vec4) -> Vec4 {
        mat4::transform(self.rotation, d)
    }

    /// Inverse, assuming `rotation` is orthogonal
    pub fn inverse(&self) -> Self {
        let inv_rotation = mat4::transpose(self.rotation);
        Self {
            rotation: inv_rotation,
            translation: -mat4::transform(inv_rotation, self.translation),
        }
    }

    /// Compose two transforms: `other` is applied first, then `self`
    pub fn compose(&self, other: &Self) -> Self {
        Self {
            rotation: mat4::mul(self.rotation, other.rotation),
            translation: self.transform_point(other.translation),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polychora_math::{simple_rotation, RotationPlane};
    use std::f32::consts::FRAC_PI_2;

    const EPSILON: f32 = 1e-5;

    fn vec_approx_eq(a: Vec4, b: Vec4) -> bool {
        (a - b).length() < EPSILON
    }

    #[test]
    fn test_identity() {
        let p = Vec4::new(1.0, -2.0, 3.0, 0.5);
        assert_eq!(Transform4D::identity().transform_point(p), p);
    }

    #[test]
    fn test_rotate_then_translate() {
        let t = Transform4D::new(
            simple_rotation(RotationPlane::XW, FRAC_PI_2),
            Vec4::new(0.0, 1.0, 0.0, 0.0),
        );
        let p = t.transform_point(Vec4::X);
        assert!(vec_approx_eq(p, Vec4::new(0.0, 1.0, 0.0, 1.0)), "got {:?}", p);
        // Directions ignore translation
        assert!(vec_approx_eq(t.transform_direction(Vec4::X), Vec4::W));
    }

    #[test]
    fn test_inverse_round_trip() {
        let angles = RotationAngles { xy: 0.3, yw: -1.1, zw: 0.7, ..Default::default() };
        let t = Transform4D::from_angles(&angles, Vec4::new(1.0, 2.0, -0.5, 0.25));
        let p = Vec4::new(-0.4, 0.9, 1.3, -2.0);
        let back = t.inverse().transform_point(t.transform_point(p));
        assert!(vec_approx_eq(back, p), "got {:?}", back);
    }

    #[test]
    fn test_compose_applies_other_first() {
        let a = Transform4D::from_translation(Vec4::new(1.0, 0.0, 0.0, 0.0));
        let b = Transform4D::new(simple_rotation(RotationPlane::XY, FRAC_PI_2), Vec4::ZERO);
        let p = Vec4::X;
        let composed = a.compose(&b).transform_point(p);
        let sequential = a.transform_point(b.transform_point(p));
        assert!(vec_approx_eq(composed, sequential));
        assert!(vec_approx_eq(composed, Vec4::new(1.0, 1.0, 0.0, 0.0)));
    }
}
