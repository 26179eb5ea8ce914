//! Rotations in 4D space
//!
//! In 4D, rotations happen in planes rather than around axes. There are six
//! coordinate planes, which pair up into three complementary couples
//! (XY/ZW, YZ/XW, ZX/YW). Rotating a plane and its complement together gives
//! a double rotation whose only fixed point is the origin.

use serde::{Deserialize, Serialize};

use crate::mat4::{self, Mat4};
use crate::Vec4;

/// The 6 rotation planes in 4D space
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RotationPlane {
    XY,
    YZ,
    ZX,
    XW,
    YW,
    ZW,
}

impl RotationPlane {
    pub const ALL: [RotationPlane; 6] = [
        RotationPlane::XY,
        RotationPlane::YZ,
        RotationPlane::ZX,
        RotationPlane::XW,
        RotationPlane::YW,
        RotationPlane::ZW,
    ];

    /// Axis indices `(from, to)`: a positive angle turns `from` toward `to`
    pub const fn axes(self) -> (usize, usize) {
        match self {
            RotationPlane::XY => (0, 1),
            RotationPlane::YZ => (1, 2),
            RotationPlane::ZX => (2, 0),
            RotationPlane::XW => (0, 3),
            RotationPlane::YW => (1, 3),
            RotationPlane::ZW => (2, 3),
        }
    }

    /// The plane spanned by the two axes this plane leaves fixed
    pub const fn complement(self) -> RotationPlane {
        match self {
            RotationPlane::XY => RotationPlane::ZW,
            RotationPlane::ZW => RotationPlane::XY,
            RotationPlane::YZ => RotationPlane::XW,
            RotationPlane::XW => RotationPlane::YZ,
            RotationPlane::ZX => RotationPlane::YW,
            RotationPlane::YW => RotationPlane::ZX,
        }
    }
}

/// Rotation by `angle` radians within `plane`, identity on the other two axes
pub fn simple_rotation(plane: RotationPlane, angle: f32) -> Mat4 {
    let (a, b) = plane.axes();
    mat4::plane_rotation(angle, a, b)
}

/// `alpha` in `plane` combined with `beta` in its complement.
///
/// The two factors act on disjoint axis pairs, so their order does not matter.
pub fn double_rotation(plane: RotationPlane, alpha: f32, beta: f32) -> Mat4 {
    mat4::mul(
        simple_rotation(plane, alpha),
        simple_rotation(plane.complement(), beta),
    )
}

/// Double rotation with equal angles in both planes
pub fn isoclinic_rotation(plane: RotationPlane, angle: f32) -> Mat4 {
    double_rotation(plane, angle, angle)
}

/// Generalized cross product: a vector orthogonal to `u`, `v` and `w`.
///
/// Expands the 3x3 minors of the matrix with rows `u`, `v`, `w` with
/// alternating signs. The result is zero when the inputs are linearly
/// dependent; callers must avoid that case.
pub fn cross4(u: Vec4, v: Vec4, w: Vec4) -> Vec4 {
    // 2x2 minors of the (v, w) rows
    let a = v.x * w.y - v.y * w.x;
    let b = v.x * w.z - v.z * w.x;
    let c = v.x * w.w - v.w * w.x;
    let d = v.y * w.z - v.z * w.y;
    let e = v.y * w.w - v.w * w.y;
    let f = v.z * w.w - v.w * w.z;

    Vec4::new(
        u.y * f - u.z * e + u.w * d,
        -u.x * f + u.z * c - u.w * b,
        u.x * e - u.y * c + u.w * a,
        -u.x * d + u.y * b - u.z * a,
    )
}

/// One angle per rotation plane, in radians
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationAngles {
    pub xy: f32,
    pub yz: f32,
    pub zx: f32,
    pub xw: f32,
    pub yw: f32,
    pub zw: f32,
}

impl RotationAngles {
    pub fn get(&self, plane: RotationPlane) -> f32 {
        match plane {
            RotationPlane::XY => self.xy,
            RotationPlane::YZ => self.yz,
            RotationPlane::ZX => self.zx,
            RotationPlane::XW => self.xw,
            RotationPlane::YW => self.yw,
            RotationPlane::ZW => self.zw,
        }
    }

    pub fn set(&mut self, plane: RotationPlane, angle: f32) {
        let slot = match plane {
            RotationPlane::XY => &mut self.xy,
            RotationPlane::YZ => &mut self.yz,
            RotationPlane::ZX => &mut self.zx,
            RotationPlane::XW => &mut self.xw,
            RotationPlane::YW => &mut self.yw,
            RotationPlane::ZW => &mut self.zw,
        };
        *slot = angle;
    }

    /// Composite rotation `XY * YZ * ZX * XW * YW * ZW`
    pub fn to_matrix(&self) -> Mat4 {
        RotationPlane::ALL
            .iter()
            .fold(mat4::IDENTITY, |acc, plane| {
                mat4::mul(acc, simple_rotation(*plane, self.get(*plane)))
            })
    }
}
