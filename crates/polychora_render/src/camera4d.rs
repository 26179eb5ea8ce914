//! 4D look-at camera
//!
//! The view basis is built from four reference vectors with repeated 4D
//! cross products, the same way a 3D look-at orthonormalizes `to - from`
//! against an up vector. In 4D a second reference direction (`over`) is
//! needed to pin down the remaining degree of freedom.

use polychora_math::{cross4, mat4, Mat4, Vec4};
use serde::{Deserialize, Serialize};

use crate::types::ProjectionUniforms;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Camera4D {
    pub from: Vec4,
    pub to: Vec4,
    pub up: Vec4,
    pub over: Vec4,
    /// Field of view in degrees
    pub fov: f32,
}

impl Default for Camera4D {
    fn default() -> Self {
        Self::new(Vec4::X * 4.0, Vec4::ZERO, Vec4::Y, Vec4::Z, 45.0)
    }
}

impl Camera4D {
    pub fn new(from: Vec4, to: Vec4, up: Vec4, over: Vec4, fov: f32) -> Self {
        Self { from, to, up, over, fov }
    }

    /// View basis with columns `[wa, wb, wc, wd]`, where `wd` points from the
    /// eye toward the target.
    ///
    /// `up` and `over` must not be coplanar with `to - from`. This is not
    /// checked: a degenerate configuration collapses basis vectors to zero.
    pub fn look_at(&self) -> Mat4 {
        let wd = (self.to - self.from).normalized();
        let wa = cross4(self.up, self.over, wd).normalized();
        let wb = cross4(self.over, wd, wa).normalized();
        let wc = cross4(wd, wa, wb);
        mat4::from_columns(wa, wb, wc, wd)
    }

    /// Uniform scale `1 / tan(fov / 2)` on the diagonal
    pub fn projection(&self) -> Mat4 {
        let t = 1.0 / (self.fov.to_radians() * 0.5).tan();
        mat4::scale(t)
    }

    /// Everything the external projection step needs for one object
    pub fn uniforms(&self, model: Mat4, translation: Vec4) -> ProjectionUniforms {
        ProjectionUniforms {
            four_from: self.from.to_array(),
            four_translation: translation.to_array(),
            four_model: model,
            four_view: self.look_at(),
            four_projection: self.projection(),
        }
    }
}
