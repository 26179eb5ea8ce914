//! Slicing hyperplane in normal/displacement form
//!
//! A hyperplane in 4D is a 3D subspace. Points are classified by the sign of
//! `dot(normal, p) + displacement`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Vec4;

/// Normals shorter than this cannot be normalized reliably
pub const MIN_NORMAL_LENGTH: f32 = 1e-6;

/// Default tolerance for [`Hyperplane::inside`]
pub const DEFAULT_INSIDE_EPSILON: f32 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum HyperplaneError {
    #[error("hyperplane normal {0:?} has near-zero length")]
    DegenerateNormal([f32; 4]),
}

/// A 3D hyperplane in 4D space.
///
/// The normal is always unit length. There is deliberately no equality:
/// compare hyperplanes through [`signed_distance`](Self::signed_distance).
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(try_from = "RawHyperplane", into = "RawHyperplane")]
pub struct Hyperplane {
    normal: Vec4,
    displacement: f32,
}

#[derive(Serialize, Deserialize)]
struct RawHyperplane {
    normal: [f32; 4],
    displacement: f32,
}

impl Hyperplane {
    /// Build a hyperplane, normalizing `normal`.
    pub fn new(normal: Vec4, displacement: f32) -> Result<Self, HyperplaneError> {
        let len = normal.length();
        if len.is_nan() || len < MIN_NORMAL_LENGTH {
            return Err(HyperplaneError::DegenerateNormal(normal.to_array()));
        }
        Ok(Self {
            normal: normal * (1.0 / len),
            displacement,
        })
    }

    /// The hyperplane `w = -displacement`
    pub fn w_axis(displacement: f32) -> Self {
        Self {
            normal: Vec4::W,
            displacement,
        }
    }

    #[inline]
    pub fn normal(&self) -> Vec4 {
        self.normal
    }

    #[inline]
    pub fn displacement(&self) -> f32 {
        self.displacement
    }

    /// Same orientation, different offset
    pub fn with_displacement(self, displacement: f32) -> Self {
        Self { displacement, ..self }
    }

    /// `dot(normal, p) + displacement`; the sign gives the half-space
    #[inline]
    pub fn signed_distance(&self, p: Vec4) -> f32 {
        self.normal.dot(p) + self.displacement
    }

    /// True when `p` lies within [`DEFAULT_INSIDE_EPSILON`] of the hyperplane
    #[inline]
    pub fn inside(&self, p: Vec4) -> bool {
        self.inside_eps(p, DEFAULT_INSIDE_EPSILON)
    }

    #[inline]
    pub fn inside_eps(&self, p: Vec4, epsilon: f32) -> bool {
        self.signed_distance(p).abs() <= epsilon
    }
}

impl TryFrom<RawHyperplane> for Hyperplane {
    type Error = HyperplaneError;

    fn try_from(raw: RawHyperplane) -> Result<Self, Self::Error> {
        Hyperplane::new(Vec4::from_array(raw.normal), raw.displacement)
    }
}

impl From<Hyperplane> for RawHyperplane {
    fn from(h: Hyperplane) -> Self {
        RawHyperplane {
            normal: h.normal.to_array(),
            displacement: h.displacement,
        }
    }
}
