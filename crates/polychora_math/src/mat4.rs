//! 4x4 Matrix utilities for 4D transformations
//!
//! Matrices are stored column-major (`m[col][row]`), matching the layout the
//! projection uniforms are uploaded in.

use crate::Vec4;

/// 4x4 matrix type (column-major)
pub type Mat4 = [[f32; 4]; 4];

/// Identity matrix
pub const IDENTITY: Mat4 = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// Rotation by `angle` radians in the plane spanned by axes `p1` and `p2`
/// (0=X, 1=Y, 2=Z, 3=W).
///
/// A positive angle turns axis `p1` toward axis `p2`; the other two axes are
/// left untouched.
pub fn plane_rotation(angle: f32, p1: usize, p2: usize) -> Mat4 {
    let (sn, cs) = angle.sin_cos();

    let mut m = IDENTITY;
    m[p1][p1] = cs;
    m[p2][p2] = cs;
    m[p1][p2] = sn;
    m[p2][p1] = -sn;
    m
}

/// Uniform scale matrix with `s` on the diagonal
pub fn scale(s: f32) -> Mat4 {
    [
        [s, 0.0, 0.0, 0.0],
        [0.0, s, 0.0, 0.0],
        [0.0, 0.0, s, 0.0],
        [0.0, 0.0, 0.0, s],
    ]
}

/// Build a matrix whose columns are the given vectors, in order
pub fn from_columns(c0: Vec4, c1: Vec4, c2: Vec4, c3: Vec4) -> Mat4 {
    [c0.to_array(), c1.to_array(), c2.to_array(), c3.to_array()]
}

/// Multiply two 4x4 matrices: result = a * b
///
/// In column-major convention, this applies b first, then a.
#[allow(clippy::needless_range_loop)]
pub fn mul(a: Mat4, b: Mat4) -> Mat4 {
    let mut result = [[0.0f32; 4]; 4];
    for col in 0..4 {
        for row in 0..4 {
            for k in 0..4 {
                result[col][row] += a[k][row] * b[col][k];
            }
        }
    }
    result
}

/// result = M * v
pub fn transform(m: Mat4, v: Vec4) -> Vec4 {
    get_column(m, 0) * v.x + get_column(m, 1) * v.y + get_column(m, 2) * v.z + get_column(m, 3) * v.w
}

/// Get a column vector from a matrix
pub fn get_column(m: Mat4, col: usize) -> Vec4 {
    Vec4::from_array(m[col])
}

/// Transpose a matrix
pub fn transpose(m: Mat4) -> Mat4 {
    [
        [m[0][0], m[1][0], m[2][0], m[3][0]],
        [m[0][1], m[1][1], m[2][1], m[3][1]],
        [m[0][2], m[1][2], m[2][2], m[3][2]],
        [m[0][3], m[1][3], m[2][3], m[3][3]],
    ]
}
