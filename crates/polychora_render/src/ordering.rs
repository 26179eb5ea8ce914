//! Angular ordering of coplanar cross-section points
//!
//! Points found by the slice kernel come out in edge order, which for a
//! quadrilateral is often a bow-tie. The points are projected to 3D by
//! dropping the coordinate along which the hyperplane normal is largest,
//! then sorted by signed angle around their centroid.
//!
//! The resulting winding (clockwise or counter-clockwise) depends on the
//! input and is not consistent between tetrahedra.

use polychora_math::{Vec3, Vec4};

const DEGENERATE_NORMAL: f32 = 1e-12;

/// Normal of the plane through the projected points.
///
/// Uses the first three points; if they are (nearly) collinear, which happens
/// when a vertex sits on the hyperplane and is found twice, falls back to the
/// best-conditioned pair of centroid-relative directions.
fn polygon_normal(projected: &[Vec3], centroid: Vec3) -> Vec3 {
    let ab = projected[1] - projected[0];
    let bc = projected[2] - projected[1];
    let n = bc.cross(ab);
    if n.dot(n) > DEGENERATE_NORMAL {
        return n.normalized();
    }

    let mut best = Vec3::ZERO;
    for i in 0..projected.len() {
        for j in i + 1..projected.len() {
            let c = (projected[i] - centroid).cross(projected[j] - centroid);
            if c.dot(c) > best.dot(best) {
                best = c;
            }
        }
    }
    best.normalized()
}

/// Signed angle of every projected point around the centroid, measured from
/// the first point. `angles[0]` is always exactly zero.
fn signed_angles(projected: &[Vec3], angles: &mut [f32]) {
    debug_assert!(projected.len() >= 3 && projected.len() == angles.len());

    let centroid =
        projected.iter().fold(Vec3::ZERO, |acc, p| acc + *p) * (1.0 / projected.len() as f32);
    let normal = polygon_normal(projected, centroid);
    let first_edge = (projected[0] - centroid).normalized();

    angles[0] = 0.0;
    for i in 1..projected.len() {
        let edge = (projected[i] - centroid).normalized();
        let mut angle = first_edge.dot(edge).clamp(-1.0, 1.0).acos();
        if normal.dot(first_edge.cross(edge)) < 0.0 {
            angle = -angle;
        }
        angles[i] = angle;
    }
}

/// Traversal order for a quadrilateral, without allocating
pub fn order_quad(points: &[Vec4; 4], plane_normal: Vec4) -> [usize; 4] {
    let axis = plane_normal.dominant_axis();
    let projected = points.map(|p| p.drop_axis(axis));
    let mut angles = [0.0f32; 4];
    signed_angles(&projected, &mut angles);
    let mut order = [0, 1, 2, 3];
    order.sort_unstable_by(|&a, &b| angles[a].total_cmp(&angles[b]));
    order
}

/// Traversal order for any set of at least three coplanar points.
///
/// Returns indices into `points`, sorted by ascending signed angle around
/// the centroid.
pub fn order_polygon(points: &[Vec4], plane_normal: Vec4) -> Vec<usize> {
    let mut order: Vec<usize> = (0..points.len()).collect();
    if points.len() < 3 {
        return order;
    }
    let axis = plane_normal.dominant_axis();
    let projected: Vec<Vec3> = points.iter().map(|p| p.drop_axis(axis)).collect();
    let mut angles = vec![0.0f32; points.len()];
    signed_angles(&projected, &mut angles);
    order.sort_by(|&a, &b| angles[a].total_cmp(&angles[b]));
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Squared distance between cyclically consecutive points
    fn side_lengths(points: &[Vec4], order: &[usize]) -> Vec<f32> {
        (0..order.len())
            .map(|k| {
                let a = points[order[k]];
                let b = points[order[(k + 1) % order.len()]];
                (b - a).length_squared()
            })
            .collect()
    }

    #[test]
    fn test_square_corners_never_diagonal() {
        // Given in bow-tie order: 0 and 1 are opposite corners
        let points = [
            Vec4::new(1.0, 1.0, 0.0, 0.0),
            Vec4::new(-1.0, -1.0, 0.0, 0.0),
            Vec4::new(1.0, -1.0, 0.0, 0.0),
            Vec4::new(-1.0, 1.0, 0.0, 0.0),
        ];
        let order = order_quad(&points, Vec4::W);
        for d in side_lengths(&points, &order) {
            assert_relative_eq!(d, 4.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_square_in_tilted_hyperplane() {
        // Square in the plane spanned by (1,0,0,1)/sqrt2 and Y, normal (1,0,0,-1)
        let u = Vec4::new(1.0, 0.0, 0.0, 1.0).normalized();
        let v = Vec4::Y;
        let c = Vec4::new(0.0, 0.0, 0.5, 0.0);
        let points = [c + u, c - u, c + v, c - v];
        let order = order_quad(&points, Vec4::new(1.0, 0.0, 0.0, -1.0).normalized());
        for d in side_lengths(&points, &order) {
            assert_relative_eq!(d, 2.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_order_is_a_permutation() {
        let points = [
            Vec4::new(0.0, 2.0, 1.0, 0.0),
            Vec4::new(0.0, -1.0, 1.0, 0.0),
            Vec4::new(0.0, 0.0, -1.5, 0.0),
            Vec4::new(0.0, 1.0, -0.5, 0.0),
        ];
        let mut order = order_quad(&points, Vec4::X);
        order.sort();
        assert_eq!(order, [0, 1, 2, 3]);
    }

    #[test]
    fn test_order_polygon_hexagon() {
        let points: Vec<Vec4> = [0, 3, 1, 4, 2, 5]
            .iter()
            .map(|&k| {
                let a = k as f32 * std::f32::consts::FRAC_PI_3;
                Vec4::new(a.cos(), 0.0, a.sin(), 0.0)
            })
            .collect();
        let order = order_polygon(&points, Vec4::Y);
        assert_eq!(order.len(), 6);
        for d in side_lengths(&points, &order) {
            assert_relative_eq!(d, 1.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_duplicate_point_does_not_panic() {
        // A tetrahedron vertex lying on the hyperplane is found on two edges
        let points = [
            Vec4::new(0.0, 0.0, 0.0, 0.0),
            Vec4::new(0.0, 0.0, 0.0, 0.0),
            Vec4::new(1.0, 0.0, 0.0, 0.0),
            Vec4::new(0.0, 1.0, 0.0, 0.0),
        ];
        let mut order = order_quad(&points, Vec4::W);
        order.sort();
        assert_eq!(order, [0, 1, 2, 3]);
    }

    #[test]
    fn test_polygon_normal_fallback() {
        let projected = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        let n = polygon_normal(&projected, Vec3::new(0.25, 0.25, 0.0));
        assert_relative_eq!(n.z.abs(), 1.0, epsilon = 1e-6);
    }
}
