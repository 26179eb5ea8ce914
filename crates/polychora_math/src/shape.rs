//! Tetrahedron topology shared by mesh construction and slicing

/// The six edges of a tetrahedron as local vertex pairs.
///
/// Slicing discovers crossing points in this order.
pub const TETRA_EDGES: [(usize, usize); 6] = [(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3)];

/// Fan triangulation of an ordered quadrilateral: `(p0,p1,p2)` and `(p0,p2,p3)`
pub const QUAD_FAN: [usize; 6] = [0, 1, 2, 0, 2, 3];

/// A tetrahedron (3-simplex) defined by vertex indices
///
/// Tetrahedra are the fundamental building blocks for 4D slicing. Each one
/// is a solid region of 4D space that a hyperplane cuts into a triangle or a
/// quadrilateral.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Tetrahedron {
    /// Indices into the parent mesh's vertex array
    pub indices: [usize; 4],
}

impl Tetrahedron {
    #[inline]
    pub fn new(indices: [usize; 4]) -> Self {
        Self { indices }
    }

    /// Get the indices as a sorted array (canonical form)
    pub fn canonical(&self) -> [usize; 4] {
        let mut sorted = self.indices;
        sorted.sort_unstable();
        sorted
    }

    /// True when all four indices differ
    pub fn is_proper(&self) -> bool {
        let c = self.canonical();
        c.windows(2).all(|w| w[0] != w[1])
    }

    /// Global vertex index pairs of the six edges, in [`TETRA_EDGES`] order
    pub fn edges(&self) -> [(usize, usize); 6] {
        TETRA_EDGES.map(|(a, b)| (self.indices[a], self.indices[b]))
    }
}
