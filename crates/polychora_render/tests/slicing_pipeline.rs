//! Integration tests for mesh -> slicer -> backend submission
//!
//! A unit 16-cell is built by hand: vertices at +-1 on each axis, one
//! tetrahedral facet per orthant.

use std::sync::Arc;

use polychora_math::{RotationAngles, Tetrahedron};
use polychora_render::{
    Camera4D, DirtyFlags, DisplayMode, DrawCommand, Hyperplane, LineDraw, RenderBackend,
    SliceDraw, Slicer, TetrahedronMesh, Transform4D, Vec4,
};

fn sixteen_cell() -> Arc<TetrahedronMesh> {
    let mut vertices = Vec::new();
    for axis in 0..4 {
        let mut p = [0.0; 4];
        p[axis] = 1.0;
        vertices.push(Vec4::from_array(p));
        p[axis] = -1.0;
        vertices.push(Vec4::from_array(p));
    }

    let mut tetrahedra = Vec::new();
    let mut normals = Vec::new();
    for mask in 0..16usize {
        let neg = |axis: usize| (mask >> axis) & 1;
        let indices = [0, 1, 2, 3].map(|axis| 2 * axis + neg(axis));
        tetrahedra.push(Tetrahedron::new(indices));
        let sign = |axis: usize| if neg(axis) == 1 { -0.5 } else { 0.5 };
        normals.push(Vec4::new(sign(0), sign(1), sign(2), sign(3)));
    }

    Arc::new(TetrahedronMesh::from_parts(vertices, tetrahedra, normals))
}

#[derive(Default)]
struct RecordingBackend {
    slices: Vec<(Vec<Vec4>, Vec<DrawCommand>)>,
    wireframes: Vec<usize>,
    skeletons: Vec<usize>,
    translations: Vec<[f32; 4]>,
}

impl RenderBackend for RecordingBackend {
    fn draw_slice(&mut self, draw: SliceDraw<'_>) {
        let mut points = Vec::new();
        for cmd in draw.draws() {
            let first = cmd.first_vertex as usize;
            let count = cmd.vertex_count as usize;
            points.extend(draw.vertices[first..first + count].iter().map(|v| v.position()));
        }
        assert_eq!(draw.colors.len(), draw.vertices.len());
        self.translations.push(draw.uniforms.four_translation);
        self.slices.push((points, draw.draws().copied().collect()));
    }

    fn draw_tetrahedra(&mut self, draw: LineDraw<'_>) {
        assert!(draw.indices.iter().all(|&i| (i as usize) < draw.vertices.len()));
        self.translations.push(draw.uniforms.four_translation);
        self.wireframes.push(draw.indices.len());
    }

    fn draw_edges(&mut self, draw: LineDraw<'_>) {
        assert!(draw.indices.iter().all(|&i| (i as usize) < draw.vertices.len()));
        self.translations.push(draw.uniforms.four_translation);
        self.skeletons.push(draw.indices.len());
    }
}

// ==================== Slicing Tests ====================

#[test]
fn test_equatorial_slice_is_an_octahedron() {
    let mut slicer = Slicer::new(Hyperplane::w_axis(0.0));
    slicer.add_batch(sixteen_cell(), Transform4D::identity());
    let stats = slicer.slice_all().unwrap();

    // The -W facets each leave one triangle of the octahedron, the +W
    // facets touch the plane only along that boundary.
    assert_eq!(stats.triangles, 8);
    assert_eq!(stats.empty, 8);
    assert_eq!(stats.quads, 0);
    assert_eq!(stats.degenerate, 0);
}

#[test]
fn test_touching_a_vertex_emits_nothing() {
    // w = 1 touches the +W vertex from below, w = -1 the -W vertex from above
    for displacement in [-1.0, 1.0] {
        let mut slicer = Slicer::new(Hyperplane::w_axis(displacement));
        let key = slicer.add_batch(sixteen_cell(), Transform4D::identity());
        let stats = slicer.slice_all().unwrap();
        assert_eq!(stats.empty, 16, "displacement {}", displacement);
        assert_eq!(slicer.batch(key).unwrap().buffers().draws().count(), 0);
    }
}

#[test]
fn test_offset_slice_is_a_smaller_octahedron() {
    // The plane w = 0.5
    let mut slicer = Slicer::new(Hyperplane::w_axis(-0.5));
    slicer.add_batch(sixteen_cell(), Transform4D::identity());
    let stats = slicer.slice_all().unwrap();
    assert_eq!(stats.triangles, 8);

    let mut backend = RecordingBackend::default();
    slicer.submit(DisplayMode::Slice, &Camera4D::default(), &mut backend);
    let (points, draws) = &backend.slices[0];
    assert_eq!(draws.len(), 8);
    assert_eq!(points.len(), 24);
    for p in points {
        assert!((p.w - 0.5).abs() < 1e-6);
        // Vertices of the octahedron of radius 0.5
        let xyz = Vec4::new(p.x, p.y, p.z, 0.0);
        assert!((xyz.length() - 0.5).abs() < 1e-6, "{:?}", p);
    }
}

#[test]
fn test_diagonal_slice_mixes_triangles_and_quads() {
    let normal = Vec4::new(1.0, 1.0, 1.0, 1.0);
    let hyperplane = Hyperplane::new(normal, 0.0).unwrap();
    let mut slicer = Slicer::new(hyperplane);
    slicer.add_batch(sixteen_cell(), Transform4D::identity());
    let stats = slicer.slice_all().unwrap();

    // Two positive and two negative signs: C(4, 2) facets are cut in a quad
    assert_eq!(stats.quads, 6);
    assert_eq!(stats.triangles, 8);
    assert_eq!(stats.empty, 2);
    assert_eq!(stats.emitted_vertices(), 8 * 3 + 6 * 6);

    let mut backend = RecordingBackend::default();
    slicer.submit(DisplayMode::Slice, &Camera4D::default(), &mut backend);
    let (points, _) = &backend.slices[0];
    assert_eq!(points.len(), 60);
    for p in points {
        assert!(hyperplane.signed_distance(*p).abs() < 1e-5);
    }
}

#[test]
fn test_rotation_is_applied_before_slicing() {
    // A quarter turn in XW carries the +-X vertices onto +-W, so the
    // rotated cell is sliced exactly like the unrotated one.
    let mut angles = RotationAngles::default();
    angles.xw = std::f32::consts::FRAC_PI_2;
    let mut slicer = Slicer::new(Hyperplane::w_axis(0.5));
    slicer.add_batch(sixteen_cell(), Transform4D::from_angles(&angles, Vec4::ZERO));
    let stats = slicer.slice_all().unwrap();
    assert_eq!(stats.triangles, 8);
    assert_eq!(stats.empty, 8);
}

// ==================== Batch Tests ====================

#[test]
fn test_reslice_touches_only_the_changed_batch() {
    let mesh = sixteen_cell();
    let mut slicer = Slicer::new(Hyperplane::w_axis(0.0));
    let near = slicer.add_batch(mesh.clone(), Transform4D::identity());
    let far = slicer.add_batch(mesh, Transform4D::identity());
    slicer.slice_all().unwrap();
    let near_before = slicer.batch(near).unwrap().buffers().clone();

    slicer.set_transform(far, Transform4D::from_translation(Vec4::new(0.0, 0.0, 0.0, 5.0)));
    assert_eq!(slicer.batch(far).unwrap().dirty(), DirtyFlags::TRANSFORM);
    let stats = slicer.reslice().unwrap();

    assert_eq!(stats.total(), 16);
    assert_eq!(stats.empty, 16);
    assert_eq!(slicer.batch(near).unwrap().buffers(), &near_before);
    assert_eq!(slicer.batch(far).unwrap().buffers().draws().count(), 0);
}

#[test]
fn test_reslice_is_idempotent() {
    let hyperplane = Hyperplane::new(Vec4::new(0.3, -0.2, 0.5, 1.0), 0.1).unwrap();
    let mut slicer = Slicer::new(hyperplane);
    let key = slicer.add_batch(sixteen_cell(), Transform4D::identity());
    slicer.slice_all().unwrap();
    let first = slicer.batch(key).unwrap().buffers().clone();
    slicer.slice_all().unwrap();
    assert_eq!(slicer.batch(key).unwrap().buffers(), &first);
}

// ==================== Submission Tests ====================

#[test]
fn test_submit_each_display_mode() {
    let translation = Vec4::new(1.0, 2.0, 3.0, 0.0);
    let mut slicer = Slicer::new(Hyperplane::w_axis(0.0));
    slicer.add_batch(sixteen_cell(), Transform4D::from_translation(translation));
    slicer.slice_all().unwrap();
    let camera = Camera4D::default();

    let mut backend = RecordingBackend::default();
    slicer.submit(DisplayMode::Slice, &camera, &mut backend);
    assert_eq!(backend.slices.len(), 1);
    assert!(backend.wireframes.is_empty() && backend.skeletons.is_empty());
    // Sliced geometry is already in world space
    assert_eq!(backend.translations, vec![[0.0; 4]]);

    let mut backend = RecordingBackend::default();
    slicer.submit(DisplayMode::Tetrahedra, &camera, &mut backend);
    assert_eq!(backend.wireframes, vec![16 * 12]);
    assert_eq!(backend.translations, vec![translation.to_array()]);

    let mut backend = RecordingBackend::default();
    slicer.submit(DisplayMode::Edges, &camera, &mut backend);
    assert_eq!(backend.skeletons, vec![24 * 2]);
    assert!(backend.slices.is_empty());
}
