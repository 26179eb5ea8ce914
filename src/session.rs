//! A configured slicing session
//!
//! Builds the configured polychora, places one batch per polychoron and
//! keeps the hyperplane, model rotation and camera in sync with the slicer.

use std::sync::Arc;

use polychora_core::{
    ConvexHull, Polychoron, PolychoronBuilder, RotationAngles, TetrahedronMesh, Transform4D,
};
use polychora_math::{HyperplaneError, Vec4};
use polychora_render::{
    BatchKey, Camera4D, DispatchError, DispatchStats, DisplayMode, RenderBackend, Slicer,
};
use thiserror::Error;

use crate::config::AppConfig;

/// Range the displacement slider covers
pub const DISPLACEMENT_RANGE: (f32, f32) = (-2.0, 2.0);

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("invalid slicing hyperplane: {0}")]
    Hyperplane(#[from] HyperplaneError),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

pub struct Session {
    slicer: Slicer,
    camera: Camera4D,
    mode: DisplayMode,
    rotation: RotationAngles,
    translations: Vec<Vec4>,
    batches: Vec<(Polychoron, BatchKey)>,
}

impl Session {
    /// Build every configured polychoron with qhull (or the hull cache)
    pub fn from_config(config: &AppConfig) -> Result<Self, SessionError> {
        Self::with_solver(config, config.scene.qhull())
    }

    pub fn with_solver<H: ConvexHull>(config: &AppConfig, solver: H) -> Result<Self, SessionError> {
        let mut builder = PolychoronBuilder::new(solver).with_round_normals(config.scene.round_normals);
        if let Some(dir) = &config.scene.hull_dir {
            if let Err(e) = std::fs::create_dir_all(dir) {
                log::warn!("Could not create hull directory {}: {}", dir.display(), e);
            }
            builder = builder.with_cache_dir(dir);
        }

        let meshes = builder
            .build_many(&config.scene.polychora)
            .into_iter()
            .map(|(p, mesh)| (p, Arc::new(mesh)))
            .collect();
        Self::from_meshes(config, meshes)
    }

    /// Start a session from already built meshes, one batch each
    pub fn from_meshes(
        config: &AppConfig,
        meshes: Vec<(Polychoron, Arc<TetrahedronMesh>)>,
    ) -> Result<Self, SessionError> {
        let hyperplane = config.slicing.hyperplane()?;
        let mut slicer = Slicer::new(hyperplane).with_snap_epsilon(config.slicing.snap_epsilon);

        let rotation = config.rotation;
        let translations: Vec<Vec4> = (0..meshes.len())
            .map(|i| config.batches.translation(i))
            .collect();
        let batches: Vec<(Polychoron, BatchKey)> = meshes
            .into_iter()
            .zip(&translations)
            .map(|((polychoron, mesh), t)| {
                let key = slicer.add_batch(mesh, Transform4D::from_angles(&rotation, *t));
                (polychoron, key)
            })
            .collect();

        if batches.is_empty() {
            log::warn!("No polychoron could be built; the session is empty");
        }

        let mut session = Self {
            slicer,
            camera: config.camera.to_camera(),
            mode: config.display.mode,
            rotation,
            translations,
            batches,
        };
        let stats = session.reslice()?;
        log::info!(
            "Session ready: {} batches, {} tetrahedra, {} vertices emitted at displacement {}",
            session.batches.len(),
            stats.total(),
            stats.emitted_vertices(),
            hyperplane.displacement()
        );
        Ok(session)
    }

    pub fn slicer(&self) -> &Slicer {
        &self.slicer
    }

    pub fn camera(&self) -> &Camera4D {
        &self.camera
    }

    pub fn batches(&self) -> &[(Polychoron, BatchKey)] {
        &self.batches
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: DisplayMode) {
        self.mode = mode;
    }

    pub fn set_camera(&mut self, camera: Camera4D) {
        self.camera = camera;
    }

    /// Move the hyperplane along its normal, clamped to [`DISPLACEMENT_RANGE`]
    pub fn set_displacement(&mut self, displacement: f32) {
        let d = displacement.clamp(DISPLACEMENT_RANGE.0, DISPLACEMENT_RANGE.1);
        let hyperplane = self.slicer.hyperplane().with_displacement(d);
        self.slicer.set_hyperplane(hyperplane);
    }

    /// Replace the model rotation of every batch, keeping each translation
    pub fn set_rotation(&mut self, rotation: RotationAngles) {
        self.rotation = rotation;
        for ((_, key), t) in self.batches.iter().zip(&self.translations) {
            self.slicer.set_transform(*key, Transform4D::from_angles(&rotation, *t));
        }
    }

    pub fn rotation(&self) -> &RotationAngles {
        &self.rotation
    }

    /// Re-slice whatever changed since the last call
    pub fn reslice(&mut self) -> Result<DispatchStats, SessionError> {
        Ok(self.slicer.reslice()?)
    }

    pub fn submit<B: RenderBackend>(&self, backend: &mut B) {
        self.slicer.submit(self.mode, &self.camera, backend);
    }

    /// Slice at `steps` evenly spaced displacements across
    /// [`DISPLACEMENT_RANGE`], ending on the last one
    pub fn sweep(&mut self, steps: usize) -> Result<Vec<(f32, DispatchStats)>, SessionError> {
        let (lo, hi) = DISPLACEMENT_RANGE;
        let mut results = Vec::with_capacity(steps);
        for i in 0..steps {
            let d = if steps > 1 {
                lo + (hi - lo) * i as f32 / (steps - 1) as f32
            } else {
                lo
            };
            self.set_displacement(d);
            results.push((d, self.reslice()?));
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polychora_core::{HullError, HullResult};

    /// Hull for axis-aligned cross polytopes: one facet per orthant. Fails
    /// on anything without a vertex on every signed axis.
    struct CrossPolytopeHull;

    impl ConvexHull for CrossPolytopeHull {
        fn hull(&self, points: &[Vec4]) -> Result<HullResult, HullError> {
            let find = |axis: usize, negative: bool| {
                let sign = if negative { -1.0 } else { 1.0 };
                points
                    .iter()
                    .position(|p| {
                        p.axis(axis) * sign > 0.0 && (0..4).filter(|&i| p.axis(i) != 0.0).count() == 1
                    })
                    .ok_or(HullError::Parse { line: 0, message: "not a cross polytope".to_string() })
            };
            let mut facets = Vec::new();
            let mut normals = Vec::new();
            for mask in 0..16usize {
                let neg = |axis: usize| mask & (1 << axis) != 0;
                facets.push((0..4).map(|a| find(a, neg(a))).collect::<Result<Vec<_>, _>>()?);
                let sign = |axis: usize| if neg(axis) { -0.5 } else { 0.5 };
                normals.push(Vec4::new(sign(0), sign(1), sign(2), sign(3)));
            }
            Ok(HullResult { vertices: points.to_vec(), facets, normals })
        }
    }

    fn config() -> AppConfig {
        let mut config = AppConfig::default();
        config.scene.polychora = vec![Polychoron::Cell16, Polychoron::Cell8];
        config.slicing.displacement = 0.0;
        config
    }

    #[test]
    fn test_failed_polychoron_is_skipped() {
        let session = Session::with_solver(&config(), CrossPolytopeHull).unwrap();
        assert_eq!(session.batches().len(), 1);
        assert_eq!(session.batches()[0].0, Polychoron::Cell16);
    }

    #[test]
    fn test_session_slices_on_construction() {
        let session = Session::with_solver(&config(), CrossPolytopeHull).unwrap();
        let key = session.batches()[0].1;
        let batch = session.slicer().batch(key).unwrap();
        assert!(!batch.is_dirty());
        // The 16-cell at w = 0: an octahedron of eight triangles
        assert_eq!(batch.buffers().draws().count(), 8);
    }

    #[test]
    fn test_invalid_hyperplane() {
        let mut config = config();
        config.slicing.normal = [0.0; 4];
        assert!(matches!(
            Session::with_solver(&config, CrossPolytopeHull),
            Err(SessionError::Hyperplane(_))
        ));
    }

    #[test]
    fn test_translations_per_batch() {
        let mut config = config();
        config.scene.polychora = vec![Polychoron::Cell16, Polychoron::Cell16];
        config.batches.translations = vec![[0.0, 0.0, 0.0, 10.0]];
        let session = Session::with_solver(&config, CrossPolytopeHull).unwrap();
        let keys: Vec<BatchKey> = session.batches().iter().map(|(_, k)| *k).collect();
        let far = session.slicer().batch(keys[0]).unwrap();
        let near = session.slicer().batch(keys[1]).unwrap();
        assert_eq!(far.transform().translation, Vec4::new(0.0, 0.0, 0.0, 10.0));
        assert_eq!(far.buffers().draws().count(), 0);
        assert_eq!(near.buffers().draws().count(), 8);
    }

    #[test]
    fn test_set_rotation_keeps_translation() {
        let mut config = config();
        config.batches.translations = vec![[1.0, 2.0, 3.0, 0.0]];
        let mut session = Session::with_solver(&config, CrossPolytopeHull).unwrap();
        let mut angles = RotationAngles::default();
        angles.xw = 0.3;
        session.set_rotation(angles);
        let key = session.batches()[0].1;
        let batch = session.slicer().batch(key).unwrap();
        assert!(batch.is_dirty());
        assert_eq!(batch.transform().translation, Vec4::new(1.0, 2.0, 3.0, 0.0));
        assert_eq!(batch.transform().rotation, angles.to_matrix());
    }

    #[test]
    fn test_sweep_covers_the_range() {
        let mut session = Session::with_solver(&config(), CrossPolytopeHull).unwrap();
        let results = session.sweep(5).unwrap();
        let displacements: Vec<f32> = results.iter().map(|(d, _)| *d).collect();
        assert_eq!(displacements, vec![-2.0, -1.0, 0.0, 1.0, 2.0]);
        // At the rim of the 16-cell only a vertex is touched
        assert_eq!(results[0].1.emitted_vertices(), 0);
        assert_eq!(results[2].1.triangles, 8);
        assert_eq!(session.slicer().hyperplane().displacement(), 2.0);
    }

    #[test]
    fn test_displacement_is_clamped() {
        let mut session = Session::with_solver(&config(), CrossPolytopeHull).unwrap();
        session.set_displacement(7.0);
        assert_eq!(session.slicer().hyperplane().displacement(), 2.0);
    }
}
