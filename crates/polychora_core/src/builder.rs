//! Polychoron construction pipeline
//!
//! seeds -> orbit -> convex hull -> validated tetrahedral mesh. Failures are
//! per object: [`PolychoronBuilder::build_many`] reports a broken polychoron
//! and carries on with the rest.

use std::path::PathBuf;

use crate::error::BuildError;
use crate::hull::{ConvexHull, HullResult};
use crate::mesh::TetrahedronMesh;
use crate::polychoron::Polychoron;

pub struct PolychoronBuilder<H: ConvexHull> {
    solver: H,
    round_normals: bool,
    cache_dir: Option<PathBuf>,
}

impl<H: ConvexHull> PolychoronBuilder<H> {
    pub fn new(solver: H) -> Self {
        Self {
            solver,
            round_normals: true,
            cache_dir: None,
        }
    }

    /// Round facet normals to the nearest tenth before use (on by default)
    pub fn with_round_normals(mut self, round: bool) -> Self {
        self.round_normals = round;
        self
    }

    /// Read hulls from, and write new hulls to, `<dir>/<slug>.ron`
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    /// Only built-in polychora are cached: custom seeds can change under an
    /// unchanged name, or reuse a built-in one.
    fn cache_path(&self, polychoron: &Polychoron) -> Option<PathBuf> {
        if matches!(polychoron, Polychoron::Custom { .. }) {
            return None;
        }
        self.cache_dir
            .as_ref()
            .map(|dir| dir.join(format!("{}.ron", polychoron.slug())))
    }

    /// Compute (or load) the convex hull of a polychoron's orbit
    pub fn hull(&self, polychoron: &Polychoron) -> Result<HullResult, BuildError> {
        let cache_path = self.cache_path(polychoron);
        if let Some(path) = cache_path.as_ref().filter(|p| p.exists()) {
            log::debug!("Loading cached hull for {} from {}", polychoron.name(), path.display());
            return Ok(HullResult::load(path)?);
        }

        let orbit = polychoron.orbit();
        if orbit.is_empty() {
            return Err(BuildError::EmptyOrbit);
        }
        let points = orbit.to_vec4s()?;
        let hull = self.solver.hull(&points)?;

        if let Some(path) = cache_path {
            if let Err(e) = hull.save(&path) {
                log::warn!("Could not cache hull at {}: {}", path.display(), e);
            }
        }
        Ok(hull)
    }

    pub fn build(&self, polychoron: &Polychoron) -> Result<TetrahedronMesh, BuildError> {
        let hull = self.hull(polychoron)?;
        let mesh = TetrahedronMesh::from_hull(&hull, self.round_normals)?;
        log::info!(
            "Built {}: {} vertices, {} tetrahedra, {} edges",
            polychoron.name(),
            mesh.vertices().len(),
            mesh.tetrahedron_count(),
            mesh.edges().len()
        );
        Ok(mesh)
    }

    /// Build every polychoron that can be built, logging the ones that can't
    pub fn build_many(&self, polychora: &[Polychoron]) -> Vec<(Polychoron, TetrahedronMesh)> {
        polychora
            .iter()
            .filter_map(|p| match self.build(p) {
                Ok(mesh) => Some((p.clone(), mesh)),
                Err(e) => {
                    log::error!("Failed to build {}: {}", p.name(), e);
                    None
                }
            })
            .collect()
    }
}
