//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`POLY_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use polychora_core::{Polychoron, QhullCommand, RotationAngles};
use polychora_math::{Hyperplane, HyperplaneError, Vec4};
use polychora_render::{Camera4D, DisplayMode, DEFAULT_SNAP_EPSILON};
use serde::{Serialize, Deserialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Which polychora to build and how
    #[serde(default)]
    pub scene: SceneConfig,
    /// Slicing hyperplane
    #[serde(default)]
    pub slicing: SlicingConfig,
    /// Model rotation shared by every batch
    #[serde(default)]
    pub rotation: RotationAngles,
    /// Per-batch placement
    #[serde(default)]
    pub batches: BatchesConfig,
    /// Camera configuration
    #[serde(default)]
    pub camera: CameraConfig,
    /// Display configuration
    #[serde(default)]
    pub display: DisplayConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`POLY_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
        }

        // Load user config (optional)
        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // Environment variables override everything
        // POLY_SLICING__DISPLACEMENT=0.5 -> slicing.displacement = 0.5
        figment = figment.merge(Env::prefixed("POLY_").split("__"));

        Ok(figment.extract()?)
    }
}

/// Scene configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Polychora to build, one batch each
    pub polychora: Vec<Polychoron>,
    /// Directory of cached RON hulls
    pub hull_dir: Option<PathBuf>,
    /// qhull executable; `qhull` on the PATH when unset
    pub qhull_program: Option<PathBuf>,
    /// Extra qhull options
    pub qhull_options: String,
    /// Round facet normals to the nearest tenth
    pub round_normals: bool,
}

impl SceneConfig {
    /// The configured qhull invocation
    pub fn qhull(&self) -> QhullCommand {
        let options = self.qhull_options.clone();
        match &self.qhull_program {
            Some(program) => QhullCommand::new(program, options),
            None => QhullCommand { options, ..Default::default() },
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            polychora: Polychoron::REGULAR.to_vec(),
            hull_dir: None,
            qhull_program: None,
            qhull_options: "Qt".to_string(),
            round_normals: true,
        }
    }
}

/// Slicing hyperplane configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SlicingConfig {
    /// Hyperplane normal [x, y, z, w], normalized on use
    pub normal: [f32; 4],
    /// Signed distance of the hyperplane from the origin
    pub displacement: f32,
    /// Signed distances at most this far from zero count as on the plane
    pub snap_epsilon: f32,
}

impl SlicingConfig {
    pub fn hyperplane(&self) -> Result<Hyperplane, HyperplaneError> {
        Hyperplane::new(Vec4::from_array(self.normal), self.displacement)
    }
}

impl Default for SlicingConfig {
    fn default() -> Self {
        Self {
            normal: [0.0, 0.0, 0.0, 1.0],
            displacement: 0.1,
            snap_epsilon: DEFAULT_SNAP_EPSILON,
        }
    }
}

/// Batch placement configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchesConfig {
    /// Translation of the n-th batch [x, y, z, w]; missing entries are the origin
    pub translations: Vec<[f32; 4]>,
}

impl BatchesConfig {
    pub fn translation(&self, index: usize) -> Vec4 {
        self.translations
            .get(index)
            .map(|t| Vec4::from_array(*t))
            .unwrap_or(Vec4::ZERO)
    }
}

/// Camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Eye position [x, y, z, w]
    pub from: [f32; 4],
    /// Look-at target
    pub to: [f32; 4],
    pub up: [f32; 4],
    pub over: [f32; 4],
    /// Field of view in degrees
    pub fov: f32,
}

impl CameraConfig {
    pub fn to_camera(&self) -> Camera4D {
        Camera4D::new(
            Vec4::from_array(self.from),
            Vec4::from_array(self.to),
            Vec4::from_array(self.up),
            Vec4::from_array(self.over),
            self.fov,
        )
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        let camera = Camera4D::default();
        Self {
            from: camera.from.to_array(),
            to: camera.to.to_array(),
            up: camera.up.to_array(),
            over: camera.over.to_array(),
            fov: camera.fov,
        }
    }
}

/// Display configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// slice, tetrahedra or edges
    pub mode: DisplayMode,
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Configuration error
#[derive(Debug, Error)]
#[error("Configuration error: {0}")]
pub struct ConfigError(#[from] figment::Error);
