//! Polychora - slicing 4D polytopes into 3D cross-sections
//!
//! Configuration and session layers used by the `polychora` binary, on top
//! of `polychora_math`, `polychora_core` and `polychora_render`.

pub mod config;
pub mod session;

pub use config::{AppConfig, ConfigError};
pub use session::{Session, SessionError, DISPLACEMENT_RANGE};
