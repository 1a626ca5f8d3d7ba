//! Scene description: what gets drawn, with which parameters.
//!
//! # Invariants
//! - Mesh positions are rest poses. Displacement is applied at draw time and
//!   never written back here.
//! - Each material's time is written only by the render loop.

pub mod config;
pub mod geometry;
mod material;
mod scene;
pub mod text;

pub use config::{CameraConfig, ConfigError, MaterialConfig, PlaneConfig, SceneConfig, TextConfig};
pub use geometry::Mesh;
pub use material::Material;
pub use scene::{Scene, SceneObject, TEXT, WATER};
pub use text::{BlockFont, GlyphSource, TextStyle};
