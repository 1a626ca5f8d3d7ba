//! Startup configuration, read once from YAML.
//!
//! Every section has defaults matching the stock demo, so an empty file (or no
//! file) gives the stock scene. The config is never written back: edits made in
//! the debug panel live only for the session.

use seascape_shading::ColorParameters;
use seascape_waves::WaveParameters;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::text::TextStyle;

/// Errors from loading a scene config.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Largest accepted plane resolution. Keeps the vertex count well inside `u32`
/// indices.
pub const MAX_RESOLUTION: u32 = 4096;

/// The water plane's extent and tessellation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaneConfig {
    pub width: f32,
    pub depth: f32,
    /// Segments per side.
    pub resolution: u32,
}

impl Default for PlaneConfig {
    fn default() -> Self {
        Self {
            width: 2.0,
            depth: 3.0,
            resolution: 1024,
        }
    }
}

/// Parameters for one shaded surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialConfig {
    pub waves: WaveParameters,
    pub colors: ColorParameters,
}

impl MaterialConfig {
    pub fn water() -> Self {
        Self {
            waves: WaveParameters::water(),
            colors: ColorParameters::water(),
        }
    }

    pub fn text() -> Self {
        Self {
            waves: WaveParameters::text(),
            colors: ColorParameters::text(),
        }
    }
}

impl Default for MaterialConfig {
    fn default() -> Self {
        Self::water()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    pub enabled: bool,
    pub content: String,
    pub style: TextStyle,
    /// Omitted fields fall back to the text defaults, not the water ones.
    #[serde(deserialize_with = "text_material")]
    pub material: MaterialConfig,
}

/// Overlay a partial material onto the text defaults.
fn text_material<'de, D>(deserializer: D) -> Result<MaterialConfig, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;

    let overrides = serde_yaml::Value::deserialize(deserializer)?;
    let mut merged = serde_yaml::to_value(MaterialConfig::text()).map_err(D::Error::custom)?;
    overlay(&mut merged, overrides);
    serde_yaml::from_value(merged).map_err(D::Error::custom)
}

fn overlay(base: &mut serde_yaml::Value, overrides: serde_yaml::Value) {
    match (base, overrides) {
        (serde_yaml::Value::Mapping(base), serde_yaml::Value::Mapping(overrides)) => {
            for (key, value) in overrides {
                match base.get_mut(&key) {
                    Some(slot) => overlay(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            content: "speedo".into(),
            style: TextStyle::default(),
            material: MaterialConfig::text(),
        }
    }
}

/// Initial orbit camera placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub target: [f32; 3],
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Fraction of the remaining orbit velocity removed per update, in (0, 1].
    pub damping: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [1.0, 1.0, 1.0],
            target: [0.0, 0.0, 0.0],
            fov_degrees: 75.0,
            near: 0.1,
            far: 100.0,
            damping: 0.05,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub plane: PlaneConfig,
    pub water: MaterialConfig,
    pub text: TextConfig,
    pub camera: CameraConfig,
}

impl SceneConfig {
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: SceneConfig = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&text)?;
        tracing::info!("loaded scene config from {}", path.display());
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Replace the plane resolution when an override is given, then revalidate.
    /// `None` keeps whatever the config file set.
    pub fn with_resolution(mut self, resolution: Option<u32>) -> Result<Self, ConfigError> {
        if let Some(resolution) = resolution {
            self.plane.resolution = resolution;
            self.validate()?;
        }
        Ok(self)
    }

    /// Reject values the scene cannot be built from. Wave and colour values are
    /// left alone: the debug panel clamps those on edit.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let plane = &self.plane;
        if !(plane.width > 0.0 && plane.depth > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "plane extent must be positive, got {}x{}",
                plane.width, plane.depth
            )));
        }
        if plane.resolution == 0 || plane.resolution > MAX_RESOLUTION {
            return Err(ConfigError::Invalid(format!(
                "plane resolution must be in 1..={MAX_RESOLUTION}, got {}",
                plane.resolution
            )));
        }
        let cam = &self.camera;
        if !(cam.near > 0.0 && cam.far > cam.near) {
            return Err(ConfigError::Invalid(format!(
                "camera clip range must satisfy 0 < near < far, got {}..{}",
                cam.near, cam.far
            )));
        }
        if !(cam.damping > 0.0 && cam.damping <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "camera damping must be in (0, 1], got {}",
                cam.damping
            )));
        }
        Ok(())
    }
}
