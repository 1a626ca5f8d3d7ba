use seascape_common::Rgb;
use seascape_shading::{ColorParameters, shade};
use seascape_waves::{WaveParameters, displacement};

/// Everything the wave/shade pair reads for one draw: the time uniform and
/// both parameter records.
///
/// Only the render loop writes `time`; only debug-panel edits write the
/// parameters.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Material {
    pub time: f32,
    pub waves: WaveParameters,
    pub colors: ColorParameters,
}

impl Material {
    pub fn new(waves: WaveParameters, colors: ColorParameters) -> Self {
        Self {
            time: 0.0,
            waves,
            colors,
        }
    }

    pub fn water() -> Self {
        Self::new(WaveParameters::water(), ColorParameters::water())
    }

    pub fn text() -> Self {
        Self::new(WaveParameters::text(), ColorParameters::text())
    }

    /// Displacement at world `(x, z)` for the current time.
    pub fn elevation_at(&self, x: f32, z: f32) -> f32 {
        displacement(x, z, self.time, &self.waves)
    }

    /// Colour for a displaced elevation.
    pub fn color_for(&self, elevation: f32) -> Rgb {
        shade(elevation, &self.colors)
    }
}
