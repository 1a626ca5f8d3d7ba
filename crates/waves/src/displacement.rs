use crate::noise::perlin2;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Shape of the animated surface.
///
/// One large standing wave (product of two sines) plus `small_iterations`
/// layers of noise ripples, the whole pattern drifting along x at `shift`
/// units per second.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveParameters {
    pub big_elevation: f32,
    /// Spatial frequency along x (`.x`) and z (`.y`).
    pub big_frequency: Vec2,
    pub big_speed: f32,
    pub small_elevation: f32,
    pub small_frequency: f32,
    pub small_speed: f32,
    pub small_iterations: u32,
    /// Horizontal drift rate of the whole pattern.
    pub shift: f32,
}

impl WaveParameters {
    /// Defaults for the water plane.
    pub fn water() -> Self {
        Self {
            big_elevation: 0.05,
            big_frequency: Vec2::new(4.0, 1.5),
            big_speed: 0.75,
            small_elevation: 0.15,
            small_frequency: 2.0,
            small_speed: 0.2,
            small_iterations: 1,
            shift: 0.01,
        }
    }

    /// Defaults for the floating text: taller swell, finer ripples.
    pub fn text() -> Self {
        Self {
            big_elevation: 0.2,
            small_frequency: 3.0,
            ..Self::water()
        }
    }
}

impl Default for WaveParameters {
    fn default() -> Self {
        Self::water()
    }
}

/// The large standing wave at `(x, z)`, with the horizontal shift applied.
pub fn big_wave(x: f32, z: f32, t: f32, params: &WaveParameters) -> f32 {
    let x = x + t * params.shift;
    let phase = t * params.big_speed;
    params.big_elevation
        * (x * params.big_frequency.x + phase).sin()
        * (z * params.big_frequency.y + phase).sin()
}

/// Sum of the small noise ripples at `(x, z)`. Always `<= 0`: ripples carve
/// troughs into the big wave. Layer `i` samples noise at `i` times the base
/// frequency with amplitude scaled by `1 / i`.
pub fn small_waves(x: f32, z: f32, t: f32, params: &WaveParameters) -> f32 {
    let x = x + t * params.shift;
    let drift = t * params.small_speed;
    let mut elevation = 0.0;
    for i in 1..=params.small_iterations {
        let i = i as f32;
        let n = perlin2(
            x * params.small_frequency * i + drift,
            z * params.small_frequency * i + drift,
        );
        elevation -= (n * params.small_elevation / i).abs();
    }
    elevation
}

/// Vertical displacement of a surface point at time `t`.
pub fn displacement(x: f32, z: f32, t: f32, params: &WaveParameters) -> f32 {
    big_wave(x, z, t, params) + small_waves(x, z, t, params)
}

/// Min/max elevation observed over a batch of vertices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElevationRange {
    pub min: f32,
    pub max: f32,
}

impl ElevationRange {
    pub const EMPTY: ElevationRange = ElevationRange {
        min: f32::INFINITY,
        max: f32::NEG_INFINITY,
    };

    pub fn include(&mut self, e: f32) {
        self.min = self.min.min(e);
        self.max = self.max.max(e);
    }

    pub fn merge(self, other: ElevationRange) -> ElevationRange {
        ElevationRange {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }
}

/// Overwrite the y coordinate of every vertex with its displacement at `t`,
/// measured from `base_y` (the mesh's rest height).
///
/// y is replaced, never accumulated, so calling this every frame on the same
/// buffer is safe. `base_y` must hold one rest height per vertex.
pub fn displace_vertices(
    vertices: &mut [[f32; 3]],
    base_y: &[f32],
    t: f32,
    params: &WaveParameters,
) -> ElevationRange {
    debug_assert_eq!(vertices.len(), base_y.len(), "one rest height per vertex");
    let _span = tracing::trace_span!("displace_vertices", count = vertices.len()).entered();
    let mut range = ElevationRange::EMPTY;
    for (v, base) in vertices.iter_mut().zip(base_y) {
        let e = displacement(v[0], v[2], t, params);
        v[1] = base + e;
        range.include(e);
    }
    range
}
