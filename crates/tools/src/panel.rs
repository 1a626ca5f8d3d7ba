//! Debug-panel control table.
//!
//! One entry per tweakable wave/colour field with the range and step the
//! panel offers. Every edit goes through [`apply`], which snaps to the step and
//! clamps to the range before writing, so the wave and shade functions only
//! ever see values the table allows.

use seascape_common::Rgb;
use seascape_scene::Material;

/// Errors from applying a panel edit.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PanelError {
    #[error("{param:?} rejected non-finite value {value}")]
    NotFinite { param: Param, value: f32 },
}

/// A scalar field the panel can edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Param {
    Shift,
    BigWavesElevation,
    BigWavesFrequencyX,
    BigWavesFrequencyY,
    BigWavesSpeed,
    SmallWavesElevation,
    SmallWavesFrequency,
    SmallWavesSpeed,
    SmallIterations,
    ColorOffset,
    ColorMultiplier,
}

/// A colour field the panel can edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorSlot {
    Depth,
    Surface,
}

impl ColorSlot {
    pub const ALL: [ColorSlot; 2] = [ColorSlot::Depth, ColorSlot::Surface];

    pub fn label(self) -> &'static str {
        match self {
            ColorSlot::Depth => "Depth color",
            ColorSlot::Surface => "Surface color",
        }
    }
}

/// Declared range and step of one slider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamControl {
    pub param: Param,
    pub label: &'static str,
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl ParamControl {
    const fn new(param: Param, label: &'static str, min: f32, max: f32, step: f32) -> Self {
        Self {
            param,
            label,
            min,
            max,
            step,
        }
    }

    /// Snap `value` to the nearest step from `min`, then clamp into range.
    pub fn constrain(&self, value: f32) -> f32 {
        let steps = ((value - self.min) / self.step).round();
        (self.min + steps * self.step).clamp(self.min, self.max)
    }
}

/// Every scalar control, in panel order.
pub const CONTROLS: [ParamControl; 11] = [
    ParamControl::new(Param::Shift, "Shift", -1.0, 1.0, 0.001),
    ParamControl::new(
        Param::BigWavesElevation,
        "Big waves elevation",
        0.0,
        1.0,
        0.001,
    ),
    ParamControl::new(
        Param::BigWavesFrequencyX,
        "Big waves frequency x",
        0.0,
        10.0,
        0.001,
    ),
    ParamControl::new(
        Param::BigWavesFrequencyY,
        "Big waves frequency y",
        0.0,
        10.0,
        0.001,
    ),
    ParamControl::new(Param::BigWavesSpeed, "Big waves speed", 0.0, 4.0, 0.001),
    ParamControl::new(
        Param::SmallWavesElevation,
        "Small waves elevation",
        0.0,
        1.0,
        0.001,
    ),
    ParamControl::new(
        Param::SmallWavesFrequency,
        "Small waves frequency",
        0.0,
        30.0,
        0.001,
    ),
    ParamControl::new(Param::SmallWavesSpeed, "Small waves speed", 0.0, 4.0, 0.001),
    ParamControl::new(Param::SmallIterations, "Small iterations", 0.0, 5.0, 1.0),
    ParamControl::new(Param::ColorOffset, "Color offset", 0.0, 1.0, 0.001),
    ParamControl::new(Param::ColorMultiplier, "Color multiplier", 0.0, 10.0, 0.001),
];

impl Param {
    pub fn control(self) -> &'static ParamControl {
        CONTROLS
            .iter()
            .find(|c| c.param == self)
            .unwrap_or(&CONTROLS[0])
    }

    pub fn get(self, m: &Material) -> f32 {
        let w = &m.waves;
        let c = &m.colors;
        match self {
            Param::Shift => w.shift,
            Param::BigWavesElevation => w.big_elevation,
            Param::BigWavesFrequencyX => w.big_frequency.x,
            Param::BigWavesFrequencyY => w.big_frequency.y,
            Param::BigWavesSpeed => w.big_speed,
            Param::SmallWavesElevation => w.small_elevation,
            Param::SmallWavesFrequency => w.small_frequency,
            Param::SmallWavesSpeed => w.small_speed,
            Param::SmallIterations => w.small_iterations as f32,
            Param::ColorOffset => c.color_offset,
            Param::ColorMultiplier => c.color_multiplier,
        }
    }

    fn write(self, m: &mut Material, v: f32) {
        let w = &mut m.waves;
        let c = &mut m.colors;
        match self {
            Param::Shift => w.shift = v,
            Param::BigWavesElevation => w.big_elevation = v,
            Param::BigWavesFrequencyX => w.big_frequency.x = v,
            Param::BigWavesFrequencyY => w.big_frequency.y = v,
            Param::BigWavesSpeed => w.big_speed = v,
            Param::SmallWavesElevation => w.small_elevation = v,
            Param::SmallWavesFrequency => w.small_frequency = v,
            Param::SmallWavesSpeed => w.small_speed = v,
            Param::SmallIterations => w.small_iterations = v as u32,
            Param::ColorOffset => c.color_offset = v,
            Param::ColorMultiplier => c.color_multiplier = v,
        }
    }
}

/// Apply a slider edit. Returns the value actually written.
pub fn apply(material: &mut Material, param: Param, value: f32) -> Result<f32, PanelError> {
    if !value.is_finite() {
        return Err(PanelError::NotFinite { param, value });
    }
    let v = param.control().constrain(value);
    param.write(material, v);
    tracing::debug!(?param, requested = value, applied = v, "parameter changed");
    Ok(v)
}

pub fn color(material: &Material, slot: ColorSlot) -> Rgb {
    match slot {
        ColorSlot::Depth => material.colors.depth_color,
        ColorSlot::Surface => material.colors.surface_color,
    }
}

/// Apply a colour-picker edit. Channels are clamped to `[0, 1]`.
pub fn set_color(material: &mut Material, slot: ColorSlot, value: Rgb) {
    let v = Rgb::new(
        value.r.clamp(0.0, 1.0),
        value.g.clamp(0.0, 1.0),
        value.b.clamp(0.0, 1.0),
    );
    match slot {
        ColorSlot::Depth => material.colors.depth_color = v,
        ColorSlot::Surface => material.colors.surface_color = v,
    }
    tracing::debug!(?slot, color = %v, "color changed");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_param_has_exactly_one_control() {
        let all = [
            Param::Shift,
            Param::BigWavesElevation,
            Param::BigWavesFrequencyX,
            Param::BigWavesFrequencyY,
            Param::BigWavesSpeed,
            Param::SmallWavesElevation,
            Param::SmallWavesFrequency,
            Param::SmallWavesSpeed,
            Param::SmallIterations,
            Param::ColorOffset,
            Param::ColorMultiplier,
        ];
        for p in all {
            assert_eq!(CONTROLS.iter().filter(|c| c.param == p).count(), 1);
            assert_eq!(p.control().param, p);
        }
    }

    #[test]
    fn defaults_sit_inside_declared_ranges() {
        for m in [Material::water(), Material::text()] {
            for c in &CONTROLS {
                let v = c.param.get(&m);
                assert!(v >= c.min && v <= c.max, "{} = {v}", c.label);
            }
        }
    }

    #[test]
    fn out_of_range_edits_are_clamped() {
        let mut m = Material::water();
        assert_eq!(apply(&mut m, Param::BigWavesElevation, 5.0).unwrap(), 1.0);
        assert_eq!(m.waves.big_elevation, 1.0);
        assert_eq!(apply(&mut m, Param::Shift, -3.0).unwrap(), -1.0);
        assert_eq!(apply(&mut m, Param::ColorMultiplier, -0.5).unwrap(), 0.0);
    }

    #[test]
    fn edits_snap_to_step() {
        let mut m = Material::water();
        let v = apply(&mut m, Param::SmallWavesSpeed, 0.12345).unwrap();
        assert!((v - 0.123).abs() < 1e-5);
        assert_eq!(apply(&mut m, Param::SmallIterations, 2.6).unwrap(), 3.0);
        assert_eq!(m.waves.small_iterations, 3);
        assert_eq!(apply(&mut m, Param::SmallIterations, 9.0).unwrap(), 5.0);
        assert_eq!(m.waves.small_iterations, 5);
    }

    #[test]
    fn frequency_axes_are_independent() {
        let mut m = Material::water();
        apply(&mut m, Param::BigWavesFrequencyY, 7.0).unwrap();
        assert_eq!(m.waves.big_frequency.x, 4.0);
        assert!((m.waves.big_frequency.y - 7.0).abs() < 1e-4);
    }

    #[test]
    fn non_finite_edit_is_rejected() {
        let mut m = Material::water();
        let before = m;
        let err = apply(&mut m, Param::BigWavesSpeed, f32::NAN).unwrap_err();
        let PanelError::NotFinite { param, .. } = err;
        assert_eq!(param, Param::BigWavesSpeed);
        assert_eq!(m, before);
    }

    #[test]
    fn color_edits_are_clamped() {
        let mut m = Material::text();
        set_color(&mut m, ColorSlot::Surface, Rgb::new(2.0, -1.0, 0.5));
        assert_eq!(color(&m, ColorSlot::Surface), Rgb::new(1.0, 0.0, 0.5));
        assert_eq!(color(&m, ColorSlot::Depth), Rgb::from_hex_u32(0x9cd4ea));
    }

    #[test]
    fn edits_do_not_touch_time() {
        let mut m = Material::water();
        m.time = 4.0;
        apply(&mut m, Param::ColorOffset, 0.5).unwrap();
        assert_eq!(m.time, 4.0);
    }
}
