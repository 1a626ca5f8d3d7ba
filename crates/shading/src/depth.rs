use seascape_common::Rgb;
use serde::{Deserialize, Serialize};

/// Endpoint colours and the mapping from elevation to mix factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorParameters {
    /// Colour of the deepest troughs.
    pub depth_color: Rgb,
    /// Colour of the crests.
    pub surface_color: Rgb,
    pub color_offset: f32,
    pub color_multiplier: f32,
}

impl ColorParameters {
    pub fn water() -> Self {
        Self {
            depth_color: Rgb::from_hex_u32(0x000000),
            surface_color: Rgb::from_hex_u32(0x404068),
            color_offset: 0.925,
            color_multiplier: 1.0,
        }
    }

    pub fn text() -> Self {
        Self {
            depth_color: Rgb::from_hex_u32(0x9cd4ea),
            surface_color: Rgb::from_hex_u32(0xff0000),
            ..Self::water()
        }
    }
}

impl Default for ColorParameters {
    fn default() -> Self {
        Self::water()
    }
}

/// How far toward `surface_color` a point at `elevation` sits, in `[0, 1]`.
///
/// NaN elevation maps to 0 (the depth colour).
pub fn mix_strength(elevation: f32, params: &ColorParameters) -> f32 {
    let m = (elevation + params.color_offset) * params.color_multiplier;
    if m.is_nan() { 0.0 } else { m.clamp(0.0, 1.0) }
}

/// Colour of a surface point at `elevation`.
///
/// Each channel is clamped to the endpoint values, so rounding in the lerp
/// never leaves the endpoint box.
pub fn shade(elevation: f32, params: &ColorParameters) -> Rgb {
    let depth = params.depth_color.to_vec3();
    let surface = params.surface_color.to_vec3();
    let mixed = depth.lerp(surface, mix_strength(elevation, params));
    Rgb::from_vec3(mixed.clamp(depth.min(surface), depth.max(surface)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn within(c: Rgb, a: Rgb, b: Rgb) -> bool {
        let ch = |v: f32, x: f32, y: f32| v >= x.min(y) && v <= x.max(y);
        ch(c.r, a.r, b.r) && ch(c.g, a.g, b.g) && ch(c.b, a.b, b.b)
    }

    #[test]
    fn crest_is_surface_color() {
        let params = ColorParameters::water();
        assert!((mix_strength(0.1, &params) - 1.0).abs() < f32::EPSILON);
        assert_eq!(shade(0.1, &params), params.surface_color);
    }

    #[test]
    fn deepest_point_is_depth_color() {
        let params = ColorParameters::water();
        assert_eq!(mix_strength(-0.925, &params), 0.0);
        assert_eq!(shade(-0.925, &params), Rgb::BLACK);
    }

    #[test]
    fn output_stays_within_endpoints() {
        for params in [ColorParameters::water(), ColorParameters::text()] {
            for i in -400..400 {
                let e = i as f32 * 0.01;
                let c = shade(e, &params);
                assert!(
                    within(c, params.depth_color, params.surface_color),
                    "elevation {e} gave {c:?}"
                );
            }
            assert!(within(
                shade(1e30, &params),
                params.depth_color,
                params.surface_color
            ));
            assert!(within(
                shade(-1e30, &params),
                params.depth_color,
                params.surface_color
            ));
        }
    }

    #[test]
    fn grey_endpoints_never_overshoot() {
        for depth in 0..=255u8 {
            for surface in [depth, depth.wrapping_add(1), 255 - depth] {
                let params = ColorParameters {
                    depth_color: Rgb::from_u8([depth; 3]),
                    surface_color: Rgb::from_u8([surface; 3]),
                    ..ColorParameters::water()
                };
                for i in 0..=99 {
                    let e = -0.925 + i as f32 * 0.01;
                    let c = shade(e, &params);
                    assert!(
                        within(c, params.depth_color, params.surface_color),
                        "#{depth:02x} -> #{surface:02x} at {e} gave {c:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn equal_endpoints_are_returned_exactly() {
        let grey = Rgb::from_hex_u32(0x808080);
        let params = ColorParameters {
            depth_color: grey,
            surface_color: grey,
            ..ColorParameters::water()
        };
        assert_eq!(shade(-0.495, &params), grey);
        assert_eq!(shade(0.0, &params), grey);
    }

    #[test]
    fn monotone_toward_surface() {
        let params = ColorParameters::water();
        let mut last = -1.0;
        for i in -200..200 {
            let m = mix_strength(i as f32 * 0.01, &params);
            assert!(m >= last);
            last = m;
        }
    }

    #[test]
    fn reversed_endpoints_do_not_panic() {
        let params = ColorParameters {
            depth_color: Rgb::WHITE,
            surface_color: Rgb::BLACK,
            ..ColorParameters::water()
        };
        let low = shade(-2.0, &params);
        let high = shade(2.0, &params);
        assert_eq!(low, Rgb::WHITE);
        assert_eq!(high, Rgb::BLACK);
    }

    #[test]
    fn continuous_in_elevation() {
        let params = ColorParameters::text();
        let delta = 1e-4;
        for i in -150..150 {
            let e = i as f32 * 0.01;
            let a = shade(e, &params);
            let b = shade(e + delta, &params);
            let slope = params.color_multiplier;
            let bound = delta * slope + 1e-5;
            assert!((a.r - b.r).abs() <= bound);
            assert!((a.g - b.g).abs() <= bound);
            assert!((a.b - b.b).abs() <= bound);
        }
    }

    #[test]
    fn zero_multiplier_pins_to_depth() {
        let params = ColorParameters {
            color_multiplier: 0.0,
            ..ColorParameters::text()
        };
        assert_eq!(shade(5.0, &params), params.depth_color);
    }

    #[test]
    fn nan_elevation_is_depth_color() {
        let params = ColorParameters::text();
        assert_eq!(shade(f32::NAN, &params), params.depth_color);
    }

    #[test]
    fn colours_deserialize_from_hex() {
        let yaml = "depth_color: '#102030'\ncolor_multiplier: 2.5\n";
        let p: ColorParameters = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(p.depth_color, Rgb::from_hex_u32(0x102030));
        assert_eq!(p.surface_color, Rgb::from_hex_u32(0x404068));
        assert_eq!(p.color_multiplier, 2.5);
    }
}
