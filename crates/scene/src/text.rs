//! Extruded text lying flat above the water.
//!
//! Glyph outlines come from a [`GlyphSource`]. The built-in [`BlockFont`] is a
//! 5×7 bitmap face whose lit cells are extruded into boxes, which is enough for
//! the wave shader to ripple across.

use crate::geometry::Mesh;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Layout and extrusion settings for a line of text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    /// Glyph height in world units.
    pub size: f32,
    /// Extrusion thickness (world y).
    pub depth: f32,
    /// Gap between one glyph's bounds and the next.
    pub letter_spacing: f32,
    /// World x of the first glyph.
    pub start_x: f32,
    /// Rest height of the text above the water.
    pub height: f32,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            size: 0.25,
            depth: 0.05,
            letter_spacing: 0.01,
            start_x: -0.6,
            height: 0.4,
        }
    }
}

/// Produces the mesh for a single glyph, or `None` if the face has no such
/// character. Meshes are in glyph space: x to the right, y up from the
/// baseline, z the extrusion axis.
pub trait GlyphSource {
    fn glyph(&self, c: char, style: &TextStyle) -> Option<Mesh>;

    /// Horizontal advance for a glyph with no geometry, such as a space.
    fn blank_advance(&self, style: &TextStyle) -> f32;
}

const GLYPH_ROWS: usize = 7;
const GLYPH_COLS: usize = 5;

/// Built-in 5×7 lowercase bitmap face. Uppercase input is folded to lowercase.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockFont;

impl BlockFont {
    /// Row bitmaps, top row first, bit 4 = leftmost column.
    fn bitmap(c: char) -> Option<[u8; GLYPH_ROWS]> {
        let rows = match c.to_ascii_lowercase() {
            'a' => [0x00, 0x00, 0x0e, 0x01, 0x0f, 0x11, 0x0f],
            'b' => [0x10, 0x10, 0x16, 0x19, 0x11, 0x11, 0x1e],
            'c' => [0x00, 0x00, 0x0e, 0x10, 0x10, 0x11, 0x0e],
            'd' => [0x01, 0x01, 0x0d, 0x13, 0x11, 0x11, 0x0f],
            'e' => [0x00, 0x00, 0x0e, 0x11, 0x1f, 0x10, 0x0e],
            'f' => [0x06, 0x09, 0x08, 0x1c, 0x08, 0x08, 0x08],
            'g' => [0x00, 0x0f, 0x11, 0x11, 0x0f, 0x01, 0x0e],
            'h' => [0x10, 0x10, 0x16, 0x19, 0x11, 0x11, 0x11],
            'i' => [0x04, 0x00, 0x0c, 0x04, 0x04, 0x04, 0x0e],
            'j' => [0x02, 0x00, 0x06, 0x02, 0x02, 0x12, 0x0c],
            'k' => [0x10, 0x10, 0x12, 0x14, 0x18, 0x14, 0x12],
            'l' => [0x0c, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0e],
            'm' => [0x00, 0x00, 0x1a, 0x15, 0x15, 0x11, 0x11],
            'n' => [0x00, 0x00, 0x16, 0x19, 0x11, 0x11, 0x11],
            'o' => [0x00, 0x00, 0x0e, 0x11, 0x11, 0x11, 0x0e],
            'p' => [0x00, 0x1e, 0x11, 0x1e, 0x10, 0x10, 0x10],
            'q' => [0x00, 0x0d, 0x13, 0x0f, 0x01, 0x01, 0x01],
            'r' => [0x00, 0x00, 0x16, 0x19, 0x10, 0x10, 0x10],
            's' => [0x00, 0x00, 0x0e, 0x10, 0x0e, 0x01, 0x1e],
            't' => [0x08, 0x08, 0x1c, 0x08, 0x08, 0x09, 0x06],
            'u' => [0x00, 0x00, 0x11, 0x11, 0x11, 0x13, 0x0d],
            'v' => [0x00, 0x00, 0x11, 0x11, 0x11, 0x0a, 0x04],
            'w' => [0x00, 0x00, 0x11, 0x11, 0x15, 0x15, 0x0a],
            'x' => [0x00, 0x00, 0x11, 0x0a, 0x04, 0x0a, 0x11],
            'y' => [0x00, 0x11, 0x11, 0x0f, 0x01, 0x11, 0x0e],
            'z' => [0x00, 0x00, 0x1f, 0x02, 0x04, 0x08, 0x1f],
            ' ' => [0x00; GLYPH_ROWS],
            _ => return None,
        };
        Some(rows)
    }
}

impl GlyphSource for BlockFont {
    fn glyph(&self, c: char, style: &TextStyle) -> Option<Mesh> {
        let rows = Self::bitmap(c)?;
        let cell = style.size / GLYPH_ROWS as f32;
        let mut mesh = Mesh::new();
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_COLS {
                if bits & (0x10 >> col) == 0 {
                    continue;
                }
                let x = col as f32 * cell;
                let y = (GLYPH_ROWS - 1 - row) as f32 * cell;
                mesh.push_box(
                    Vec3::new(x, y, 0.0),
                    Vec3::new(x + cell, y + cell, style.depth),
                );
            }
        }
        Some(mesh)
    }

    fn blank_advance(&self, style: &TextStyle) -> f32 {
        style.size * 3.0 / GLYPH_ROWS as f32
    }
}

/// Rotate a glyph-space mesh to lie flat (a −π/2 turn about x: glyph y maps to
/// world −z, extrusion maps to world +y) and move it to `origin`.
fn lay_flat(mesh: &mut Mesh, origin: Vec3) {
    for p in &mut mesh.positions {
        let [x, y, z] = *p;
        *p = [origin.x + x, origin.y + z, origin.z - y];
    }
}

/// Lay out `text` left to right, one mesh for the whole line.
///
/// Each glyph is placed at the running x offset, which then advances by the
/// glyph's bounding-box width plus `letter_spacing`. Characters the face does
/// not know are skipped with a warning.
pub fn layout(text: &str, style: &TextStyle, font: &dyn GlyphSource) -> Mesh {
    let mut line = Mesh::new();
    let mut x_offset = style.start_x;
    for c in text.chars() {
        let Some(mut glyph) = font.glyph(c, style) else {
            tracing::warn!("no glyph for {c:?}, skipping");
            continue;
        };
        let width = match glyph.bounds() {
            Some((lo, hi)) => hi.x - lo.x,
            None => font.blank_advance(style),
        };
        lay_flat(&mut glyph, Vec3::new(x_offset, style.height, 0.0));
        line.append(&glyph);
        x_offset += width + style.letter_spacing;
    }
    tracing::debug!(
        glyphs = text.chars().count(),
        vertices = line.vertex_count(),
        "text laid out"
    );
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_lowercase_letter_has_geometry() {
        let style = TextStyle::default();
        for c in 'a'..='z' {
            let g = BlockFont.glyph(c, &style).unwrap();
            assert!(!g.is_empty(), "{c} is blank");
        }
    }

    #[test]
    fn uppercase_folds_to_lowercase() {
        let style = TextStyle::default();
        assert_eq!(BlockFont.glyph('S', &style), BlockFont.glyph('s', &style));
    }

    #[test]
    fn glyph_fits_in_size_box() {
        let style = TextStyle::default();
        let (lo, hi) = BlockFont.glyph('h', &style).unwrap().bounds().unwrap();
        assert!(lo.y >= 0.0);
        assert!((hi.y - style.size).abs() < 1e-6);
        assert!((hi.z - style.depth).abs() < 1e-6);
    }

    #[test]
    fn layout_lies_flat_at_height() {
        let style = TextStyle::default();
        let mesh = layout("speedo", &style, &BlockFont);
        let (lo, hi) = mesh.bounds().unwrap();
        assert!((lo.y - style.height).abs() < 1e-6);
        assert!((hi.y - (style.height + style.depth)).abs() < 1e-6);
        // glyph "up" runs toward -z
        assert!(lo.z < 0.0);
        assert!(hi.z <= 1e-6);
        assert!(lo.x >= style.start_x - 1e-6);
    }

    #[test]
    fn layout_advances_by_width_plus_spacing() {
        let style = TextStyle::default();
        let single = layout("o", &style, &BlockFont);
        let (lo, hi) = single.bounds().unwrap();
        let width = hi.x - lo.x;

        let double = layout("oo", &style, &BlockFont);
        let (lo2, hi2) = double.bounds().unwrap();
        let expected = width * 2.0 + style.letter_spacing;
        assert!(((hi2.x - lo2.x) - expected).abs() < 1e-5);
    }

    #[test]
    fn unknown_glyphs_are_skipped() {
        let style = TextStyle::default();
        let with_unknown = layout("s€o", &style, &BlockFont);
        let without = layout("so", &style, &BlockFont);
        assert_eq!(with_unknown, without);
    }

    #[test]
    fn space_advances_without_geometry() {
        let style = TextStyle::default();
        let a = layout("o o", &style, &BlockFont);
        let b = layout("oo", &style, &BlockFont);
        assert_eq!(a.vertex_count(), b.vertex_count());
        let (_, hi_a) = a.bounds().unwrap();
        let (_, hi_b) = b.bounds().unwrap();
        assert!(hi_a.x > hi_b.x);
    }

    #[test]
    fn empty_text_is_empty_mesh() {
        assert!(layout("", &TextStyle::default(), &BlockFont).is_empty());
    }
}
