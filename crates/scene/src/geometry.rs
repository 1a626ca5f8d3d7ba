use glam::Vec3;

use crate::config::MAX_RESOLUTION;

/// Indexed triangle mesh. Positions are the rest pose; the wave function
/// displaces y at draw time without touching this data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub positions: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Axis-aligned bounds, or `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut it = self.positions.iter().map(|p| Vec3::from_array(*p));
        let first = it.next()?;
        Some(it.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p))))
    }

    /// Append another mesh, re-basing its indices.
    pub fn append(&mut self, other: &Mesh) {
        let base = self.positions.len() as u32;
        self.positions.extend_from_slice(&other.positions);
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }

    pub fn translate(&mut self, offset: Vec3) {
        for p in &mut self.positions {
            *p = (Vec3::from_array(*p) + offset).to_array();
        }
    }

    /// Append an axis-aligned box spanning `min..max`, faces wound
    /// counter-clockwise when seen from outside.
    pub fn push_box(&mut self, min: Vec3, max: Vec3) {
        let base = self.positions.len() as u32;
        let (x0, y0, z0) = (min.x, min.y, min.z);
        let (x1, y1, z1) = (max.x, max.y, max.z);
        self.positions.extend_from_slice(&[
            [x0, y0, z0],
            [x1, y0, z0],
            [x1, y1, z0],
            [x0, y1, z0],
            [x0, y0, z1],
            [x1, y0, z1],
            [x1, y1, z1],
            [x0, y1, z1],
        ]);
        #[rustfmt::skip]
        const FACES: [u32; 36] = [
            0, 2, 1, 0, 3, 2, // -Z
            4, 5, 6, 4, 6, 7, // +Z
            0, 4, 7, 0, 7, 3, // -X
            1, 2, 6, 1, 6, 5, // +X
            0, 1, 5, 0, 5, 4, // -Y
            3, 7, 6, 3, 6, 2, // +Y
        ];
        self.indices.extend(FACES.iter().map(|i| i + base));
    }
}

/// Regular grid in the XZ plane at y = 0, centred on the origin.
///
/// `width` spans x, `depth` spans z, `segments` cells per side, so the mesh
/// has `(segments + 1)²` vertices. Triangles face +y. `segments` is clamped
/// to `1..=MAX_RESOLUTION`.
pub fn plane(width: f32, depth: f32, segments: u32) -> Mesh {
    let segments = segments.clamp(1, MAX_RESOLUTION);
    let row = segments + 1;
    let mut positions = Vec::with_capacity((row * row) as usize);
    for iz in 0..row {
        let z = iz as f32 / segments as f32 * depth - depth * 0.5;
        for ix in 0..row {
            let x = ix as f32 / segments as f32 * width - width * 0.5;
            positions.push([x, 0.0, z]);
        }
    }

    let mut indices = Vec::with_capacity((segments * segments * 6) as usize);
    for iz in 0..segments {
        for ix in 0..segments {
            let a = iz * row + ix;
            let b = a + 1;
            let c = a + row;
            let d = c + 1;
            indices.extend_from_slice(&[a, c, b, b, c, d]);
        }
    }

    Mesh { positions, indices }
}

/// Face normal of triangle `tri` (unnormalised).
pub fn triangle_normal(mesh: &Mesh, tri: usize) -> Vec3 {
    let i = &mesh.indices[tri * 3..tri * 3 + 3];
    let a = Vec3::from_array(mesh.positions[i[0] as usize]);
    let b = Vec3::from_array(mesh.positions[i[1] as usize]);
    let c = Vec3::from_array(mesh.positions[i[2] as usize]);
    (b - a).cross(c - a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plane_vertex_and_triangle_counts() {
        let m = plane(2.0, 3.0, 4);
        assert_eq!(m.vertex_count(), 25);
        assert_eq!(m.triangle_count(), 32);
        assert!(m.indices.iter().all(|&i| (i as usize) < m.vertex_count()));
    }

    #[test]
    fn plane_spans_requested_extent() {
        let m = plane(2.0, 3.0, 8);
        let (lo, hi) = m.bounds().unwrap();
        assert_eq!(lo, Vec3::new(-1.0, 0.0, -1.5));
        assert_eq!(hi, Vec3::new(1.0, 0.0, 1.5));
    }

    #[test]
    fn plane_faces_up() {
        let m = plane(1.0, 1.0, 3);
        for t in 0..m.triangle_count() {
            let n = triangle_normal(&m, t);
            assert!(n.y > 0.0);
            assert!(n.x.abs() < 1e-6 && n.z.abs() < 1e-6);
        }
    }

    #[test]
    fn zero_segments_is_one_cell() {
        let m = plane(1.0, 1.0, 0);
        assert_eq!(m.vertex_count(), 4);
        assert_eq!(m.triangle_count(), 2);
    }

    #[test]
    fn box_faces_point_outward() {
        let mut m = Mesh::new();
        m.push_box(Vec3::ZERO, Vec3::ONE);
        let centre = Vec3::splat(0.5);
        for t in 0..m.triangle_count() {
            let i = &m.indices[t * 3..t * 3 + 3];
            let a = Vec3::from_array(m.positions[i[0] as usize]);
            let n = triangle_normal(&m, t);
            assert!(n.dot(a - centre) > 0.0, "triangle {t} faces inward");
        }
    }

    #[test]
    fn append_rebases_indices() {
        let mut a = Mesh::new();
        a.push_box(Vec3::ZERO, Vec3::ONE);
        let mut b = Mesh::new();
        b.push_box(Vec3::splat(2.0), Vec3::splat(3.0));
        a.append(&b);
        assert_eq!(a.vertex_count(), 16);
        assert_eq!(a.indices[36], 8);
        let (_, hi) = a.bounds().unwrap();
        assert_eq!(hi, Vec3::splat(3.0));
    }

    #[test]
    fn empty_mesh_has_no_bounds() {
        assert!(Mesh::new().bounds().is_none());
    }
}
