//! Stateless 2D gradient noise.
//!
//! Classic Perlin construction: a pseudo-random gradient at every integer
//! lattice point, dotted with the offset to the sample and blended with a
//! quintic fade. Gradients come from an integer hash of the lattice
//! coordinates, so there is no permutation table or seed state to share, and
//! the WGSL port in the render backend produces the same values bit for bit
//! modulo float rounding.

#[inline]
fn fade(t: f32) -> f32 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// 32-bit avalanche hash of a lattice coordinate.
#[inline]
pub fn lattice_hash(ix: i32, iy: i32) -> u32 {
    let mut h = (ix as u32).wrapping_mul(0x8da6_b343) ^ (iy as u32).wrapping_mul(0xd816_3841);
    h ^= h >> 16;
    h = h.wrapping_mul(0x7feb_352d);
    h ^= h >> 15;
    h = h.wrapping_mul(0x846c_a68b);
    h ^= h >> 16;
    h
}

/// Dot product of one of eight lattice gradients with `(dx, dy)`.
///
/// Four diagonals `(±1, ±1)` and four axes. The diagonals have length √2,
/// which puts the noise extremes at ±1.
#[inline]
fn grad(hash: u32, dx: f32, dy: f32) -> f32 {
    match hash & 7 {
        0 => dx + dy,
        1 => -dx + dy,
        2 => dx - dy,
        3 => -dx - dy,
        4 => dx,
        5 => -dx,
        6 => dy,
        _ => -dy,
    }
}

/// 2D Perlin noise in `[-1, 1]`. Exactly zero at every integer lattice point.
pub fn perlin2(x: f32, y: f32) -> f32 {
    let x0 = x.floor();
    let y0 = y.floor();
    let ix = x0 as i32;
    let iy = y0 as i32;
    let fx = x - x0;
    let fy = y - y0;

    let v00 = grad(lattice_hash(ix, iy), fx, fy);
    let v10 = grad(lattice_hash(ix.wrapping_add(1), iy), fx - 1.0, fy);
    let v01 = grad(lattice_hash(ix, iy.wrapping_add(1)), fx, fy - 1.0);
    let v11 = grad(
        lattice_hash(ix.wrapping_add(1), iy.wrapping_add(1)),
        fx - 1.0,
        fy - 1.0,
    );

    let u = fade(fx);
    let v = fade(fy);
    lerp(lerp(v00, v10, u), lerp(v01, v11, u), v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_on_lattice_points() {
        for ix in -20..20 {
            for iy in -20..20 {
                assert_eq!(perlin2(ix as f32, iy as f32), 0.0, "at ({ix}, {iy})");
            }
        }
    }

    #[test]
    fn deterministic() {
        let a = perlin2(3.17, -8.42);
        let b = perlin2(3.17, -8.42);
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn bounded() {
        let mut max: f32 = 0.0;
        for i in 0..200 {
            for j in 0..200 {
                let n = perlin2(i as f32 * 0.071 - 7.0, j as f32 * 0.053 - 5.0);
                assert!(n.abs() <= 1.0 + 1e-5, "noise {n} out of range");
                max = max.max(n.abs());
            }
        }
        // not degenerate
        assert!(max > 0.2);
    }

    #[test]
    fn not_constant_between_lattice_points() {
        let samples: Vec<f32> = (0..16).map(|i| perlin2(i as f32 + 0.5, 0.5)).collect();
        let first = samples[0];
        assert!(samples.iter().any(|s| (s - first).abs() > 1e-3));
    }

    #[test]
    fn continuous_across_cell_edges() {
        let eps = 1e-4;
        for i in -5..5 {
            let edge = i as f32;
            let left = perlin2(edge - eps, 0.37);
            let right = perlin2(edge + eps, 0.37);
            assert!((left - right).abs() < 1e-2);
        }
    }

    #[test]
    fn hash_spreads_neighbours() {
        let a = lattice_hash(0, 0);
        let b = lattice_hash(1, 0);
        let c = lattice_hash(0, 1);
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(b, c);
    }
}
