/// WGSL shader shared by the water plane and the floating text.
///
/// The vertex stage displaces world-space y by the wave function; the fragment
/// stage maps the displacement to a colour. Noise and wave code mirror
/// `seascape_waves` operation for operation so CPU and GPU agree.
pub const WATER_SHADER: &str = r#"
struct Material {
    view_proj: mat4x4<f32>,
    big_frequency: vec2<f32>,
    time: f32,
    shift: f32,
    big_elevation: f32,
    big_speed: f32,
    small_elevation: f32,
    small_frequency: f32,
    small_speed: f32,
    small_iterations: u32,
    color_offset: f32,
    color_multiplier: f32,
    depth_color: vec4<f32>,
    surface_color: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> u: Material;

fn lattice_hash(ix: i32, iy: i32) -> u32 {
    var h = (bitcast<u32>(ix) * 0x8da6b343u) ^ (bitcast<u32>(iy) * 0xd8163841u);
    h ^= h >> 16u;
    h *= 0x7feb352du;
    h ^= h >> 15u;
    h *= 0x846ca68bu;
    h ^= h >> 16u;
    return h;
}

fn grad(hash: u32, dx: f32, dy: f32) -> f32 {
    switch hash & 7u {
        case 0u: { return dx + dy; }
        case 1u: { return -dx + dy; }
        case 2u: { return dx - dy; }
        case 3u: { return -dx - dy; }
        case 4u: { return dx; }
        case 5u: { return -dx; }
        case 6u: { return dy; }
        default: { return -dy; }
    }
}

fn fade(t: f32) -> f32 {
    return t * t * t * (t * (t * 6.0 - 15.0) + 10.0);
}

fn perlin2(p: vec2<f32>) -> f32 {
    let p0 = floor(p);
    let i = vec2<i32>(p0);
    let f = p - p0;

    let v00 = grad(lattice_hash(i.x, i.y), f.x, f.y);
    let v10 = grad(lattice_hash(i.x + 1, i.y), f.x - 1.0, f.y);
    let v01 = grad(lattice_hash(i.x, i.y + 1), f.x, f.y - 1.0);
    let v11 = grad(lattice_hash(i.x + 1, i.y + 1), f.x - 1.0, f.y - 1.0);

    let a = fade(f.x);
    let b = fade(f.y);
    return mix(mix(v00, v10, a), mix(v01, v11, a), b);
}

fn displacement(x_in: f32, z: f32) -> f32 {
    let t = u.time;
    let x = x_in + t * u.shift;

    let phase = t * u.big_speed;
    var elevation = u.big_elevation
        * sin(x * u.big_frequency.x + phase)
        * sin(z * u.big_frequency.y + phase);

    let drift = t * u.small_speed;
    for (var i = 1u; i <= u.small_iterations; i++) {
        let k = f32(i);
        let n = perlin2(vec2<f32>(
            x * u.small_frequency * k + drift,
            z * u.small_frequency * k + drift
        ));
        elevation -= abs(n * u.small_elevation / k);
    }
    return elevation;
}

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) elevation: f32,
};

@vertex
fn vs_main(@location(0) position: vec3<f32>) -> VertexOutput {
    let e = displacement(position.x, position.z);
    var out: VertexOutput;
    out.clip_position = u.view_proj * vec4<f32>(position.x, position.y + e, position.z, 1.0);
    out.elevation = e;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let m = (in.elevation + u.color_offset) * u.color_multiplier;
    let strength = select(clamp(m, 0.0, 1.0), 0.0, m != m);
    let color = mix(u.depth_color.rgb, u.surface_color.rgb, strength);
    return vec4<f32>(color, 1.0);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declares_both_entry_points() {
        assert!(WATER_SHADER.contains("fn vs_main"));
        assert!(WATER_SHADER.contains("fn fs_main"));
    }

    #[test]
    fn hash_constants_match_cpu_noise() {
        // Same multipliers as seascape_waves::noise::lattice_hash.
        for c in ["0x8da6b343u", "0xd8163841u", "0x7feb352du", "0x846ca68bu"] {
            assert!(WATER_SHADER.contains(c), "missing {c}");
        }
    }
}
