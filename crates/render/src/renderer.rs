use glam::{Mat4, Vec3};
use seascape_common::Rgb;
use seascape_scene::Scene;
use seascape_waves::displace_vertices;
use serde::Serialize;
use std::fmt;

/// Camera state handed to a renderer for one frame.
#[derive(Debug, Clone, Copy)]
pub struct RenderView {
    pub view_proj: Mat4,
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            view_proj: Mat4::IDENTITY,
            eye: Vec3::ONE,
            target: Vec3::ZERO,
            fov_degrees: 75.0,
        }
    }
}

/// Errors a renderer can report for a frame.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("surface lost or outdated")]
    SurfaceLost,
    #[error("surface timed out")]
    Timeout,
    #[error("out of GPU memory")]
    OutOfMemory,
    #[error("render backend error: {0}")]
    Backend(String),
}

impl RenderError {
    /// Errors after which the host may keep scheduling frames. Lost and
    /// timed-out surfaces come back after reconfiguration; everything else is
    /// fatal to the loop.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, RenderError::SurfaceLost | RenderError::Timeout)
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer reads the scene and the view and produces output. It never
/// mutates the scene: time and parameters are owned elsewhere.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame, synchronously.
    fn render(&mut self, scene: &Scene, view: &RenderView) -> Result<Self::Output, RenderError>;
}

/// Interactive camera controls advanced once per frame.
pub trait Controls {
    fn update(&mut self, dt: f32);
    fn view(&self) -> RenderView;
}

/// Per-object result of a CPU frame.
#[derive(Debug, Clone, Serialize)]
pub struct ObjectStats {
    pub name: String,
    pub vertices: usize,
    pub min_elevation: f32,
    pub max_elevation: f32,
    /// Average shaded colour over all vertices.
    pub mean_color: [f32; 3],
}

/// What the CPU reference renderer produced for one frame.
#[derive(Debug, Clone, Serialize)]
pub struct FrameStats {
    pub frame: u64,
    pub time: f32,
    pub objects: Vec<ObjectStats>,
}

impl fmt::Display for FrameStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "frame={} t={:.3}", self.frame, self.time)?;
        for o in &self.objects {
            write!(
                f,
                " | {} elevation=[{:+.4}, {:+.4}] color={}",
                o.name,
                o.min_elevation,
                o.max_elevation,
                Rgb::new(o.mean_color[0], o.mean_color[1], o.mean_color[2])
            )?;
        }
        Ok(())
    }
}

/// Reference renderer that evaluates the wave and shade functions for every
/// vertex on the CPU, exactly as the vertex and fragment stages do.
///
/// Used by the headless CLI and tests. Displaced positions go into scratch
/// buffers that are overwritten each frame; the scene's meshes stay at rest.
#[derive(Debug, Default)]
pub struct CpuRenderer {
    frame: u64,
    scratch: Vec<Vec<[f32; 3]>>,
    rest_y: Vec<Vec<f32>>,
    last_view: Option<RenderView>,
}

impl CpuRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames rendered so far.
    pub fn frames(&self) -> u64 {
        self.frame
    }

    /// Displaced vertices of object `index` from the last frame.
    pub fn displaced(&self, index: usize) -> Option<&[[f32; 3]]> {
        self.scratch.get(index).map(Vec::as_slice)
    }

    pub fn last_view(&self) -> Option<&RenderView> {
        self.last_view.as_ref()
    }
}

impl Renderer for CpuRenderer {
    type Output = FrameStats;

    fn render(&mut self, scene: &Scene, view: &RenderView) -> Result<FrameStats, RenderError> {
        let _span = tracing::trace_span!("cpu_render", frame = self.frame).entered();
        let objects = scene.objects();
        self.scratch.resize_with(objects.len(), Vec::new);
        self.rest_y.resize_with(objects.len(), Vec::new);

        let mut stats = Vec::with_capacity(objects.len());
        let mut time = 0.0;
        for (i, object) in objects.iter().enumerate() {
            let material = &object.material;
            time = material.time;

            let scratch = &mut self.scratch[i];
            scratch.clear();
            scratch.extend_from_slice(&object.mesh.positions);
            let rest = &mut self.rest_y[i];
            rest.clear();
            rest.extend(object.mesh.positions.iter().map(|p| p[1]));

            let range = displace_vertices(scratch, rest, material.time, &material.waves);

            let mut sum = Vec3::ZERO;
            for (p, base) in scratch.iter().zip(rest.iter()) {
                sum += material.color_for(p[1] - base).to_vec3();
            }
            let mean = if scratch.is_empty() {
                Vec3::ZERO
            } else {
                sum / scratch.len() as f32
            };

            let (min_elevation, max_elevation) = if range.is_empty() {
                (0.0, 0.0)
            } else {
                (range.min, range.max)
            };
            stats.push(ObjectStats {
                name: object.name.clone(),
                vertices: scratch.len(),
                min_elevation,
                max_elevation,
                mean_color: mean.to_array(),
            });
        }

        self.last_view = Some(*view);
        let out = FrameStats {
            frame: self.frame,
            time,
            objects: stats,
        };
        self.frame += 1;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seascape_scene::{BlockFont, Material, PlaneConfig, SceneConfig, TEXT, WATER};
    use seascape_waves::displacement;

    fn scene() -> Scene {
        let config = SceneConfig {
            plane: PlaneConfig {
                resolution: 16,
                ..PlaneConfig::default()
            },
            ..SceneConfig::default()
        };
        Scene::from_config(&config, &BlockFont)
    }

    #[test]
    fn cpu_frame_matches_pure_functions() {
        let mut scene = scene();
        scene.set_time(1.3);
        let mut r = CpuRenderer::new();
        let stats = r.render(&scene, &RenderView::default()).unwrap();
        assert_eq!(stats.frame, 0);
        assert_eq!(stats.time, 1.3);

        let water = scene.object(WATER).unwrap();
        let displaced = r.displaced(0).unwrap();
        for (rest, moved) in water.mesh.positions.iter().zip(displaced) {
            let e = displacement(rest[0], rest[2], 1.3, &water.material.waves);
            assert_eq!(moved[1], rest[1] + e);
            assert_eq!(moved[0], rest[0]);
            assert_eq!(moved[2], rest[2]);
        }
        let s = &stats.objects[0];
        assert_eq!(s.name, WATER);
        assert!(s.min_elevation <= s.max_elevation);
    }

    #[test]
    fn text_is_displaced_from_its_rest_height() {
        let mut scene = scene();
        scene.set_time(0.8);
        let mut r = CpuRenderer::new();
        r.render(&scene, &RenderView::default()).unwrap();
        let text = scene.object(TEXT).unwrap();
        let displaced = r.displaced(1).unwrap();
        let rest = text.mesh.positions[0];
        let e = displacement(rest[0], rest[2], 0.8, &text.material.waves);
        assert!((displaced[0][1] - (rest[1] + e)).abs() < 1e-6);
    }

    #[test]
    fn scene_is_not_mutated() {
        let mut scene = scene();
        scene.set_time(2.0);
        let before = scene.object(WATER).unwrap().mesh.clone();
        let mut r = CpuRenderer::new();
        r.render(&scene, &RenderView::default()).unwrap();
        r.render(&scene, &RenderView::default()).unwrap();
        assert_eq!(scene.object(WATER).unwrap().mesh, before);
        assert_eq!(r.frames(), 2);
    }

    #[test]
    fn mean_color_within_endpoints() {
        let mut scene = scene();
        scene.set_time(0.5);
        let mut r = CpuRenderer::new();
        let stats = r.render(&scene, &RenderView::default()).unwrap();
        let m = Material::water();
        let (lo, hi) = (m.colors.depth_color, m.colors.surface_color);
        let c = stats.objects[0].mean_color;
        assert!(c[0] >= lo.r - 1e-6 && c[0] <= hi.r + 1e-6);
        assert!(c[2] >= lo.b - 1e-6 && c[2] <= hi.b + 1e-6);
    }

    #[test]
    fn display_lists_objects() {
        let scene = scene();
        let mut r = CpuRenderer::new();
        let stats = r.render(&scene, &RenderView::default()).unwrap();
        let s = stats.to_string();
        assert!(s.contains("frame=0"));
        assert!(s.contains("water"));
        assert!(s.contains("text"));
    }

    #[test]
    fn stats_serialize() {
        let scene = scene();
        let mut r = CpuRenderer::new();
        let stats = r.render(&scene, &RenderView::default()).unwrap();
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["objects"][0]["name"], "water");
    }

    #[test]
    fn recoverable_errors() {
        assert!(RenderError::SurfaceLost.is_recoverable());
        assert!(RenderError::Timeout.is_recoverable());
        assert!(!RenderError::OutOfMemory.is_recoverable());
        assert!(!RenderError::Backend("boom".into()).is_recoverable());
    }
}
