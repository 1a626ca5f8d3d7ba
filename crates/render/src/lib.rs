//! Rendering Adapter: renderer-agnostic interface.
//!
//! # Invariants
//! - Renderers never mutate the scene.
//! - Render output derives from scene state and the view only.
//!
//! The [`Renderer`] trait is the seam between the render loop and a backend.
//! [`CpuRenderer`] evaluates the wave/shade functions per vertex and reports
//! statistics; the wgpu backend runs the same math in WGSL.

mod camera;
mod renderer;

pub use camera::OrbitCamera;
pub use renderer::{
    Controls, CpuRenderer, FrameStats, ObjectStats, RenderError, RenderView, Renderer,
};

pub fn crate_info() -> &'static str {
    "seascape-render v0.1.0"
}
