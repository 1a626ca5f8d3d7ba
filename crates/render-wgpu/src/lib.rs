//! wgpu render backend for the seascape.
//!
//! Draws every scene object with one pipeline. Displacement and colour are
//! computed per vertex and per fragment on the GPU from the object's material
//! uniforms; the meshes are uploaded once at rest and never rewritten.
//!
//! # Invariants
//! - Renderer never mutates the scene.
//! - Camera motion lives outside the scene; only the view matrix reaches here.

mod gpu;
mod shaders;

pub use gpu::WgpuRenderer;
