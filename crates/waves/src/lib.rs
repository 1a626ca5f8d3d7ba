//! Wave Displacement: closed-form vertical displacement of a surface point.
//!
//! # Invariants
//! - Every function here is pure: same inputs, same output, no shared state.
//! - Displacement is a function of position and time only. Nothing is
//!   integrated or accumulated between frames.
//! - With `small_iterations == 0` the result is exactly the big-wave term.

mod displacement;
pub mod noise;

pub use displacement::{
    ElevationRange, WaveParameters, big_wave, displace_vertices, displacement, small_waves,
};
