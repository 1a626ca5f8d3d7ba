//! Depth Shading: colour of a surface point from its displaced elevation.
//!
//! # Invariants
//! - `shade` is pure.
//! - Output never leaves the RGB box spanned by the two endpoint colours.

mod depth;

pub use depth::{ColorParameters, mix_strength, shade};
