//! Shared types for the seascape crates.

mod types;

pub use types::{ColorParseError, Rgb};
