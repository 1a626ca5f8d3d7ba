//! Developer tooling: debug-panel control table and scene inspector.
//!
//! # Invariants
//! - Every panel edit is clamped to its declared range before it is written.
//! - Tools only read the scene, except through [`panel::apply`] and
//!   [`panel::set_color`].

mod inspector;
pub mod panel;

pub use inspector::{ObjectInfo, SceneInspector, SceneSummary};
pub use panel::{CONTROLS, ColorSlot, PanelError, Param, ParamControl};
