//! Render Loop: the single writer of elapsed time.
//!
//! # Invariants
//! - Time written to materials never decreases and is never reset.
//! - Within a frame, time writes happen before the render call.
//! - Frame N finishes rendering before frame N+1 reads the clock.
//! - A failed render schedules nothing further.

mod clock;
mod render_loop;

pub use clock::{Clock, ManualClock, SystemClock};
pub use render_loop::{
    CountingScheduler, FrameInfo, FrameScheduler, LoopError, LoopState, RenderLoop,
};
