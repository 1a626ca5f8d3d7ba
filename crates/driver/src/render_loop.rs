use seascape_render::{Controls, RenderError, Renderer};
use seascape_scene::Scene;

use crate::clock::Clock;

/// Errors that end a frame without scheduling the next one.
#[derive(Debug, thiserror::Error)]
pub enum LoopError {
    #[error("render failed on frame {frame}: {source}")]
    Render {
        frame: u64,
        #[source]
        source: RenderError,
    },
}

impl LoopError {
    /// Whether the host can reconfigure and schedule another frame itself.
    pub fn is_recoverable(&self) -> bool {
        match self {
            LoopError::Render { source, .. } => source.is_recoverable(),
        }
    }
}

/// The host's frame-scheduling primitive (`requestAnimationFrame`,
/// `Window::request_redraw`, ...).
pub trait FrameScheduler {
    fn request_next_frame(&mut self);
}

/// Scheduler that only counts requests. Used for headless runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct CountingScheduler {
    pub requested: u64,
}

impl FrameScheduler for CountingScheduler {
    fn request_next_frame(&mut self) {
        self.requested += 1;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// No frame has run yet.
    Idle,
    /// At least one frame has run; each successful frame schedules the next.
    Running,
}

/// Timing of one completed frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    pub frame: u64,
    /// Time written to every material this frame.
    pub time: f32,
    /// Time since the previous frame (zero on the first).
    pub dt: f32,
}

/// Owns elapsed time and drives one frame per host callback.
pub struct RenderLoop<C: Clock> {
    clock: C,
    state: LoopState,
    frame: u64,
    time: f32,
}

impl<C: Clock> RenderLoop<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            state: LoopState::Idle,
            frame: 0,
            time: 0.0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Frames completed so far.
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Time written on the most recent frame.
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Run one frame:
    /// 1. read the clock (never earlier than the previous frame's time),
    /// 2. write the time into every material,
    /// 3. advance the camera controls,
    /// 4. render once,
    /// 5. ask the host for the next frame.
    ///
    /// A render failure returns the error and skips step 5.
    pub fn tick<R, K, S>(
        &mut self,
        scene: &mut Scene,
        controls: &mut K,
        renderer: &mut R,
        scheduler: &mut S,
    ) -> Result<(FrameInfo, R::Output), LoopError>
    where
        R: Renderer,
        K: Controls,
        S: FrameScheduler,
    {
        let _span = tracing::trace_span!("frame", frame = self.frame).entered();

        if self.state == LoopState::Idle {
            self.state = LoopState::Running;
            tracing::info!("render loop running");
        }

        let previous = self.time;
        let now = self.clock.elapsed();
        let time = if now < previous {
            tracing::warn!(now, previous, "clock went backwards, holding time");
            previous
        } else {
            now
        };
        let dt = if self.frame == 0 { 0.0 } else { time - previous };
        self.time = time;

        scene.set_time(time);
        controls.update(dt);

        let view = controls.view();
        let output = renderer.render(scene, &view).map_err(|source| {
            tracing::error!(frame = self.frame, "render failed: {source}");
            LoopError::Render {
                frame: self.frame,
                source,
            }
        })?;

        let info = FrameInfo {
            frame: self.frame,
            time,
            dt,
        };
        self.frame += 1;

        scheduler.request_next_frame();
        Ok((info, output))
    }

    /// Run `frames` frames back to back with a counting scheduler, handing
    /// each frame's output to `on_frame`. Stops at the first failure.
    pub fn run_headless<R, K>(
        &mut self,
        frames: u64,
        scene: &mut Scene,
        controls: &mut K,
        renderer: &mut R,
        mut on_frame: impl FnMut(&FrameInfo, R::Output),
    ) -> Result<u64, LoopError>
    where
        R: Renderer,
        K: Controls,
    {
        let mut scheduler = CountingScheduler::default();
        let mut completed = 0;
        while completed < frames {
            let (info, output) = self.tick(scene, controls, renderer, &mut scheduler)?;
            on_frame(&info, output);
            completed += 1;
        }
        debug_assert_eq!(scheduler.requested, completed);
        Ok(completed)
    }
}
