use std::time::Instant;

/// Source of elapsed seconds since the loop started.
pub trait Clock {
    fn elapsed(&mut self) -> f32;
}

/// Wall clock backed by [`Instant`], started on construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn elapsed(&mut self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }
}

/// Deterministic clock: every read returns the current time, then advances
/// it by `step`.
#[derive(Debug, Clone, Copy)]
pub struct ManualClock {
    now: f32,
    step: f32,
}

impl ManualClock {
    /// A clock ticking at `fps` frames per second, starting at zero.
    pub fn at_fps(fps: f32) -> Self {
        Self::new(1.0 / fps)
    }

    pub fn new(step: f32) -> Self {
        Self { now: 0.0, step }
    }

    pub fn now(&self) -> f32 {
        self.now
    }

    pub fn set(&mut self, now: f32) {
        self.now = now;
    }
}

impl Clock for ManualClock {
    fn elapsed(&mut self) -> f32 {
        let t = self.now;
        self.now += self.step;
        t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_steps() {
        let mut c = ManualClock::new(0.5);
        assert_eq!(c.elapsed(), 0.0);
        assert_eq!(c.elapsed(), 0.5);
        assert_eq!(c.elapsed(), 1.0);
        assert_eq!(c.now(), 1.5);
    }

    #[test]
    fn manual_clock_at_fps() {
        let mut c = ManualClock::at_fps(60.0);
        c.elapsed();
        assert!((c.elapsed() - 1.0 / 60.0).abs() < 1e-7);
    }

    #[test]
    fn system_clock_does_not_go_backwards() {
        let mut c = SystemClock::new();
        let a = c.elapsed();
        let b = c.elapsed();
        assert!(b >= a);
        assert!(a >= 0.0);
    }
}
