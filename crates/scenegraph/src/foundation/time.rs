//! Frame timing utilities

use std::time::Instant;

/// Frame timer feeding `Scene::update`
///
/// In `Realtime` mode the delta is measured with [`Instant`]; in `Fixed` mode
/// every tick advances by the same step, which keeps headless runs and tests
/// deterministic.
pub struct Timer {
    mode: TimerMode,
    last_frame: Instant,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
}

/// How a [`Timer`] produces its delta time
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimerMode {
    /// Wall-clock time between ticks
    Realtime,
    /// Constant step in seconds
    Fixed(f32),
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a new wall-clock timer
    pub fn new() -> Self {
        Self::with_mode(TimerMode::Realtime)
    }

    /// Create a timer that always advances by `step` seconds
    pub fn fixed(step: f32) -> Self {
        Self::with_mode(TimerMode::Fixed(step))
    }

    fn with_mode(mode: TimerMode) -> Self {
        Self {
            mode,
            last_frame: Instant::now(),
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Advance the timer (call once per frame) and return the new delta
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        self.delta_time = match self.mode {
            TimerMode::Realtime => now.duration_since(self.last_frame).as_secs_f32(),
            TimerMode::Fixed(step) => step,
        };
        self.total_time += self.delta_time;
        self.last_frame = now;
        self.frame_count += 1;
        self.delta_time
    }

    /// Get the time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the total elapsed time since timer creation
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the average FPS since timer creation
    #[allow(clippy::cast_precision_loss)]
    pub fn average_fps(&self) -> f32 {
        if self.total_time > 0.0 {
            self.frame_count as f32 / self.total_time
        } else {
            0.0
        }
    }
}
