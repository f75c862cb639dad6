use std::time::{Duration, Instant};

pub const MIN_SLIDE_DURATION: Duration = Duration::from_secs(5);

pub fn clamp_duration(duration: Duration) -> Duration {
    duration.max(MIN_SLIDE_DURATION)
}

/// Slide advance and progress share one start instant, so the progress bar
/// is always full exactly when the slide changes.
#[derive(Debug, Clone)]
pub struct Rotation {
    index: usize,
    duration: Duration,
    started: Instant,
}

impl Rotation {
    pub fn new(duration: Duration, now: Instant) -> Self {
        Self {
            index: 0,
            duration: clamp_duration(duration),
            started: now,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Current position in a deck of `len` visible slides.
    pub fn current(&self, len: usize) -> usize {
        if len == 0 { 0 } else { self.index % len }
    }

    /// Advance once the slide has been up for its full duration.
    pub fn tick(&mut self, now: Instant, len: usize) -> bool {
        if len == 0 || now.duration_since(self.started) < self.duration {
            return false;
        }
        self.index = (self.current(len) + 1) % len;
        self.started = now;
        true
    }

    pub fn progress(&self, now: Instant) -> f64 {
        let elapsed = now.duration_since(self.started).as_secs_f64();
        (elapsed / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    /// Restart both timers with a new duration.
    pub fn set_duration(&mut self, duration: Duration, now: Instant) {
        self.duration = clamp_duration(duration);
        self.started = now;
    }

    pub fn next(&mut self, now: Instant, len: usize) {
        if len > 0 {
            self.index = (self.current(len) + 1) % len;
        }
        self.started = now;
    }

    pub fn prev(&mut self, now: Instant, len: usize) {
        if len > 0 {
            self.index = (self.current(len) + len - 1) % len;
        }
        self.started = now;
    }

    pub fn reset(&mut self, now: Instant) {
        self.index = 0;
        self.started = now;
    }
}
