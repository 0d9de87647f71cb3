//! Time management for the frame loop.

use std::time::{Duration, Instant};

/// Manages frame timing and delta time calculation.
///
/// `elapsed` is the monotonic scene clock that secondary motion is evaluated
/// against; `delta` is the frame time the interpolators scale their smoothing by.
#[derive(Debug)]
pub struct Time {
    /// Time of the last frame.
    last_frame: Instant,
    /// Duration of the last frame.
    delta: Duration,
    /// Total elapsed time since start.
    elapsed: Duration,
    /// Frame count since start.
    frame_count: u64,
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

impl Time {
    /// Create a new time manager.
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
        }
    }

    /// Update timing at the start of a new frame.
    pub fn update(&mut self) {
        let now = Instant::now();
        let delta = now - self.last_frame;
        self.last_frame = now;
        self.step(delta);
    }

    /// Advance the clock by a fixed amount instead of reading the wall clock.
    /// Negative, NaN or unrepresentable amounts count as a zero-length frame.
    pub fn advance(&mut self, seconds: f32) {
        self.step(Duration::try_from_secs_f32(seconds).unwrap_or_default());
    }

    fn step(&mut self, delta: Duration) {
        self.delta = delta;
        self.elapsed += delta;
        self.frame_count += 1;
    }

    /// Get the delta time in seconds.
    pub fn delta_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }

    /// Get the delta time as a Duration.
    pub fn delta(&self) -> Duration {
        self.delta
    }

    /// Get total elapsed time in seconds.
    pub fn elapsed_seconds(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    /// Get the current frame count.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the current FPS (averaged over last frame).
    pub fn fps(&self) -> f32 {
        if self.delta.as_secs_f32() > 0.0 {
            1.0 / self.delta.as_secs_f32()
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_accumulates_elapsed_and_frames() {
        let mut time = Time::new();
        time.advance(0.25);
        time.advance(0.5);
        assert_eq!(time.frame_count(), 2);
        assert!((time.delta_seconds() - 0.5).abs() < 1e-6);
        assert!((time.elapsed_seconds() - 0.75).abs() < 1e-6);
        assert!((time.fps() - 2.0).abs() < 1e-4);
    }

    #[test]
    fn negative_advance_is_a_zero_frame() {
        let mut time = Time::new();
        time.advance(-1.0);
        assert_eq!(time.delta_seconds(), 0.0);
        assert_eq!(time.fps(), 0.0);
    }

    #[test]
    fn unrepresentable_advance_is_a_zero_frame() {
        let mut time = Time::new();
        time.advance(0.5);
        for seconds in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY, f32::MAX] {
            time.advance(seconds);
            assert_eq!(time.delta_seconds(), 0.0);
        }
        assert!((time.elapsed_seconds() - 0.5).abs() < 1e-6);
        assert_eq!(time.frame_count(), 5);
    }
}
