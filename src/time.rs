//! Frame timing for the simulation loop.
//!
//! Provides a single source of truth for elapsed time, delta time, frame
//! counting, and FPS. Uses `std::time` for high-precision timing with no
//! external dependencies.
//!
//! # Example
//!
//! ```ignore
//! use kaleida::time::FrameClock;
//!
//! let mut clock = FrameClock::new();
//!
//! // In your frame loop:
//! let (elapsed, delta) = clock.update();
//! println!("Elapsed: {:.2}s, delta: {:.4}s, fps: {:.1}", elapsed, delta, clock.fps());
//! ```

use std::time::{Duration, Instant};

/// Frame timing for simulation and rendering.
///
/// Runs from wall-clock time by default. With a fixed delta set, both delta
/// and elapsed advance by exactly that step per update, which makes headless
/// runs reproducible frame for frame.
#[derive(Debug)]
pub struct FrameClock {
    /// When the clock was created.
    start: Instant,
    /// When the last frame occurred.
    last_frame: Instant,
    /// Total elapsed time in seconds (cached for fast access).
    elapsed_secs: f32,
    /// Time since last frame in seconds.
    delta_secs: f32,
    /// Total frames since start.
    frame_count: u64,
    /// Calculated FPS (updated periodically).
    fps: f32,
    /// Frame count at last FPS update.
    fps_frame_count: u64,
    /// Time of last FPS calculation.
    fps_update_time: Instant,
    /// How often to update the FPS calculation.
    fps_update_interval: Duration,
    /// Fixed delta time for deterministic updates (optional).
    fixed_delta: Option<f32>,
}

impl FrameClock {
    /// Create a new clock starting from now.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_frame: now,
            elapsed_secs: 0.0,
            delta_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_millis(500),
            fixed_delta: None,
        }
    }

    /// Create a clock that advances by exactly `delta` seconds per update.
    pub fn fixed(delta: f32) -> Self {
        let mut clock = Self::new();
        clock.fixed_delta = Some(delta.max(0.0));
        clock
    }

    /// Update timing values. Call once per frame.
    ///
    /// Returns `(elapsed_time, delta_time)` for convenience.
    pub fn update(&mut self) -> (f32, f32) {
        let now = Instant::now();

        match self.fixed_delta {
            Some(step) => {
                self.delta_secs = step;
                self.elapsed_secs += step;
            }
            None => {
                self.delta_secs = now.duration_since(self.last_frame).as_secs_f32();
                self.elapsed_secs = now.duration_since(self.start).as_secs_f32();
            }
        }
        self.last_frame = now;
        self.frame_count += 1;

        // Update FPS periodically
        let fps_elapsed = now.duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
        }

        (self.elapsed_secs, self.delta_secs)
    }

    /// Total elapsed time in seconds since start.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }

    /// Time since last frame in seconds (delta time).
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    /// Total frames since start.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Calculated frames per second.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Set a fixed delta time for deterministic updates.
    ///
    /// Pass `None` to return to real frame timing.
    pub fn set_fixed_delta(&mut self, delta: Option<f32>) {
        self.fixed_delta = delta.map(|d| d.max(0.0));
    }

    /// Reset the clock to its initial state, keeping the fixed-delta setting.
    pub fn reset(&mut self) {
        let now = Instant::now();
        self.start = now;
        self.last_frame = now;
        self.elapsed_secs = 0.0;
        self.delta_secs = 0.0;
        self.frame_count = 0;
        self.fps = 0.0;
        self.fps_frame_count = 0;
        self.fps_update_time = now;
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_clock_new() {
        let clock = FrameClock::new();
        assert_eq!(clock.frame(), 0);
        assert_eq!(clock.elapsed(), 0.0);
    }

    #[test]
    fn test_clock_update() {
        let mut clock = FrameClock::new();
        thread::sleep(Duration::from_millis(10));
        let (elapsed, delta) = clock.update();

        assert!(elapsed > 0.0);
        assert!(delta > 0.0);
        assert_eq!(clock.frame(), 1);
    }

    #[test]
    fn test_fixed_delta_is_deterministic() {
        let mut clock = FrameClock::fixed(1.0 / 60.0);

        thread::sleep(Duration::from_millis(25));
        clock.update();
        clock.update();
        clock.update();

        // Advances by the fixed step regardless of wall time
        assert!((clock.delta() - 1.0 / 60.0).abs() < 1e-6);
        assert!((clock.elapsed() - 3.0 / 60.0).abs() < 1e-5);
        assert_eq!(clock.frame(), 3);
    }

    #[test]
    fn test_reset() {
        let mut clock = FrameClock::fixed(0.1);
        clock.update();
        clock.update();
        clock.reset();
        assert_eq!(clock.frame(), 0);
        assert_eq!(clock.elapsed(), 0.0);
        // Fixed-delta setting survives the reset
        clock.update();
        assert!((clock.delta() - 0.1).abs() < 1e-6);
    }
}
