//! Per-frame parameter snapshot.
//!
//! A [`FrameParams`] value is built once per frame by the simulation context and
//! handed read-only to the integrator, the pattern generator, and the compositor.
//! Nothing in the core mutates it mid-frame; interaction scalars are folded in at
//! the frame boundary from the signal hub.

use glam::Vec2;

/// Lower bound for the kaleidoscope symmetry count.
pub const SYMMETRY_MIN: u32 = 3;
/// Upper bound for the kaleidoscope symmetry count.
pub const SYMMETRY_MAX: u32 = 12;

/// The golden ratio, used by the spiral field and the hue spacing.
pub const GOLDEN_RATIO: f32 = 1.618_034;

/// Immutable per-frame inputs shared by the integrator and the compositor.
///
/// Fields are public on purpose: collaborators own these values and the core
/// treats them as read-only for the duration of a frame. Out-of-range values are
/// normalized by [`FrameParams::clamped`], which the simulation applies before
/// any component sees the snapshot.
#[derive(Clone, Copy, Debug)]
pub struct FrameParams {
    /// Monotonic simulation time in seconds.
    pub time: f32,
    /// Seconds covered by this frame, expected `> 0`.
    pub delta_time: f32,
    /// Output resolution in pixels.
    pub resolution: Vec2,
    /// Width over height, derived from `resolution`.
    pub aspect_ratio: f32,
    /// Global hue offset applied by the pattern generator.
    pub color_shift: f32,
    /// Detail knob in `[0, 1]`; drives fractal iteration depth and fold frequency.
    pub complexity: f32,
    /// Kaleidoscope fold count, clamped to `[SYMMETRY_MIN, SYMMETRY_MAX]`.
    pub symmetry_count: u32,
    /// The golden ratio constant handed to the spiral field.
    pub golden_ratio: f32,
    /// Organic breathing phase in radians, externally advanced.
    pub breathing_phase: f32,
    /// Tap interaction intensity, decays toward zero between events.
    pub tap_intensity: f32,
    /// Swipe interaction intensity, decays toward zero between events.
    pub swipe_effect: f32,
    /// Device-motion interaction intensity, decays toward zero between events.
    pub motion_effect: f32,
}

impl FrameParams {
    /// Create a snapshot with neutral defaults for the given resolution.
    pub fn new(width: u32, height: u32) -> Self {
        let resolution = Vec2::new(width.max(1) as f32, height.max(1) as f32);
        Self {
            time: 0.0,
            delta_time: 1.0 / 60.0,
            resolution,
            aspect_ratio: resolution.x / resolution.y,
            color_shift: 0.0,
            complexity: 0.6,
            symmetry_count: 6,
            golden_ratio: GOLDEN_RATIO,
            breathing_phase: 0.0,
            tap_intensity: 0.0,
            swipe_effect: 0.0,
            motion_effect: 0.0,
        }
    }

    /// Change the output resolution, keeping the aspect ratio consistent.
    pub fn set_resolution(&mut self, width: u32, height: u32) {
        self.resolution = Vec2::new(width.max(1) as f32, height.max(1) as f32);
        self.aspect_ratio = self.resolution.x / self.resolution.y;
    }

    /// Normalize out-of-range values: symmetry count into `[3, 12]`, complexity
    /// into `[0, 1]`, interaction scalars to `>= 0`. Never rejects.
    pub fn clamped(mut self) -> Self {
        self.symmetry_count = self.symmetry_count.clamp(SYMMETRY_MIN, SYMMETRY_MAX);
        self.complexity = self.complexity.clamp(0.0, 1.0);
        self.tap_intensity = self.tap_intensity.max(0.0);
        self.swipe_effect = self.swipe_effect.max(0.0);
        self.motion_effect = self.motion_effect.max(0.0);
        self
    }
}

impl Default for FrameParams {
    fn default() -> Self {
        Self::new(960, 540)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = FrameParams::new(800, 400);
        assert_eq!(params.aspect_ratio, 2.0);
        assert_eq!(params.symmetry_count, 6);
        assert_eq!(params.tap_intensity, 0.0);
    }

    #[test]
    fn test_clamp_symmetry_and_scalars() {
        let mut params = FrameParams::new(100, 100);
        params.symmetry_count = 1;
        params.complexity = 7.0;
        params.tap_intensity = -3.0;
        let params = params.clamped();
        assert_eq!(params.symmetry_count, SYMMETRY_MIN);
        assert_eq!(params.complexity, 1.0);
        assert_eq!(params.tap_intensity, 0.0);

        let mut params = FrameParams::new(100, 100);
        params.symmetry_count = 40;
        assert_eq!(params.clamped().symmetry_count, SYMMETRY_MAX);
    }

    #[test]
    fn test_zero_resolution_guarded() {
        let params = FrameParams::new(0, 0);
        assert!(params.aspect_ratio.is_finite());
        assert!(params.resolution.x >= 1.0);
    }
}
