//! Procedural pattern generation.
//!
//! Pure functions from a normalized 2D coordinate, time, and frame parameters to
//! scalar pattern signals, composed into a final color. Every function here is
//! side-effect free and deterministic for given inputs, so the compositor can
//! evaluate them per pixel from any number of threads and tests can pin exact
//! values.
//!
//! # Layers
//!
//! | Layer | Signal | Weight |
//! |-------|--------|--------|
//! | [`PatternLayer::Kaleidoscope`] | Angle-folded sinusoidal interference | 0.4 |
//! | [`PatternLayer::Mandelbrot`] | Escape-time iteration on the sample point | 0.2 |
//! | [`PatternLayer::Julia`] | Escape-time iteration with an animated constant | 0.2 |
//! | [`PatternLayer::Fibonacci`] | Angular wave attenuated away from center | 0.1 |
//! | [`PatternLayer::GoldenSpiral`] | Log-spiral wave windowed between two radii | 0.1 |
//!
//! All layer outputs land in `[0, 1]`; [`combined_pattern`] is their weighted sum
//! and [`pattern_color`] turns it into an RGB color through the six-sector HSV
//! conversion.

use glam::{Vec2, Vec3};

use crate::color::{hsv_to_rgb, smoothstep};
use crate::params::{FrameParams, SYMMETRY_MAX, SYMMETRY_MIN};

/// Radius guard for the spiral's logarithm.
const RADIUS_EPSILON: f32 = 1e-4;

/// One procedural signal of the composed pattern.
///
/// Each variant evaluates independently; the compositor consumes the weighted
/// blend, while tests and the demo can address single layers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PatternLayer {
    /// Angle-folded multi-frequency interference with N-fold symmetry.
    Kaleidoscope,
    /// Escape-time fractal sampling the coordinate as `c`.
    Mandelbrot,
    /// Escape-time fractal with a time-varying constant and the coordinate as `z0`.
    Julia,
    /// `sin(angle*8 + radius*20 - time*2)`, fading out away from center.
    Fibonacci,
    /// Golden-ratio log spiral, windowed between an inner and outer radius.
    GoldenSpiral,
}

impl PatternLayer {
    /// Every layer, in composition order.
    pub const ALL: [PatternLayer; 5] = [
        PatternLayer::Kaleidoscope,
        PatternLayer::Mandelbrot,
        PatternLayer::Julia,
        PatternLayer::Fibonacci,
        PatternLayer::GoldenSpiral,
    ];

    /// Blend weight of this layer in the composed pattern.
    pub fn weight(self) -> f32 {
        match self {
            PatternLayer::Kaleidoscope => 0.4,
            PatternLayer::Mandelbrot => 0.2,
            PatternLayer::Julia => 0.2,
            PatternLayer::Fibonacci => 0.1,
            PatternLayer::GoldenSpiral => 0.1,
        }
    }

    /// Evaluate this layer at `coord`. Output is in `[0, 1]`.
    pub fn evaluate(self, coord: Vec2, time: f32, params: &FrameParams) -> f32 {
        match self {
            PatternLayer::Kaleidoscope => {
                kaleidoscope(coord, time, params.symmetry_count, params.complexity)
            }
            PatternLayer::Mandelbrot => mandelbrot(coord, max_iterations(params.complexity)),
            PatternLayer::Julia => julia(coord, time, max_iterations(params.complexity)),
            PatternLayer::Fibonacci => fibonacci_field(coord, time),
            PatternLayer::GoldenSpiral => golden_spiral(coord, time, params.golden_ratio),
        }
    }
}

/// Iteration budget for the escape-time layers, derived from the complexity
/// knob: 8 at complexity 0 up to 32 at complexity 1.
pub fn max_iterations(complexity: f32) -> u32 {
    8 + (complexity.clamp(0.0, 1.0) * 24.0) as u32
}

/// Fold an angle into `[0, pi/symmetry_count]` by modulo and mirror reflection.
///
/// The fold period is `2*pi/symmetry_count`; an angle past the half period
/// reflects back as `period - angle`, which produces the mirror symmetry within
/// each wedge. The count clamps into `[3, 12]` before folding.
pub fn fold_angle(angle: f32, symmetry_count: u32) -> f32 {
    let count = symmetry_count.clamp(SYMMETRY_MIN, SYMMETRY_MAX);
    let period = std::f32::consts::TAU / count as f32;
    let folded = angle.rem_euclid(period);
    if folded > period * 0.5 {
        period - folded
    } else {
        folded
    }
}

/// Kaleidoscope layer: fold the sample into one mirrored wedge, then evaluate a
/// multi-frequency sinusoidal interference pattern on the folded point.
///
/// The raw interference sum spans `[-1.5, 1.5]` and normalizes to `[0, 1]` via
/// `pattern * 0.33 + 0.5`.
pub fn kaleidoscope(coord: Vec2, time: f32, symmetry_count: u32, complexity: f32) -> f32 {
    let radius = coord.length();
    let folded = fold_angle(coord.y.atan2(coord.x), symmetry_count);
    let p = Vec2::new(folded.cos(), folded.sin()) * radius;

    let frequency = 4.0 + complexity.clamp(0.0, 1.0) * 6.0;
    let pattern = (p.x * frequency + time).sin()
        + (p.y * frequency * 1.7 - time * 1.3).sin() * 0.3
        + ((p.x + p.y) * frequency * 0.9 + time * 0.7).sin() * 0.2;

    (pattern * 0.33 + 0.5).clamp(0.0, 1.0)
}

/// Complex-quadratic escape-time iteration `z = z^2 + c`.
///
/// Returns `iterations / max_iter` when `|z|^2` escapes past 4, or 0 when the
/// orbit never escapes within the budget. Pure: identical inputs give
/// bit-identical output.
pub fn escape_time(z0: Vec2, c: Vec2, max_iter: u32) -> f32 {
    let mut zx = z0.x;
    let mut zy = z0.y;
    let mut iter = 0u32;

    while zx * zx + zy * zy <= 4.0 && iter < max_iter {
        let next_zx = zx * zx - zy * zy + c.x;
        zy = 2.0 * zx * zy + c.y;
        zx = next_zx;
        iter += 1;
    }

    if iter == max_iter {
        0.0
    } else {
        iter as f32 / max_iter as f32
    }
}

/// Mandelbrot layer: the scaled sample coordinate is `c`, the orbit starts at 0.
pub fn mandelbrot(coord: Vec2, max_iter: u32) -> f32 {
    let c = coord * 1.4 - Vec2::new(0.5, 0.0);
    escape_time(Vec2::ZERO, c, max_iter)
}

/// Julia layer: the sample is `z0`, `c` orbits slowly with time.
pub fn julia(coord: Vec2, time: f32, max_iter: u32) -> f32 {
    let drift = time * 0.08;
    let c = Vec2::new(
        -0.7 + drift.sin() * 0.25,
        0.270_15 + (drift * 1.3).cos() * 0.12,
    );
    escape_time(coord * 1.3, c, max_iter)
}

/// Golden-ratio spiral field, windowed so it fades in near the center and out
/// toward the edge.
pub fn golden_spiral(coord: Vec2, time: f32, phi: f32) -> f32 {
    let radius = coord.length();
    let angle = coord.y.atan2(coord.x);

    let wave = (angle * phi + (radius + RADIUS_EPSILON).ln() * phi * 4.0 - time * 3.0).sin();
    let window = smoothstep(0.05, 0.2, radius) * (1.0 - smoothstep(0.75, 1.1, radius));

    (wave * 0.5 + 0.5) * window
}

/// Fibonacci angular field: eight-lobed wave attenuated by `exp(-radius * 2)`.
pub fn fibonacci_field(coord: Vec2, time: f32) -> f32 {
    let radius = coord.length();
    let angle = coord.y.atan2(coord.x);

    let wave = (angle * 8.0 + radius * 20.0 - time * 2.0).sin();
    (wave * 0.5 + 0.5) * (-radius * 2.0).exp()
}

/// Weighted sum of all five layers. Weights total 1, so the result is in `[0, 1]`.
pub fn combined_pattern(coord: Vec2, time: f32, params: &FrameParams) -> f32 {
    PatternLayer::ALL
        .iter()
        .map(|layer| layer.evaluate(coord, time, params) * layer.weight())
        .sum()
}

/// Final per-sample color: the combined scalar picks a hue around the wheel,
/// saturation and brightness ride slow sinusoids, and the interaction scalars
/// push hue (swipe), saturation (motion), and brightness (tap).
pub fn pattern_color(coord: Vec2, time: f32, params: &FrameParams) -> Vec3 {
    let breath = 1.0 + 0.04 * params.breathing_phase.sin();
    let coord = coord * breath;
    let combined = combined_pattern(coord, time, params);

    let hue = (combined * 0.55 + params.color_shift + time * 0.02 + params.swipe_effect * 0.1)
        .rem_euclid(1.0);
    let saturation = (0.55 + 0.3 * (time * 0.43 + combined * 2.1).sin()
        + params.motion_effect * 0.1)
        .clamp(0.0, 1.0);
    let value = (0.55 + 0.35 * (time * 0.67 + combined * 3.3).sin()
        + params.tap_intensity * 0.2)
        .clamp(0.0, 1.0);

    hsv_to_rgb(hue, saturation, value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> FrameParams {
        FrameParams::new(320, 180)
    }

    #[test]
    fn test_fold_angle_stays_in_wedge() {
        for count in SYMMETRY_MIN..=SYMMETRY_MAX {
            let half_period = std::f32::consts::PI / count as f32;
            for i in -20..=20 {
                let angle = i as f32 * 0.37;
                let folded = fold_angle(angle, count);
                assert!(
                    (0.0..=half_period + 1e-5).contains(&folded),
                    "count={count} angle={angle} folded={folded}"
                );
            }
        }
    }

    #[test]
    fn test_kaleidoscope_rotation_invariant() {
        let count = 7;
        let rotation = std::f32::consts::TAU / count as f32;
        let (sin, cos) = rotation.sin_cos();
        let coord = Vec2::new(0.43, -0.21);
        let rotated = Vec2::new(coord.x * cos - coord.y * sin, coord.x * sin + coord.y * cos);

        let a = kaleidoscope(coord, 1.8, count, 0.6);
        let b = kaleidoscope(rotated, 1.8, count, 0.6);
        assert!((a - b).abs() < 2e-3, "a={a} b={b}");
    }

    #[test]
    fn test_escape_time_interior_is_zero() {
        // The origin never escapes under z^2 + 0
        assert_eq!(escape_time(Vec2::ZERO, Vec2::ZERO, 32), 0.0);
    }

    #[test]
    fn test_escape_time_exterior_escapes_fast() {
        let v = escape_time(Vec2::ZERO, Vec2::new(2.0, 2.0), 32);
        assert!(v > 0.0 && v < 0.2, "v={v}");
    }

    #[test]
    fn test_escape_time_bit_identical() {
        let coord = Vec2::new(0.31, -0.44);
        let a = mandelbrot(coord, 24);
        let b = mandelbrot(coord, 24);
        assert_eq!(a.to_bits(), b.to_bits());

        let a = julia(coord, 3.7, 24);
        let b = julia(coord, 3.7, 24);
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn test_layers_stay_normalized() {
        let params = params();
        for layer in PatternLayer::ALL {
            for ix in -8..=8 {
                for iy in -8..=8 {
                    let coord = Vec2::new(ix as f32 * 0.2, iy as f32 * 0.2);
                    for t in [0.0, 1.3, 17.9] {
                        let v = layer.evaluate(coord, t, &params);
                        assert!(
                            (0.0..=1.0).contains(&v),
                            "{layer:?} at {coord:?} t={t} gave {v}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_combined_pattern_normalized() {
        let params = params();
        for i in 0..50 {
            let coord = Vec2::new((i as f32 * 0.13).sin(), (i as f32 * 0.29).cos()) * 1.5;
            let v = combined_pattern(coord, i as f32 * 0.1, &params);
            assert!((0.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn test_pattern_color_channels_in_range() {
        let mut params = params();
        params.tap_intensity = 2.0;
        params.swipe_effect = 1.5;
        params.motion_effect = 3.0;
        for i in 0..30 {
            let coord = Vec2::new(i as f32 * 0.07 - 1.0, 0.4);
            let rgb = pattern_color(coord, i as f32 * 0.21, &params);
            for channel in [rgb.x, rgb.y, rgb.z] {
                assert!((0.0..=1.0).contains(&channel));
            }
        }
    }

    #[test]
    fn test_max_iterations_scales_with_complexity() {
        assert_eq!(max_iterations(0.0), 8);
        assert_eq!(max_iterations(1.0), 32);
        assert_eq!(max_iterations(9.0), 32);
        assert!(max_iterations(0.5) > 8 && max_iterations(0.5) < 32);
    }
}
