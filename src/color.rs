//! Color math shared by the pattern generator, the integrator, and the compositor.
//!
//! Everything here is a pure function: hue-saturation-value conversion using the
//! standard six-sector formulation, the cubic smoothstep used for fades and radial
//! windows, and the gamma encode applied as the final compositing step.

use glam::Vec3;

/// Convert an HSV triple to RGB using the six-sector formulation.
///
/// `h`, `s`, `v` are expected in `[0, 1]`. The sector is `floor(h * 6) mod 6`,
/// so a hue sitting exactly on a sector boundary resolves to the lower sector
/// (the conversion is continuous there, both sectors agree on the value).
///
/// # Example
///
/// ```ignore
/// let red = hsv_to_rgb(0.0, 1.0, 1.0);       // (1, 0, 0)
/// let green = hsv_to_rgb(1.0 / 3.0, 1.0, 1.0); // (0, 1, 0)
/// ```
pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> Vec3 {
    let c = v * s;
    let x = c * (1.0 - ((h * 6.0) % 2.0 - 1.0).abs());
    let m = v - c;

    let (r, g, b) = match (h * 6.0) as u32 % 6 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    Vec3::new(r + m, g + m, b + m)
}

/// Cubic S-curve interpolation between two edges.
///
/// Returns 0 below `edge0`, 1 above `edge1`, and eases smoothly in between.
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Gamma-encode a linear color with the display exponent `1/2.2`.
///
/// Negative channels clamp to zero before the power function; values above 1
/// are left to the caller to clamp after any further accumulation.
pub fn gamma_encode(linear: Vec3) -> Vec3 {
    const INV_GAMMA: f32 = 1.0 / 2.2;
    Vec3::new(
        linear.x.max(0.0).powf(INV_GAMMA),
        linear.y.max(0.0).powf(INV_GAMMA),
        linear.z.max(0.0).powf(INV_GAMMA),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hsv_primary_anchors() {
        let red = hsv_to_rgb(0.0, 1.0, 1.0);
        assert!((red - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-6);

        let green = hsv_to_rgb(1.0 / 3.0, 1.0, 1.0);
        assert!((green - Vec3::new(0.0, 1.0, 0.0)).length() < 1e-5);

        let blue = hsv_to_rgb(2.0 / 3.0, 1.0, 1.0);
        assert!((blue - Vec3::new(0.0, 0.0, 1.0)).length() < 1e-5);
    }

    #[test]
    fn test_hsv_desaturated_is_gray() {
        let gray = hsv_to_rgb(0.42, 0.0, 0.5);
        assert!((gray.x - 0.5).abs() < 1e-6);
        assert!((gray.y - 0.5).abs() < 1e-6);
        assert!((gray.z - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_hsv_output_in_range() {
        for i in 0..=100 {
            let h = i as f32 / 100.0;
            let rgb = hsv_to_rgb(h, 0.8, 0.9);
            for channel in [rgb.x, rgb.y, rgb.z] {
                assert!((0.0..=1.0).contains(&channel), "h={h} produced {channel}");
            }
        }
    }

    #[test]
    fn test_smoothstep_edges() {
        assert_eq!(smoothstep(0.0, 1.0, -0.5), 0.0);
        assert_eq!(smoothstep(0.0, 1.0, 0.0), 0.0);
        assert_eq!(smoothstep(0.0, 1.0, 1.0), 1.0);
        assert_eq!(smoothstep(0.0, 1.0, 2.0), 1.0);
        assert!((smoothstep(0.0, 1.0, 0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_smoothstep_monotonic() {
        let mut prev = 0.0;
        for i in 0..=50 {
            let v = smoothstep(0.2, 0.8, i as f32 / 50.0);
            assert!(v >= prev);
            prev = v;
        }
    }

    #[test]
    fn test_gamma_encode_bounds() {
        let out = gamma_encode(Vec3::new(-1.0, 0.0, 1.0));
        assert_eq!(out.x, 0.0);
        assert_eq!(out.y, 0.0);
        assert!((out.z - 1.0).abs() < 1e-6);

        // Gamma brightens mid-range linear values
        let mid = gamma_encode(Vec3::splat(0.5));
        assert!(mid.x > 0.5 && mid.x < 1.0);
    }
}
