//! Force model for the integrator.
//!
//! Forces are a tagged sum type with an exhaustive, pure evaluation: given a
//! particle's position, mass, the frame time, and the slot index, each variant
//! returns its contribution. The integrator builds the per-frame force list once
//! and evaluates it for every live particle, so nothing here reads or writes
//! particle state.
//!
//! # Degenerate input
//!
//! The attraction terms divide by distance. Below [`DISTANCE_EPSILON`] the term
//! is suppressed entirely rather than returning an infinite or NaN push.

use glam::Vec2;

/// Distances below this suppress inverse-distance terms.
pub const DISTANCE_EPSILON: f32 = 0.001;

/// One force term applied by the integrator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Force {
    /// Constant acceleration field, scaled by particle mass.
    Gravity(Vec2),

    /// Constant directional push, mass independent.
    Wind(Vec2),

    /// Inverse-square attraction toward a fixed point.
    ///
    /// `normalize(to_center) * strength / distance^2`, suppressed inside the
    /// epsilon guard. Negative strength repels.
    Attractor {
        /// Point being pulled toward.
        center: Vec2,
        /// Pull strength; falls off with the square of the distance.
        strength: f32,
    },

    /// Inverse-distance attraction toward `count` wells spaced evenly around a
    /// circle at the origin.
    ///
    /// Well positions are fixed constants for the frame, never other particles,
    /// which keeps the integration pass order-independent.
    SymmetryWells {
        /// Number of wells around the circle.
        count: u32,
        /// Radius of the circle the wells sit on.
        radius: f32,
        /// Per-well pull strength; falls off linearly with distance.
        strength: f32,
    },

    /// Deterministic pseudo-noise push from `sin`/`cos` of time and slot index.
    Turbulence {
        /// Push amplitude.
        strength: f32,
    },
}

impl Force {
    /// Evaluate this force for one particle.
    pub fn eval(&self, position: Vec2, mass: f32, time: f32, index: usize) -> Vec2 {
        match *self {
            Force::Gravity(g) => g * mass,
            Force::Wind(w) => w,
            Force::Attractor { center, strength } => {
                attract_inverse_square(position, center, strength)
            }
            Force::SymmetryWells {
                count,
                radius,
                strength,
            } => {
                let mut total = Vec2::ZERO;
                for k in 0..count {
                    let theta = std::f32::consts::TAU * k as f32 / count.max(1) as f32;
                    let well = Vec2::new(theta.cos(), theta.sin()) * radius;
                    total += attract_inverse_distance(position, well, strength);
                }
                total
            }
            Force::Turbulence { strength } => {
                let seed = time * 1.7 + index as f32 * 0.61;
                Vec2::new((seed * 3.1).sin(), (seed * 2.3).cos()) * strength
            }
        }
    }
}

fn attract_inverse_square(position: Vec2, center: Vec2, strength: f32) -> Vec2 {
    let to_center = center - position;
    let distance = to_center.length();
    if distance < DISTANCE_EPSILON {
        return Vec2::ZERO;
    }
    to_center / distance * (strength / (distance * distance))
}

fn attract_inverse_distance(position: Vec2, well: Vec2, strength: f32) -> Vec2 {
    let to_well = well - position;
    let distance = to_well.length();
    if distance < DISTANCE_EPSILON {
        return Vec2::ZERO;
    }
    to_well / distance * (strength / distance)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gravity_scales_with_mass() {
        let g = Force::Gravity(Vec2::new(0.0, -1.0));
        let light = g.eval(Vec2::ZERO, 0.5, 0.0, 0);
        let heavy = g.eval(Vec2::ZERO, 2.0, 0.0, 0);
        assert_eq!(light.y * 4.0, heavy.y);
    }

    #[test]
    fn test_attractor_guard_at_center() {
        let f = Force::Attractor {
            center: Vec2::new(0.3, 0.3),
            strength: 5.0,
        };
        let at_center = f.eval(Vec2::new(0.3, 0.3), 1.0, 0.0, 0);
        assert_eq!(at_center, Vec2::ZERO);

        let near = f.eval(Vec2::new(0.3 + 5e-4, 0.3), 1.0, 0.0, 0);
        assert_eq!(near, Vec2::ZERO);

        let outside = f.eval(Vec2::ZERO, 1.0, 0.0, 0);
        assert!(outside.is_finite());
        assert!(outside.length() > 0.0);
    }

    #[test]
    fn test_attractor_points_toward_center() {
        let f = Force::Attractor {
            center: Vec2::ZERO,
            strength: 1.0,
        };
        let pull = f.eval(Vec2::new(1.0, 0.0), 1.0, 0.0, 0);
        assert!(pull.x < 0.0);
        assert!(pull.y.abs() < 1e-6);
    }

    #[test]
    fn test_wells_cancel_at_origin() {
        // Evenly spaced unit pulls sum to zero at the circle's center
        for count in 3..=12 {
            let f = Force::SymmetryWells {
                count,
                radius: 0.5,
                strength: 1.0,
            };
            let total = f.eval(Vec2::ZERO, 1.0, 0.0, 0);
            assert!(total.length() < 1e-4, "count={count} total={total:?}");
        }
    }

    #[test]
    fn test_turbulence_deterministic_per_slot() {
        let f = Force::Turbulence { strength: 0.2 };
        let a = f.eval(Vec2::ZERO, 1.0, 2.5, 7);
        let b = f.eval(Vec2::ONE, 1.0, 2.5, 7);
        assert_eq!(a, b);

        let other_slot = f.eval(Vec2::ZERO, 1.0, 2.5, 8);
        assert_ne!(a, other_slot);
    }
}
