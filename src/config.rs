//! Simulation configuration.
//!
//! [`SimConfig`] is a flat set of named numeric parameters, wired through the
//! builder methods or one of the presets. Out-of-range values never reject,
//! they normalize on construction of the simulation.
//!
//! # Example
//!
//! ```ignore
//! let config = SimConfig::default()
//!     .with_capacity(5_000)
//!     .with_emission_rate(300.0)
//!     .with_life_range(1.5..4.0);
//! ```
//!
//! # Presets
//!
//! | Preset | Character |
//! |--------|-----------|
//! | [`SimConfig::drift`] | Slow, sparse, long-lived motes |
//! | [`SimConfig::bloom`] | Dense center bloom pulled into the symmetry wells |
//! | [`SimConfig::storm`] | Fast turbulent swarm with hard bounces |

use glam::Vec2;
use std::ops::Range;

/// Flat numeric configuration for the particle core.
///
/// Everything a simulation needs up front: pool sizing, emission ranges, force
/// strengths, boundary behavior, and the decay rates for the three interaction
/// scalars. Spawn ranges may be degenerate (`x..x`) to pin a value.
#[derive(Clone, Debug)]
pub struct SimConfig {
    /// Fixed pool capacity.
    pub capacity: usize,
    /// Target emission rate in particles per second.
    pub emission_rate: f32,
    /// Initial speed range for emitted particles.
    pub speed_range: Range<f32>,
    /// Base size range for emitted particles.
    pub size_range: Range<f32>,
    /// Lifetime range in seconds for emitted particles.
    pub life_range: Range<f32>,
    /// Mass range for emitted particles.
    pub mass_range: Range<f32>,
    /// Radius of the polar spawn disc around the center.
    pub spawn_radius: f32,
    /// Constant acceleration applied scaled by mass.
    pub gravity: Vec2,
    /// Constant directional push, mass independent.
    pub wind: Vec2,
    /// Center point of the inverse-square attractor.
    pub attractor: Vec2,
    /// Strength of the inverse-square attractor.
    pub attractor_strength: f32,
    /// Strength of each symmetry well.
    pub well_strength: f32,
    /// Radius of the circle the symmetry wells sit on.
    pub well_radius: f32,
    /// Amplitude of the pseudo-noise turbulence term.
    pub turbulence: f32,
    /// Per-second velocity retention, applied as `dampening^dt`.
    pub dampening: f32,
    /// Particles bounce back inside once `|position|` exceeds this.
    pub boundary_radius: f32,
    /// Normal-velocity scale on bounce, `< 1` so bounces lose energy.
    pub restitution: f32,
    /// Per-second exponential decay rate of the tap scalar.
    pub tap_decay: f32,
    /// Per-second exponential decay rate of the swipe scalar.
    pub swipe_decay: f32,
    /// Per-second exponential decay rate of the motion scalar.
    pub motion_decay: f32,
    /// Seed for the emission RNG, so runs are reproducible.
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            capacity: 10_000,
            emission_rate: 150.0,
            speed_range: 0.05..0.35,
            size_range: 0.010..0.030,
            life_range: 2.0..6.0,
            mass_range: 0.5..2.0,
            spawn_radius: 0.15,
            gravity: Vec2::new(0.0, -0.05),
            wind: Vec2::new(0.02, 0.0),
            attractor: Vec2::ZERO,
            attractor_strength: 0.02,
            well_strength: 0.015,
            well_radius: 0.6,
            turbulence: 0.08,
            dampening: 0.55,
            boundary_radius: 1.05,
            restitution: 0.72,
            tap_decay: 1.8,
            swipe_decay: 1.2,
            motion_decay: 0.9,
            seed: 42,
        }
    }
}

impl SimConfig {
    // =========================================================================
    // PRESETS
    // =========================================================================

    /// Slow, sparse, long-lived motes drifting on the wind.
    pub fn drift() -> Self {
        Self {
            emission_rate: 60.0,
            speed_range: 0.02..0.12,
            life_range: 5.0..10.0,
            wind: Vec2::new(0.04, 0.01),
            turbulence: 0.03,
            dampening: 0.8,
            ..Self::default()
        }
    }

    /// Dense center bloom pulled outward into the symmetry wells.
    pub fn bloom() -> Self {
        Self {
            emission_rate: 400.0,
            speed_range: 0.1..0.4,
            size_range: 0.008..0.022,
            life_range: 1.5..4.0,
            spawn_radius: 0.05,
            attractor_strength: -0.03,
            well_strength: 0.04,
            ..Self::default()
        }
    }

    /// Fast turbulent swarm with hard bounces off the boundary.
    pub fn storm() -> Self {
        Self {
            emission_rate: 800.0,
            speed_range: 0.3..0.9,
            life_range: 0.8..2.5,
            turbulence: 0.4,
            dampening: 0.9,
            restitution: 0.9,
            ..Self::default()
        }
    }

    // =========================================================================
    // BUILDER METHODS
    // =========================================================================

    /// Set the pool capacity.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the emission rate in particles per second.
    pub fn with_emission_rate(mut self, rate: f32) -> Self {
        self.emission_rate = rate;
        self
    }

    /// Set the initial speed range for emitted particles.
    pub fn with_speed_range(mut self, range: Range<f32>) -> Self {
        self.speed_range = range;
        self
    }

    /// Set the base size range for emitted particles.
    pub fn with_size_range(mut self, range: Range<f32>) -> Self {
        self.size_range = range;
        self
    }

    /// Set the lifetime range in seconds. A degenerate range pins the lifetime.
    pub fn with_life_range(mut self, range: Range<f32>) -> Self {
        self.life_range = range;
        self
    }

    /// Set the mass range for emitted particles.
    pub fn with_mass_range(mut self, range: Range<f32>) -> Self {
        self.mass_range = range;
        self
    }

    /// Set the gravity acceleration vector.
    pub fn with_gravity(mut self, gravity: Vec2) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set the wind push vector.
    pub fn with_wind(mut self, wind: Vec2) -> Self {
        self.wind = wind;
        self
    }

    /// Set the attractor center and strength. Negative strength repels.
    pub fn with_attractor(mut self, center: Vec2, strength: f32) -> Self {
        self.attractor = center;
        self.attractor_strength = strength;
        self
    }

    /// Set the symmetry-well circle radius and per-well strength.
    pub fn with_wells(mut self, radius: f32, strength: f32) -> Self {
        self.well_radius = radius;
        self.well_strength = strength;
        self
    }

    /// Set the turbulence amplitude.
    pub fn with_turbulence(mut self, amplitude: f32) -> Self {
        self.turbulence = amplitude;
        self
    }

    /// Set the per-second velocity retention factor.
    pub fn with_dampening(mut self, dampening: f32) -> Self {
        self.dampening = dampening;
        self
    }

    /// Set the bounce boundary radius.
    pub fn with_boundary_radius(mut self, radius: f32) -> Self {
        self.boundary_radius = radius;
        self
    }

    /// Set the bounce restitution factor.
    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }

    /// Set the emission RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Normalize every parameter into its valid range. Values clamp, they are
    /// never rejected.
    pub fn normalized(mut self) -> Self {
        self.capacity = self.capacity.max(1);
        self.emission_rate = self.emission_rate.max(0.0);
        self.speed_range = ordered(self.speed_range, 0.0);
        self.size_range = ordered(self.size_range, 0.0);
        self.life_range = ordered(self.life_range, 1e-3);
        self.mass_range = ordered(self.mass_range, 1e-3);
        self.spawn_radius = self.spawn_radius.max(0.0);
        self.dampening = self.dampening.clamp(1e-3, 1.0);
        self.boundary_radius = self.boundary_radius.max(1e-3);
        self.restitution = self.restitution.clamp(0.0, 0.99);
        self.tap_decay = self.tap_decay.max(0.0);
        self.swipe_decay = self.swipe_decay.max(0.0);
        self.motion_decay = self.motion_decay.max(0.0);
        self
    }
}

/// Order a range's endpoints and floor them at `min`.
fn ordered(range: Range<f32>, min: f32) -> Range<f32> {
    let (a, b) = if range.start <= range.end {
        (range.start, range.end)
    } else {
        (range.end, range.start)
    };
    a.max(min)..b.max(min)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_chain() {
        let config = SimConfig::default()
            .with_capacity(123)
            .with_emission_rate(9.0)
            .with_restitution(0.5);
        assert_eq!(config.capacity, 123);
        assert_eq!(config.emission_rate, 9.0);
        assert_eq!(config.restitution, 0.5);
    }

    #[test]
    fn test_normalized_clamps() {
        let config = SimConfig::default()
            .with_capacity(0)
            .with_emission_rate(-10.0)
            .with_restitution(2.0)
            .with_dampening(-1.0)
            .with_life_range(5.0..1.0)
            .normalized();
        assert_eq!(config.capacity, 1);
        assert_eq!(config.emission_rate, 0.0);
        assert_eq!(config.restitution, 0.99);
        assert!(config.dampening > 0.0 && config.dampening <= 1.0);
        assert!(config.life_range.start <= config.life_range.end);
    }

    #[test]
    fn test_presets_normalize_cleanly() {
        for config in [SimConfig::drift(), SimConfig::bloom(), SimConfig::storm()] {
            let n = config.normalized();
            assert!(n.restitution < 1.0);
            assert!(n.capacity >= 1);
        }
    }
}
