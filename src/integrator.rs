//! Data-parallel physics integration.
//!
//! One pass per frame over every pool slot: dead slots (alpha <= 0) cost a
//! branch and nothing else; live particles accumulate forces, damp, move,
//! bounce off the circular boundary, age, and refresh their lifecycle color and
//! size. No particle reads another particle's state, so the pass runs over a
//! rayon parallel iterator without any synchronization.
//!
//! Death happens here: the step where `life` crosses zero writes alpha = 0 and
//! leaves the slot for the recycler sweep. Nothing else ever touches a dead
//! slot until it is re-emitted.

use rayon::prelude::*;

use glam::Vec2;

use crate::config::SimConfig;
use crate::forces::Force;
use crate::params::FrameParams;
use crate::particle::{self, Particle};

/// Per-frame physics step over the particle array.
///
/// Holds the force and boundary configuration; per-frame inputs arrive through
/// [`FrameParams`]. The interaction scalars modulate the frame's force list:
/// tap boosts the attractor, swipe leans on the wind, motion stirs turbulence.
#[derive(Clone, Debug)]
pub struct Integrator {
    gravity: Vec2,
    wind: Vec2,
    attractor: Vec2,
    attractor_strength: f32,
    well_radius: f32,
    well_strength: f32,
    turbulence: f32,
    dampening: f32,
    boundary_radius: f32,
    restitution: f32,
    size_min: f32,
    size_max: f32,
}

impl Integrator {
    /// Build an integrator from the simulation configuration.
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            gravity: config.gravity,
            wind: config.wind,
            attractor: config.attractor,
            attractor_strength: config.attractor_strength,
            well_radius: config.well_radius,
            well_strength: config.well_strength,
            turbulence: config.turbulence,
            dampening: config.dampening,
            boundary_radius: config.boundary_radius,
            restitution: config.restitution,
            size_min: config.size_range.start,
            size_max: config.size_range.end,
        }
    }

    /// Update every live particle in place. Dead slots are skipped entirely.
    pub fn step(&self, particles: &mut [Particle], params: &FrameParams) {
        let forces = self.frame_forces(params);
        particles
            .par_iter_mut()
            .enumerate()
            .for_each(|(index, particle)| {
                self.integrate_one(index, particle, &forces, params);
            });
    }

    /// The frame's force list, with interaction scalars folded in.
    fn frame_forces(&self, params: &FrameParams) -> Vec<Force> {
        vec![
            Force::Gravity(self.gravity),
            Force::Wind(self.wind * (1.0 + params.swipe_effect)),
            Force::Attractor {
                center: self.attractor,
                strength: self.attractor_strength * (1.0 + params.tap_intensity * 2.0),
            },
            Force::SymmetryWells {
                count: params.symmetry_count,
                radius: self.well_radius,
                strength: self.well_strength,
            },
            Force::Turbulence {
                strength: self.turbulence * (1.0 + params.motion_effect),
            },
        ]
    }

    fn integrate_one(
        &self,
        index: usize,
        p: &mut Particle,
        forces: &[Force],
        params: &FrameParams,
    ) {
        if !p.is_alive() {
            return;
        }
        let dt = params.delta_time;

        let mut total = Vec2::ZERO;
        for force in forces {
            total += force.eval(p.position, p.mass, params.time, index);
        }

        if p.mass > 0.0 {
            p.velocity += total * dt / p.mass;
        }
        p.velocity *= self.dampening.powf(dt);
        p.position += p.velocity * dt;

        self.bounce(p);

        p.life -= dt;
        if p.life <= 0.0 {
            p.color.w = 0.0;
            return;
        }

        let ratio = p.life_ratio();
        let alpha = particle::lifecycle_alpha(ratio);
        p.color = particle::lifecycle_color(params.time, index, ratio, alpha);
        p.size = particle::rendered_size(
            particle::base_size(index, self.size_min, self.size_max),
            params.breathing_phase,
            index,
            ratio,
        );
    }

    /// Clamp to the boundary circle and reflect the outward velocity component,
    /// scaled by restitution. The tangential component is untouched, so a
    /// bounce never adds speed.
    fn bounce(&self, p: &mut Particle) {
        let distance = p.position.length();
        if distance <= self.boundary_radius {
            return;
        }
        let normal = p.position / distance;
        p.position = normal * self.boundary_radius;

        let outward_speed = p.velocity.dot(normal);
        if outward_speed > 0.0 {
            p.velocity -= normal * outward_speed * (1.0 + self.restitution);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    fn quiet_config() -> SimConfig {
        SimConfig {
            gravity: Vec2::ZERO,
            wind: Vec2::ZERO,
            attractor_strength: 0.0,
            well_strength: 0.0,
            turbulence: 0.0,
            dampening: 1.0,
            boundary_radius: 1.0,
            restitution: 0.5,
            ..SimConfig::default()
        }
    }

    fn live_particle() -> Particle {
        Particle {
            position: Vec2::new(0.2, 0.1),
            velocity: Vec2::new(0.3, -0.1),
            color: Vec4::new(1.0, 1.0, 1.0, 1.0),
            life: 4.0,
            max_life: 4.0,
            size: 0.02,
            mass: 1.0,
        }
    }

    #[test]
    fn test_dead_slots_are_skipped() {
        let integrator = Integrator::from_config(&SimConfig::default());
        let params = FrameParams::new(100, 100);
        let mut slots = [Particle {
            velocity: Vec2::new(9.0, 9.0),
            life: 5.0,
            ..Particle::DEAD
        }];
        integrator.step(&mut slots, &params);
        assert_eq!(slots[0].velocity, Vec2::new(9.0, 9.0));
        assert_eq!(slots[0].life, 5.0);
    }

    #[test]
    fn test_life_decays_by_delta_time() {
        let integrator = Integrator::from_config(&quiet_config());
        let mut params = FrameParams::new(100, 100);
        params.delta_time = 0.25;
        let mut slots = [live_particle()];
        integrator.step(&mut slots, &params);
        assert!((slots[0].life - 3.75).abs() < 1e-6);
        assert!(slots[0].is_alive());
    }

    #[test]
    fn test_death_zeroes_alpha() {
        let integrator = Integrator::from_config(&quiet_config());
        let mut params = FrameParams::new(100, 100);
        params.delta_time = 0.5;
        let mut slots = [Particle {
            life: 0.3,
            ..live_particle()
        }];
        integrator.step(&mut slots, &params);
        assert!(slots[0].life <= 0.0);
        assert_eq!(slots[0].color.w, 0.0);

        // A second step must not keep decrementing the dead slot
        let life_after_death = slots[0].life;
        integrator.step(&mut slots, &params);
        assert_eq!(slots[0].life, life_after_death);
    }

    #[test]
    fn test_bounce_keeps_particle_inside_and_loses_energy() {
        let integrator = Integrator::from_config(&quiet_config());
        let mut params = FrameParams::new(100, 100);
        params.delta_time = 0.1;
        let mut slots = [Particle {
            position: Vec2::new(0.99, 0.0),
            velocity: Vec2::new(2.0, 0.5),
            ..live_particle()
        }];
        let velocity_before = slots[0].velocity;
        integrator.step(&mut slots, &params);

        assert!(slots[0].position.length() <= 1.0 + 1e-5);
        assert!(slots[0].velocity.length() <= velocity_before.length() + 1e-5);

        // Boundary radius is 1.0, so the clamped position is the impact normal
        let normal = slots[0].position;
        let tangent = Vec2::new(-normal.y, normal.x);
        assert!(slots[0].velocity.dot(normal) < 0.0);
        assert!((slots[0].velocity.dot(tangent) - velocity_before.dot(tangent)).abs() < 1e-5);
    }

    #[test]
    fn test_alpha_stays_normalized() {
        let integrator = Integrator::from_config(&SimConfig::default());
        let mut params = FrameParams::new(100, 100);
        params.delta_time = 0.016;
        let mut slots: Vec<Particle> = (0..64)
            .map(|i| Particle {
                position: Vec2::new((i as f32 * 0.7).sin(), (i as f32 * 1.3).cos()) * 0.8,
                velocity: Vec2::new((i as f32 * 2.1).sin(), (i as f32 * 0.9).cos()),
                life: 0.05 + i as f32 * 0.11,
                max_life: 3.0,
                ..live_particle()
            })
            .collect();

        for _ in 0..200 {
            integrator.step(&mut slots, &params);
            for p in &slots {
                assert!((0.0..=1.0).contains(&p.color.w), "alpha={}", p.color.w);
            }
        }
    }
}
