//! Emission policy: the per-frame scheduler that turns free pool slots into
//! newly initialized particles.
//!
//! Emission runs on simulation time only. The accumulator gathers `delta_time`
//! until it covers at least one emission interval, then a batch of
//! `floor(accumulated * rate)` particles is drawn from the free stack (capped
//! at whatever is actually free) and the timer resets. Pool exhaustion is not
//! an error: the batch shrinks to the free count and emission retries next
//! frame.
//!
//! Each tick starts with the recycler sweep, so a particle that died during the
//! previous integration pass is back on the free stack before this tick's batch
//! is sized.

use std::ops::Range;

use glam::{Vec2, Vec4};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::color::hsv_to_rgb;
use crate::config::SimConfig;
use crate::params::FrameParams;
use crate::particle::{self, Particle};
use crate::pool::ParticlePool;

/// What one emission tick did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EmissionTick {
    /// Expired slots returned to the free stack by the sweep.
    pub recycled: usize,
    /// Particles initialized from free slots this tick.
    pub emitted: usize,
}

/// Rate-based particle emission over the pool's free list.
///
/// Kinematics are randomized from the configured ranges through a seeded
/// [`SmallRng`], so two runs with the same seed and timestep emit identical
/// particles. Hue is deterministic from `(time, index)` and the base size is
/// the same per-slot hash the integrator recomputes from.
pub struct EmissionPolicy {
    rate: f32,
    accumulator: f32,
    speed_range: Range<f32>,
    size_range: Range<f32>,
    life_range: Range<f32>,
    mass_range: Range<f32>,
    spawn_radius: f32,
    rng: SmallRng,
}

impl EmissionPolicy {
    /// Build an emission policy from the simulation configuration.
    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            rate: config.emission_rate.max(0.0),
            accumulator: 0.0,
            speed_range: config.speed_range.clone(),
            size_range: config.size_range.clone(),
            life_range: config.life_range.clone(),
            mass_range: config.mass_range.clone(),
            spawn_radius: config.spawn_radius.max(0.0),
            rng: SmallRng::seed_from_u64(config.seed),
        }
    }

    /// Sweep expired slots, then emit the batch the elapsed time has earned.
    pub fn tick(&mut self, pool: &mut ParticlePool, params: &FrameParams) -> EmissionTick {
        let recycled = pool.recycle_dead();

        self.accumulator += params.delta_time.max(0.0);
        if self.rate <= 0.0 {
            return EmissionTick { recycled, emitted: 0 };
        }

        let interval = 1.0 / self.rate;
        if self.accumulator < interval {
            return EmissionTick { recycled, emitted: 0 };
        }

        let earned = (self.accumulator * self.rate).floor() as usize;
        let batch = earned.min(pool.free_count());
        if batch < earned {
            log::debug!(
                "emission throttled: wanted {earned}, {} slots free",
                pool.free_count()
            );
        }

        let mut emitted = 0;
        for _ in 0..batch {
            let Some(index) = pool.allocate() else { break };
            pool.particles_mut()[index] = self.spawn(index, params);
            emitted += 1;
        }
        self.accumulator = 0.0;

        EmissionTick { recycled, emitted }
    }

    /// Initialize a fresh particle for `index`.
    ///
    /// Spawn alpha is 1.0 purely as the alive marker; the first integration
    /// pass replaces it with the lifecycle fade before anything renders.
    fn spawn(&mut self, index: usize, params: &FrameParams) -> Particle {
        let angle = self.rng.gen_range(0.0..std::f32::consts::TAU);
        let radius = sample(&mut self.rng, &(0.0..self.spawn_radius));
        let position = Vec2::new(angle.cos(), angle.sin()) * radius;

        let heading = self.rng.gen_range(0.0..std::f32::consts::TAU);
        let speed = sample(&mut self.rng, &self.speed_range);
        let velocity = Vec2::new(heading.cos(), heading.sin()) * speed;

        let max_life = sample(&mut self.rng, &self.life_range);
        let mass = sample(&mut self.rng, &self.mass_range).max(1e-3);
        let size = particle::base_size(index, self.size_range.start, self.size_range.end);

        let rgb = hsv_to_rgb(particle::lifecycle_hue(params.time, index), 0.9, 1.0);

        Particle {
            position,
            velocity,
            color: Vec4::new(rgb.x, rgb.y, rgb.z, 1.0),
            life: max_life,
            max_life,
            size,
            mass,
        }
    }
}

/// Draw from a range, pinning degenerate (`x..x`) ranges to their start.
fn sample(rng: &mut SmallRng, range: &Range<f32>) -> f32 {
    if range.end > range.start {
        rng.gen_range(range.clone())
    } else {
        range.start
    }
}
