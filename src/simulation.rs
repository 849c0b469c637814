//! Top-level simulation context.
//!
//! [`Simulation`] owns the particle pool and wires the per-frame sequence:
//! drain interaction signals, emit, integrate, publish. Every component is an
//! explicit field here; there is no global state anywhere in the crate.
//!
//! The per-frame order matters: signals fold into the parameter snapshot
//! before anything reads it, the emitter runs before the integrator so fresh
//! particles get their first physics step in the same frame, and compositing
//! only ever sees the pool after [`Simulation::step`] has returned.
//!
//! # Example
//!
//! ```ignore
//! use kaleida::prelude::*;
//!
//! let mut sim = Simulation::from_config(SimConfig::bloom())
//!     .with_resolution(1280, 720)
//!     .with_symmetry(8);
//!
//! sim.signals().bump_tap(0.8);
//! sim.step(1.0 / 60.0);
//! let frame = sim.composite();
//! ```

use std::sync::Arc;

use crate::compositor::{Compositor, Frame};
use crate::config::SimConfig;
use crate::emitter::{EmissionPolicy, EmissionTick};
use crate::integrator::Integrator;
use crate::params::FrameParams;
use crate::particle::{Particle, ParticleInstance};
use crate::pool::ParticlePool;
use crate::signals::InteractionSignals;

/// The simulation context: pool, emitter, integrator, compositor, and the
/// shared interaction signal hub.
pub struct Simulation {
    config: SimConfig,
    pool: ParticlePool,
    emitter: EmissionPolicy,
    integrator: Integrator,
    compositor: Compositor,
    signals: Arc<InteractionSignals>,
    params: FrameParams,
    time: f32,
    frame: u64,
}

impl Simulation {
    /// Create a simulation with the default configuration.
    pub fn new() -> Self {
        Self::from_config(SimConfig::default())
    }

    /// Create a simulation from a configuration. Out-of-range values clamp.
    pub fn from_config(config: SimConfig) -> Self {
        let config = config.normalized();
        log::debug!(
            "simulation ready: capacity {}, emission {}/s, boundary {}",
            config.capacity,
            config.emission_rate,
            config.boundary_radius
        );
        Self {
            pool: ParticlePool::new(config.capacity),
            emitter: EmissionPolicy::from_config(&config),
            integrator: Integrator::from_config(&config),
            compositor: Compositor::new(),
            signals: Arc::new(InteractionSignals::new()),
            params: FrameParams::default(),
            time: 0.0,
            frame: 0,
            config,
        }
    }

    /// Set the output resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.params.set_resolution(width, height);
        self
    }

    /// Set the kaleidoscope symmetry count. Clamps to `[3, 12]`.
    pub fn with_symmetry(mut self, count: u32) -> Self {
        self.params.symmetry_count = count;
        self.params = self.params.clamped();
        self
    }

    /// Set the pattern detail level. Clamps to `[0, 1]`.
    pub fn with_complexity(mut self, complexity: f32) -> Self {
        self.params.complexity = complexity;
        self.params = self.params.clamped();
        self
    }

    /// Set the global hue offset.
    pub fn with_color_shift(mut self, shift: f32) -> Self {
        self.params.color_shift = shift;
        self
    }

    /// Advance the simulation by `dt` seconds.
    ///
    /// Negative or NaN deltas are treated as zero, which freezes the frame
    /// rather than running physics backwards. Returns what the emission tick
    /// did, mostly for tests and logging.
    pub fn step(&mut self, dt: f32) -> EmissionTick {
        // f32::max returns the other operand on NaN, so this also scrubs NaN
        let dt = dt.max(0.0);
        self.time += dt;
        self.params.time = self.time;
        self.params.delta_time = dt;

        let (tap, swipe, motion) = self.signals.consume(
            dt,
            self.config.tap_decay,
            self.config.swipe_decay,
            self.config.motion_decay,
        );
        self.params.tap_intensity = tap;
        self.params.swipe_effect = swipe;
        self.params.motion_effect = motion;
        self.params = self.params.clamped();

        let tick = self.emitter.tick(&mut self.pool, &self.params);
        self.integrator.step(self.pool.particles_mut(), &self.params);

        self.frame += 1;
        if self.frame % 300 == 0 {
            log::debug!(
                "frame {}: {} active, +{} emitted, {} recycled",
                self.frame,
                self.pool.active_count(),
                tick.emitted,
                tick.recycled
            );
        }
        tick
    }

    /// Composite the current particle state over the pattern field on the CPU.
    pub fn composite(&self) -> Frame {
        self.compositor.render(self.pool.particles(), &self.params)
    }

    /// Read-only view of the full particle array, dead slots included.
    pub fn particles(&self) -> &[Particle] {
        self.pool.particles()
    }

    /// Number of live particles in the pool.
    pub fn active_particle_count(&self) -> usize {
        self.pool.active_count()
    }

    /// Instance records for every live particle, ready for GPU upload.
    pub fn instances(&self) -> Vec<ParticleInstance> {
        self.pool.instances()
    }

    /// Handle to the interaction signal hub. Clone it onto input threads;
    /// bumps land at the next frame boundary.
    pub fn signals(&self) -> Arc<InteractionSignals> {
        Arc::clone(&self.signals)
    }

    /// The parameter snapshot of the most recent frame.
    pub fn params(&self) -> &FrameParams {
        &self.params
    }

    /// The normalized configuration this simulation runs with.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Monotonic simulation time in seconds.
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Frames stepped since creation.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Advance the breathing phase used by pattern and particle sizing.
    pub fn set_breathing_phase(&mut self, phase: f32) {
        self.params.breathing_phase = phase;
    }

    /// Change the output resolution between frames.
    pub fn set_resolution(&mut self, width: u32, height: u32) {
        self.params.set_resolution(width, height);
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}
