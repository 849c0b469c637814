//! # Kaleida - Kaleidoscopic Generative-Art Engine
//!
//! Audio/haptic-reactive generative art: a procedural fractal pattern field
//! layered with a pooled, physics-driven particle system, composited on the
//! CPU or the GPU.
//!
//! Kaleida keeps the whole simulation on the CPU in plain data structures, so
//! every frame is deterministic and testable, and mirrors the per-pixel math
//! into WGSL for interactive resolutions.
//!
//! ## Quick Start
//!
//! ```ignore
//! use kaleida::prelude::*;
//!
//! fn main() {
//!     let mut sim = Simulation::from_config(SimConfig::bloom())
//!         .with_resolution(1280, 720)
//!         .with_symmetry(8);
//!
//!     // Input threads hold a handle to the signal hub
//!     let signals = sim.signals();
//!     signals.bump_tap(0.8);
//!
//!     for _ in 0..600 {
//!         sim.step(1.0 / 60.0);
//!     }
//!     sim.composite().save_png("frame.png").unwrap();
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Pattern field
//!
//! Five pure layers blend into the backdrop, each a function of coordinate,
//! time, and the frame parameters:
//!
//! | Layer | Weight | Character |
//! |-------|--------|-----------|
//! | [`PatternLayer::Kaleidoscope`] | 0.4 | Angular fold with sinusoidal interference |
//! | [`PatternLayer::Mandelbrot`] | 0.2 | Escape-time fractal over the sample point |
//! | [`PatternLayer::Julia`] | 0.2 | Escape-time fractal with a drifting constant |
//! | [`PatternLayer::Fibonacci`] | 0.1 | Radially decaying angular wave |
//! | [`PatternLayer::GoldenSpiral`] | 0.1 | Logarithmic spiral windowed by radius |
//!
//! ### Particles
//!
//! A fixed-capacity [`ParticlePool`] recycles slots through a free stack.
//! The [`Simulation`] emits by rate, integrates forces (gravity, wind,
//! attractor, symmetry wells, turbulence), bounces off a circular boundary,
//! and fades alpha in and out over each particle's life. Alpha doubles as the
//! liveness flag: a slot with zero alpha costs nothing until it respawns.
//!
//! ### Interaction signals
//!
//! Taps, swipes, and device motion land in [`InteractionSignals`] from any
//! thread and decay exponentially once folded into the frame. Bump them from
//! an audio or sensor callback and the visuals flare and settle on their own.
//!
//! ## Rendering
//!
//! Two interchangeable paths produce the picture:
//!
//! - [`Compositor`] evaluates pattern plus particle splats per pixel on the
//!   CPU (rayon across rows) into a [`Frame`] you can inspect or save.
//! - [`HeadlessRenderer`] runs the same math as WGSL into an offscreen
//!   texture and reads it back, no window required.

pub mod color;
pub mod compositor;
pub mod config;
mod emitter;
pub mod error;
pub mod forces;
pub mod gpu;
mod integrator;
pub mod params;
pub mod particle;
pub mod pattern;
pub mod pool;
pub mod signals;
mod simulation;
pub mod time;

pub use bytemuck;
pub use compositor::{Compositor, Frame};
pub use config::SimConfig;
pub use emitter::{EmissionPolicy, EmissionTick};
pub use error::RenderError;
pub use forces::Force;
pub use glam::{Vec2, Vec3, Vec4};
pub use gpu::HeadlessRenderer;
pub use integrator::Integrator;
pub use params::FrameParams;
pub use particle::{Particle, ParticleInstance};
pub use pattern::PatternLayer;
pub use pool::ParticlePool;
pub use signals::InteractionSignals;
pub use simulation::Simulation;
pub use time::FrameClock;

/// Convenient re-exports for common usage.
///
/// # Usage
///
/// ```ignore
/// use kaleida::prelude::*;
/// ```
///
/// This imports:
/// - [`Simulation`] - the simulation context and builder
/// - [`SimConfig`] - configuration and presets
/// - [`Compositor`], [`Frame`] - the CPU render path
/// - [`HeadlessRenderer`] - the offscreen GPU render path
/// - [`InteractionSignals`] - the cross-thread input hub
/// - [`FrameClock`] - frame timing
/// - [`Vec2`], [`Vec3`], [`Vec4`] - glam vector types
pub mod prelude {
    pub use crate::compositor::{Compositor, Frame};
    pub use crate::config::SimConfig;
    pub use crate::emitter::EmissionTick;
    pub use crate::error::RenderError;
    pub use crate::gpu::HeadlessRenderer;
    pub use crate::params::FrameParams;
    pub use crate::particle::{Particle, ParticleInstance};
    pub use crate::pattern::PatternLayer;
    pub use crate::signals::InteractionSignals;
    pub use crate::simulation::Simulation;
    pub use crate::time::FrameClock;
    pub use crate::{Vec2, Vec3, Vec4};
}
