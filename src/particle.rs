//! Particle record and lifecycle helpers.
//!
//! A [`Particle`] is one visual point-mass. The alpha channel of its color is
//! the alive flag: anything with `alpha <= 0` is dead, skipped by the
//! integrator, excluded from rendering, and waiting for the recycler to return
//! its slot to the free list.
//!
//! The free functions here are the lifecycle math shared by the emitter and the
//! integrator: the double-smoothstep alpha fade, the time+index hue rule, and
//! the deterministic per-slot size used for the breathing recompute.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec4};

use crate::color::{hsv_to_rgb, smoothstep};

/// One visual point-mass.
#[derive(Clone, Copy, Debug)]
pub struct Particle {
    /// World position, in the same normalized space the compositor samples.
    pub position: Vec2,
    /// Velocity in world units per second.
    pub velocity: Vec2,
    /// RGBA color; alpha doubles as the alive flag.
    pub color: Vec4,
    /// Remaining life in seconds. May dip below zero for one frame before the
    /// recycler sweeps the slot.
    pub life: f32,
    /// Life this particle started with, in seconds.
    pub max_life: f32,
    /// Rendered size, recomputed each frame. Never negative.
    pub size: f32,
    /// Mass, scales gravity and divides accumulated force.
    pub mass: f32,
}

impl Particle {
    /// An empty dead slot.
    pub const DEAD: Particle = Particle {
        position: Vec2::ZERO,
        velocity: Vec2::ZERO,
        color: Vec4::ZERO,
        life: 0.0,
        max_life: 1.0,
        size: 0.0,
        mass: 1.0,
    };

    /// Whether this particle participates in integration and rendering.
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.color.w > 0.0
    }

    /// Remaining life normalized to `[0, 1]`.
    #[inline]
    pub fn life_ratio(&self) -> f32 {
        if self.max_life > 0.0 {
            (self.life / self.max_life).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

impl Default for Particle {
    fn default() -> Self {
        Self::DEAD
    }
}

/// Alpha from the normalized remaining life.
///
/// Fades in over the first 20% of a particle's life (`life_ratio` falling from
/// 1.0 to 0.8) and out over the last 20% (0.2 down to 0.0). Always in `[0, 1]`,
/// and exactly 0 at both extremes.
pub fn lifecycle_alpha(life_ratio: f32) -> f32 {
    let fade_in = 1.0 - smoothstep(0.8, 1.0, life_ratio);
    let fade_out = smoothstep(0.0, 0.2, life_ratio);
    (fade_in * fade_out).clamp(0.0, 1.0)
}

/// Deterministic per-slot unit hash. Same sine-fract construction the shaders
/// use, so CPU and GPU agree on per-slot variation.
pub fn index_hash(index: usize) -> f32 {
    ((index as f32 * 12.9898).sin() * 43758.5453).fract().abs()
}

/// Hue for a particle spawned or refreshed at `time` in slot `index`.
///
/// Slots space out around the wheel by the golden-ratio conjugate and the whole
/// wheel drifts slowly with time.
pub fn lifecycle_hue(time: f32, index: usize) -> f32 {
    (index as f32 * 0.618_034 + time * 0.05).rem_euclid(1.0)
}

/// Per-frame color refresh: hue from time and slot, saturation and brightness
/// scaled by the remaining life.
pub fn lifecycle_color(time: f32, index: usize, life_ratio: f32, alpha: f32) -> Vec4 {
    let hue = lifecycle_hue(time, index);
    let saturation = 0.6 + 0.4 * life_ratio;
    let value = 0.45 + 0.55 * life_ratio;
    let rgb = hsv_to_rgb(hue, saturation, value);
    Vec4::new(rgb.x, rgb.y, rgb.z, alpha)
}

/// Base size for a slot, drawn deterministically from the configured range.
/// The emitter seeds with this value and the integrator recomputes from it, so
/// the per-frame size refresh needs no extra stored state.
pub fn base_size(index: usize, size_min: f32, size_max: f32) -> f32 {
    size_min + (size_max - size_min) * index_hash(index)
}

/// Rendered size: breathing modulation around the base, scaled down as life
/// runs out. Clamped to `>= 0`.
pub fn rendered_size(base: f32, breathing_phase: f32, index: usize, life_ratio: f32) -> f32 {
    let breath = 1.0 + 0.15 * (breathing_phase + index as f32 * 0.37).sin();
    (base * breath * (0.5 + 0.5 * life_ratio)).max(0.0)
}

/// GPU-side instance record for the particle render pass.
///
/// Layout must match the vertex attributes the particle pipeline declares:
/// two `Float32x4` slots.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct ParticleInstance {
    /// xy = world position, z = rendered size, w = remaining life.
    pub pos_size: [f32; 4],
    /// RGBA color.
    pub color: [f32; 4],
}

impl ParticleInstance {
    /// Pack a particle into its instance record.
    pub fn from_particle(p: &Particle) -> Self {
        Self {
            pos_size: [p.position.x, p.position.y, p.size, p.life],
            color: p.color.to_array(),
        }
    }
}
