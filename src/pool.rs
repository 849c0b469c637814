//! Fixed-capacity particle storage with free-index recycling.
//!
//! The pool owns the backing array. Per frame, the emission policy takes the
//! mutable side (allocate + initialize), the integrator takes a mutable slice
//! pass, and the compositor reads a completed snapshot. An index is always in
//! exactly one of {active set, free stack}; the `in_free` bitmap makes recycling
//! idempotent-guarded rather than trusting callers.

use crate::particle::{Particle, ParticleInstance};

/// Fixed-capacity array of particles plus a stack of free indices.
pub struct ParticlePool {
    particles: Vec<Particle>,
    free: Vec<u32>,
    in_free: Vec<bool>,
}

impl ParticlePool {
    /// Create a pool where every slot starts dead and free.
    ///
    /// The free stack is seeded in reverse so allocation hands out slot 0 first,
    /// which keeps runs reproducible.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            particles: vec![Particle::DEAD; capacity],
            free: (0..capacity as u32).rev().collect(),
            in_free: vec![true; capacity],
        }
    }

    /// Pop a free slot, or `None` when the pool is exhausted. Exhaustion is
    /// non-fatal: emission just throttles and retries next frame.
    pub fn allocate(&mut self) -> Option<usize> {
        let index = self.free.pop()? as usize;
        self.in_free[index] = false;
        Some(index)
    }

    /// Return a slot to the free stack and zero its visual alpha.
    ///
    /// Only valid for slots not already free; a double recycle is a logic error
    /// (debug assertion), not a crash, and leaves the stack consistent.
    pub fn recycle(&mut self, index: usize) {
        if self.in_free[index] {
            debug_assert!(false, "double recycle of slot {index}");
            return;
        }
        self.particles[index].color.w = 0.0;
        self.in_free[index] = true;
        self.free.push(index as u32);
    }

    /// Sweep for expired particles and free each exactly once.
    ///
    /// A slot is expired when its life has run out and it has not been recycled
    /// yet. Returns how many slots were freed.
    pub fn recycle_dead(&mut self) -> usize {
        let mut freed = 0;
        for index in 0..self.particles.len() {
            if !self.in_free[index] && self.particles[index].life <= 0.0 {
                self.recycle(index);
                freed += 1;
            }
        }
        freed
    }

    /// Slots currently allocated out of the pool.
    #[inline]
    pub fn active_count(&self) -> usize {
        self.particles.len() - self.free.len()
    }

    /// Total slot count.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.particles.len()
    }

    /// Slots available for emission this tick.
    #[inline]
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Whether a slot is on the free stack.
    #[inline]
    pub fn is_free(&self, index: usize) -> bool {
        self.in_free[index]
    }

    /// Read-only view of every slot, dead ones included.
    #[inline]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutable view for the integrator and the emitter.
    #[inline]
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    /// Instance records for every live particle, in slot order.
    pub fn instances(&self) -> Vec<ParticleInstance> {
        self.particles
            .iter()
            .filter(|p| p.is_alive())
            .map(ParticleInstance::from_particle)
            .collect()
    }
}
