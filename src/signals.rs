//! Interaction signals: tap, swipe, and motion intensity scalars.
//!
//! External inputs (an audio beat, a haptic tap, an accelerometer) land here
//! from any thread as bump calls. Once per frame the simulation drains the
//! current values into [`FrameParams`] and applies exponential decay, so a
//! single bump flares and fades over the following frames instead of acting as
//! a one-frame spike.
//!
//! Values are stored as f32 bit patterns in [`AtomicU32`]s, which keeps the
//! struct shareable behind an `Arc` without a lock.

use std::sync::atomic::{AtomicU32, Ordering};

/// Thread-safe holder for the three interaction scalars.
#[derive(Debug)]
pub struct InteractionSignals {
    tap: AtomicU32,
    swipe: AtomicU32,
    motion: AtomicU32,
}

impl Default for InteractionSignals {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionSignals {
    /// All three scalars at rest.
    pub fn new() -> Self {
        Self {
            tap: AtomicU32::new(0.0f32.to_bits()),
            swipe: AtomicU32::new(0.0f32.to_bits()),
            motion: AtomicU32::new(0.0f32.to_bits()),
        }
    }

    /// Add tap intensity. Negative amounts are ignored.
    pub fn bump_tap(&self, amount: f32) {
        bump(&self.tap, amount);
    }

    /// Add swipe intensity. Negative amounts are ignored.
    pub fn bump_swipe(&self, amount: f32) {
        bump(&self.swipe, amount);
    }

    /// Add motion intensity. Negative amounts are ignored.
    pub fn bump_motion(&self, amount: f32) {
        bump(&self.motion, amount);
    }

    /// Current tap intensity.
    pub fn tap(&self) -> f32 {
        f32::from_bits(self.tap.load(Ordering::Acquire))
    }

    /// Current swipe intensity.
    pub fn swipe(&self) -> f32 {
        f32::from_bits(self.swipe.load(Ordering::Acquire))
    }

    /// Current motion intensity.
    pub fn motion(&self) -> f32 {
        f32::from_bits(self.motion.load(Ordering::Acquire))
    }

    /// Read all three scalars, then decay them by `exp(-rate * dt)` each.
    ///
    /// Returns `(tap, swipe, motion)` as they stood at the start of the frame.
    /// Bumps racing with the decay are folded in rather than lost.
    pub fn consume(&self, dt: f32, tap_rate: f32, swipe_rate: f32, motion_rate: f32) -> (f32, f32, f32) {
        let dt = dt.max(0.0);
        (
            decay(&self.tap, (-tap_rate * dt).exp()),
            decay(&self.swipe, (-swipe_rate * dt).exp()),
            decay(&self.motion, (-motion_rate * dt).exp()),
        )
    }
}

fn bump(cell: &AtomicU32, amount: f32) {
    if !(amount > 0.0) {
        return;
    }
    let mut current = cell.load(Ordering::Acquire);
    loop {
        let next = (f32::from_bits(current).max(0.0) + amount).to_bits();
        match cell.compare_exchange_weak(current, next, Ordering::AcqRel, Ordering::Acquire) {
            Ok(_) => return,
            Err(observed) => current = observed,
        }
    }
}

/// Multiply the stored scalar by `factor`, snapping dust to zero.
/// Returns the value before the decay.
fn decay(cell: &AtomicU32, factor: f32) -> f32 {
    let mut current = cell.load(Ordering::Acquire);
    loop {
        let value = f32::from_bits(current).max(0.0);
        let mut decayed = value * factor.clamp(0.0, 1.0);
        if decayed < 1e-6 {
            decayed = 0.0;
        }
        match cell.compare_exchange_weak(
            current,
            decayed.to_bits(),
            Ordering::AcqRel,
            Ordering::Acquire,
        ) {
            Ok(_) => return value,
            Err(observed) => current = observed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_bump_accumulates() {
        let signals = InteractionSignals::new();
        signals.bump_tap(0.4);
        signals.bump_tap(0.3);
        assert!((signals.tap() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_negative_and_nan_bumps_ignored() {
        let signals = InteractionSignals::new();
        signals.bump_swipe(-5.0);
        signals.bump_swipe(f32::NAN);
        assert_eq!(signals.swipe(), 0.0);
    }

    #[test]
    fn test_consume_returns_pre_decay_value() {
        let signals = InteractionSignals::new();
        signals.bump_motion(1.0);
        let (_, _, motion) = signals.consume(1.0, 0.0, 0.0, 2.0);
        assert!((motion - 1.0).abs() < 1e-6);
        // After one second at rate 2.0 the stored value is e^-2
        assert!((signals.motion() - (-2.0f32).exp()).abs() < 1e-4);
    }

    #[test]
    fn test_decay_reaches_zero() {
        let signals = InteractionSignals::new();
        signals.bump_tap(1.0);
        for _ in 0..2_000 {
            signals.consume(0.016, 1.8, 1.2, 0.9);
        }
        assert_eq!(signals.tap(), 0.0);
    }

    #[test]
    fn test_cross_thread_bumps() {
        let signals = Arc::new(InteractionSignals::new());
        let mut handles = Vec::new();
        for _ in 0..4 {
            let shared = Arc::clone(&signals);
            handles.push(std::thread::spawn(move || {
                for _ in 0..1_000 {
                    shared.bump_tap(0.001);
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        assert!((signals.tap() - 4.0).abs() < 1e-2);
    }
}
