//! Timed scalar tween
//!
//! Drives one value over a fixed duration through a caller-chosen easing
//! function. The time fraction is clamped to `[0, 1]`; the eased output is
//! not, so "back"-style easings overshoot the endpoints as intended.

use crate::{clamp01, lerp};

/// Easing: pure map from clamped time fraction to progress.
///
/// May return values outside `[0, 1]` (overshoot); must be deterministic.
pub type EaseFn = fn(f32) -> f32;

/// Identity easing
pub fn linear(t: f32) -> f32 {
    t
}

/// Classic hermite smoothstep
pub fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

/// Decelerating ease with a small overshoot past 1.0, for the spin kick-off
/// and settle-in nudges
pub fn ease_out_back(t: f32) -> f32 {
    const C1: f32 = 1.70158;
    const C3: f32 = C1 + 1.0;
    let u = t - 1.0;
    1.0 + C3 * u * u * u + C1 * u * u
}

/// A single scalar animation over a fixed duration.
///
/// Completion is reported exactly once: the first `advance` call that pushes
/// `elapsed` to or past `duration` returns true, every later call false.
#[derive(Debug, Clone)]
pub struct Tween {
    from: f32,
    to: f32,
    duration: f32,
    elapsed: f32,
    ease: EaseFn,
    fired: bool,
}

impl Tween {
    /// New tween, started at elapsed = 0
    pub fn start(from: f32, to: f32, duration: f32, ease: EaseFn) -> Self {
        Self {
            from,
            to,
            duration,
            elapsed: 0.0,
            ease,
            fired: false,
        }
    }

    /// Restart this tween over a new range, resetting elapsed time
    pub fn restart(&mut self, from: f32, to: f32, duration: f32) {
        self.from = from;
        self.to = to;
        self.duration = duration;
        self.elapsed = 0.0;
        self.fired = false;
    }

    /// Advance by `dt` seconds; returns true on the one call that completes
    /// the tween
    pub fn advance(&mut self, dt: f32) -> bool {
        if self.fired {
            return false;
        }
        self.elapsed += dt;
        if self.elapsed >= self.duration {
            self.fired = true;
            return true;
        }
        false
    }

    /// Current value: `lerp(from, to, ease(clamp01(elapsed / duration)))`
    pub fn value(&self) -> f32 {
        let fraction = if self.duration > 0.0 {
            clamp01(self.elapsed / self.duration)
        } else {
            1.0
        };
        lerp(self.from, self.to, (self.ease)(fraction))
    }

    /// True while the tween has time remaining
    pub fn is_active(&self) -> bool {
        self.elapsed < self.duration
    }
}
