//! Reel Sim - a deterministic multi-reel slot machine core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (reel state machines, stop sequencing, payline rules)
//! - `config`: Machine configuration and fail-fast validation
//!
//! Rendering, input and asset lookup are external collaborators: the core
//! exposes per-slot `(symbol, position)` read-outs and an event stream, and
//! consumes easing as a plain `fn(f32) -> f32`.

pub mod config;
pub mod sim;

pub use config::{ConfigError, SlotConfig};

/// Simulation tuning constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz is plenty for reel animation)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Duration of the start/end nudge animations (seconds)
    pub const NUDGE_DURATION: f32 = 0.5;

    /// How far (in screen units) the bottom slot must drop past the recycle
    /// line before it is rotated back to the top of the window
    pub const RECYCLE_SLACK: f32 = 0.2;

    /// Default gap between consecutive reel starts (seconds)
    pub const DEFAULT_STAGGER_STEP: f32 = 0.1;

    /// Default pause after a winning spin before input is re-enabled (seconds)
    pub const DEFAULT_WIN_SETTLE: f32 = 2.0;

    /// Default screen height of one symbol row
    pub const DEFAULT_ROW_HEIGHT: f32 = 100.0;

    /// Default downward scroll speed while spinning (screen units / second)
    pub const DEFAULT_SPIN_SPEED: f32 = 600.0;

    /// Default magnitude of the start/end nudge (screen units); small next
    /// to the row height so reels come to rest close to the grid
    pub const DEFAULT_NUDGE_MAGNITUDE: f32 = 8.0;

    /// Reels that must hold a symbol for an any-row win (3-of-a-kind)
    pub const DEFAULT_MATCH_THRESHOLD: usize = 3;
}

/// Linear interpolation, deliberately unclamped so easing functions that
/// overshoot `[0, 1]` (back/elastic kicks) extrapolate past the endpoints
#[inline]
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

/// Clamp a time fraction to `[0, 1]`
#[inline]
pub fn clamp01(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}
