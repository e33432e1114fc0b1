//! Deterministic simulation module
//!
//! All machine logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Reels advance in index order within one tick
//! - No rendering or platform dependencies

pub mod orchestrator;
pub mod payline;
pub mod reel;
pub mod state;
pub mod tween;

pub use orchestrator::Orchestrator;
pub use payline::PaylineEvaluator;
pub use reel::Reel;
pub use state::{
    ArtHandle, PaylineResult, ReelState, ReelWindow, SimEvent, SpinResult, StopCondition, StopKind,
    Symbol, SymbolSlot, SymbolSupply,
};
pub use tween::{EaseFn, Tween, ease_out_back, linear, smoothstep};
