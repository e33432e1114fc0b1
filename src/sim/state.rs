//! Reel state and core simulation types
//!
//! Value types shared by the reel state machine, the orchestrator and the
//! payline rules. Identity for matching is the symbol `id` only; art handles
//! are opaque tokens resolved by the presentation layer.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Opaque reference to a symbol's art, resolved outside the core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtHandle(pub u32);

/// One symbol face on a reel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    pub id: u32,
    pub art: ArtHandle,
}

impl Symbol {
    /// Symbol whose art handle mirrors its id (the common 1:1 case)
    pub fn new(id: u32) -> Self {
        Self {
            id,
            art: ArtHandle(id),
        }
    }
}

/// Current phase of a reel's spin cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReelState {
    /// At rest; initial state and the end of every cycle
    #[default]
    Idle,
    /// Kick-off nudge before the scroll starts
    StartEasing,
    /// Scrolling; slots recycle and the stop condition is checked
    Spinning,
    /// Settle-in nudge after the stop condition fired
    EndEasing,
}

/// One of the fixed visible window positions.
///
/// Owned exclusively by its reel; reassigned (never destroyed) on recycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolSlot {
    pub symbol: Symbol,
    /// Screen-space position (x is the reel column, y scrolls)
    pub pos: Vec2,
    /// Y cached when a nudge animation starts; only read while easing
    pub prior_y: f32,
    /// Set while this slot is part of a winning payline
    pub highlighted: bool,
}

/// Fixed-size circular window of slots in continuous top-to-bottom screen
/// order: one buffer slot above the visible rows, one below.
///
/// Recycling rotates the head offset instead of shifting slots, so an
/// effectively infinite scroll costs exactly `window_size` allocations for
/// the reel's lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReelWindow {
    slots: Vec<SymbolSlot>,
    /// Index of the current top-most slot
    head: usize,
}

impl ReelWindow {
    /// Lay out `slots` top-to-bottom: the top buffer slot sits half a row
    /// above the visible edge, each following slot one row lower.
    pub fn new(symbols: &[Symbol], reel_x: f32, visible_rows: usize, row_height: f32) -> Self {
        let window_size = visible_rows + 2;
        debug_assert!(symbols.len() >= window_size);
        let top_y = visible_rows as f32 * row_height / 2.0 + row_height / 2.0;
        let slots = (0..window_size)
            .map(|i| SymbolSlot {
                symbol: symbols[i % symbols.len()],
                pos: Vec2::new(reel_x, top_y - i as f32 * row_height),
                prior_y: 0.0,
                highlighted: false,
            })
            .collect();
        Self { slots, head: 0 }
    }

    /// Constant for the reel's lifetime
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Slot at screen position `i` (0 = top buffer)
    pub fn slot(&self, i: usize) -> &SymbolSlot {
        &self.slots[(self.head + i) % self.slots.len()]
    }

    pub fn slot_mut(&mut self, i: usize) -> &mut SymbolSlot {
        let n = self.slots.len();
        &mut self.slots[(self.head + i) % n]
    }

    /// Slots in top-to-bottom screen order
    pub fn iter(&self) -> impl Iterator<Item = &SymbolSlot> {
        (0..self.slots.len()).map(|i| self.slot(i))
    }

    /// Move the bottom slot to the top of the window, giving it `symbol` and
    /// placing it one row above the current top slot. O(1): only the head
    /// offset moves.
    pub fn recycle_bottom(&mut self, symbol: Symbol, row_height: f32) {
        let n = self.slots.len();
        let new_head = (self.head + n - 1) % n;
        let top_y = self.slot(0).pos.y;
        let slot = &mut self.slots[new_head];
        slot.symbol = symbol;
        slot.pos.y = top_y + row_height;
        self.head = new_head;
    }
}

/// Cycling supply of symbol faces fed into recycled slots.
///
/// One full permutation of the symbol set; the cursor wraps to 0 so the
/// sequence repeats exactly every `len()` draws.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolSupply {
    symbols: Vec<Symbol>,
    cursor: usize,
}

impl SymbolSupply {
    pub fn new(symbols: Vec<Symbol>) -> Self {
        debug_assert!(!symbols.is_empty());
        Self { symbols, cursor: 0 }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// The permutation in cursor order, starting from index 0
    pub fn order(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Draw the next symbol and advance the cursor, wrapping at the end
    pub fn next_symbol(&mut self) -> Symbol {
        let s = self.symbols[self.cursor];
        self.cursor = (self.cursor + 1) % self.symbols.len();
        s
    }

    /// Skip the cursor forward, as if `n` symbols had been drawn
    pub fn advance_by(&mut self, n: usize) {
        self.cursor = (self.cursor + n) % self.symbols.len();
    }
}

/// When a spinning reel is allowed to stop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopKind {
    /// Stop as soon as the spin timer runs out
    Duration,
    /// Stop when the target symbol occupies the exact middle visible row
    MiddleRow,
    /// Each tick, probe one uniformly random visible row for the target
    /// symbol; the row is re-rolled every tick, not fixed per spin
    RandomVisibleRow,
}

/// Immutable per-spin stop rule.
///
/// Every kind waits out `min_duration` plus a uniformly random extra in
/// `[0, extra_random_duration)` before its check applies at all.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StopCondition {
    pub kind: StopKind,
    pub min_duration: f32,
    pub extra_random_duration: f32,
    /// Only read for `MiddleRow` / `RandomVisibleRow`
    pub target_symbol_id: u32,
}

impl StopCondition {
    pub fn duration(min: f32, extra: f32) -> Self {
        Self {
            kind: StopKind::Duration,
            min_duration: min,
            extra_random_duration: extra,
            target_symbol_id: 0,
        }
    }

    pub fn middle_row(min: f32, extra: f32, target: u32) -> Self {
        Self {
            kind: StopKind::MiddleRow,
            min_duration: min,
            extra_random_duration: extra,
            target_symbol_id: target,
        }
    }

    pub fn random_visible_row(min: f32, extra: f32, target: u32) -> Self {
        Self {
            kind: StopKind::RandomVisibleRow,
            min_duration: min,
            extra_random_duration: extra,
            target_symbol_id: target,
        }
    }
}

/// Produced exactly once per completed spin, consumed by the orchestrator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinResult {
    pub reel_index: usize,
    /// Visible symbol ids top-to-bottom; length equals `visible_rows`
    pub visible_symbol_ids: Vec<u32>,
}

/// Outcome of payline evaluation over the final grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaylineResult {
    pub won: bool,
    /// Per reel, per visible row: true if that cell is part of a win
    pub highlight: Vec<Vec<bool>>,
}

impl PaylineResult {
    pub fn lost(reel_count: usize, visible_rows: usize) -> Self {
        Self {
            won: false,
            highlight: vec![vec![false; visible_rows]; reel_count],
        }
    }
}

/// Events for the presentation layer, drained from the orchestrator each
/// frame (the non-blocking stand-in for render callbacks)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    /// A reel left Idle and began its kick-off nudge
    ReelStarted { reel: usize },
    /// A reel settled; its visible symbols are final
    ReelStopped { reel: usize, symbols: Vec<u32> },
    /// All reels reported and the paylines were evaluated
    Evaluated { result: PaylineResult },
    /// The post-win settle pause ended; highlights were reverted
    HighlightsCleared,
}
