//! Machine configuration
//!
//! Plain structured values handed to [`crate::sim::Orchestrator`] at setup.
//! Everything here is validated fail-fast before the first spin: a bad config
//! (empty symbol set, zero rows) would otherwise surface as a silent hang.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::Symbol;

/// Errors rejected at setup time (or when a spin request references a symbol
/// the machine does not carry)
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("machine needs at least one reel")]
    NoReels,
    #[error("machine needs at least one visible row, got {0}")]
    NoVisibleRows(usize),
    #[error("symbol set is empty")]
    EmptySymbolSet,
    #[error("duplicate symbol id {0} in symbol set")]
    DuplicateSymbolId(u32),
    #[error("symbol set ({got}) cannot fill one window ({need} slots)")]
    SymbolSetTooSmall { got: usize, need: usize },
    #[error("{0} must be positive")]
    NonPositive(&'static str),
    #[error("stop condition targets symbol id {0}, which is not in the symbol set")]
    UnknownTargetSymbol(u32),
}

/// Machine setup: reel geometry, animation tuning and the symbol set.
///
/// Each reel gets its own shuffled permutation of `symbols` as its supply, so
/// `symbols.len()` is also the supply length per reel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotConfig {
    /// Number of reels (columns)
    pub reel_count: usize,
    /// Symbols shown per reel; the window carries 2 extra buffer slots
    pub visible_rows: usize,
    /// Screen height of one symbol row
    pub row_height: f32,
    /// Downward scroll speed while spinning (screen units / second)
    pub spin_speed: f32,
    /// Magnitude of the start/end nudge animation (screen units)
    pub nudge_magnitude: f32,
    /// Delay between consecutive reel starts (seconds)
    pub stagger_step: f32,
    /// Pause after a winning spin while highlights play (seconds)
    pub win_settle_secs: f32,
    /// Reels that must hold a symbol for an any-row win
    pub match_threshold: usize,
    /// One full symbol set; ids must be unique
    pub symbols: Vec<Symbol>,
}

impl Default for SlotConfig {
    fn default() -> Self {
        Self {
            reel_count: 3,
            visible_rows: 3,
            row_height: DEFAULT_ROW_HEIGHT,
            spin_speed: DEFAULT_SPIN_SPEED,
            nudge_magnitude: DEFAULT_NUDGE_MAGNITUDE,
            stagger_step: DEFAULT_STAGGER_STEP,
            win_settle_secs: DEFAULT_WIN_SETTLE,
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            symbols: (0..8).map(Symbol::new).collect(),
        }
    }
}

impl SlotConfig {
    /// Window slots per reel: all visible rows plus one buffer above and below
    pub fn window_size(&self) -> usize {
        self.visible_rows + 2
    }

    /// Total screen height of the visible part of a reel
    pub fn window_height(&self) -> f32 {
        self.visible_rows as f32 * self.row_height
    }

    /// Reject malformed configuration before any reel is built
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.reel_count == 0 {
            return Err(ConfigError::NoReels);
        }
        if self.visible_rows < 1 {
            return Err(ConfigError::NoVisibleRows(self.visible_rows));
        }
        if self.symbols.is_empty() {
            return Err(ConfigError::EmptySymbolSet);
        }
        // The window is filled straight from the supply at setup, so the
        // supply must cover at least one full window
        if self.symbols.len() < self.window_size() {
            return Err(ConfigError::SymbolSetTooSmall {
                got: self.symbols.len(),
                need: self.window_size(),
            });
        }
        if self.row_height <= 0.0 {
            return Err(ConfigError::NonPositive("row_height"));
        }
        if self.spin_speed <= 0.0 {
            return Err(ConfigError::NonPositive("spin_speed"));
        }
        if self.stagger_step < 0.0 {
            return Err(ConfigError::NonPositive("stagger_step"));
        }
        let mut seen = Vec::with_capacity(self.symbols.len());
        for s in &self.symbols {
            if seen.contains(&s.id) {
                return Err(ConfigError::DuplicateSymbolId(s.id));
            }
            seen.push(s.id);
        }
        Ok(())
    }

    /// True if the symbol set carries `id`
    pub fn has_symbol(&self, id: u32) -> bool {
        self.symbols.iter().any(|s| s.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(SlotConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_rejects_empty_symbol_set() {
        let cfg = SlotConfig {
            symbols: vec![],
            ..Default::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::EmptySymbolSet));
    }

    #[test]
    fn test_rejects_zero_rows_and_reels() {
        let cfg = SlotConfig {
            visible_rows: 0,
            ..Default::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::NoVisibleRows(0)));

        let cfg = SlotConfig {
            reel_count: 0,
            ..Default::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::NoReels));
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let mut cfg = SlotConfig::default();
        cfg.symbols.push(Symbol::new(0));
        assert_eq!(cfg.validate(), Err(ConfigError::DuplicateSymbolId(0)));
    }

    #[test]
    fn test_window_size_is_visible_plus_buffers() {
        let cfg = SlotConfig::default();
        assert_eq!(cfg.window_size(), cfg.visible_rows + 2);
    }
}
