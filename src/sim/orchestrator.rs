//! Reel orchestration and stop sequencing
//!
//! Owns the reels, starts coordinated spins with staggered delays, enforces
//! the left-to-right stop cascade, and hands the final grid to the payline
//! evaluator. Everything runs synchronously inside `tick(dt)`, in reel-index
//! order; waiting is modeled with deferred timers, never a blocking sleep.

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_pcg::Pcg32;

use super::payline::PaylineEvaluator;
use super::reel::Reel;
use super::state::{ReelState, SimEvent, StopCondition, StopKind};
use crate::config::{ConfigError, SlotConfig};

/// Work scheduled for a later tick
#[derive(Debug, Clone, Copy, PartialEq)]
enum DeferredAction {
    /// End of the post-win settle pause: revert highlights, re-enable spins
    ClearHighlights,
}

#[derive(Debug, Clone)]
struct DeferredTimer {
    remaining: f32,
    action: DeferredAction,
}

/// The machine: a fixed set of reels plus the spin/stop bookkeeping
pub struct Orchestrator {
    config: SlotConfig,
    reels: Vec<Reel>,
    evaluator: PaylineEvaluator,
    rng: Pcg32,
    /// Result grid for the spin in flight; exactly one entry per reel index
    /// by the time evaluation runs
    grid: Vec<Option<Vec<u32>>>,
    /// Grid of the immediately previous completed spin
    previous_grid: Option<Vec<Vec<u32>>>,
    timers: Vec<DeferredTimer>,
    /// True while a win highlight plays; new spins are suppressed
    settling: bool,
    events: Vec<SimEvent>,
}

impl Orchestrator {
    /// Build the machine. Each reel gets an independently shuffled
    /// permutation of the configured symbol set; all randomness flows from
    /// `seed`, so equal seeds replay identically.
    pub fn new(config: SlotConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = Pcg32::seed_from_u64(seed);

        let half_span = (config.reel_count as f32 - 1.0) / 2.0;
        let reels = (0..config.reel_count)
            .map(|i| {
                let mut symbols = config.symbols.clone();
                symbols.shuffle(&mut rng);
                // Columns centered on x = 0, one row-width apart
                let reel_x = (i as f32 - half_span) * config.row_height;
                Reel::new(
                    i,
                    super::state::SymbolSupply::new(symbols),
                    reel_x,
                    config.visible_rows,
                    config.row_height,
                )
            })
            .collect();

        let evaluator = PaylineEvaluator::new(config.visible_rows, config.match_threshold);
        let grid = vec![None; config.reel_count];
        Ok(Self {
            config,
            reels,
            evaluator,
            rng,
            grid,
            previous_grid: None,
            timers: Vec::new(),
            settling: false,
            events: Vec::new(),
        })
    }

    pub fn config(&self) -> &SlotConfig {
        &self.config
    }

    pub fn reels(&self) -> &[Reel] {
        &self.reels
    }

    /// Grid of the previous completed spin, if any
    pub fn previous_grid(&self) -> Option<&[Vec<u32>]> {
        self.previous_grid.as_deref()
    }

    /// True while a win highlight plays and spin requests are suppressed
    pub fn is_settling(&self) -> bool {
        self.settling
    }

    /// A spin cycle is in flight (or settling) and `spin_all` would be a no-op
    pub fn is_busy(&self) -> bool {
        self.settling || self.reels.iter().any(|r| !r.is_at_rest())
    }

    /// Start a coordinated spin of every reel, left to right with staggered
    /// delays. Globally exclusive: returns `Ok(false)` without touching any
    /// state while a cycle is in flight. A stop condition targeting a symbol
    /// the machine does not carry is rejected up front - it would spin
    /// forever.
    pub fn spin_all(&mut self, condition: StopCondition) -> Result<bool, ConfigError> {
        if condition.kind != StopKind::Duration && !self.config.has_symbol(condition.target_symbol_id)
        {
            return Err(ConfigError::UnknownTargetSymbol(condition.target_symbol_id));
        }
        if self.is_busy() {
            return Ok(false);
        }

        self.grid.fill(None);
        for i in 0..self.reels.len() {
            let delay = i as f32 * self.config.stagger_step;
            self.reels[i].spin(
                condition,
                delay,
                self.config.spin_speed,
                self.config.nudge_magnitude,
                &mut self.rng,
            );
        }
        // Reel 0 answers to no one; its settling unlocks reel 1
        self.reels[0].grant_stop();
        log::info!("spin started ({:?})", condition.kind);
        Ok(true)
    }

    /// Advance the whole machine by one tick: timers first, then every reel
    /// in index order
    pub fn tick(&mut self, dt: f32) {
        self.run_timers(dt);

        for i in 0..self.reels.len() {
            let was_idle = self.reels[i].state() == ReelState::Idle;
            let result = self.reels[i].advance(dt, &mut self.rng);

            if was_idle && self.reels[i].state() == ReelState::StartEasing {
                self.events.push(SimEvent::ReelStarted { reel: i });
            }

            if let Some(result) = result {
                self.events.push(SimEvent::ReelStopped {
                    reel: i,
                    symbols: result.visible_symbol_ids.clone(),
                });
                self.grid[i] = Some(result.visible_symbol_ids);
                if i + 1 < self.reels.len() {
                    self.reels[i + 1].grant_stop();
                }
                if self.grid.iter().all(|g| g.is_some()) {
                    self.evaluate_spin();
                }
            }
        }
    }

    /// Events accumulated since the last drain, in occurrence order
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    fn run_timers(&mut self, dt: f32) {
        let mut due = Vec::new();
        self.timers.retain_mut(|timer| {
            timer.remaining -= dt;
            if timer.remaining <= 0.0 {
                due.push(timer.action);
                false
            } else {
                true
            }
        });
        for action in due {
            match action {
                DeferredAction::ClearHighlights => {
                    for reel in &mut self.reels {
                        reel.clear_highlights();
                    }
                    self.settling = false;
                    self.events.push(SimEvent::HighlightsCleared);
                }
            }
        }
    }

    /// All reels reported: run the paylines, apply highlights on a win and
    /// hold further spins for the settle pause
    fn evaluate_spin(&mut self) {
        let grid: Vec<Vec<u32>> = self.grid.iter().flatten().cloned().collect();
        let result = self.evaluator.evaluate(&grid);
        log::info!(
            "spin settled: {} {:?}",
            if result.won { "WIN" } else { "no win" },
            grid
        );

        if result.won {
            for (reel, mask) in self.reels.iter_mut().zip(&result.highlight) {
                reel.set_highlights(mask);
            }
            self.settling = true;
            self.timers.push(DeferredTimer {
                remaining: self.config.win_settle_secs,
                action: DeferredAction::ClearHighlights,
            });
        }

        self.previous_grid = Some(grid);
        self.events.push(SimEvent::Evaluated { result });
    }
}
