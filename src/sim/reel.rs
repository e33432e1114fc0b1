//! Single reel spin state machine
//!
//! A reel owns a fixed circular window of slots and a cycling symbol supply,
//! and walks Idle -> StartEasing -> Spinning -> EndEasing -> Idle once per
//! spin. It is advanced explicitly with `advance(dt, rng)` each tick; there
//! is no frame loop or callback chaining inside.

use rand::Rng;

use super::state::{ReelState, ReelWindow, SpinResult, StopCondition, StopKind, SymbolSupply};
use super::tween::{EaseFn, Tween, ease_out_back};
use crate::consts::{NUDGE_DURATION, RECYCLE_SLACK};

/// Spin request waiting out its stagger delay; not one of the four states
#[derive(Debug, Clone)]
struct PendingSpin {
    delay: f32,
    condition: StopCondition,
    speed: f32,
    nudge_magnitude: f32,
    /// Total spin time, jitter already applied at request time
    duration: f32,
}

/// One vertically scrolling column of symbols
#[derive(Debug, Clone)]
pub struct Reel {
    index: usize,
    visible_rows: usize,
    row_height: f32,
    window: ReelWindow,
    supply: SymbolSupply,
    state: ReelState,
    pending: Option<PendingSpin>,
    /// Granted by the orchestrator once the reel to the left has stopped
    may_stop: bool,
    condition: StopCondition,
    speed: f32,
    nudge_magnitude: f32,
    /// Spin time left before the stop condition applies
    remaining: f32,
    nudge: Tween,
    start_ease: EaseFn,
    end_ease: EaseFn,
}

impl Reel {
    /// Build a reel at column `reel_x`. The first `visible_rows + 2` symbols
    /// of the supply fill the window; the supply cursor starts just past
    /// them, so the scroll continues the permutation seamlessly.
    pub fn new(
        index: usize,
        mut supply: SymbolSupply,
        reel_x: f32,
        visible_rows: usize,
        row_height: f32,
    ) -> Self {
        let window = ReelWindow::new(supply.order(), reel_x, visible_rows, row_height);
        supply.advance_by(visible_rows + 2);
        Self {
            index,
            visible_rows,
            row_height,
            window,
            supply,
            state: ReelState::Idle,
            pending: None,
            may_stop: false,
            condition: StopCondition::duration(0.0, 0.0),
            speed: 0.0,
            nudge_magnitude: 0.0,
            remaining: 0.0,
            nudge: Tween::start(0.0, 0.0, 0.0, ease_out_back),
            start_ease: ease_out_back,
            end_ease: ease_out_back,
        }
    }

    /// Swap the stock nudge easings for caller-supplied curves
    pub fn set_easing(&mut self, start: EaseFn, end: EaseFn) {
        self.start_ease = start;
        self.end_ease = end;
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn state(&self) -> ReelState {
        self.state
    }

    /// Idle with no spin scheduled
    pub fn is_at_rest(&self) -> bool {
        self.state == ReelState::Idle && self.pending.is_none()
    }

    /// The window, top-to-bottom, for the presentation layer
    pub fn window(&self) -> &ReelWindow {
        &self.window
    }

    /// Symbol ids in the visible rows, top-to-bottom
    pub fn visible_symbol_ids(&self) -> Vec<u32> {
        (0..self.visible_rows)
            .map(|row| self.window.slot(1 + row).symbol.id)
            .collect()
    }

    /// Window index of the exact middle visible slot
    fn middle_slot(&self) -> usize {
        1 + self.visible_rows / 2
    }

    /// Request a spin after `delay` seconds. Ignored (returns false) unless
    /// the reel is at rest; re-entrant requests are legal no-ops.
    pub fn spin<R: Rng>(
        &mut self,
        condition: StopCondition,
        delay: f32,
        speed: f32,
        nudge_magnitude: f32,
        rng: &mut R,
    ) -> bool {
        if !self.is_at_rest() {
            return false;
        }
        let jitter = if condition.extra_random_duration > 0.0 {
            rng.random_range(0.0..condition.extra_random_duration)
        } else {
            0.0
        };
        self.may_stop = false;
        self.pending = Some(PendingSpin {
            delay,
            condition,
            speed,
            nudge_magnitude,
            duration: condition.min_duration + jitter,
        });
        true
    }

    /// Allow this reel to evaluate its stop condition. Harmless when already
    /// stopped or idle.
    pub fn grant_stop(&mut self) {
        self.may_stop = true;
    }

    /// Mark or clear win highlights on the visible rows
    pub fn set_highlights(&mut self, mask: &[bool]) {
        for row in 0..self.visible_rows {
            self.window.slot_mut(1 + row).highlighted = mask.get(row).copied().unwrap_or(false);
        }
    }

    pub fn clear_highlights(&mut self) {
        for i in 0..self.window.len() {
            self.window.slot_mut(i).highlighted = false;
        }
    }

    /// Advance the reel by one tick. Returns the spin result on the tick the
    /// reel settles back to Idle, exactly once per spin.
    pub fn advance<R: Rng>(&mut self, dt: f32, rng: &mut R) -> Option<SpinResult> {
        if let Some(pending) = &mut self.pending {
            pending.delay -= dt;
            if pending.delay > 0.0 {
                return None;
            }
            let pending = self.pending.take().unwrap();
            self.begin_start_easing(pending);
            return None;
        }

        match self.state {
            ReelState::Idle => None,
            ReelState::StartEasing => {
                let done = self.nudge.advance(dt);
                self.apply_nudge();
                if done {
                    log::debug!("reel {} spinning", self.index);
                    self.state = ReelState::Spinning;
                }
                None
            }
            ReelState::Spinning => {
                self.update_spinning(dt, rng);
                None
            }
            ReelState::EndEasing => {
                let done = self.nudge.advance(dt);
                self.apply_nudge();
                if done {
                    self.state = ReelState::Idle;
                    let result = SpinResult {
                        reel_index: self.index,
                        visible_symbol_ids: self.visible_symbol_ids(),
                    };
                    log::debug!("reel {} stopped: {:?}", self.index, result.visible_symbol_ids);
                    return Some(result);
                }
                None
            }
        }
    }

    fn begin_start_easing(&mut self, pending: PendingSpin) {
        self.condition = pending.condition;
        self.speed = pending.speed;
        self.nudge_magnitude = pending.nudge_magnitude;
        self.remaining = pending.duration;
        self.shift_and_cache(0.0);
        self.nudge = Tween::start(0.0, self.nudge_magnitude, NUDGE_DURATION, self.start_ease);
        self.state = ReelState::StartEasing;
        log::debug!("reel {} kick-off, spin time {:.2}s", self.index, self.remaining);
    }

    /// Shift every slot down by `offset` and cache the result as the nudge
    /// base position
    fn shift_and_cache(&mut self, offset: f32) {
        for i in 0..self.window.len() {
            let slot = self.window.slot_mut(i);
            slot.pos.y -= offset;
            slot.prior_y = slot.pos.y;
        }
    }

    /// While easing, every slot's Y is its cached base plus the tween value
    fn apply_nudge(&mut self) {
        let offset = self.nudge.value();
        for i in 0..self.window.len() {
            let slot = self.window.slot_mut(i);
            slot.pos.y = slot.prior_y + offset;
        }
    }

    fn update_spinning<R: Rng>(&mut self, dt: f32, rng: &mut R) {
        for i in 0..self.window.len() {
            self.window.slot_mut(i).pos.y -= self.speed * dt;
        }

        // Once the bottom slot has dropped past the recycle line by more
        // than the slack, rotate it back to the top with the next symbol
        // from the supply. Loop in case a large dt scrolled more than one
        // row.
        let window_height = self.visible_rows as f32 * self.row_height;
        let recycle_line = -(window_height / 2.0 + self.row_height / 2.0);
        while self.window.slot(self.window.len() - 1).pos.y < recycle_line - RECYCLE_SLACK {
            let symbol = self.supply.next_symbol();
            self.window.recycle_bottom(symbol, self.row_height);
        }

        self.remaining -= dt;
        if self.remaining > 0.0 || !self.may_stop {
            return;
        }

        let stop = match self.condition.kind {
            StopKind::Duration => true,
            StopKind::MiddleRow => {
                self.window.slot(self.middle_slot()).symbol.id == self.condition.target_symbol_id
            }
            StopKind::RandomVisibleRow => {
                // Probe one random visible row, re-rolled every tick; the
                // re-roll is part of the payout odds, do not fix it per spin
                let row = rng.random_range(0..self.visible_rows);
                self.window.slot(1 + row).symbol.id == self.condition.target_symbol_id
            }
        };

        if stop {
            self.begin_end_easing();
        }
    }

    fn begin_end_easing(&mut self) {
        // Snap the middle slot onto the row grid before the settle nudge so
        // the reel comes to rest aligned
        let middle_y = self.window.slot(self.middle_slot()).pos.y;
        self.shift_and_cache(middle_y);
        self.nudge = Tween::start(0.0, -self.nudge_magnitude, NUDGE_DURATION, self.end_ease);
        self.state = ReelState::EndEasing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::state::Symbol;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn test_reel(index: usize) -> Reel {
        let supply = SymbolSupply::new((0..8).map(Symbol::new).collect());
        Reel::new(index, supply, 0.0, 3, 100.0)
    }

    fn run_to_rest(reel: &mut Reel, rng: &mut Pcg32, max_ticks: usize) -> Option<SpinResult> {
        for _ in 0..max_ticks {
            if let Some(result) = reel.advance(SIM_DT, rng) {
                return Some(result);
            }
        }
        None
    }

    #[test]
    fn test_full_spin_cycle_emits_one_result() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut reel = test_reel(0);
        assert!(reel.spin(StopCondition::duration(0.5, 0.0), 0.0, 600.0, 30.0, &mut rng));
        reel.grant_stop();

        let result = run_to_rest(&mut reel, &mut rng, 10_000).expect("reel never stopped");
        assert_eq!(result.reel_index, 0);
        assert_eq!(result.visible_symbol_ids.len(), 3);
        assert_eq!(reel.state(), ReelState::Idle);

        // No further results without a new spin
        for _ in 0..100 {
            assert!(reel.advance(SIM_DT, &mut rng).is_none());
        }
    }

    #[test]
    fn test_spin_while_busy_is_ignored() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut reel = test_reel(0);
        assert!(reel.spin(StopCondition::duration(1.0, 0.0), 0.0, 600.0, 30.0, &mut rng));
        // Still pending its delay counts as busy too
        assert!(!reel.spin(StopCondition::duration(1.0, 0.0), 0.0, 600.0, 30.0, &mut rng));
        reel.advance(SIM_DT, &mut rng);
        assert!(!reel.spin(StopCondition::duration(1.0, 0.0), 0.0, 600.0, 30.0, &mut rng));
    }

    #[test]
    fn test_does_not_stop_without_permission() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut reel = test_reel(1);
        reel.spin(StopCondition::duration(0.2, 0.0), 0.0, 600.0, 30.0, &mut rng);

        // Far past the spin duration, still spinning: no grant yet
        for _ in 0..600 {
            assert!(reel.advance(SIM_DT, &mut rng).is_none());
        }
        assert_eq!(reel.state(), ReelState::Spinning);

        reel.grant_stop();
        let result = run_to_rest(&mut reel, &mut rng, 10_000);
        assert!(result.is_some());
    }

    #[test]
    fn test_window_size_constant_across_recycles() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut reel = test_reel(0);
        let size = reel.window().len();
        reel.spin(StopCondition::duration(2.0, 0.0), 0.0, 900.0, 30.0, &mut rng);
        reel.grant_stop();
        for _ in 0..5_000 {
            reel.advance(SIM_DT, &mut rng);
            assert_eq!(reel.window().len(), size);
            if reel.state() == ReelState::Idle && reel.is_at_rest() {
                break;
            }
        }
    }

    #[test]
    fn test_middle_row_condition_lands_target_in_middle() {
        let mut rng = Pcg32::seed_from_u64(21);
        let mut reel = test_reel(0);
        let target = 5;
        reel.spin(
            StopCondition::middle_row(0.3, 0.0, target),
            0.0,
            600.0,
            30.0,
            &mut rng,
        );
        reel.grant_stop();
        let result = run_to_rest(&mut reel, &mut rng, 50_000).expect("target never reached middle");
        assert_eq!(result.visible_symbol_ids[1], target);
    }

    #[test]
    fn test_stagger_delay_defers_takeoff() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut reel = test_reel(2);
        reel.spin(StopCondition::duration(0.5, 0.0), 0.25, 600.0, 30.0, &mut rng);

        // Half the delay: still idle
        for _ in 0..7 {
            reel.advance(SIM_DT, &mut rng);
            assert_eq!(reel.state(), ReelState::Idle);
        }
        // Past the delay: kick-off begins
        for _ in 0..10 {
            reel.advance(SIM_DT, &mut rng);
        }
        assert_eq!(reel.state(), ReelState::StartEasing);
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(32))]

            /// Every completed spin reports exactly `visible_rows` symbols
            #[test]
            fn prop_result_len_matches_visible_rows(
                visible_rows in 1usize..6,
                seed in 0u64..1_000,
            ) {
                let supply = SymbolSupply::new((0..8).map(Symbol::new).collect());
                let mut reel = Reel::new(0, supply, 0.0, visible_rows, 100.0);
                let mut rng = Pcg32::seed_from_u64(seed);
                reel.spin(StopCondition::duration(0.3, 0.2), 0.0, 600.0, 30.0, &mut rng);
                reel.grant_stop();

                let mut result = None;
                for _ in 0..20_000 {
                    if let Some(r) = reel.advance(SIM_DT, &mut rng) {
                        result = Some(r);
                        break;
                    }
                }
                let result = result.expect("spin never completed");
                prop_assert_eq!(result.visible_symbol_ids.len(), visible_rows);
            }
        }
    }

    #[test]
    fn test_recycle_follows_supply_permutation() {
        let mut rng = Pcg32::seed_from_u64(17);
        let mut reel = test_reel(0);
        // Window took ids 0..=4, so the first recycled symbol must be id 5
        reel.spin(StopCondition::duration(5.0, 0.0), 0.0, 900.0, 30.0, &mut rng);
        reel.grant_stop();
        for _ in 0..10_000 {
            reel.advance(SIM_DT, &mut rng);
            if reel.window().slot(0).symbol.id != 0 {
                break;
            }
        }
        assert_eq!(reel.window().slot(0).symbol.id, 5);
    }
}
