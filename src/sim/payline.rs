//! Payline evaluation
//!
//! Pure rules over the final symbol grid. Two paylines, checked in order:
//! the middle row across all reels, then 3-of-a-kind anywhere across reels.

use super::state::PaylineResult;

/// Decides win/lose and which cells to highlight
#[derive(Debug, Clone)]
pub struct PaylineEvaluator {
    visible_rows: usize,
    /// Reels that must hold a symbol for the any-row rule to pay out
    match_threshold: usize,
}

impl PaylineEvaluator {
    pub fn new(visible_rows: usize, match_threshold: usize) -> Self {
        Self {
            visible_rows,
            match_threshold,
        }
    }

    /// Evaluate the grid: one inner sequence of visible symbol ids per reel,
    /// top-to-bottom
    pub fn evaluate(&self, grid: &[Vec<u32>]) -> PaylineResult {
        if let Some(result) = self.check_middle_row(grid) {
            return result;
        }
        if let Some(result) = self.check_any_row(grid) {
            return result;
        }
        PaylineResult::lost(grid.len(), self.visible_rows)
    }

    /// Win iff every reel carries the same id in its middle visible row;
    /// highlights the middle cell of every reel
    fn check_middle_row(&self, grid: &[Vec<u32>]) -> Option<PaylineResult> {
        let middle = self.visible_rows / 2;
        let first = grid.first()?.get(middle)?;
        if !grid.iter().all(|reel| reel.get(middle) == Some(first)) {
            return None;
        }
        let mut result = PaylineResult::lost(grid.len(), self.visible_rows);
        result.won = true;
        for mask in &mut result.highlight {
            mask[middle] = true;
        }
        Some(result)
    }

    /// Win iff some id from reel 0 appears anywhere in at least
    /// `match_threshold` reels (reel 0 included); highlights every cell
    /// holding a winning id, in every reel
    fn check_any_row(&self, grid: &[Vec<u32>]) -> Option<PaylineResult> {
        let first_reel = grid.first()?;
        let mut result = PaylineResult::lost(grid.len(), self.visible_rows);

        for (row, &id) in first_reel.iter().enumerate() {
            // Skip ids already handled via an earlier row of reel 0
            if first_reel[..row].contains(&id) {
                continue;
            }
            let reels_holding = grid
                .iter()
                .filter(|reel| reel.contains(&id))
                .count();
            if reels_holding < self.match_threshold {
                continue;
            }
            result.won = true;
            for (reel, mask) in grid.iter().zip(&mut result.highlight) {
                for (cell, flag) in reel.iter().zip(mask.iter_mut()) {
                    if *cell == id {
                        *flag = true;
                    }
                }
            }
        }

        result.won.then_some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evaluator() -> PaylineEvaluator {
        PaylineEvaluator::new(3, 3)
    }

    #[test]
    fn test_middle_row_win_highlights_middle_cells() {
        let grid = vec![vec![1, 7, 2], vec![9, 7, 3], vec![4, 7, 5]];
        let result = evaluator().evaluate(&grid);
        assert!(result.won);
        for mask in &result.highlight {
            assert_eq!(mask, &vec![false, true, false]);
        }
    }

    #[test]
    fn test_no_shared_symbols_loses() {
        let grid = vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 9]];
        let result = evaluator().evaluate(&grid);
        assert!(!result.won);
        for mask in &result.highlight {
            assert!(mask.iter().all(|&cell| !cell));
        }
    }

    #[test]
    fn test_any_row_three_of_a_kind_highlights_every_cell() {
        // Id 5 appears somewhere in all three reels
        let grid = vec![vec![5, 1, 2], vec![3, 4, 5], vec![6, 5, 7]];
        let result = evaluator().evaluate(&grid);
        assert!(result.won);
        assert_eq!(result.highlight[0], vec![true, false, false]);
        assert_eq!(result.highlight[1], vec![false, false, true]);
        assert_eq!(result.highlight[2], vec![false, true, false]);
    }

    #[test]
    fn test_any_row_below_threshold_loses() {
        // Id 5 in only two of three reels
        let grid = vec![vec![5, 1, 2], vec![3, 4, 5], vec![6, 8, 7]];
        let result = evaluator().evaluate(&grid);
        assert!(!result.won);
    }

    #[test]
    fn test_middle_row_takes_precedence_over_any_row() {
        // Middle row all 7s; id 7 also scattered elsewhere, but only the
        // middle line is highlighted
        let grid = vec![vec![7, 7, 2], vec![9, 7, 7], vec![4, 7, 5]];
        let result = evaluator().evaluate(&grid);
        assert!(result.won);
        for mask in &result.highlight {
            assert!(mask[1]);
        }
        assert!(!result.highlight[0][0]);
        assert!(!result.highlight[1][2]);
    }

    #[test]
    fn test_multiple_winning_ids_union_highlights() {
        // Both 1 and 2 appear in all three reels
        let grid = vec![vec![1, 2, 3], vec![2, 1, 4], vec![1, 5, 2]];
        let result = evaluator().evaluate(&grid);
        assert!(result.won);
        assert_eq!(result.highlight[0], vec![true, true, false]);
        assert_eq!(result.highlight[1], vec![true, true, false]);
        assert_eq!(result.highlight[2], vec![true, false, true]);
    }

    #[test]
    fn test_threshold_is_configurable() {
        // Id 5 in two reels; a 2-of-a-kind table pays out
        let grid = vec![vec![5, 1, 2], vec![3, 4, 5], vec![6, 8, 7]];
        let loose = PaylineEvaluator::new(3, 2);
        assert!(loose.evaluate(&grid).won);
    }
}
