use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{BeatmapId, BoardError, Cell, Grid, BOARD_SIZE};

/// Records that the panels of two beatmaps exchanged their cells.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapRecord {
    pub source: BeatmapId,
    pub target: BeatmapId,
    pub sequence: u64,
}

/// All swaps applied to a board, in order.
///
/// The current layout is the configured layout with all of these swaps applied
/// in order, see [`SwapTable::replay()`].
#[derive(Clone, Debug, Default)]
pub struct SwapTable {
    records: Vec<SwapRecord>,
    next_sequence: u64,
}

impl SwapTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exchanges the cells of the panels currently holding `source` and `target`.
    ///
    /// Swapping a beatmap with itself changes nothing and is not recorded.
    /// Fails if either beatmap has no panel on the board, in which case nothing is changed.
    pub fn swap(
        &mut self,
        grid: &mut Grid,
        source: BeatmapId,
        target: BeatmapId,
    ) -> Result<Option<SwapRecord>, BoardError> {
        let source_idx = grid
            .panel_idx(source)
            .ok_or(BoardError::SwapTargetNotFound { beatmap_id: source })?;
        let target_idx = grid
            .panel_idx(target)
            .ok_or(BoardError::SwapTargetNotFound { beatmap_id: target })?;
        if source_idx == target_idx {
            return Ok(None);
        }
        grid.exchange(source_idx, target_idx);
        let record = SwapRecord {
            source,
            target,
            sequence: self.next_sequence,
        };
        self.next_sequence += 1;
        self.records.push(record);
        trace!(%source, %target, "Swapped panels");
        Ok(Some(record))
    }

    /// Rearranges the board so that `layout[(row - 1) * 4 + (column - 1)]`
    /// ends up on `(column, row)`.
    ///
    /// The rearrangement is performed and recorded as a series of swaps. Every
    /// listed beatmap must currently be on the board, each exactly once, and every
    /// cell of the board must be occupied.
    ///
    /// Returns the number of swaps that were needed. Nothing is changed on error.
    pub fn define_board(
        &mut self,
        grid: &mut Grid,
        layout: &[BeatmapId],
    ) -> Result<usize, BoardError> {
        let num_cells = usize::from(BOARD_SIZE) * usize::from(BOARD_SIZE);
        if layout.len() != num_cells {
            return Err(BoardError::InvalidBoardDefinition {
                reason: "the layout must list exactly 16 beatmaps",
            });
        }
        for (idx, beatmap_id) in layout.iter().enumerate() {
            if layout[..idx].contains(beatmap_id) {
                return Err(BoardError::InvalidBoardDefinition {
                    reason: "a beatmap is listed more than once",
                });
            }
            if grid.panel_idx(*beatmap_id).is_none() {
                return Err(BoardError::SwapTargetNotFound {
                    beatmap_id: *beatmap_id,
                });
            }
        }
        if Cell::all().any(|cell| grid.panel_at(cell).is_none()) {
            return Err(BoardError::InvalidBoardDefinition {
                reason: "not every cell of the board holds a beatmap",
            });
        }

        // Selection sort: each swap puts one beatmap into its final cell and
        // never touches cells that were already filled.
        let mut num_swaps = 0;
        for (cell, &wanted) in Cell::all().zip(layout) {
            // Checked above that every cell is occupied
            let Some(current) = grid.panel_at(cell).map(|panel| panel.beatmap_id) else {
                continue;
            };
            if current != wanted {
                self.swap(grid, wanted, current)?;
                num_swaps += 1;
            }
        }
        Ok(num_swaps)
    }

    /// Moves every panel to its configured cell and applies all recorded swaps again.
    pub fn replay(&self, grid: &mut Grid) -> Result<(), BoardError> {
        grid.restore_seed_layout();
        for record in &self.records {
            let source_idx = grid
                .panel_idx(record.source)
                .ok_or(BoardError::SwapTargetNotFound {
                    beatmap_id: record.source,
                })?;
            let target_idx = grid
                .panel_idx(record.target)
                .ok_or(BoardError::SwapTargetNotFound {
                    beatmap_id: record.target,
                })?;
            grid.exchange(source_idx, target_idx);
        }
        Ok(())
    }

    /// Forgets all swaps and moves every panel back to its configured cell.
    pub fn clear(&mut self, grid: &mut Grid) {
        self.records.clear();
        grid.restore_seed_layout();
    }

    pub fn records(&self) -> &[SwapRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use quickcheck::quickcheck;

    use super::*;
    use crate::arbitrary::{full_board_slots, BeatmapPairs};

    fn full_grid() -> Grid {
        Grid::new(full_board_slots()).unwrap()
    }

    quickcheck! {
        fn swap_twice_is_identity(pairs: BeatmapPairs) -> bool {
            let mut grid = full_grid();
            let mut table = SwapTable::new();
            for &(a, b) in &pairs.0 {
                table.swap(&mut grid, a, b).unwrap();
            }
            let before = grid.current_layout();
            let Some(&(a, b)) = pairs.0.first() else {
                return true;
            };
            table.swap(&mut grid, a, b).unwrap();
            table.swap(&mut grid, a, b).unwrap();
            grid.current_layout() == before
        }

        fn replay_reproduces_layout(pairs: BeatmapPairs) -> bool {
            let mut grid = full_grid();
            let mut table = SwapTable::new();
            for &(a, b) in &pairs.0 {
                table.swap(&mut grid, a, b).unwrap();
            }
            let live = grid.current_layout();
            let mut rebuilt = full_grid();
            table.replay(&mut rebuilt).unwrap();
            rebuilt.current_layout() == live
        }

        fn define_board_reaches_layout(pairs: BeatmapPairs) -> bool {
            // Build some permutation of the board, then ask for it from the seed layout
            let mut scrambled = full_grid();
            let mut scratch = SwapTable::new();
            for &(a, b) in &pairs.0 {
                scratch.swap(&mut scrambled, a, b).unwrap();
            }
            let wanted: Vec<BeatmapId> = scrambled.current_layout().into_iter().map(|(id, _)| id).collect();

            let mut grid = full_grid();
            let mut table = SwapTable::new();
            let num_swaps = table.define_board(&mut grid, &wanted).unwrap();
            num_swaps == table.records().len() && grid.current_layout() == scrambled.current_layout()
        }
    }

    #[test]
    fn swap_moves_beatmaps_between_cells() {
        let mut grid = full_grid();
        let mut table = SwapTable::new();
        let a = grid.beatmap_at(Cell::new(1, 1)).unwrap().beatmap_id;
        let b = grid.beatmap_at(Cell::new(4, 4)).unwrap().beatmap_id;
        let record = table.swap(&mut grid, a, b).unwrap().unwrap();
        assert_eq!((record.source, record.target), (a, b));
        assert_eq!(grid.beatmap_at(Cell::new(1, 1)).unwrap().beatmap_id, b);
        assert_eq!(grid.beatmap_at(Cell::new(4, 4)).unwrap().beatmap_id, a);
        // The configured position stays the same
        assert_eq!(
            grid.slot_for_beatmap(a).unwrap().board_position,
            Some(Cell::new(1, 1))
        );
    }

    #[test]
    fn swap_with_unknown_beatmap_fails() {
        let mut grid = full_grid();
        let mut table = SwapTable::new();
        let a = grid.beatmap_at(Cell::new(1, 1)).unwrap().beatmap_id;
        let before = grid.current_layout();
        assert_eq!(
            table.swap(&mut grid, a, BeatmapId(9999)),
            Err(BoardError::SwapTargetNotFound {
                beatmap_id: BeatmapId(9999)
            })
        );
        assert_eq!(grid.current_layout(), before);
        assert!(table.is_empty());
    }

    #[test]
    fn self_swap_is_not_recorded() {
        let mut grid = full_grid();
        let mut table = SwapTable::new();
        let a = grid.beatmap_at(Cell::new(2, 3)).unwrap().beatmap_id;
        assert_eq!(table.swap(&mut grid, a, a), Ok(None));
        assert!(table.is_empty());
    }

    #[test]
    fn define_board_rejects_bad_layouts() {
        let mut grid = full_grid();
        let mut table = SwapTable::new();
        let mut layout: Vec<BeatmapId> = grid.current_layout().into_iter().map(|(id, _)| id).collect();
        assert!(matches!(
            table.define_board(&mut grid, &layout[..15]),
            Err(BoardError::InvalidBoardDefinition { .. })
        ));
        layout[3] = layout[0];
        assert!(matches!(
            table.define_board(&mut grid, &layout),
            Err(BoardError::InvalidBoardDefinition { .. })
        ));
        assert!(table.is_empty());
    }
}
