mod cell_set;
mod lines;

use std::collections::HashSet;

pub use cell_set::*;
pub use lines::*;
use serde::{Deserialize, Serialize};

use crate::{BeatmapId, BeatmapSlot, BoardError, SlotId};

pub const BOARD_SIZE: u8 = 4;

/// A cell of the board, with 1-based coordinates.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub column: u8,
    pub row: u8,
}

impl Cell {
    /// Panics if the coordinates are out of bounds, see [`Self::try_new()`] for a fallible version.
    pub const fn new(column: u8, row: u8) -> Self {
        assert!(column >= 1 && column <= BOARD_SIZE && row >= 1 && row <= BOARD_SIZE);
        Self { column, row }
    }

    pub fn try_new(column: u8, row: u8) -> Result<Self, BoardError> {
        if (1..=BOARD_SIZE).contains(&column) && (1..=BOARD_SIZE).contains(&row) {
            Ok(Self { column, row })
        } else {
            Err(BoardError::CellOutOfBounds { column, row })
        }
    }

    /// All cells in row-major order.
    pub fn all() -> impl Iterator<Item = Cell> {
        (1..=BOARD_SIZE).flat_map(|row| (1..=BOARD_SIZE).map(move |column| Cell { column, row }))
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// The current placement of a slot on the board.
///
/// Starts out at the slot's configured position and moves with every swap.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GridPanel {
    pub beatmap_id: BeatmapId,
    pub real: Cell,
    /// Index into the slots of the [`Grid`].
    slot_idx: usize,
}

/// The slots of one round together with their current placement.
#[derive(Clone, Debug)]
pub struct Grid {
    slots: Vec<BeatmapSlot>,
    /// One panel for every slot with a configured board position.
    panels: Vec<GridPanel>,
}

impl Grid {
    /// Creates the board of a round, with every panel at its configured position.
    pub fn new(slots: Vec<BeatmapSlot>) -> Result<Self, BoardError> {
        let mut seen_ids = HashSet::new();
        let mut seen_beatmaps = HashSet::new();
        let mut occupied = CellSet::new();
        let mut panels = Vec::new();
        for (slot_idx, slot) in slots.iter().enumerate() {
            if !seen_ids.insert(slot.id.clone()) {
                return Err(BoardError::DuplicateSlot {
                    slot: slot.id.clone(),
                });
            }
            // Marks are keyed by beatmap, so two slots can't share one
            if !seen_beatmaps.insert(slot.beatmap_id) {
                return Err(BoardError::DuplicateBeatmap {
                    beatmap_id: slot.beatmap_id,
                });
            }
            if let Some(cell) = slot.board_position {
                // Cells built with struct syntax might be out of bounds
                let cell = Cell::try_new(cell.column, cell.row)?;
                if occupied.contains(cell) {
                    return Err(BoardError::OverlappingSlots {
                        column: cell.column,
                        row: cell.row,
                    });
                }
                occupied = occupied.insert(cell);
                panels.push(GridPanel {
                    beatmap_id: slot.beatmap_id,
                    real: cell,
                    slot_idx,
                });
            }
        }
        Ok(Self { slots, panels })
    }

    pub fn slots(&self) -> &[BeatmapSlot] {
        &self.slots
    }

    pub fn panels(&self) -> &[GridPanel] {
        &self.panels
    }

    pub fn slot(&self, id: &SlotId) -> Option<&BeatmapSlot> {
        self.slots.iter().find(|slot| &slot.id == id)
    }

    pub fn slot_for_beatmap(&self, beatmap_id: BeatmapId) -> Option<&BeatmapSlot> {
        self.slots.iter().find(|slot| slot.beatmap_id == beatmap_id)
    }

    /// Looks up the beatmap configured for a slot identifier.
    pub fn resolve(&self, id: &SlotId) -> Result<BeatmapId, BoardError> {
        self.slot(id)
            .map(|slot| slot.beatmap_id)
            .ok_or_else(|| BoardError::UnknownSlot { slot: id.clone() })
    }

    pub fn panel_at(&self, cell: Cell) -> Option<&GridPanel> {
        self.panels.iter().find(|panel| panel.real == cell)
    }

    pub fn panel_for(&self, beatmap_id: BeatmapId) -> Option<&GridPanel> {
        self.panels
            .iter()
            .find(|panel| panel.beatmap_id == beatmap_id)
    }

    /// The slot whose panel currently occupies this cell.
    ///
    /// Tie-breaker slots are never part of lines, so they are skipped.
    pub fn beatmap_at(&self, cell: Cell) -> Option<&BeatmapSlot> {
        self.panel_at(cell)
            .map(|panel| &self.slots[panel.slot_idx])
            .filter(|slot| slot.is_on_board())
    }

    /// The cells holding a line-eligible beatmap for which `pred` holds.
    pub fn cells_where(&self, pred: impl Fn(BeatmapId) -> bool) -> CellSet {
        let mut set = CellSet::new();
        for panel in &self.panels {
            if self.slots[panel.slot_idx].is_on_board() && pred(panel.beatmap_id) {
                set = set.insert(panel.real);
            }
        }
        set
    }

    /// The cells holding a line-eligible beatmap.
    pub fn occupied(&self) -> CellSet {
        self.cells_where(|_| true)
    }

    /// Every panel's beatmap and current cell, in row-major order.
    pub fn current_layout(&self) -> Vec<(BeatmapId, Cell)> {
        let mut layout: Vec<(BeatmapId, Cell)> = self
            .panels
            .iter()
            .map(|panel| (panel.beatmap_id, panel.real))
            .collect();
        layout.sort_by_key(|&(_, cell)| (cell.row, cell.column));
        layout
    }

    /// Exchanges the cells of two panels, given by their indices.
    pub(crate) fn exchange(&mut self, a: usize, b: usize) {
        let cell_a = self.panels[a].real;
        self.panels[a].real = self.panels[b].real;
        self.panels[b].real = cell_a;
    }

    pub(crate) fn panel_idx(&self, beatmap_id: BeatmapId) -> Option<usize> {
        self.panels
            .iter()
            .position(|panel| panel.beatmap_id == beatmap_id)
    }

    /// Moves every panel back to its configured position.
    pub(crate) fn restore_seed_layout(&mut self) {
        for panel in self.panels.iter_mut() {
            if let Some(cell) = self.slots[panel.slot_idx].board_position {
                panel.real = cell;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arbitrary::full_board_slots;
    use crate::slot;

    #[test]
    fn beatmap_lookup_follows_panels() {
        let grid = Grid::new(full_board_slots()).unwrap();
        let slot = grid.beatmap_at(Cell::new(3, 2)).unwrap();
        assert_eq!(slot.board_position, Some(Cell::new(3, 2)));
        assert_eq!(grid.panel_for(slot.beatmap_id).unwrap().real, Cell::new(3, 2));
        assert_eq!(grid.occupied(), CellSet::full());
    }

    #[test]
    fn tie_breaker_is_excluded_from_lines() {
        let mut slots = full_board_slots();
        slots[0].id = slot!("TB");
        let grid = Grid::new(slots).unwrap();
        assert!(grid.beatmap_at(Cell::new(1, 1)).is_none());
        assert!(grid.panel_at(Cell::new(1, 1)).is_some());
        assert_eq!(grid.occupied().len(), 15);
    }

    #[test]
    fn invalid_configurations() {
        let mut slots = full_board_slots();
        slots[1].board_position = slots[0].board_position;
        assert_eq!(
            Grid::new(slots).unwrap_err(),
            BoardError::OverlappingSlots { column: 1, row: 1 }
        );

        let mut slots = full_board_slots();
        slots[1].id = slots[0].id.clone();
        assert!(matches!(
            Grid::new(slots),
            Err(BoardError::DuplicateSlot { .. })
        ));

        let mut slots = full_board_slots();
        slots[1].beatmap_id = slots[0].beatmap_id;
        assert_eq!(
            Grid::new(slots).unwrap_err(),
            BoardError::DuplicateBeatmap {
                beatmap_id: BeatmapId(100)
            }
        );

        // Also when the second slot is not on the board
        let mut slots = full_board_slots();
        slots.push(BeatmapSlot {
            id: slot!("EX1"),
            beatmap_id: BeatmapId(115),
            board_position: None,
        });
        assert!(matches!(
            Grid::new(slots),
            Err(BoardError::DuplicateBeatmap { .. })
        ));

        let mut slots = full_board_slots();
        slots[2].board_position = Some(Cell { column: 5, row: 1 });
        assert_eq!(
            Grid::new(slots).unwrap_err(),
            BoardError::CellOutOfBounds { column: 5, row: 1 }
        );
    }

    #[test]
    fn resolve_unknown_slot() {
        let grid = Grid::new(full_board_slots()).unwrap();
        assert_eq!(
            grid.resolve(&slot!("FM9")),
            Err(BoardError::UnknownSlot { slot: slot!("FM9") })
        );
    }
}
