use std::fmt::{self, Debug};

use crate::{Cell, BOARD_SIZE};

/// A [`Copy`] set of cells of the 4x4 board, one bit per cell.
///
/// Intended for collecting all cells that carry a certain mark, so that
/// lines can be checked with a single mask operation.
///
/// It can be converted back into a list of cells by means of its
/// [`IntoIterator`] instance, which yields them in row-major order.
///
/// Note that its "mutating" methods return a new object instead of really mutating.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct CellSet {
    /// Bit `(row - 1) * 4 + (column - 1)` is set iff the cell is in the set.
    bits: u16,
}

impl CellSet {
    pub const fn new() -> Self {
        Self { bits: 0 }
    }

    /// The set containing every cell of the board.
    pub const fn full() -> Self {
        Self { bits: u16::MAX }
    }

    #[must_use]
    pub const fn insert(self, cell: Cell) -> Self {
        Self {
            bits: self.bits | (1u16 << Self::bit_idx(cell)),
        }
    }

    #[must_use]
    pub const fn remove(self, cell: Cell) -> Self {
        Self {
            bits: self.bits & !(1u16 << Self::bit_idx(cell)),
        }
    }

    pub const fn contains(self, cell: Cell) -> bool {
        self.bits & (1u16 << Self::bit_idx(cell)) != 0
    }

    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }

    pub const fn len(self) -> u32 {
        self.bits.count_ones()
    }

    /// Is every cell of `other` also in `self`?
    pub const fn is_superset(self, other: CellSet) -> bool {
        self.bits & other.bits == other.bits
    }

    pub const fn intersects(self, other: CellSet) -> bool {
        self.bits & other.bits != 0
    }

    // Cells are only constructed in bounds, see `Cell::try_new()`
    const fn bit_idx(cell: Cell) -> u32 {
        ((cell.row - 1) * BOARD_SIZE + (cell.column - 1)) as u32
    }
}

impl std::ops::BitAnd for CellSet {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self {
            bits: self.bits & rhs.bits,
        }
    }
}

impl std::ops::BitOr for CellSet {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self {
            bits: self.bits | rhs.bits,
        }
    }
}

impl std::ops::BitOrAssign for CellSet {
    fn bitor_assign(&mut self, rhs: Self) {
        self.bits |= rhs.bits;
    }
}

impl std::ops::Not for CellSet {
    type Output = Self;

    fn not(self) -> Self::Output {
        Self { bits: !self.bits }
    }
}

impl FromIterator<Cell> for CellSet {
    fn from_iter<T: IntoIterator<Item = Cell>>(iter: T) -> Self {
        let mut set = CellSet::new();
        for cell in iter {
            set = set.insert(cell);
        }
        set
    }
}

impl Debug for CellSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut s = String::with_capacity(16 * 2);
        for row in 1..=BOARD_SIZE {
            for column in 1..=BOARD_SIZE {
                s.push(if self.contains(Cell::new(column, row)) { '1' } else { '.' });
                s.push(if column == BOARD_SIZE { '\n' } else { ' ' });
            }
        }
        write!(f, "{}", s)
    }
}

/// Iterator produced by [`CellSet::into_iter()`].
pub struct CellSetIter {
    set: CellSet,
}

impl IntoIterator for CellSet {
    type Item = Cell;

    type IntoIter = CellSetIter;

    fn into_iter(self) -> Self::IntoIter {
        CellSetIter { set: self }
    }
}

impl Iterator for CellSetIter {
    type Item = Cell;

    fn next(&mut self) -> Option<Self::Item> {
        if self.set.is_empty() {
            None
        } else {
            // At most 15, so the cast is fine
            let idx = self.set.bits.trailing_zeros() as u8;
            self.set.bits ^= 1u16 << idx;
            Some(Cell::new(idx % BOARD_SIZE + 1, idx / BOARD_SIZE + 1))
        }
    }
}

#[cfg(test)]
mod tests {
    use quickcheck::quickcheck;

    use super::*;

    quickcheck! {
        fn iteration_yields_inserted_cells(cells: Vec<Cell>) -> bool {
            let set = CellSet::from_iter(cells.iter().copied());
            let mut expected = cells;
            expected.sort_by_key(|c| (c.row, c.column));
            expected.dedup();
            Vec::from_iter(set) == expected
        }
    }

    #[test]
    fn full_set_has_every_cell() {
        assert_eq!(CellSet::full().len(), 16);
        assert!(CellSet::full().contains(Cell::new(4, 4)));
        assert!(CellSet::full().remove(Cell::new(2, 3)).is_superset(CellSet::new()));
        assert!(!CellSet::full()
            .remove(Cell::new(2, 3))
            .contains(Cell::new(2, 3)));
    }
}
