use crate::{BoardError, Cell, CellSet, BOARD_SIZE};

/// A row, column or diagonal of the board, given by its two end cells.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Line {
    pub start: Cell,
    pub end: Cell,
}

/// All lines on which a team can win: 4 rows, 4 columns and the 2 diagonals.
pub const LINES: [Line; 10] = [
    Line::new(Cell::new(1, 1), Cell::new(4, 1)),
    Line::new(Cell::new(1, 2), Cell::new(4, 2)),
    Line::new(Cell::new(1, 3), Cell::new(4, 3)),
    Line::new(Cell::new(1, 4), Cell::new(4, 4)),
    Line::new(Cell::new(1, 1), Cell::new(1, 4)),
    Line::new(Cell::new(2, 1), Cell::new(2, 4)),
    Line::new(Cell::new(3, 1), Cell::new(3, 4)),
    Line::new(Cell::new(4, 1), Cell::new(4, 4)),
    Line::new(Cell::new(1, 1), Cell::new(4, 4)),
    Line::new(Cell::new(4, 1), Cell::new(1, 4)),
];

impl Line {
    pub const fn new(start: Cell, end: Cell) -> Self {
        Self { start, end }
    }

    /// The four cells of this line, from `start` to `end`.
    pub fn cells(self) -> Result<[Cell; 4], BoardError> {
        line_cells(self.start, self.end)
    }

    /// The cells of this line as a set.
    pub fn mask(self) -> Result<CellSet, BoardError> {
        Ok(CellSet::from_iter(self.cells()?))
    }
}

impl std::fmt::Display for Line {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Line { start, end } = *self;
        if start.row == end.row {
            write!(f, "row {}", start.row)
        } else if start.column == end.column {
            write!(f, "column {}", start.column)
        } else if start.column == start.row {
            write!(f, "diagonal")
        } else {
            write!(f, "anti-diagonal")
        }
    }
}

/// Enumerates the cells of the line from `start` to `end`.
///
/// The line must be horizontal, vertical, or a diagonal with a step of ±1 in
/// both axes, and consist of exactly four cells.
pub fn line_cells(start: Cell, end: Cell) -> Result<[Cell; 4], BoardError> {
    let d_column = i16::from(end.column) - i16::from(start.column);
    let d_row = i16::from(end.row) - i16::from(start.row);
    let span = i16::from(BOARD_SIZE) - 1;
    let well_formed = match (d_column.abs(), d_row.abs()) {
        (0, d) | (d, 0) => d == span,
        (dc, dr) => dc == span && dr == span,
    };
    if !well_formed {
        return Err(BoardError::MalformedLine { start, end });
    }
    let (step_column, step_row) = (d_column.signum(), d_row.signum());
    let mut cells = [start; 4];
    for (k, cell) in cells.iter_mut().enumerate() {
        let k = k as i16;
        // Both ends are valid cells and the steps stay between them
        *cell = Cell::new(
            (i16::from(start.column) + k * step_column) as u8,
            (i16::from(start.row) + k * step_row) as u8,
        );
    }
    Ok(cells)
}

/// All ten [`LINES`] together with their masks.
pub const LINE_MASKS: [(Line, CellSet); 10] = {
    let mut masks = [(LINES[0], CellSet::new()); 10];
    let mut idx = 0;
    while idx < LINES.len() {
        masks[idx] = (LINES[idx], const_mask(LINES[idx]));
        idx += 1;
    }
    masks
};

// Only for the well-formed lines in `LINES`, see `line_cells()` for the checked version
const fn const_mask(line: Line) -> CellSet {
    let step_column = (line.end.column as i8 - line.start.column as i8).signum();
    let step_row = (line.end.row as i8 - line.start.row as i8).signum();
    let mut mask = CellSet::new();
    let mut k = 0;
    while k < BOARD_SIZE as i8 {
        mask = mask.insert(Cell::new(
            (line.start.column as i8 + k * step_column) as u8,
            (line.start.row as i8 + k * step_row) as u8,
        ));
        k += 1;
    }
    mask
}
