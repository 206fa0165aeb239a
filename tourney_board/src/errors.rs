use crate::{BeatmapId, Cell, SlotId};

/// The error type for building a board and for mutating it.
///
/// These all indicate a bug in the caller or in the round configuration.
/// Operations that are merely not allowed by the rules are not errors, they
/// are rejected without changing anything.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BoardError {
    /// A swap referred to a beatmap that is not currently on the board.
    SwapTargetNotFound { beatmap_id: BeatmapId },
    /// The two ends of a line are not on a common row, column or diagonal of length 4.
    MalformedLine { start: Cell, end: Cell },
    CellOutOfBounds { column: u8, row: u8 },
    /// Two slots were configured to occupy the same cell.
    OverlappingSlots { column: u8, row: u8 },
    DuplicateSlot { slot: SlotId },
    /// Two slots were configured with the same beatmap.
    DuplicateBeatmap { beatmap_id: BeatmapId },
    UnknownSlot { slot: SlotId },
    InvalidBoardDefinition { reason: &'static str },
}

impl std::error::Error for BoardError {}

impl std::fmt::Display for BoardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoardError::SwapTargetNotFound { beatmap_id } => write!(
                f,
                "Cannot resolve swap targets: beatmap {} is not on the board",
                beatmap_id
            ),
            BoardError::MalformedLine { start, end } => write!(
                f,
                "The cells {} and {} are not the ends of a line of four cells",
                start, end
            ),
            BoardError::CellOutOfBounds { column, row } => write!(
                f,
                "The cell (column {}, row {}) lies outside of the 4x4 board",
                column, row
            ),
            BoardError::OverlappingSlots { column, row } => write!(
                f,
                "More than one slot was placed on the cell (column {}, row {})",
                column, row
            ),
            BoardError::DuplicateSlot { slot } => {
                write!(f, "The slot {} is configured more than once", slot)
            }
            BoardError::DuplicateBeatmap { beatmap_id } => write!(
                f,
                "The beatmap {} is configured for more than one slot",
                beatmap_id
            ),
            BoardError::UnknownSlot { slot } => {
                write!(f, "The slot {} is not part of this round", slot)
            }
            BoardError::InvalidBoardDefinition { reason } => {
                write!(f, "Invalid board definition: {}", reason)
            }
        }
    }
}
