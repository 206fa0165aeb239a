use serde::{Deserialize, Serialize};

use crate::{BeatmapId, BeatmapSlot, BoardError, Cell, SlotId, TeamColour};

/// The configuration of a round, as far as the board is concerned.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundConfig {
    pub name: String,
    /// Whether this round is played on the board at all.
    #[serde(default = "default_true")]
    pub use_board: bool,
    /// In the final stage, the first EX win decides the match.
    #[serde(default)]
    pub final_stage: bool,
    /// Seconds after a pick until the presentation moves on to gameplay.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_advance_secs: Option<u64>,
    pub slots: Vec<SlotConfig>,
}

fn default_true() -> bool {
    true
}

/// A single slot of the map pool. Slots without coordinates are not on the board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotConfig {
    pub mods: String,
    #[serde(default = "default_mod_index")]
    pub mod_index: u32,
    pub beatmap_id: BeatmapId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board_column: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub board_row: Option<u8>,
}

fn default_mod_index() -> u32 {
    1
}

impl SlotConfig {
    pub fn to_slot(&self) -> Result<BeatmapSlot, BoardError> {
        let board_position = match (self.board_column, self.board_row) {
            (Some(column), Some(row)) => Some(Cell::try_new(column, row)?),
            (None, None) => None,
            (column, row) => {
                return Err(BoardError::CellOutOfBounds {
                    column: column.unwrap_or(0),
                    row: row.unwrap_or(0),
                })
            }
        };
        Ok(BeatmapSlot {
            id: SlotId::new(&self.mods.to_ascii_uppercase(), self.mod_index),
            beatmap_id: self.beatmap_id,
            board_position,
        })
    }
}

impl RoundConfig {
    pub fn beatmap_slots(&self) -> Result<Vec<BeatmapSlot>, BoardError> {
        self.slots.iter().map(SlotConfig::to_slot).collect()
    }
}

/// Which log an undo applies to.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UndoChannel {
    /// Picks, bans and wins.
    #[default]
    Main,
    Protect,
    Trap,
    Ex,
}

/// A command that was parsed from a chat message by some bot.
///
/// Beatmaps are referred to by their slot in the map pool.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RemoteCommand {
    Pick {
        team: TeamColour,
        map_mod: SlotId,
    },
    Ban {
        team: TeamColour,
        map_mod: SlotId,
    },
    Protect {
        team: TeamColour,
        map_mod: SlotId,
    },
    Trap {
        team: TeamColour,
        map_mod: SlotId,
    },
    /// Only red and blue can win a beatmap.
    MarkWin {
        team: TeamColour,
        map_mod: SlotId,
    },
    PickEx {
        team: TeamColour,
        map_mod: SlotId,
    },
    MarkExWin {
        team: TeamColour,
        map_mod: SlotId,
    },
    Swap {
        source: SlotId,
        target: SlotId,
    },
    /// The complete layout of the board, row by row.
    BoardDefinition {
        grid: Vec<SlotId>,
    },
    Undo {
        map_mod: SlotId,
        #[serde(default)]
        channel: UndoChannel,
    },
    Reset,
}
