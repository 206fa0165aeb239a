use serde::{Deserialize, Serialize};

use crate::{
    BeatmapId, BoardError, ChoiceKind, ChoiceLog, Grid, RemoteCommand, SlotId, TeamColour,
    UndoChannel,
};

/// A change to a board, no matter whether it came from a click or from a chat command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Operation {
    /// Pick, ban, protect, trap or win a beatmap on the board.
    ///
    /// The team of a win is implied by its kind.
    Mark {
        team: TeamColour,
        kind: ChoiceKind,
        beatmap_id: BeatmapId,
    },
    PickEx {
        team: TeamColour,
        beatmap_id: BeatmapId,
    },
    MarkExWin {
        team: TeamColour,
        beatmap_id: BeatmapId,
    },
    Swap {
        source: BeatmapId,
        target: BeatmapId,
    },
    /// Rearrange the board, `layout` lists the beatmaps row by row.
    DefineBoard { layout: Vec<BeatmapId> },
    Undo {
        beatmap_id: BeatmapId,
        channel: UndoChannel,
    },
    Reset,
}

/// What an operation did to the board.
///
/// Anything but `Unchanged` means the derived state has to be recomputed.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome")]
pub enum Outcome {
    /// The operation was not allowed, or had no effect.
    Unchanged,
    Changed,
    /// A beatmap was picked on the board, which restarts the auto-advance countdown.
    Picked { beatmap_id: BeatmapId },
}

impl Outcome {
    pub fn is_dirty(self) -> bool {
        self != Outcome::Unchanged
    }
}

/// The operator-selected team and kind that a click on a beatmap applies.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Mode {
    pub team: TeamColour,
    pub kind: ChoiceKind,
}

impl Mode {
    pub fn new(team: TeamColour, kind: ChoiceKind) -> Self {
        Self { team, kind }
    }

    /// The operation that clicking on this beatmap performs. In neutral mode, clicks do nothing.
    pub fn operation_for(self, beatmap_id: BeatmapId) -> Option<Operation> {
        if self.kind == ChoiceKind::Neutral {
            return None;
        }
        let team = self.kind.winner().unwrap_or(self.team);
        Some(Operation::Mark {
            team,
            kind: self.kind,
            beatmap_id,
        })
    }
}

/// Checks whether marking the beatmap with this kind is allowed by the rules.
///
/// - Nothing but traps can be put on a banned beatmap.
/// - A beatmap that was won cannot be banned or protected anymore, but it can be
///   won by the other team instead, or picked again to take back the win.
pub fn mark_is_legal(choices: &ChoiceLog, kind: ChoiceKind, beatmap_id: BeatmapId) -> bool {
    let banned = choices.is_banned(beatmap_id);
    let won = choices.current_win(beatmap_id).is_some();
    match kind {
        ChoiceKind::Trap => true,
        ChoiceKind::Pick | ChoiceKind::RedWin | ChoiceKind::BlueWin => !banned,
        ChoiceKind::Ban | ChoiceKind::Protect => !banned && !won,
        ChoiceKind::Neutral => false,
    }
}

impl Operation {
    /// Translates a chat command into the operation that an operator would perform.
    ///
    /// Returns `Ok(None)` for commands that no click could produce, e.g. a win for the neutral team.
    pub fn from_remote(command: RemoteCommand, grid: &Grid) -> Result<Option<Operation>, BoardError> {
        let mark = |team: TeamColour, kind: ChoiceKind, map_mod: SlotId| -> Result<Option<Operation>, BoardError> {
            let beatmap_id = grid.resolve(&map_mod)?;
            Ok(Mode::new(team, kind).operation_for(beatmap_id))
        };
        let operation = match command {
            RemoteCommand::Pick { team, map_mod } => return mark(team, ChoiceKind::Pick, map_mod),
            RemoteCommand::Ban { team, map_mod } => return mark(team, ChoiceKind::Ban, map_mod),
            RemoteCommand::Protect { team, map_mod } => {
                return mark(team, ChoiceKind::Protect, map_mod)
            }
            RemoteCommand::Trap { team, map_mod } => return mark(team, ChoiceKind::Trap, map_mod),
            RemoteCommand::MarkWin { team, map_mod } => match team.win_kind() {
                Some(kind) => return mark(team, kind, map_mod),
                None => return Ok(None),
            },
            RemoteCommand::PickEx { team, map_mod } => Operation::PickEx {
                team,
                beatmap_id: grid.resolve(&map_mod)?,
            },
            RemoteCommand::MarkExWin { team, map_mod } => {
                if team.win_kind().is_none() {
                    return Ok(None);
                }
                Operation::MarkExWin {
                    team,
                    beatmap_id: grid.resolve(&map_mod)?,
                }
            }
            RemoteCommand::Swap { source, target } => Operation::Swap {
                source: grid.resolve(&source)?,
                target: grid.resolve(&target)?,
            },
            RemoteCommand::BoardDefinition { grid: slots } => Operation::DefineBoard {
                layout: slots
                    .iter()
                    .map(|slot| grid.resolve(slot))
                    .collect::<Result<_, _>>()?,
            },
            RemoteCommand::Undo { map_mod, channel } => Operation::Undo {
                beatmap_id: grid.resolve(&map_mod)?,
                channel,
            },
            RemoteCommand::Reset => Operation::Reset,
        };
        Ok(Some(operation))
    }
}
