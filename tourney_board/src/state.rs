use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::{
    mark_is_legal, BeatmapId, BoardError, BoardSnapshot, Cell, Choice, ChoiceKind, ChoiceLog,
    Evaluation, ExtraPicks, Grid, Mode, Operation, Outcome, RemoteCommand, RoundConfig, SwapTable,
    TeamColour, UndoChannel, WinResult,
};

/// Where a match stands, according to the last recomputation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Lines can still be completed.
    Board,
    /// The board is exhausted or drawn, or the round has no board: EX marks decide.
    ExStage,
    Completed,
}

/// Everything the board knows about one match.
///
/// All mutations go through [`Self::apply()`] and its shorthands. They only
/// touch the logs and report whether something changed; the derived state
/// (scores, winner, tie-breaker) is brought up to date by [`Self::recompute()`],
/// which the caller invokes once per frame or batch of commands.
///
/// Switching to another match means building a new `MatchBoardState`.
#[derive(Clone, Debug)]
pub struct MatchBoardState {
    round_name: String,
    use_board: bool,
    final_stage: bool,
    grid: Grid,
    /// Picks, bans and wins.
    choices: ChoiceLog,
    protects: ChoiceLog,
    traps: ChoiceLog,
    swaps: SwapTable,
    extra_picks: ExtraPicks,
    team1_score: u32,
    team2_score: u32,
    completed: bool,
    winner_colour: TeamColour,
    evaluation: Evaluation,
    dirty: bool,
}

impl MatchBoardState {
    pub fn new(round: &RoundConfig) -> Result<Self, BoardError> {
        let grid = Grid::new(round.beatmap_slots()?)?;
        Ok(Self {
            round_name: round.name.clone(),
            use_board: round.use_board,
            final_stage: round.final_stage,
            grid,
            choices: ChoiceLog::new(),
            protects: ChoiceLog::new(),
            traps: ChoiceLog::new(),
            swaps: SwapTable::new(),
            extra_picks: ExtraPicks::new(),
            team1_score: 0,
            team2_score: 0,
            completed: false,
            winner_colour: TeamColour::None,
            evaluation: Evaluation::default(),
            // So that the first recompute reports the initial evaluation
            dirty: true,
        })
    }

    pub fn round_name(&self) -> &str {
        &self.round_name
    }

    pub fn use_board(&self) -> bool {
        self.use_board
    }

    pub fn final_stage(&self) -> bool {
        self.final_stage
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn choices(&self) -> &ChoiceLog {
        &self.choices
    }

    pub fn swaps(&self) -> &SwapTable {
        &self.swaps
    }

    pub fn extra_picks(&self) -> &ExtraPicks {
        &self.extra_picks
    }

    // Queries are pure and can be called at any time.

    /// The current pick/ban/win entry of this beatmap.
    pub fn current_choice(&self, beatmap_id: BeatmapId) -> Option<&Choice> {
        self.choices.current_for(beatmap_id)
    }

    pub fn current_protect(&self, beatmap_id: BeatmapId) -> Option<&Choice> {
        self.protects.current_for(beatmap_id)
    }

    pub fn current_trap(&self, beatmap_id: BeatmapId) -> Option<&Choice> {
        self.traps.current_for(beatmap_id)
    }

    pub fn current_layout(&self) -> Vec<(BeatmapId, Cell)> {
        self.grid.current_layout()
    }

    /// The lines of the current layout, or `None` for rounds without a board.
    pub fn snapshot(&self) -> Option<BoardSnapshot> {
        self.use_board
            .then(|| BoardSnapshot::new(&self.grid, &self.choices))
    }

    pub fn detect_win(&self) -> WinResult {
        self.snapshot()
            .map(|snapshot| snapshot.detect_win())
            .unwrap_or_default()
    }

    pub fn detect_tie_breaker(&self) -> bool {
        self.snapshot()
            .is_some_and(|snapshot| snapshot.detect_tie_breaker())
    }

    /// Evaluates the board as it is right now, regardless of [`Self::recompute()`].
    pub fn evaluate(&self) -> Evaluation {
        self.snapshot()
            .map(|snapshot| snapshot.evaluate())
            .unwrap_or_default()
    }

    /// The evaluation as of the last [`Self::recompute()`].
    pub fn evaluation(&self) -> Evaluation {
        self.evaluation
    }

    /// The scores of team 1 (red) and team 2 (blue).
    pub fn scores(&self) -> (u32, u32) {
        (self.team1_score, self.team2_score)
    }

    pub fn completed(&self) -> bool {
        self.completed
    }

    /// `Neutral` for a drawn board, `None` while there is no result.
    pub fn winner_colour(&self) -> TeamColour {
        self.winner_colour
    }

    pub fn phase(&self) -> Phase {
        if self.completed {
            Phase::Completed
        } else if !self.use_board
            || self.evaluation.tie_breaker
            || self.evaluation.winner == WinResult::Draw
        {
            Phase::ExStage
        } else {
            Phase::Board
        }
    }

    /// Has anything changed since the last [`Self::recompute()`]?
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Brings the derived state up to date with the logs.
    ///
    /// Returns `None` if nothing changed since the last call. Any number of
    /// mutations may have happened in between; everything is derived from scratch.
    pub fn recompute(&mut self) -> Option<Evaluation> {
        if !self.dirty {
            return None;
        }
        self.dirty = false;

        let evaluation = self.evaluate();
        let mut result = evaluation.winner;
        if let Some(team) = self.extra_picks.conclusion(self.final_stage) {
            result = decisive_result(team);
        }
        (self.team1_score, self.team2_score) = result.scores();
        self.completed = result.winner().is_some();
        self.winner_colour = match result {
            WinResult::Red => TeamColour::Red,
            WinResult::Blue => TeamColour::Blue,
            WinResult::Draw => TeamColour::Neutral,
            WinResult::None => TeamColour::None,
        };

        if evaluation != self.evaluation {
            debug!(
                round = %self.round_name,
                winner = %evaluation.winner,
                tie_breaker = evaluation.tie_breaker,
                "Board evaluation changed"
            );
        }
        self.evaluation = evaluation;
        Some(evaluation)
    }

    /// Applies an operation.
    ///
    /// Operations that the rules don't allow are ignored and reported as
    /// [`Outcome::Unchanged`]. Errors are only returned when the operation
    /// refers to something that is not there, e.g. a swap with a beatmap
    /// that is not on the board.
    pub fn apply(&mut self, operation: Operation) -> Result<Outcome, BoardError> {
        trace!(?operation, "Applying operation");
        let outcome = match operation {
            Operation::Mark {
                team,
                kind,
                beatmap_id,
            } => self.mark(team, kind, beatmap_id),
            Operation::PickEx { team, beatmap_id } => self.mark_ex(team, beatmap_id, false),
            Operation::MarkExWin { team, beatmap_id } => self.mark_ex(team, beatmap_id, true),
            Operation::Swap { source, target } => self.swap(source, target)?,
            Operation::DefineBoard { layout } => {
                match self.swaps.define_board(&mut self.grid, &layout)? {
                    0 => Outcome::Unchanged,
                    _ => Outcome::Changed,
                }
            }
            Operation::Undo {
                beatmap_id,
                channel,
            } => self.undo_in(beatmap_id, channel),
            Operation::Reset => self.reset(),
        };
        self.dirty |= outcome.is_dirty();
        Ok(outcome)
    }

    /// Applies a command from the chat as if the operator had clicked it.
    pub fn apply_remote(&mut self, command: RemoteCommand) -> Result<Outcome, BoardError> {
        match Operation::from_remote(command.clone(), &self.grid)? {
            Some(operation) => self.apply(operation),
            None => {
                debug!(?command, "Ignoring command without an equivalent operation");
                Ok(Outcome::Unchanged)
            }
        }
    }

    /// Applies a click on a beatmap in the given mode.
    pub fn click(&mut self, mode: Mode, beatmap_id: BeatmapId) -> Result<Outcome, BoardError> {
        match mode.operation_for(beatmap_id) {
            Some(operation) => self.apply(operation),
            None => Ok(Outcome::Unchanged),
        }
    }

    /// Exchanges the cells of two beatmaps on the board.
    pub fn swap(&mut self, source: BeatmapId, target: BeatmapId) -> Result<Outcome, BoardError> {
        let outcome = match self.swaps.swap(&mut self.grid, source, target)? {
            Some(_) => Outcome::Changed,
            None => Outcome::Unchanged,
        };
        self.dirty |= outcome.is_dirty();
        Ok(outcome)
    }

    /// Takes back the most recent pick, ban or win of this beatmap.
    pub fn undo(&mut self, beatmap_id: BeatmapId) -> Outcome {
        let outcome = self.undo_in(beatmap_id, UndoChannel::Main);
        self.dirty |= outcome.is_dirty();
        outcome
    }

    /// Clears every log, restores the configured layout and zeroes the scores.
    pub fn reset(&mut self) -> Outcome {
        self.choices.clear();
        self.protects.clear();
        self.traps.clear();
        self.extra_picks.clear();
        self.swaps.clear(&mut self.grid);
        self.team1_score = 0;
        self.team2_score = 0;
        self.completed = false;
        self.winner_colour = TeamColour::None;
        self.evaluation = Evaluation::default();
        self.dirty = true;
        debug!(round = %self.round_name, "Board reset");
        Outcome::Changed
    }

    fn mark(&mut self, team: TeamColour, kind: ChoiceKind, beatmap_id: BeatmapId) -> Outcome {
        if !mark_is_legal(&self.choices, kind, beatmap_id) {
            debug!(%team, ?kind, %beatmap_id, "Rejected mark");
            return Outcome::Unchanged;
        }
        let log = match kind {
            ChoiceKind::Protect => &mut self.protects,
            ChoiceKind::Trap => &mut self.traps,
            _ => &mut self.choices,
        };
        if log
            .current_for(beatmap_id)
            .is_some_and(|c| c.team == team && c.kind == kind)
        {
            return Outcome::Unchanged;
        }
        // Only a pick takes back wins
        if kind == ChoiceKind::Pick {
            log.remove_matching(beatmap_id, ChoiceKind::is_win);
        }
        log.append(team, kind, beatmap_id);
        trace!(%team, ?kind, %beatmap_id, "Marked beatmap");
        if kind == ChoiceKind::Pick {
            Outcome::Picked { beatmap_id }
        } else {
            Outcome::Changed
        }
    }

    fn mark_ex(&mut self, team: TeamColour, beatmap_id: BeatmapId, win: bool) -> Outcome {
        let evaluation = self.evaluate();
        let ex_stage_open = !self.use_board
            || evaluation.tie_breaker
            || evaluation.winner == WinResult::Draw;
        if win && team.win_kind().is_none() {
            debug!(%team, %beatmap_id, "Rejected EX win for a team that cannot win");
            return Outcome::Unchanged;
        }
        if !ex_stage_open {
            debug!(%team, %beatmap_id, "Rejected EX mark while the board is still open");
            return Outcome::Unchanged;
        }
        if win {
            self.extra_picks.mark_win(beatmap_id, team);
            if self.final_stage {
                // The match is over right away, not only at the next recompute
                (self.team1_score, self.team2_score) = decisive_result(team).scores();
                self.completed = true;
                self.winner_colour = team;
                debug!(%team, %beatmap_id, "Match concluded by EX win");
            }
            Outcome::Changed
        } else {
            self.extra_picks.mark_pick(beatmap_id, team);
            Outcome::Picked { beatmap_id }
        }
    }

    fn undo_in(&mut self, beatmap_id: BeatmapId, channel: UndoChannel) -> Outcome {
        let undone = match channel {
            UndoChannel::Main => self.choices.undo_last(beatmap_id).is_some(),
            UndoChannel::Protect => self.protects.undo_last(beatmap_id).is_some(),
            UndoChannel::Trap => self.traps.undo_last(beatmap_id).is_some(),
            UndoChannel::Ex => self.extra_picks.remove(beatmap_id).is_some(),
        };
        if undone {
            Outcome::Changed
        } else {
            Outcome::Unchanged
        }
    }
}

fn decisive_result(team: TeamColour) -> WinResult {
    match team {
        TeamColour::Red => WinResult::Red,
        TeamColour::Blue => WinResult::Blue,
        TeamColour::Neutral | TeamColour::None => WinResult::None,
    }
}
