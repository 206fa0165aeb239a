use serde::{Deserialize, Serialize};

use crate::{BeatmapId, CellSet, ChoiceKind, ChoiceLog, Grid, Line, TeamColour, LINE_MASKS};

/// The score a team gets for winning the board.
pub const WINNING_SCORE: u32 = 6;

/// The result of looking for won lines on the board.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WinResult {
    #[default]
    None,
    Red,
    Blue,
    /// Both teams completed a line.
    Draw,
}

impl WinResult {
    /// The team that won, if the result is decisive.
    pub fn winner(self) -> Option<TeamColour> {
        match self {
            WinResult::Red => Some(TeamColour::Red),
            WinResult::Blue => Some(TeamColour::Blue),
            WinResult::None | WinResult::Draw => None,
        }
    }

    /// The scores `(team 1, team 2)` implied by this result.
    pub fn scores(self) -> (u32, u32) {
        match self {
            WinResult::Red => (WINNING_SCORE, 0),
            WinResult::Blue => (0, WINNING_SCORE),
            WinResult::None | WinResult::Draw => (0, 0),
        }
    }
}

impl std::fmt::Display for WinResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            WinResult::None => "no winner",
            WinResult::Red => "red wins",
            WinResult::Blue => "blue wins",
            WinResult::Draw => "draw",
        };
        write!(f, "{}", name)
    }
}

/// Everything that is derived from the board.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub winner: WinResult,
    /// No line can be completed by either team anymore.
    pub tie_breaker: bool,
}

/// The marks of the board, projected onto cells.
///
/// Built once from the choice log and the current layout, after which all
/// line checks are plain mask operations.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BoardSnapshot {
    /// Cells holding a beatmap that can take part in lines.
    pub occupied: CellSet,
    pub banned: CellSet,
    pub red_wins: CellSet,
    pub blue_wins: CellSet,
}

impl BoardSnapshot {
    pub fn new(grid: &Grid, choices: &ChoiceLog) -> Self {
        // Each colour is looked up on its own, so a beatmap carrying win marks
        // of both teams counts for both of them.
        let has_win = |beatmap_id: BeatmapId, kind: ChoiceKind| {
            choices
                .current_matching(beatmap_id, |k| k == kind)
                .is_some()
        };
        Self {
            occupied: grid.occupied(),
            banned: grid.cells_where(|id| choices.is_banned(id)),
            red_wins: grid.cells_where(|id| has_win(id, ChoiceKind::RedWin)),
            blue_wins: grid.cells_where(|id| has_win(id, ChoiceKind::BlueWin)),
        }
    }

    /// Is this line fully marked with wins of one team?
    pub fn is_won_by(&self, mask: CellSet, team: TeamColour) -> bool {
        match team {
            TeamColour::Red => self.red_wins.is_superset(mask),
            TeamColour::Blue => self.blue_wins.is_superset(mask),
            TeamColour::Neutral | TeamColour::None => false,
        }
    }

    /// Can this line still be completed by some team?
    ///
    /// Protects and traps play no role here.
    pub fn can_win(&self, mask: CellSet) -> bool {
        // A missing beatmap can never be marked
        self.occupied.is_superset(mask)
            && !self.banned.intersects(mask)
            && !(self.red_wins.intersects(mask) && self.blue_wins.intersects(mask))
    }

    /// Does every cell of the board hold a beatmap that can take part in lines?
    ///
    /// An incomplete board is treated as unavailable: it has neither a winner nor
    /// a tie-breaker.
    pub fn is_complete(&self) -> bool {
        self.occupied == CellSet::full()
    }

    pub fn detect_win(&self) -> WinResult {
        if !self.is_complete() {
            return WinResult::None;
        }
        let mut red_won = false;
        let mut blue_won = false;
        // All lines have to be checked, both teams may have completed one
        for (_, mask) in LINE_MASKS {
            red_won |= self.is_won_by(mask, TeamColour::Red);
            blue_won |= self.is_won_by(mask, TeamColour::Blue);
        }
        match (red_won, blue_won) {
            (false, false) => WinResult::None,
            (true, false) => WinResult::Red,
            (false, true) => WinResult::Blue,
            (true, true) => WinResult::Draw,
        }
    }

    pub fn detect_tie_breaker(&self) -> bool {
        self.is_complete() && LINE_MASKS.iter().all(|&(_, mask)| !self.can_win(mask))
    }

    /// The lines that are completely marked by this team.
    pub fn won_lines(&self, team: TeamColour) -> Vec<Line> {
        LINE_MASKS
            .into_iter()
            .filter(|&(_, mask)| self.is_complete() && self.is_won_by(mask, team))
            .map(|(line, _)| line)
            .collect()
    }

    pub fn evaluate(&self) -> Evaluation {
        Evaluation {
            winner: self.detect_win(),
            tie_breaker: self.detect_tie_breaker(),
        }
    }
}

/// Checks all lines of the current layout for a winner.
pub fn detect_win(grid: &Grid, choices: &ChoiceLog) -> WinResult {
    BoardSnapshot::new(grid, choices).detect_win()
}

/// Is there no line left that one of the teams could still complete?
pub fn detect_tie_breaker(grid: &Grid, choices: &ChoiceLog) -> bool {
    BoardSnapshot::new(grid, choices).detect_tie_breaker()
}
