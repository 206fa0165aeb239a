use serde::{Deserialize, Serialize};

use crate::BeatmapId;

/// The side an entry belongs to.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeamColour {
    /// Team 1.
    Red,
    /// Team 2.
    Blue,
    /// Used for outcomes that favour nobody, e.g. a drawn board.
    Neutral,
    #[default]
    None,
}

impl TeamColour {
    /// The win mark of this team, if it can win at all.
    pub fn win_kind(self) -> Option<ChoiceKind> {
        match self {
            TeamColour::Red => Some(ChoiceKind::RedWin),
            TeamColour::Blue => Some(ChoiceKind::BlueWin),
            TeamColour::Neutral | TeamColour::None => None,
        }
    }
}

impl std::fmt::Display for TeamColour {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TeamColour::Red => "red",
            TeamColour::Blue => "blue",
            TeamColour::Neutral => "neutral",
            TeamColour::None => "none",
        };
        write!(f, "{}", name)
    }
}

/// What a [`Choice`] marks a beatmap as.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChoiceKind {
    Pick,
    Ban,
    Protect,
    Trap,
    RedWin,
    BlueWin,
    #[default]
    Neutral,
}

impl ChoiceKind {
    pub fn is_win(self) -> bool {
        matches!(self, ChoiceKind::RedWin | ChoiceKind::BlueWin)
    }

    /// The team a win mark belongs to.
    pub fn winner(self) -> Option<TeamColour> {
        match self {
            ChoiceKind::RedWin => Some(TeamColour::Red),
            ChoiceKind::BlueWin => Some(TeamColour::Blue),
            _ => None,
        }
    }
}

/// One immutable entry of a [`ChoiceLog`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub team: TeamColour,
    pub kind: ChoiceKind,
    pub beatmap_id: BeatmapId,
    /// Assigned by the log, strictly increasing in order of appending.
    pub sequence: u64,
}

/// A list of choices that new entries are appended to.
///
/// The current status of a beatmap is the entry with the greatest sequence
/// number for that beatmap. Entries are removed by undoing the most recent one
/// ([`ChoiceLog::undo_last()`]), by taking back all entries of some kinds for a
/// beatmap ([`ChoiceLog::remove_matching()`], which is how a pick takes back
/// wins), or by clearing the whole log.
///
/// The log does not validate anything, legality is checked before appending.
#[derive(Clone, Debug, Default)]
pub struct ChoiceLog {
    // Sorted by sequence, since sequence numbers are handed out in order
    entries: Vec<Choice>,
    next_sequence: u64,
}

impl ChoiceLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a new entry and returns its sequence number.
    pub fn append(&mut self, team: TeamColour, kind: ChoiceKind, beatmap_id: BeatmapId) -> u64 {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.entries.push(Choice {
            team,
            kind,
            beatmap_id,
            sequence,
        });
        sequence
    }

    /// The most recent entry for this beatmap.
    pub fn current_for(&self, beatmap_id: BeatmapId) -> Option<&Choice> {
        self.entries
            .iter()
            .rev()
            .find(|c| c.beatmap_id == beatmap_id)
    }

    /// The most recent entry for this beatmap among those with a matching kind.
    pub fn current_matching(
        &self,
        beatmap_id: BeatmapId,
        kind_filter: impl Fn(ChoiceKind) -> bool,
    ) -> Option<&Choice> {
        self.entries
            .iter()
            .rev()
            .find(|c| c.beatmap_id == beatmap_id && kind_filter(c.kind))
    }

    /// The most recent win mark for this beatmap.
    pub fn current_win(&self, beatmap_id: BeatmapId) -> Option<&Choice> {
        self.current_matching(beatmap_id, ChoiceKind::is_win)
    }

    pub fn is_banned(&self, beatmap_id: BeatmapId) -> bool {
        self.current_matching(beatmap_id, |k| k == ChoiceKind::Ban)
            .is_some()
    }

    /// Removes the most recent entry for this beatmap, if there is one.
    pub fn undo_last(&mut self, beatmap_id: BeatmapId) -> Option<Choice> {
        let idx = self
            .entries
            .iter()
            .rposition(|c| c.beatmap_id == beatmap_id)?;
        Some(self.entries.remove(idx))
    }

    /// Removes all entries for this beatmap that have a matching kind.
    ///
    /// Returns how many entries were removed.
    pub fn remove_matching(
        &mut self,
        beatmap_id: BeatmapId,
        kind_filter: impl Fn(ChoiceKind) -> bool,
    ) -> usize {
        let len_before = self.entries.len();
        self.entries
            .retain(|c| !(c.beatmap_id == beatmap_id && kind_filter(c.kind)));
        len_before - self.entries.len()
    }

    /// Empties the log. Sequence numbers keep increasing.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Choice> {
        self.entries.iter()
    }
}
