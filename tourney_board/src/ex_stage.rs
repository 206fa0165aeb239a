use serde::{Deserialize, Serialize};

use crate::{BeatmapId, TeamColour};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExMarkKind {
    Pick,
    Win,
}

/// The mark of a beatmap in the EX stage.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExMark {
    pub beatmap_id: BeatmapId,
    pub team: TeamColour,
    pub kind: ExMarkKind,
}

/// The marks of the EX stage.
///
/// Unlike the [`ChoiceLog`](crate::ChoiceLog), every beatmap has at most one
/// entry here: a new mark replaces the previous one.
#[derive(Clone, Debug, Default)]
pub struct ExtraPicks {
    marks: Vec<ExMark>,
}

impl ExtraPicks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_pick(&mut self, beatmap_id: BeatmapId, team: TeamColour) {
        self.replace(ExMark {
            beatmap_id,
            team,
            kind: ExMarkKind::Pick,
        });
    }

    pub fn mark_win(&mut self, beatmap_id: BeatmapId, team: TeamColour) {
        self.replace(ExMark {
            beatmap_id,
            team,
            kind: ExMarkKind::Win,
        });
    }

    fn replace(&mut self, mark: ExMark) {
        self.remove(mark.beatmap_id);
        self.marks.push(mark);
    }

    pub fn remove(&mut self, beatmap_id: BeatmapId) -> Option<ExMark> {
        let idx = self
            .marks
            .iter()
            .position(|m| m.beatmap_id == beatmap_id)?;
        Some(self.marks.remove(idx))
    }

    pub fn get(&self, beatmap_id: BeatmapId) -> Option<&ExMark> {
        self.marks.iter().find(|m| m.beatmap_id == beatmap_id)
    }

    /// The team that concluded the match, if this is the final stage and a
    /// win was marked. The most recently marked win counts.
    pub fn conclusion(&self, final_stage: bool) -> Option<TeamColour> {
        if !final_stage {
            return None;
        }
        self.marks
            .iter()
            .rev()
            .find(|m| m.kind == ExMarkKind::Win)
            .map(|m| m.team)
    }

    pub fn clear(&mut self) {
        self.marks.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExMark> {
        self.marks.iter()
    }
}
