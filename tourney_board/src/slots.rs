use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Cell;

/// The online id of a beatmap.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BeatmapId(pub u32);

impl std::fmt::Display for BeatmapId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Mod tag of slots that only exist for the tie-breaker. They never take part in lines.
pub const TIE_BREAKER_MODS: &str = "TB";

/// Mod tag of slots played in the EX stage.
pub const EX_MODS: &str = "EX";

/// Identifies a slot of the map pool, e.g. `NM1` or `HD2`.
///
/// Within one round, no two slots share the same identifier.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SlotId {
    pub mods: String,
    /// Disambiguates slots sharing the same `mods`, starting at 1.
    pub mod_index: u32,
}

impl SlotId {
    pub fn new(mods: &str, mod_index: u32) -> Self {
        Self {
            mods: String::from(mods),
            mod_index,
        }
    }
}

impl std::fmt::Display for SlotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.mods, self.mod_index)
    }
}

/// The error type for the [`FromStr`] instance of [`SlotId`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotIdFromStrErr {
    Empty,
    MissingMods,
    InvalidModChar,
    InvalidIndex,
}

impl std::error::Error for SlotIdFromStrErr {}

impl std::fmt::Display for SlotIdFromStrErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SlotIdFromStrErr::Empty => write!(f, "Slot identifier is empty"),
            SlotIdFromStrErr::MissingMods => {
                write!(f, "Slot identifier does not start with a mod tag")
            }
            SlotIdFromStrErr::InvalidModChar => {
                write!(f, "Slot identifier contains a character that is neither a letter nor a digit")
            }
            SlotIdFromStrErr::InvalidIndex => {
                write!(f, "Slot identifier has an index that is not a positive number")
            }
        }
    }
}

impl FromStr for SlotId {
    type Err = SlotIdFromStrErr;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(SlotIdFromStrErr::Empty);
        }
        let split = s.find(|c: char| c.is_ascii_digit()).unwrap_or(s.len());
        let (mods, index) = s.split_at(split);
        if mods.is_empty() {
            return Err(SlotIdFromStrErr::MissingMods);
        }
        if !mods.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(SlotIdFromStrErr::InvalidModChar);
        }
        // "TB" alone means "TB1"
        let mod_index = if index.is_empty() {
            1
        } else {
            match index.parse::<u32>() {
                Ok(0) | Err(_) => return Err(SlotIdFromStrErr::InvalidIndex),
                Ok(n) => n,
            }
        };
        Ok(SlotId {
            mods: mods.to_ascii_uppercase(),
            mod_index,
        })
    }
}

impl TryFrom<String> for SlotId {
    type Error = SlotIdFromStrErr;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SlotId> for String {
    fn from(slot: SlotId) -> String {
        slot.to_string()
    }
}

/// Shorthand for creating slot identifiers from a string such as `"NM1"`.
///
/// This macro is just calling the [`FromStr`] instance of [`SlotId`].
/// ```
/// # use tourney_board::{slot, SlotId};
/// assert_eq!(slot!("hd2"), SlotId::new("HD", 2));
/// assert_eq!(slot!("TB"), SlotId::new("TB", 1));
/// ```
#[macro_export]
macro_rules! slot {
    ($s:literal) => {
        <$crate::SlotId as std::str::FromStr>::from_str($s)
            .expect("Invalid slot identifier given to slot! macro")
    };
}
#[allow(unused_imports)]
pub(crate) use slot;

/// One entry of the map pool of a round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BeatmapSlot {
    pub id: SlotId,
    pub beatmap_id: BeatmapId,
    /// Where the round configuration places this slot on the board.
    ///
    /// This is only the initial position, the current one is tracked by the grid's panels.
    pub board_position: Option<Cell>,
}

impl BeatmapSlot {
    pub fn is_tie_breaker(&self) -> bool {
        self.id.mods == TIE_BREAKER_MODS
    }

    pub fn is_ex(&self) -> bool {
        self.id.mods == EX_MODS
    }

    /// Whether this slot can take part in lines.
    pub fn is_on_board(&self) -> bool {
        self.board_position.is_some() && !self.is_tie_breaker()
    }
}
