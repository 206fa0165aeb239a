use quickcheck::{Arbitrary, Gen};

use crate::{
    BeatmapId, BeatmapSlot, Cell, ChoiceKind, ChoiceLog, Grid, Mode, RoundConfig, SlotConfig,
    SlotId, TeamColour, BOARD_SIZE,
};

static BOARD_MODS: [&str; 4] = ["NM", "HD", "HR", "DT"];

/// A board where row `r` holds the slots of `BOARD_MODS[r - 1]`, ordered by index.
///
/// The slot on `(column, row)` has beatmap id `100 + (row - 1) * 4 + (column - 1)`.
pub fn full_board_slots() -> Vec<BeatmapSlot> {
    Cell::all()
        .map(|cell| BeatmapSlot {
            id: SlotId::new(BOARD_MODS[usize::from(cell.row - 1)], u32::from(cell.column)),
            beatmap_id: beatmap_at(cell),
            board_position: Some(cell),
        })
        .collect()
}

fn beatmap_at(cell: Cell) -> BeatmapId {
    BeatmapId(100 + u32::from((cell.row - 1) * BOARD_SIZE + (cell.column - 1)))
}

/// The board of [`full_board_slots()`] plus an EX and a TB slot that are not on the board.
pub fn full_round() -> RoundConfig {
    let mut slots: Vec<SlotConfig> = full_board_slots()
        .into_iter()
        .map(|slot| SlotConfig {
            mods: slot.id.mods,
            mod_index: slot.id.mod_index,
            beatmap_id: slot.beatmap_id,
            board_column: slot.board_position.map(|c| c.column),
            board_row: slot.board_position.map(|c| c.row),
        })
        .collect();
    for (mods, beatmap_id) in [("EX", 900), ("TB", 901)] {
        slots.push(SlotConfig {
            mods: String::from(mods),
            mod_index: 1,
            beatmap_id: BeatmapId(beatmap_id),
            board_column: None,
            board_row: None,
        });
    }
    RoundConfig {
        name: String::from("Test round"),
        use_board: true,
        final_stage: false,
        auto_advance_secs: None,
        slots,
    }
}

impl Arbitrary for Cell {
    fn arbitrary(g: &mut Gen) -> Self {
        Cell::new(
            u8::arbitrary(g) % BOARD_SIZE + 1,
            u8::arbitrary(g) % BOARD_SIZE + 1,
        )
    }
}

impl Arbitrary for TeamColour {
    fn arbitrary(g: &mut Gen) -> Self {
        *g.choose(&[TeamColour::Red, TeamColour::Blue]).unwrap()
    }
}

impl Arbitrary for ChoiceKind {
    fn arbitrary(g: &mut Gen) -> Self {
        *g.choose(&[
            ChoiceKind::Pick,
            ChoiceKind::Ban,
            ChoiceKind::Protect,
            ChoiceKind::Trap,
            ChoiceKind::RedWin,
            ChoiceKind::BlueWin,
        ])
        .unwrap()
    }
}

impl Arbitrary for Mode {
    fn arbitrary(g: &mut Gen) -> Self {
        Mode::new(TeamColour::arbitrary(g), ChoiceKind::arbitrary(g))
    }
}

/// Pairs of beatmaps that are both on the board of [`full_board_slots()`].
#[derive(Clone, Debug)]
pub struct BeatmapPairs(pub Vec<(BeatmapId, BeatmapId)>);

impl Arbitrary for BeatmapPairs {
    fn arbitrary(g: &mut Gen) -> Self {
        let pairs = Vec::<(Cell, Cell)>::arbitrary(g);
        BeatmapPairs(
            pairs
                .into_iter()
                .map(|(a, b)| (beatmap_at(a), beatmap_at(b)))
                .collect(),
        )
    }
}

/// Clicks on cells of the board of [`full_board_slots()`], in order.
#[derive(Clone, Debug)]
pub struct ClickSequence(pub Vec<(Mode, Cell)>);

impl Arbitrary for ClickSequence {
    fn arbitrary(g: &mut Gen) -> Self {
        ClickSequence(Vec::arbitrary(g))
    }
}

/// A log for the board of [`full_board_slots()`] where every cell carries at
/// most one of pick, ban, red win or blue win.
#[derive(Clone, Debug)]
pub struct MarkedBoard {
    pub log: ChoiceLog,
}

impl Arbitrary for MarkedBoard {
    fn arbitrary(g: &mut Gen) -> Self {
        let grid = Grid::new(full_board_slots()).unwrap();
        let mut log = ChoiceLog::new();
        for cell in Cell::all() {
            let beatmap_id = grid.beatmap_at(cell).unwrap().beatmap_id;
            // Wins are overrepresented so that lines are actually completed sometimes
            let kind = *g
                .choose(&[
                    None,
                    Some(ChoiceKind::Pick),
                    Some(ChoiceKind::Ban),
                    Some(ChoiceKind::RedWin),
                    Some(ChoiceKind::RedWin),
                    Some(ChoiceKind::RedWin),
                    Some(ChoiceKind::BlueWin),
                    Some(ChoiceKind::BlueWin),
                    Some(ChoiceKind::BlueWin),
                ])
                .unwrap();
            if let Some(kind) = kind {
                let team = kind.winner().unwrap_or_else(|| TeamColour::arbitrary(g));
                log.append(team, kind, beatmap_id);
            }
        }
        MarkedBoard { log }
    }
}
