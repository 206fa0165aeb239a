use crate::{Cell, ChoiceKind, ExMarkKind, MatchBoardState, BOARD_SIZE};

const MIN_CELL_WIDTH: usize = 7;

/// Draws the current layout of the board, one slot tag per cell.
///
/// The tag is followed by `R`/`B` for a win, `x` for a ban or `p` for a pick,
/// then `+` if the beatmap is protected and `!` if it is trapped.
/// Cells grow with the longest tag.
/// Marked EX slots are listed below the board.
pub fn visualize_board(state: &MatchBoardState) -> String {
    let tags: Vec<Vec<String>> = (1..=BOARD_SIZE)
        .map(|row| {
            (1..=BOARD_SIZE)
                .map(|column| cell_tag(state, Cell::new(column, row)))
                .collect()
        })
        .collect();
    // One column of space in front of each tag
    let cell_width = tags
        .iter()
        .flatten()
        .map(|tag| tag.chars().count() + 1)
        .fold(MIN_CELL_WIDTH, usize::max);

    // Draw the top of the box
    let mut result = String::from("     ");
    for column in 1..=BOARD_SIZE {
        result += &format!("{:<width$}", column, width = cell_width);
    }
    result += "\n    ╭";
    for _ in 1..=BOARD_SIZE {
        result += &"─".repeat(cell_width);
    }
    result += "╮\n";

    for (row, row_tags) in (1..=BOARD_SIZE).zip(&tags) {
        result += &format!("{:>3} │", row);
        for tag in row_tags {
            result += &format!(" {:<width$}", tag, width = cell_width - 1);
        }
        result += "│\n";
    }

    // Draw the bottom of the box
    result += "    ╰";
    for _ in 1..=BOARD_SIZE {
        result += &"─".repeat(cell_width);
    }
    result += "╯";

    for slot in state.grid().slots().iter().filter(|slot| slot.is_ex()) {
        if let Some(mark) = state.extra_picks().get(slot.beatmap_id) {
            let kind = match mark.kind {
                ExMarkKind::Pick => "picked",
                ExMarkKind::Win => "won",
            };
            result += &format!("\n    {} {} by {}", slot.id, kind, mark.team);
        }
    }
    result
}

fn cell_tag(state: &MatchBoardState, cell: Cell) -> String {
    let Some(slot) = state.grid().beatmap_at(cell) else {
        return String::from("·");
    };
    let mut tag = slot.id.to_string();
    match state.current_choice(slot.beatmap_id).map(|choice| choice.kind) {
        Some(ChoiceKind::RedWin) => tag.push('R'),
        Some(ChoiceKind::BlueWin) => tag.push('B'),
        Some(ChoiceKind::Ban) => tag.push('x'),
        Some(ChoiceKind::Pick) => tag.push('p'),
        _ => {}
    }
    if state.current_protect(slot.beatmap_id).is_some() {
        tag.push('+');
    }
    if state.current_trap(slot.beatmap_id).is_some() {
        tag.push('!');
    }
    tag
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arbitrary::full_round;
    use crate::{slot, Mode, TeamColour};

    #[test]
    fn marks_show_up_next_to_tags() {
        let mut state = MatchBoardState::new(&full_round()).unwrap();
        let click = |state: &mut MatchBoardState, team, kind, name| {
            let id = state.grid().resolve(&name).unwrap();
            let _ = state.click(Mode::new(team, kind), id).unwrap();
        };
        click(&mut state, TeamColour::Red, ChoiceKind::RedWin, slot!("NM1"));
        click(&mut state, TeamColour::Blue, ChoiceKind::Ban, slot!("HD2"));
        click(&mut state, TeamColour::Blue, ChoiceKind::Pick, slot!("DT4"));
        click(&mut state, TeamColour::Red, ChoiceKind::Protect, slot!("DT4"));
        click(&mut state, TeamColour::Blue, ChoiceKind::Trap, slot!("HR3"));

        let board = visualize_board(&state);
        let lines: Vec<&str> = board.lines().collect();
        assert_eq!(lines.len(), 2 + BOARD_SIZE as usize + 1);
        assert!(lines[2].contains("NM1R "));
        assert!(lines[2].contains("NM2 "));
        assert!(lines[3].contains("HD2x "));
        assert!(lines[4].contains("HR3! "));
        assert!(lines[5].contains("DT4p+"));
        // Every row has the same width
        let widths: Vec<usize> = lines[1..].iter().map(|l| l.chars().count()).collect();
        assert!(widths.iter().all(|&w| w == widths[0]), "{}", board);
    }

    #[test]
    fn long_tags_widen_every_cell() {
        let mut round = full_round();
        // DT4 becomes DT12
        round.slots[15].mod_index = 12;
        let mut state = MatchBoardState::new(&round).unwrap();
        let id = state.grid().resolve(&slot!("DT12")).unwrap();
        // Protect first, a won beatmap can't be protected any more
        for (team, kind) in [
            (TeamColour::Red, ChoiceKind::Protect),
            (TeamColour::Red, ChoiceKind::RedWin),
            (TeamColour::Blue, ChoiceKind::Trap),
        ] {
            assert_eq!(state.click(Mode::new(team, kind), id), Ok(crate::Outcome::Changed));
        }

        let board = visualize_board(&state);
        let lines: Vec<&str> = board.lines().collect();
        assert!(lines[5].ends_with(" DT12R+!│"), "{}", board);
        let widths: Vec<usize> = lines[1..].iter().map(|l| l.chars().count()).collect();
        assert!(widths.iter().all(|&w| w == widths[0]), "{}", board);
        // The column numbers stay above their cells
        assert_eq!(lines[0].find('4'), Some(5 + 3 * 8));
    }

    #[test]
    fn ex_marks_are_listed() {
        let mut round = full_round();
        round.use_board = false;
        let mut state = MatchBoardState::new(&round).unwrap();
        assert!(!visualize_board(&state).contains("EX1"));
        let ex = state.grid().resolve(&slot!("EX1")).unwrap();
        let _ = state
            .apply(crate::Operation::PickEx {
                team: TeamColour::Red,
                beatmap_id: ex,
            })
            .unwrap();
        assert!(visualize_board(&state).ends_with("EX1 picked by red"));
    }

    #[test]
    fn swapped_panels_are_drawn_at_their_new_cell() {
        let mut state = MatchBoardState::new(&full_round()).unwrap();
        let a = state.grid().resolve(&slot!("NM1")).unwrap();
        let b = state.grid().resolve(&slot!("DT4")).unwrap();
        let _ = state.swap(a, b).unwrap();
        let board = visualize_board(&state);
        let lines: Vec<&str> = board.lines().collect();
        assert!(lines[2].starts_with("  1 │ DT4"));
        assert!(lines[5].contains("NM1"));
    }
}
