use std::io::BufRead;
use std::time::{Duration, Instant};

use tourney_board::{
    AutoAdvance, Evaluation, MatchBoardState, Outcome, Phase, RemoteCommand, RoundConfig,
    TeamColour,
};
use tracing::{debug, info, trace, warn};

use crate::recording::Recorder;

/// The match time that passes with every tick of a command stream.
pub const TICK: Duration = Duration::from_secs(1);

/// What a match ended up as, after the last command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchReport {
    pub round_name: String,
    pub evaluation: Evaluation,
    pub scores: (u32, u32),
    pub winner_colour: TeamColour,
    pub phase: Phase,
    /// Commands that changed the board.
    pub applied: usize,
    /// Commands that were ignored, either by the rules or because of an error.
    pub rejected: usize,
    /// How often the presentation moved on to gameplay after a pick.
    pub auto_advances: usize,
}

/// One match, driven by remote commands and ticks of match time.
pub struct Session {
    state: MatchBoardState,
    auto_advance: Option<AutoAdvance>,
    now: Instant,
    applied: usize,
    rejected: usize,
    auto_advances: usize,
}

impl Session {
    pub fn new(round: &RoundConfig) -> anyhow::Result<Self> {
        let state = MatchBoardState::new(round)?;
        Ok(Self {
            state,
            auto_advance: round
                .auto_advance_secs
                .map(|secs| AutoAdvance::new(Duration::from_secs(secs))),
            now: Instant::now(),
            applied: 0,
            rejected: 0,
            auto_advances: 0,
        })
    }

    pub fn state(&self) -> &MatchBoardState {
        &self.state
    }

    /// Applies a command. Commands that can't be applied are logged and counted, never fatal.
    pub fn handle_command(&mut self, command: RemoteCommand, recorder: &mut Option<Recorder>) {
        trace!(?command, "Received command");
        match self.state.apply_remote(command.clone()) {
            Ok(Outcome::Unchanged) => {
                debug!(?command, "Command had no effect");
                self.rejected += 1;
            }
            Ok(outcome) => {
                if let Some(timer) = &mut self.auto_advance {
                    if let Outcome::Picked { beatmap_id } = outcome {
                        debug!(%beatmap_id, delay = ?timer.delay(), "Scheduling auto-advance");
                        timer.reschedule(self.now);
                    } else if command == RemoteCommand::Reset && timer.is_pending() {
                        debug!("Cancelling auto-advance");
                        timer.cancel();
                    }
                }
                self.applied += 1;
                if let Some(recorder) = recorder {
                    recorder.store_command(command, outcome);
                }
            }
            Err(err) => {
                warn!(?command, "{}", err);
                self.rejected += 1;
            }
        }
    }

    /// Brings the board up to date and lets one [`TICK`] of match time pass.
    pub fn tick(&mut self) {
        self.recompute();
        self.now += TICK;
        if let Some(timer) = &mut self.auto_advance {
            if timer.poll(self.now) {
                info!(round = self.state.round_name(), "Moving on to gameplay");
                self.auto_advances += 1;
            }
        }
    }

    /// Brings the board up to date and reports the result.
    pub fn finish(&mut self) -> MatchReport {
        self.recompute();
        MatchReport {
            round_name: String::from(self.state.round_name()),
            evaluation: self.state.evaluation(),
            scores: self.state.scores(),
            winner_colour: self.state.winner_colour(),
            phase: self.state.phase(),
            applied: self.applied,
            rejected: self.rejected,
            auto_advances: self.auto_advances,
        }
    }

    fn recompute(&mut self) {
        if let Some(evaluation) = self.state.recompute() {
            let (red, blue) = self.state.scores();
            info!(
                round = self.state.round_name(),
                winner = %evaluation.winner,
                tie_breaker = evaluation.tie_breaker,
                phase = ?self.state.phase(),
                red,
                blue,
                "Board updated"
            );
            let snapshot = self.state.snapshot();
            if let (Some(team), Some(snapshot)) = (evaluation.winner.winner(), snapshot) {
                let lines: Vec<String> = snapshot
                    .won_lines(team)
                    .iter()
                    .map(ToString::to_string)
                    .collect();
                debug!(%team, ?lines, "Won lines");
            }
        }
    }
}

/// Replays a command stream against a fresh board of the given round.
///
/// Every line holds one JSON [`RemoteCommand`], and an empty line ends a tick.
/// Lines that are not valid commands abort the match.
pub fn play_match(
    round: &RoundConfig,
    reader: impl BufRead,
    recorder: &mut Option<Recorder>,
) -> anyhow::Result<(Session, MatchReport)> {
    let mut session = Session::new(round)?;
    for (line_idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            session.tick();
            continue;
        }
        let command: RemoteCommand = match serde_json::from_str(line) {
            Ok(command) => command,
            Err(err) => anyhow::bail!("Invalid command on line {}: {}", line_idx + 1, err),
        };
        session.handle_command(command, recorder);
    }

    let report = session.finish();
    if let Some(rec) = recorder {
        let path = rec.write_match_recording(&report)?;
        debug!(path = %path.display(), "Wrote match recording");
    }
    Ok((session, report))
}

#[cfg(test)]
mod tests {
    use tourney_board::{BeatmapId, SlotConfig, WinResult};

    use super::*;

    static BOARD_MODS: [&str; 4] = ["NM", "HD", "HR", "DT"];

    fn round(auto_advance_secs: Option<u64>) -> RoundConfig {
        let mut slots = Vec::new();
        for row in 1..=4u8 {
            for column in 1..=4u8 {
                slots.push(SlotConfig {
                    mods: String::from(BOARD_MODS[usize::from(row - 1)]),
                    mod_index: u32::from(column),
                    beatmap_id: BeatmapId(u32::from(row) * 10 + u32::from(column)),
                    board_column: Some(column),
                    board_row: Some(row),
                });
            }
        }
        slots.push(SlotConfig {
            mods: String::from("EX"),
            mod_index: 1,
            beatmap_id: BeatmapId(99),
            board_column: None,
            board_row: None,
        });
        RoundConfig {
            name: String::from("Semifinals"),
            use_board: true,
            final_stage: false,
            auto_advance_secs,
            slots,
        }
    }

    fn play(round: &RoundConfig, input: &str) -> anyhow::Result<MatchReport> {
        play_match(round, input.as_bytes(), &mut None).map(|(_, report)| report)
    }

    #[test]
    fn red_row_wins() {
        let input = r#"{"type": "MarkWin", "team": "red", "map_mod": "NM1"}
{"type": "MarkWin", "team": "red", "map_mod": "NM2"}

{"type": "MarkWin", "team": "red", "map_mod": "NM3"}
{"type": "MarkWin", "team": "red", "map_mod": "NM4"}
"#;
        let report = play(&round(None), input).unwrap();
        assert_eq!(report.evaluation.winner, WinResult::Red);
        assert_eq!(report.scores, (6, 0));
        assert_eq!(report.winner_colour, TeamColour::Red);
        assert_eq!(report.phase, Phase::Completed);
        assert_eq!(report.applied, 4);
        assert_eq!(report.rejected, 0);
    }

    #[test]
    fn bad_commands_are_skipped() {
        let input = r#"{"type": "Ban", "team": "blue", "map_mod": "NM1"}
{"type": "Pick", "team": "red", "map_mod": "NM1"}
{"type": "Pick", "team": "red", "map_mod": "EZ3"}
{"type": "MarkWin", "team": "neutral", "map_mod": "HD1"}
{"type": "Swap", "source": "NM2", "target": "EX1"}
{"type": "Pick", "team": "red", "map_mod": "HD1"}
"#;
        let report = play(&round(None), input).unwrap();
        assert_eq!(report.applied, 2);
        assert_eq!(report.rejected, 4);
        assert_eq!(report.phase, Phase::Board);
    }

    #[test]
    fn malformed_line_aborts() {
        let input = "{\"type\": \"Reset\"}\n{\"type\": \"Teleport\"}\n";
        let err = play(&round(None), input).unwrap_err();
        assert!(err.to_string().contains("line 2"), "{}", err);
    }

    #[test]
    fn picks_restart_auto_advance() {
        let pick = |slot: &str| {
            format!(r#"{{"type": "Pick", "team": "blue", "map_mod": "{}"}}"#, slot)
        };
        let mut session = Session::new(&round(Some(2))).unwrap();
        session.handle_command(serde_json::from_str(&pick("NM1")).unwrap(), &mut None);
        session.tick();
        // One tick later, which pushes the deadline back
        session.handle_command(serde_json::from_str(&pick("NM2")).unwrap(), &mut None);
        session.tick();
        assert_eq!(session.finish().auto_advances, 0);
        session.tick();
        assert_eq!(session.finish().auto_advances, 1);
        session.tick();
        session.tick();
        assert_eq!(session.finish().auto_advances, 1);

        let input = format!("{}\n\n{}\n\n\n\n\n", pick("NM1"), pick("NM2"));
        let report = play(&round(Some(2)), &input).unwrap();
        assert_eq!(report.auto_advances, 1);
    }

    #[test]
    fn reset_cancels_auto_advance() {
        let input = r#"{"type": "Pick", "team": "red", "map_mod": "HR2"}
{"type": "Reset"}



"#;
        let report = play(&round(Some(1)), input).unwrap();
        assert_eq!(report.auto_advances, 0);
        assert_eq!(report.applied, 2);
    }

    #[test]
    fn recording_is_written() {
        let dir = std::env::temp_dir().join(format!("referee_recording_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let mut recorder = Some(Recorder::new(dir.clone()).unwrap());
        let input = r#"{"type": "Pick", "team": "red", "map_mod": "DT4"}
{"type": "Pick", "team": "red", "map_mod": "XX1"}
{"type": "Undo", "map_mod": "DT4"}
"#;
        play_match(&round(None), input.as_bytes(), &mut recorder).unwrap();
        let path = dir.join("match_000001.json");
        let recording: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        std::fs::remove_dir_all(&dir).unwrap();
        assert_eq!(recording["round"], "Semifinals");
        let commands = recording["commands"].as_array().unwrap();
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0]["outcome"], "Picked");
        assert_eq!(commands[0]["beatmap_id"], 44);
        assert_eq!(commands[1]["command"]["type"], "Undo");
        assert_eq!(commands[1]["outcome"], "Changed");
    }
}
