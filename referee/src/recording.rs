use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tourney_board::{Evaluation, Outcome, Phase, RemoteCommand};

use crate::session::MatchReport;

/// Writes one JSON transcript per match into a directory.
pub struct Recorder {
    num: usize,
    directory: PathBuf,
    commands: Vec<RecordedCommand>,
}

impl Recorder {
    pub fn new(directory: PathBuf) -> anyhow::Result<Self> {
        if !directory.is_dir() {
            anyhow::bail!("Directory '{}' does not exist", directory.display());
        }
        Ok(Self {
            num: 1,
            directory,
            commands: Vec::new(),
        })
    }

    /// Remembers a command that was applied without error.
    pub fn store_command(&mut self, command: RemoteCommand, outcome: Outcome) {
        self.commands.push(RecordedCommand { command, outcome });
    }

    /// Writes the stored commands to `match_NNNNNN.json` and starts the next transcript.
    pub fn write_match_recording(&mut self, report: &MatchReport) -> anyhow::Result<PathBuf> {
        let filepath = self.directory.join(format!("match_{:0>6}.json", self.num));
        let writer = BufWriter::new(File::create(&filepath)?);
        let recording = MatchRecording {
            round: report.round_name.clone(),
            commands: std::mem::take(&mut self.commands),
            evaluation: report.evaluation,
            scores: report.scores,
            phase: report.phase,
        };
        serde_json::to_writer_pretty(writer, &recording)?;
        self.num += 1;
        Ok(filepath)
    }
}

#[derive(Serialize, Deserialize)]
pub struct MatchRecording {
    round: String,
    commands: Vec<RecordedCommand>,
    evaluation: Evaluation,
    scores: (u32, u32),
    phase: Phase,
}

#[derive(Serialize, Deserialize)]
pub struct RecordedCommand {
    command: RemoteCommand,
    #[serde(flatten)]
    outcome: Outcome,
}
