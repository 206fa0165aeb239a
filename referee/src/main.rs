use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use clap::Parser;
use referee::{load_round_config, play_match, MatchReport, Recorder};
use tourney_board::{visualize_board, Phase, TeamColour};
use tracing::info;
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
struct Args {
    /// Paths to command streams, one match each ("-" reads from stdin)
    #[clap(num_args(1..), required = true)]
    command_streams: Vec<PathBuf>,

    /// Path to the round configuration JSON file
    #[arg(short, long)]
    round: PathBuf,

    /// Record each match's applied commands as JSON files into this directory
    #[arg(short = 'd', long)]
    record_to_directory: Option<PathBuf>,

    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "info")]
    log_level: LevelFilter,
}

#[derive(Default)]
struct Tally {
    red: usize,
    blue: usize,
    draws: usize,
    open: usize,
}

impl Tally {
    fn add(&mut self, report: &MatchReport) {
        match (report.phase, report.winner_colour) {
            (Phase::Completed, TeamColour::Red) => self.red += 1,
            (Phase::Completed, TeamColour::Blue) => self.blue += 1,
            (_, TeamColour::Neutral) => self.draws += 1,
            _ => self.open += 1,
        }
    }
}

fn open_stream(path: &Path) -> anyhow::Result<Box<dyn BufRead>> {
    if path.as_os_str() == "-" {
        Ok(Box::new(std::io::stdin().lock()))
    } else {
        Ok(Box::new(BufReader::new(File::open(path)?)))
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    initialize_logging(args.log_level);

    let round = load_round_config(&args.round)?;
    info!(round = %round.name, matches = args.command_streams.len());

    let mut recorder = if let Some(dir_path) = args.record_to_directory {
        Some(Recorder::new(dir_path)?)
    } else {
        None
    };

    let mut tally = Tally::default();
    for (match_idx, path) in args.command_streams.iter().enumerate() {
        let reader = open_stream(path)?;
        let (session, report) = play_match(&round, reader, &mut recorder)?;
        println!("Match {} ({}):", match_idx + 1, path.display());
        println!("{}", visualize_board(session.state()));
        println!(
            "- {}, red {} : {} blue\n- {} commands applied, {} ignored\n- {:?}",
            report.evaluation.winner,
            report.scores.0,
            report.scores.1,
            report.applied,
            report.rejected,
            report.phase
        );
        tally.add(&report);
    }

    if args.command_streams.len() > 1 {
        println!(
            "\nEnd result:\n- {} won by red\n- {} won by blue\n- {} draws\n- {} undecided",
            tally.red, tally.blue, tally.draws, tally.open
        );
    }

    Ok(())
}

fn initialize_logging(level: LevelFilter) {
    let format = tracing_subscriber::fmt::format()
        .with_target(false)
        .compact();

    let filter = Targets::new().with_default(level);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(format)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}
