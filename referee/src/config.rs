use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tourney_board::RoundConfig;
use tracing::debug;

/// Reads a round configuration from a JSON file.
///
/// The board itself is only checked when a match is set up, so that a broken
/// configuration is reported together with the match that uses it.
pub fn load_round_config(path: &Path) -> anyhow::Result<RoundConfig> {
    let reader = BufReader::new(File::open(path)?);
    let config: RoundConfig = serde_json::from_reader(reader)?;
    debug!(round = %config.name, slots = config.slots.len(), "Loaded round configuration");
    Ok(config)
}
