use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser};
use humantime::parse_duration;
use toaster::Position;

#[allow(clippy::struct_excessive_bools)]
#[derive(Parser, Debug)]
#[command(author, version, about = "Terminal toast queue driven from stdin", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file (default: toaster.toml, optional).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Container position, e.g. "bottom-left".
    #[arg(long, value_parser = parse_position)]
    pub position: Option<Position>,

    /// Countdown for the oldest visible toast (e.g. "3s").
    #[arg(long, value_parser = parse_duration)]
    pub timer: Option<Duration>,

    /// Never play the audio cue.
    #[arg(long, action = ArgAction::SetTrue)]
    pub no_audio: bool,

    /// After end of input, keep running until every toast has expired.
    #[arg(long, action = ArgAction::SetTrue)]
    pub wait: bool,

    /// Print `show` snapshots as JSON.
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Use a JSON layer for logs (`--features json-logs`).
    #[arg(long, action = ArgAction::SetTrue)]
    pub json_logs: bool,

    /// Explicit log filter (e.g. "toaster=debug").
    #[arg(long, value_name = "FILTER")]
    pub log_filter: Option<String>,
}

fn parse_position(raw: &str) -> Result<Position, String> {
    raw.parse()
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
