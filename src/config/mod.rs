use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::Result;
use crate::error::{ConfigError, Error as ToastError};
use crate::types::Position;

mod defaults;
mod env;
mod raw;
mod serde;

pub(crate) use serde::HumantimeDuration;

pub const DEFAULT_TIMER: Duration = Duration::from_millis(5_000);
pub const DEFAULT_EXIT_DELAY: Duration = Duration::from_millis(500);
const CHANNEL_CAPACITY_BOUNDS: std::ops::RangeInclusive<usize> = 1..=4096;

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub toast: ToastSettings,
    pub audio: AudioSettings,
}

/// Queue behaviour: where it sits, how long slot 1 lives, how long exits take.
#[derive(Debug, Clone)]
pub struct ToastSettings {
    pub position: Position,
    pub timer: Duration,
    pub exit_delay: Duration,
    pub channel_capacity: usize,
}

#[derive(Debug, Clone, Default)]
pub struct AudioSettings {
    pub enabled: bool,
    /// Sound file decoded and played when a toast appears.
    pub sound: Option<PathBuf>,
}

impl Default for ToastSettings {
    fn default() -> Self {
        Self {
            position: Position::default(),
            timer: DEFAULT_TIMER,
            exit_delay: DEFAULT_EXIT_DELAY,
            channel_capacity: defaults::default_channel_capacity(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file and the environment.
    ///
    /// A missing file is fine unless `required` is set.
    ///
    /// # Errors
    ///
    /// Returns an error when a required file is missing, when the file or the
    /// environment cannot be parsed, or when the resulting values fail
    /// validation.
    pub fn from_env_and_file(path: impl AsRef<Path>, required: bool) -> Result<Self> {
        let path = path.as_ref();
        if required {
            std::fs::metadata(path).map_err(|source| ConfigError::FileRead {
                path: path.to_path_buf(),
                source,
            })?;
        }
        let mut raw = raw::load(path).map_err(ToastError::from)?;
        raw.apply_env_overrides().map_err(ToastError::from)?;
        raw.validate_and_build()
    }
}
