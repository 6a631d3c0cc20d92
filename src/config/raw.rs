use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use serde_with::serde_as;
use tracing::warn;

use crate::Result;
use crate::error::ConfigError;
use crate::types::Position;

use super::defaults::{
    default_channel_capacity, default_exit_delay, default_position, default_timer,
};
use super::env::{env_bool, env_duration, env_string};
use super::{AudioSettings, CHANNEL_CAPACITY_BOUNDS, Config, HumantimeDuration, ToastSettings};

pub(super) fn load(path: impl AsRef<Path>) -> std::result::Result<RawConfig, ConfigError> {
    let mut builder = ::config::Config::builder();
    let path = path.as_ref();
    builder = builder.add_source(::config::File::from(path).required(false));
    builder = builder.add_source(
        ::config::Environment::with_prefix("TOASTER")
            .separator("__")
            .try_parsing(true),
    );

    builder
        .build()
        .map_err(|err| ConfigError::Other(err.to_string()))?
        .try_deserialize()
        .map_err(|err| ConfigError::Parse(err.to_string()))
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct RawConfig {
    #[serde(default)]
    pub(super) toast: RawToast,
    #[serde(default)]
    pub(super) audio: RawAudio,
}

#[serde_as]
#[derive(Debug, Deserialize)]
pub(super) struct RawToast {
    #[serde(default = "default_position")]
    pub(super) position: String,
    #[serde(default = "default_timer")]
    #[serde_as(as = "HumantimeDuration")]
    pub(super) timer: Duration,
    #[serde(default = "default_exit_delay")]
    #[serde_as(as = "HumantimeDuration")]
    pub(super) exit_delay: Duration,
    #[serde(default = "default_channel_capacity")]
    pub(super) channel_capacity: usize,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct RawAudio {
    #[serde(default)]
    pub(super) enabled: bool,
    #[serde(default)]
    pub(super) sound: Option<PathBuf>,
}

impl RawConfig {
    pub(super) fn apply_env_overrides(&mut self) -> std::result::Result<(), ConfigError> {
        if let Some(position) = env_string("TOAST_POSITION")? {
            self.toast.position = position;
        }
        if let Some(timer) = env_duration("TOAST_TIMER")? {
            self.toast.timer = timer;
        }
        if let Some(delay) = env_duration("TOAST_EXIT_DELAY")? {
            self.toast.exit_delay = delay;
        }
        if let Some(enabled) = env_bool("TOAST_AUDIO")? {
            self.audio.enabled = enabled;
        }
        if let Some(sound) = env_string("TOAST_SOUND")? {
            self.audio.sound = Some(PathBuf::from(sound));
        }
        Ok(())
    }

    pub(super) fn validate_and_build(self) -> Result<Config> {
        let position = self.toast.position.parse::<Position>().unwrap_or_else(|err| {
            warn!(value = %self.toast.position, "{err}; using {}", Position::default());
            Position::default()
        });

        if self.toast.timer.is_zero() {
            return Err(ConfigError::InvalidField {
                field: "toast.timer",
                message: "timer must be greater than zero".to_string(),
            }
            .into());
        }
        if !CHANNEL_CAPACITY_BOUNDS.contains(&self.toast.channel_capacity) {
            return Err(ConfigError::InvalidField {
                field: "toast.channel_capacity",
                message: format!(
                    "expected between {} and {}, got {}",
                    CHANNEL_CAPACITY_BOUNDS.start(),
                    CHANNEL_CAPACITY_BOUNDS.end(),
                    self.toast.channel_capacity
                ),
            }
            .into());
        }
        if self.audio.enabled && self.audio.sound.is_none() {
            return Err(ConfigError::MissingField {
                field: "audio.sound",
            }
            .into());
        }

        Ok(Config {
            toast: ToastSettings {
                position,
                timer: self.toast.timer,
                exit_delay: self.toast.exit_delay,
                channel_capacity: self.toast.channel_capacity,
            },
            audio: AudioSettings {
                enabled: self.audio.enabled,
                sound: self.audio.sound,
            },
        })
    }
}

impl Default for RawToast {
    fn default() -> Self {
        Self {
            position: default_position(),
            timer: default_timer(),
            exit_delay: default_exit_delay(),
            channel_capacity: default_channel_capacity(),
        }
    }
}
