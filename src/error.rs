use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Notify(#[from] NotifyError),
    #[error("telemetry initialization failed: {0}")]
    Telemetry(String),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration: {0}")]
    Parse(String),
    #[error("missing required configuration field: {field}")]
    MissingField { field: &'static str },
    #[error("invalid configuration for {field}: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },
    #[error("configuration error: {0}")]
    Other(String),
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("toast manager is no longer running")]
    Closed,
    #[error("audio cue failed")]
    Audio(#[from] AudioError),
}

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio output device available")]
    NoAudioDevice,
    #[error("sound file not found: {0}")]
    FileNotFound(PathBuf),
    #[error("failed to open sound file {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode sound file: {0}")]
    Decode(String),
    #[error("playback failed: {0}")]
    Playback(String),
    #[error("failed to spawn playback thread")]
    Spawn(#[source] std::io::Error),
}

impl<T> From<async_channel::SendError<T>> for NotifyError {
    fn from(_: async_channel::SendError<T>) -> Self {
        Self::Closed
    }
}

impl From<tokio::sync::oneshot::error::RecvError> for NotifyError {
    fn from(_: tokio::sync::oneshot::error::RecvError) -> Self {
        Self::Closed
    }
}

impl Error {
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        matches!(self, Self::Notify(NotifyError::Closed))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::Error;

    #[test]
    fn json_failures_keep_their_own_variant() {
        let err = Error::from(serde_json::from_str::<u8>("nope").unwrap_err());
        assert!(matches!(err, Error::Serialize(_)));
        assert!(!err.is_closed());
    }
}
