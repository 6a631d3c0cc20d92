//! Audio cue played when a toast becomes visible.
//!
//! Playback is fire-and-forget: each cue decodes its sound file on a short
//! lived thread and failures are only logged, the queue never waits on it.
//! Decoding and output go through `rodio` when the `audio` feature is on.

#[cfg(feature = "audio")]
use std::fs::File;
#[cfg(feature = "audio")]
use std::io::BufReader;
#[cfg(feature = "audio")]
use std::path::{Path, PathBuf};
#[cfg(feature = "audio")]
use std::sync::Arc;
#[cfg(feature = "audio")]
use std::sync::atomic::{AtomicUsize, Ordering};

#[cfg(feature = "audio")]
use rodio::{Decoder, OutputStream, Sink};
#[cfg(feature = "audio")]
use tracing::trace;
use tracing::warn;

use crate::config::AudioSettings;
#[cfg(feature = "audio")]
use crate::error::AudioError;
use crate::types::Notification;

/// Cues allowed to play at the same time; extra cues are dropped.
#[cfg(feature = "audio")]
const MAX_CONCURRENT_CUES: usize = 2;

pub trait AudioCue {
    fn play(&self, notification: &Notification);
}

impl<A: AudioCue + ?Sized> AudioCue for Box<A> {
    fn play(&self, notification: &Notification) {
        (**self).play(notification);
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl AudioCue for Silent {
    fn play(&self, _: &Notification) {}
}

/// Plays one sound file (WAV, OGG, MP3, FLAC) through the default output device.
#[cfg(feature = "audio")]
#[derive(Debug, Clone)]
pub struct SoundCue {
    sound: PathBuf,
    active: Arc<AtomicUsize>,
}

#[cfg(feature = "audio")]
impl SoundCue {
    pub fn new(sound: impl Into<PathBuf>) -> Self {
        Self {
            sound: sound.into(),
            active: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn try_play(&self) -> Result<(), AudioError> {
        if !self.sound.is_file() {
            return Err(AudioError::FileNotFound(self.sound.clone()));
        }

        if self
            .active
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                (n < MAX_CONCURRENT_CUES).then_some(n + 1)
            })
            .is_err()
        {
            trace!("audio cue dropped, too many cues playing");
            return Ok(());
        }

        let sound = self.sound.clone();
        let active = Arc::clone(&self.active);
        let spawned = std::thread::Builder::new()
            .name("audio-cue".into())
            .spawn(move || {
                let result = play_blocking(&sound);
                active.fetch_sub(1, Ordering::SeqCst);
                if let Err(err) = result {
                    warn!(error = %err, path = %sound.display(), "audio cue playback failed");
                }
            });
        if let Err(err) = spawned {
            self.active.fetch_sub(1, Ordering::SeqCst);
            return Err(AudioError::Spawn(err));
        }
        Ok(())
    }
}

#[cfg(feature = "audio")]
impl AudioCue for SoundCue {
    fn play(&self, notification: &Notification) {
        match self.try_play() {
            Ok(()) => trace!(kind = %notification.kind, "audio cue started"),
            Err(err) => warn!(error = %err, "audio cue failed"),
        }
    }
}

#[cfg(feature = "audio")]
fn play_blocking(path: &Path) -> Result<(), AudioError> {
    let (_stream, handle) = OutputStream::try_default().map_err(|_| AudioError::NoAudioDevice)?;

    let file = File::open(path).map_err(|source| AudioError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let source =
        Decoder::new(BufReader::new(file)).map_err(|err| AudioError::Decode(err.to_string()))?;

    let sink = Sink::try_new(&handle).map_err(|err| AudioError::Playback(err.to_string()))?;
    sink.append(source);
    sink.sleep_until_end();
    Ok(())
}

/// Builds the cue described by `settings`, silent when audio is disabled.
pub fn cue_from_settings(settings: &AudioSettings) -> Box<dyn AudioCue + Send> {
    match (settings.enabled, settings.sound.as_ref()) {
        #[cfg(feature = "audio")]
        (true, Some(sound)) => Box::new(SoundCue::new(sound.clone())),
        #[cfg(not(feature = "audio"))]
        (true, Some(sound)) => {
            warn!(path = %sound.display(), "built without the `audio` feature; cues are silent");
            Box::new(Silent)
        }
        _ => Box::new(Silent),
    }
}

#[cfg(all(test, feature = "audio"))]
mod tests {
    use super::{AudioCue, SoundCue};
    use crate::error::AudioError;
    use crate::types::Notification;
    use std::sync::atomic::Ordering;

    #[test]
    fn missing_sound_is_reported_not_raised() {
        let cue = SoundCue::new("/nonexistent/toaster-cue.oga");
        assert!(matches!(cue.try_play(), Err(AudioError::FileNotFound(_))));
        assert_eq!(cue.active.load(Ordering::SeqCst), 0);
        cue.play(&Notification::info("still fine"));
    }

    #[test]
    fn saturated_cue_drops_extra_playback() {
        let dir = std::env::temp_dir().join(format!("toaster-cue-{}", std::process::id()));
        std::fs::create_dir_all(&dir).ok();
        let path = dir.join("blank.wav");
        std::fs::write(&path, b"not really audio").ok();

        let cue = SoundCue::new(&path);
        cue.active.store(super::MAX_CONCURRENT_CUES, Ordering::SeqCst);
        assert!(cue.try_play().is_ok());
        assert_eq!(cue.active.load(Ordering::SeqCst), super::MAX_CONCURRENT_CUES);

        std::fs::remove_file(&path).ok();
    }
}
