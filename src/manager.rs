//! Async driver around [`ToastQueue`].
//!
//! One tokio task owns the queue, the presenter and the audio cue. Callers
//! talk to it through a cloneable [`ToastHandle`]; every timer is derived
//! from [`ToastQueue::next_wake`], so replacing the slot-1 countdown also
//! replaces the only pending wake-up.

use std::time::Duration;

use async_channel::{Receiver, Sender, bounded};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info};

use crate::Result;
use crate::audio::AudioCue;
use crate::config::ToastSettings;
use crate::error::NotifyError;
use crate::present::{Presenter, RenderOp};
use crate::queue::{Snapshot, ToastQueue};
use crate::types::{Notification, Slot, ToastId};

enum Command {
    Notify {
        notification: Notification,
        reply: Option<oneshot::Sender<ToastId>>,
    },
    CloseSlot {
        slot: Slot,
        reply: oneshot::Sender<bool>,
    },
    Close {
        id: ToastId,
        reply: oneshot::Sender<bool>,
    },
    SetPosition {
        raw: String,
        reply: oneshot::Sender<bool>,
    },
    SetTimer {
        timer: Duration,
        reply: oneshot::Sender<bool>,
    },
    Snapshot {
        reply: oneshot::Sender<Snapshot>,
    },
}

/// Ingress to a running [`ToastManager`].
#[derive(Clone, Debug)]
pub struct ToastHandle {
    tx: Sender<Command>,
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Notify { .. } => "notify",
            Self::CloseSlot { .. } => "close-slot",
            Self::Close { .. } => "close",
            Self::SetPosition { .. } => "set-position",
            Self::SetTimer { .. } => "set-timer",
            Self::Snapshot { .. } => "snapshot",
        };
        f.write_str(name)
    }
}

impl ToastHandle {
    /// Queues a toast without waiting for its id.
    ///
    /// # Errors
    ///
    /// Fails with [`NotifyError::Closed`] once the manager has stopped.
    pub async fn set_notification(&self, notification: Notification) -> Result<()> {
        self.send(Command::Notify {
            notification,
            reply: None,
        })
        .await
    }

    /// Non-blocking variant for synchronous callers; a full channel drops the toast.
    ///
    /// # Errors
    ///
    /// Fails with [`NotifyError::Closed`] once the manager has stopped.
    pub fn try_set_notification(&self, notification: Notification) -> Result<bool> {
        match self.tx.try_send(Command::Notify {
            notification,
            reply: None,
        }) {
            Ok(()) => Ok(true),
            Err(async_channel::TrySendError::Full(_)) => {
                tracing::warn!("toast channel full; dropping notification");
                Ok(false)
            }
            Err(async_channel::TrySendError::Closed(_)) => Err(NotifyError::Closed.into()),
        }
    }

    /// Queues a toast and returns the id it was given.
    ///
    /// # Errors
    ///
    /// Fails with [`NotifyError::Closed`] once the manager has stopped.
    pub async fn notify(&self, notification: Notification) -> Result<ToastId> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Notify {
            notification,
            reply: Some(reply),
        })
        .await?;
        Ok(rx.await.map_err(NotifyError::from)?)
    }

    /// User dismissal of whatever sits in `slot`; `false` for an empty slot.
    ///
    /// # Errors
    ///
    /// Fails with [`NotifyError::Closed`] once the manager has stopped.
    pub async fn close_by_cross(&self, slot: Slot) -> Result<bool> {
        self.request(|reply| Command::CloseSlot { slot, reply }).await
    }

    /// Dismisses a visible toast by id.
    ///
    /// # Errors
    ///
    /// Fails with [`NotifyError::Closed`] once the manager has stopped.
    pub async fn close(&self, id: ToastId) -> Result<bool> {
        self.request(|reply| Command::Close { id, reply }).await
    }

    /// Moves the container; unsupported names are ignored and return `false`.
    ///
    /// # Errors
    ///
    /// Fails with [`NotifyError::Closed`] once the manager has stopped.
    pub async fn set_position(&self, raw: impl Into<String>) -> Result<bool> {
        let raw = raw.into();
        self.request(|reply| Command::SetPosition { raw, reply }).await
    }

    /// Sets the countdown length used from the next slot-1 promotion on.
    ///
    /// # Errors
    ///
    /// Fails with [`NotifyError::Closed`] once the manager has stopped.
    pub async fn set_timer(&self, timer: Duration) -> Result<bool> {
        self.request(|reply| Command::SetTimer { timer, reply }).await
    }

    /// # Errors
    ///
    /// Fails with [`NotifyError::Closed`] once the manager has stopped.
    pub async fn snapshot(&self) -> Result<Snapshot> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    /// Stops the manager once queued commands are handled.
    pub fn shutdown(&self) {
        self.tx.close();
    }

    async fn send(&self, command: Command) -> Result<()> {
        self.tx.send(command).await.map_err(NotifyError::from)?;
        Ok(())
    }

    async fn request<T>(&self, build: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply, rx) = oneshot::channel();
        self.send(build(reply)).await?;
        Ok(rx.await.map_err(NotifyError::from)?)
    }
}

pub struct ToastManager<P, A> {
    queue: ToastQueue,
    presenter: P,
    cue: A,
    rx: Receiver<Command>,
}

impl<P, A> ToastManager<P, A>
where
    P: Presenter,
    A: AudioCue,
{
    pub fn new(settings: &ToastSettings, presenter: P, cue: A) -> (Self, ToastHandle) {
        let (tx, rx) = bounded(settings.channel_capacity.max(1));
        let manager = Self {
            queue: ToastQueue::new(settings),
            presenter,
            cue,
            rx,
        };
        (manager, ToastHandle { tx })
    }

    /// Runs until every [`ToastHandle`] is dropped or [`ToastHandle::shutdown`] is called.
    pub async fn run(mut self) {
        self.flush();
        loop {
            let wake = self.queue.next_wake();
            tokio::select! {
                biased;
                command = self.rx.recv() => match command {
                    Ok(command) => {
                        let now = Instant::now();
                        self.queue.advance(now);
                        self.handle(command, now);
                    }
                    Err(_) => break,
                },
                () = sleep_until_wake(wake) => self.queue.advance(Instant::now()),
            }
            self.flush();
        }
        info!(pending = self.queue.len(), "toast manager stopped");
    }

    fn handle(&mut self, command: Command, now: Instant) {
        debug!(?command, "toast command");
        match command {
            Command::Notify {
                notification,
                reply,
            } => {
                let id = self.queue.push(notification, now);
                if let Some(reply) = reply {
                    let _ = reply.send(id);
                }
            }
            Command::CloseSlot { slot, reply } => {
                let _ = reply.send(self.queue.dismiss_slot(slot, now));
            }
            Command::Close { id, reply } => {
                let _ = reply.send(self.queue.dismiss(id, now));
            }
            Command::SetPosition { raw, reply } => {
                let _ = reply.send(self.queue.set_position(&raw));
            }
            Command::SetTimer { timer, reply } => {
                let _ = reply.send(self.queue.set_timer(timer));
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(self.queue.snapshot());
            }
        }
    }

    fn flush(&mut self) {
        for op in self.queue.drain() {
            if let RenderOp::Mount { toast, .. } = &op {
                self.cue.play(&toast.notification);
            }
            self.presenter.apply(&op);
        }
    }
}

impl<P, A> ToastManager<P, A>
where
    P: Presenter + Send + 'static,
    A: AudioCue + Send + 'static,
{
    /// Builds a manager and runs it on the current tokio runtime.
    pub fn spawn(settings: &ToastSettings, presenter: P, cue: A) -> (ToastHandle, JoinHandle<()>) {
        let (manager, handle) = Self::new(settings, presenter, cue);
        (handle, tokio::spawn(manager.run()))
    }
}

async fn sleep_until_wake(wake: Option<Instant>) {
    match wake {
        Some(at) => sleep_until(at).await,
        None => std::future::pending().await,
    }
}
