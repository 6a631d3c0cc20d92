//! Synchronous toast queue: backlog, visible slots, slot-1 countdown and
//! leaving toasts.
//!
//! The queue never sleeps. Callers feed it the current [`Instant`], ask for
//! [`ToastQueue::next_wake`] and call [`ToastQueue::advance`] once that
//! instant is reached. Every state change is recorded as a [`RenderOp`]
//! retrieved with [`ToastQueue::drain`].

use std::collections::VecDeque;
use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::ToastSettings;
use crate::present::RenderOp;
use crate::types::{Notification, Position, Slot, ToastId};

/// Number of progress ticks in one countdown.
pub const COUNTDOWN_STEPS: u32 = 100;

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Toast {
    pub id: ToastId,
    #[serde(flatten)]
    pub notification: Notification,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ToastState {
    Queued,
    Visible(Slot),
    Dismissing,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DismissReason {
    Expired,
    Closed,
}

impl DismissReason {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Expired => "expired",
            Self::Closed => "closed",
        }
    }
}

#[derive(Debug)]
struct Countdown {
    generation: u64,
    toast: ToastId,
    started: Instant,
    duration: Duration,
    step: Duration,
    ticks: u32,
}

impl Countdown {
    fn percent(&self) -> u8 {
        u8::try_from(COUNTDOWN_STEPS.saturating_sub(self.ticks)).unwrap_or(0)
    }

    fn next_tick(&self) -> Option<Instant> {
        (self.ticks < COUNTDOWN_STEPS).then(|| self.started + self.step * (self.ticks + 1))
    }

    fn deadline(&self) -> Instant {
        self.started + self.duration
    }
}

#[derive(Debug)]
struct PendingExit {
    toast: ToastId,
    due: Instant,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct CountdownView {
    pub toast: ToastId,
    pub percent: u8,
    #[serde(skip)]
    pub generation: u64,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct SlotView {
    pub slot: Slot,
    #[serde(flatten)]
    pub toast: Toast,
}

/// Serializable picture of the queue at one instant.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Snapshot {
    pub position: Position,
    pub timer_ms: u64,
    pub container_visible: bool,
    pub slots: Vec<SlotView>,
    pub queued: usize,
    pub overflow: usize,
    pub overflow_label: String,
    pub countdown: Option<CountdownView>,
    pub leaving: usize,
}

/// `"+ N"` for a positive backlog, empty otherwise.
#[must_use]
pub fn overflow_label(count: usize) -> String {
    if count > 0 {
        format!("+ {count}")
    } else {
        String::new()
    }
}

#[derive(Debug)]
pub struct ToastQueue {
    entries: VecDeque<Toast>,
    leaving: Vec<PendingExit>,
    countdown: Option<Countdown>,
    generation: u64,
    next_id: u64,
    position: Position,
    timer: Duration,
    exit_delay: Duration,
    container_visible: bool,
    outbox: Vec<RenderOp>,
}

impl ToastQueue {
    pub fn new(settings: &ToastSettings) -> Self {
        Self {
            entries: VecDeque::new(),
            leaving: Vec::new(),
            countdown: None,
            generation: 0,
            next_id: 1,
            position: settings.position,
            timer: settings.timer,
            exit_delay: settings.exit_delay,
            container_visible: false,
            outbox: vec![RenderOp::Position {
                position: settings.position,
            }],
        }
    }

    /// Appends a toast to the tail of the queue.
    pub fn push(&mut self, notification: Notification, now: Instant) -> ToastId {
        let id = ToastId(self.next_id);
        self.next_id += 1;

        debug!(toast_id = %id, kind = %notification.kind, "toast queued");
        self.entries.push_back(Toast { id, notification });

        if let Some(slot) = Slot::from_index(self.entries.len() - 1) {
            self.materialize(slot, now);
        }
        self.emit_overflow();
        id
    }

    /// Dismisses whatever occupies `slot`. Returns `false` for an empty slot.
    pub fn dismiss_slot(&mut self, slot: Slot, now: Instant) -> bool {
        if slot.index() >= self.visible_len() {
            debug!(%slot, "dismiss ignored: slot is empty");
            return false;
        }
        self.remove_at(slot.index(), now, DismissReason::Closed);
        true
    }

    /// Dismisses a visible toast by id. Queued or leaving toasts are left alone.
    pub fn dismiss(&mut self, id: ToastId, now: Instant) -> bool {
        match self.entries.iter().position(|toast| toast.id == id) {
            Some(index) if index < Slot::COUNT => {
                self.remove_at(index, now, DismissReason::Closed);
                true
            }
            Some(_) => {
                debug!(toast_id = %id, "dismiss ignored: toast is not visible yet");
                false
            }
            None => {
                debug!(toast_id = %id, "dismiss ignored: unknown or leaving toast");
                false
            }
        }
    }

    /// Applies a position by name; unsupported names keep the current one.
    pub fn set_position(&mut self, raw: &str) -> bool {
        match raw.parse::<Position>() {
            Ok(position) => {
                self.apply_position(position);
                true
            }
            Err(err) => {
                warn!(value = raw, current = %self.position, "{err}; keeping current position");
                false
            }
        }
    }

    pub fn apply_position(&mut self, position: Position) {
        self.position = position;
        self.outbox.push(RenderOp::Position { position });
    }

    /// Changes the countdown length for countdowns started from now on.
    pub fn set_timer(&mut self, timer: Duration) -> bool {
        if timer.is_zero() {
            warn!("ignoring zero toast timer");
            return false;
        }
        self.timer = timer;
        true
    }

    /// Earliest instant at which [`Self::advance`] has work to do.
    pub fn next_wake(&self) -> Option<Instant> {
        let countdown = self.countdown.as_ref().map(|cd| {
            let deadline = cd.deadline();
            cd.next_tick().map_or(deadline, |tick| tick.min(deadline))
        });
        let exit = self.leaving.iter().map(|exit| exit.due).min();
        countdown.into_iter().chain(exit).min()
    }

    /// Runs every tick, expiry and removal due at `now`.
    pub fn advance(&mut self, now: Instant) {
        let mut expired = None;
        if let Some(cd) = self.countdown.as_mut() {
            while let Some(tick) = cd.next_tick() {
                if tick > now {
                    break;
                }
                cd.ticks += 1;
                self.outbox.push(RenderOp::Progress {
                    id: cd.toast,
                    percent: cd.percent(),
                });
            }
            if cd.deadline() <= now {
                expired = Some((cd.toast, cd.generation));
            }
        }

        if let Some((id, generation)) = expired {
            self.countdown = None;
            if self.entries.front().map(|toast| toast.id) == Some(id) {
                self.remove_at(0, now, DismissReason::Expired);
            } else {
                warn!(toast_id = %id, generation, "stale countdown dropped");
            }
        }

        self.finish_exits(now);
    }

    /// Takes the render operations recorded since the last call.
    pub fn drain(&mut self) -> Vec<RenderOp> {
        std::mem::take(&mut self.outbox)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True once nothing is queued and every exit transition has finished.
    pub fn is_idle(&self) -> bool {
        self.entries.is_empty() && self.leaving.is_empty()
    }

    pub fn overflow(&self) -> usize {
        self.entries.len().saturating_sub(Slot::COUNT)
    }

    pub const fn position(&self) -> Position {
        self.position
    }

    pub const fn timer(&self) -> Duration {
        self.timer
    }

    pub const fn container_visible(&self) -> bool {
        self.container_visible
    }

    pub fn visible(&self) -> impl Iterator<Item = (Slot, &Toast)> {
        self.entries
            .iter()
            .enumerate()
            .filter_map(|(index, toast)| Slot::from_index(index).map(|slot| (slot, toast)))
    }

    pub fn countdown(&self) -> Option<CountdownView> {
        self.countdown.as_ref().map(|cd| CountdownView {
            toast: cd.toast,
            percent: cd.percent(),
            generation: cd.generation,
        })
    }

    pub fn state_of(&self, id: ToastId) -> Option<ToastState> {
        if let Some(index) = self.entries.iter().position(|toast| toast.id == id) {
            return Some(
                Slot::from_index(index).map_or(ToastState::Queued, ToastState::Visible),
            );
        }
        self.leaving
            .iter()
            .any(|exit| exit.toast == id)
            .then_some(ToastState::Dismissing)
    }

    pub fn snapshot(&self) -> Snapshot {
        let overflow = self.overflow();
        Snapshot {
            position: self.position,
            timer_ms: u64::try_from(self.timer.as_millis()).unwrap_or(u64::MAX),
            container_visible: self.container_visible,
            slots: self
                .visible()
                .map(|(slot, toast)| SlotView {
                    slot,
                    toast: toast.clone(),
                })
                .collect(),
            queued: self.entries.len(),
            overflow,
            overflow_label: overflow_label(overflow),
            countdown: self.countdown(),
            leaving: self.leaving.len(),
        }
    }

    fn visible_len(&self) -> usize {
        self.entries.len().min(Slot::COUNT)
    }

    fn materialize(&mut self, slot: Slot, now: Instant) {
        let Some(toast) = self.entries.get(slot.index()).cloned() else {
            return;
        };
        if !self.container_visible {
            self.container_visible = true;
            self.outbox.push(RenderOp::ShowContainer);
        }
        debug!(toast_id = %toast.id, %slot, "toast visible");
        self.outbox.push(RenderOp::Mount { slot, toast });
        if slot == Slot::First {
            self.start_countdown(now);
        }
    }

    fn start_countdown(&mut self, now: Instant) {
        let Some(head) = self.entries.front() else {
            self.countdown = None;
            return;
        };
        self.generation += 1;
        let countdown = Countdown {
            generation: self.generation,
            toast: head.id,
            started: now,
            duration: self.timer,
            step: self.timer / COUNTDOWN_STEPS,
            ticks: 0,
        };
        debug!(
            toast_id = %countdown.toast,
            generation = countdown.generation,
            timer = ?countdown.duration,
            "countdown started"
        );
        self.outbox.push(RenderOp::Progress {
            id: countdown.toast,
            percent: countdown.percent(),
        });
        self.countdown = Some(countdown);
    }

    fn remove_at(&mut self, index: usize, now: Instant, reason: DismissReason) {
        let Some(slot) = Slot::from_index(index) else {
            return;
        };
        let Some(toast) = self.entries.remove(index) else {
            return;
        };

        info!(toast_id = %toast.id, %slot, reason = reason.as_str(), "toast dismissed");
        self.outbox.push(RenderOp::BeginExit { id: toast.id, slot });

        if slot == Slot::First {
            self.countdown = None;
        }

        for target in index..Slot::COUNT - 1 {
            let (Some(to), Some(from), Some(moved)) = (
                Slot::from_index(target),
                Slot::from_index(target + 1),
                self.entries.get(target),
            ) else {
                break;
            };
            self.outbox.push(RenderOp::Relabel {
                from,
                to,
                id: moved.id,
            });
        }

        if self.entries.len() >= Slot::COUNT {
            self.materialize(Slot::Third, now);
        }
        self.emit_overflow();

        self.leaving.push(PendingExit {
            toast: toast.id,
            due: now + self.exit_delay,
        });
    }

    fn finish_exits(&mut self, now: Instant) {
        let mut done: Vec<PendingExit> = Vec::new();
        let mut index = 0;
        while index < self.leaving.len() {
            if self.leaving[index].due <= now {
                done.push(self.leaving.swap_remove(index));
            } else {
                index += 1;
            }
        }
        if done.is_empty() {
            return;
        }
        done.sort_by_key(|exit| exit.due);
        for exit in done {
            self.outbox.push(RenderOp::Remove { id: exit.toast });
        }

        // Every finished removal restarts slot 1 from a full countdown.
        if !self.entries.is_empty() {
            self.start_countdown(now);
        } else if self.leaving.is_empty() && self.container_visible {
            self.container_visible = false;
            self.outbox.push(RenderOp::HideContainer);
        }
    }

    fn emit_overflow(&mut self) {
        self.outbox.push(RenderOp::Overflow {
            count: self.overflow(),
        });
    }
}
