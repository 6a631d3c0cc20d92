use std::io::Write;

use tracing::{debug, trace, warn};

use crate::queue::{Toast, overflow_label};
use crate::types::{Position, Slot, ToastId};

/// One change the presentation layer has to reflect.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RenderOp {
    Position { position: Position },
    ShowContainer,
    HideContainer,
    /// A toast entered a slot; plays the enter animation.
    Mount { slot: Slot, toast: Toast },
    /// A visible toast moved down one slot without re-entering.
    Relabel { from: Slot, to: Slot, id: ToastId },
    BeginExit { id: ToastId, slot: Slot },
    Remove { id: ToastId },
    Progress { id: ToastId, percent: u8 },
    Overflow { count: usize },
}

pub trait Presenter {
    fn apply(&mut self, op: &RenderOp);
}

impl<P: Presenter + ?Sized> Presenter for Box<P> {
    fn apply(&mut self, op: &RenderOp) {
        (**self).apply(op);
    }
}

/// Logs every operation; useful headless.
#[derive(Debug, Default)]
pub struct TracingPresenter;

impl Presenter for TracingPresenter {
    fn apply(&mut self, op: &RenderOp) {
        match op {
            RenderOp::Progress { id, percent } => trace!(toast_id = %id, percent, "progress"),
            RenderOp::Mount { slot, toast } => debug!(
                toast_id = %toast.id,
                %slot,
                kind = %toast.notification.kind,
                message = %toast.notification.message,
                "mount"
            ),
            other => debug!(op = ?other, "render"),
        }
    }
}

/// Mirrors the slots and redraws a text frame on every visible change.
pub struct TerminalPresenter<W: Write> {
    out: W,
    position: Position,
    slots: [Option<Toast>; Slot::COUNT],
    leaving: Vec<Toast>,
    overflow: usize,
    percent: Option<u8>,
    visible: bool,
}

impl<W: Write> TerminalPresenter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            position: Position::default(),
            slots: [None, None, None],
            leaving: Vec::new(),
            overflow: 0,
            percent: None,
            visible: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn mirror(&mut self, op: &RenderOp) -> bool {
        match op {
            RenderOp::Position { position } => {
                self.position = *position;
                self.visible
            }
            RenderOp::ShowContainer => {
                self.visible = true;
                false
            }
            RenderOp::HideContainer => {
                self.visible = false;
                self.percent = None;
                true
            }
            RenderOp::Mount { slot, toast } => {
                if *slot == Slot::First {
                    self.percent = None;
                }
                self.slots[slot.index()] = Some(toast.clone());
                true
            }
            RenderOp::Relabel { from, to, id } => {
                let moved = self.slots[from.index()].take_if(|toast| toast.id == *id);
                if moved.is_some() {
                    self.slots[to.index()] = moved;
                }
                if *to == Slot::First {
                    self.percent = None;
                }
                true
            }
            RenderOp::BeginExit { id, slot } => {
                if let Some(toast) = self.slots[slot.index()].take_if(|toast| toast.id == *id) {
                    self.leaving.push(toast);
                }
                true
            }
            RenderOp::Remove { id } => {
                self.leaving.retain(|toast| toast.id != *id);
                false
            }
            RenderOp::Progress { percent, .. } => {
                self.percent = Some(*percent);
                percent % 10 == 0
            }
            RenderOp::Overflow { count } => {
                let changed = self.overflow != *count;
                self.overflow = *count;
                changed
            }
        }
    }

    fn draw(&mut self) -> std::io::Result<()> {
        if !self.visible {
            return writeln!(self.out, "[{}] (hidden)", self.position);
        }
        let counter = overflow_label(self.overflow);
        if self.position.is_bottom() && !counter.is_empty() {
            writeln!(self.out, "    {counter}")?;
        }

        let mut rows: Vec<(Slot, &Toast)> = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(index, toast)| Some((Slot::from_index(index)?, toast.as_ref()?)))
            .collect();
        if self.position.is_bottom() {
            rows.reverse();
        }

        writeln!(self.out, "[{}]", self.position)?;
        for (slot, toast) in rows {
            let palette = toast.notification.kind.palette();
            write!(
                self.out,
                "  {slot} {} {}",
                palette.icon.glyph(),
                toast.notification.message
            )?;
            match (slot, self.percent) {
                (Slot::First, Some(percent)) => writeln!(self.out, "  ({percent}%)")?,
                _ => writeln!(self.out)?,
            }
        }
        if !self.position.is_bottom() && !counter.is_empty() {
            writeln!(self.out, "    {counter}")?;
        }
        self.out.flush()
    }
}

impl<W: Write> Presenter for TerminalPresenter<W> {
    fn apply(&mut self, op: &RenderOp) {
        if self.mirror(op) {
            if let Err(err) = self.draw() {
                warn!(error = %err, "failed to draw toast frame");
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::{Presenter, RenderOp, TerminalPresenter};
    use crate::queue::Toast;
    use crate::types::{Notification, Position, Slot, ToastId};

    fn toast(id: u64, notification: Notification) -> Toast {
        Toast {
            id: ToastId(id),
            notification,
        }
    }

    #[test]
    fn terminal_frame_follows_relabels() {
        let mut presenter = TerminalPresenter::new(Vec::new());
        for op in [
            RenderOp::ShowContainer,
            RenderOp::Mount {
                slot: Slot::First,
                toast: toast(1, Notification::success("Saved")),
            },
            RenderOp::Mount {
                slot: Slot::Second,
                toast: toast(2, Notification::error("Failed")),
            },
        ] {
            presenter.apply(&op);
        }
        let _ = std::mem::take(&mut presenter.out);

        presenter.apply(&RenderOp::BeginExit {
            id: ToastId(1),
            slot: Slot::First,
        });
        presenter.apply(&RenderOp::Relabel {
            from: Slot::Second,
            to: Slot::First,
            id: ToastId(2),
        });

        let text = String::from_utf8(presenter.into_inner()).unwrap();
        let last_frame = text.rsplit("[top-right]").next().unwrap();
        assert!(last_frame.contains("1 ✖ Failed"));
        assert!(!last_frame.contains("Saved"));
    }

    #[test]
    fn bottom_positions_draw_counter_first() {
        let mut presenter = TerminalPresenter::new(Vec::new());
        presenter.apply(&RenderOp::Position {
            position: Position::BottomLeft,
        });
        presenter.apply(&RenderOp::ShowContainer);
        presenter.apply(&RenderOp::Overflow { count: 2 });

        let text = String::from_utf8(presenter.into_inner()).unwrap();
        assert_eq!(text, "    + 2\n[bottom-left]\n");
    }
}
