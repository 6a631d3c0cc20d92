#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::sleep;
use toaster::audio::AudioCue;
use toaster::config::ToastSettings;
use toaster::audio::Silent;
use toaster::present::{Presenter, RenderOp, TracingPresenter};
use toaster::{Notification, Slot, ToastHandle, ToastManager};

#[derive(Clone, Default)]
struct Recorder(Arc<Mutex<Vec<RenderOp>>>);

impl Recorder {
    fn ops(&self) -> Vec<RenderOp> {
        self.0.lock().unwrap().clone()
    }
}

impl Presenter for Recorder {
    fn apply(&mut self, op: &RenderOp) {
        self.0.lock().unwrap().push(op.clone());
    }
}

#[derive(Clone, Default)]
struct CountingCue(Arc<AtomicUsize>);

impl AudioCue for CountingCue {
    fn play(&self, _: &Notification) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }
}

fn start() -> (ToastHandle, Recorder, CountingCue) {
    let recorder = Recorder::default();
    let cue = CountingCue::default();
    let (handle, _task) =
        ToastManager::spawn(&ToastSettings::default(), recorder.clone(), cue.clone());
    (handle, recorder, cue)
}

async fn fill(handle: &ToastHandle) {
    handle.set_notification(Notification::success("Saved")).await.unwrap();
    handle.set_notification(Notification::error("Failed")).await.unwrap();
    handle.set_notification(Notification::info("Note")).await.unwrap();
    handle.set_notification(Notification::plain("Extra")).await.unwrap();
}

async fn shown(handle: &ToastHandle) -> Vec<String> {
    handle
        .snapshot()
        .await
        .unwrap()
        .slots
        .into_iter()
        .map(|view| view.toast.notification.message)
        .collect()
}

#[tokio::test(start_paused = true)]
async fn four_toasts_fill_three_slots() {
    let (handle, _recorder, cue) = start();
    fill(&handle).await;

    let snapshot = handle.snapshot().await.unwrap();
    insta::assert_json_snapshot!(snapshot, @r###"
    {
      "position": "top-right",
      "timer_ms": 5000,
      "container_visible": true,
      "slots": [
        {
          "slot": 1,
          "id": 1,
          "type": "success",
          "message": "Saved"
        },
        {
          "slot": 2,
          "id": 2,
          "type": "error",
          "message": "Failed"
        },
        {
          "slot": 3,
          "id": 3,
          "type": "info",
          "message": "Note"
        }
      ],
      "queued": 4,
      "overflow": 1,
      "overflow_label": "+ 1",
      "countdown": {
        "toast": 1,
        "percent": 100
      },
      "leaving": 0
    }
    "###);
    assert_eq!(cue.0.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn closing_first_slot_promotes_backlog() {
    let (handle, _recorder, cue) = start();
    fill(&handle).await;

    assert!(handle.close_by_cross(Slot::First).await.unwrap());
    assert_eq!(shown(&handle).await, ["Failed", "Note", "Extra"]);
    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.overflow, 0);
    assert_eq!(snapshot.overflow_label, "");
    assert_eq!(cue.0.load(Ordering::SeqCst), 4);

    sleep(Duration::from_millis(600)).await;
    let snapshot = handle.snapshot().await.unwrap();
    let failed = snapshot.slots[0].toast.id;
    assert_eq!(snapshot.countdown.map(|cd| cd.toast), Some(failed));
    assert_eq!(snapshot.leaving, 0);
}

#[tokio::test(start_paused = true)]
async fn closing_second_slot_restarts_head_countdown() {
    let (handle, _recorder, _cue) = start();
    let head = handle.notify(Notification::success("Saved")).await.unwrap();
    handle.set_notification(Notification::info("Note")).await.unwrap();

    sleep(Duration::from_millis(3_000)).await;
    assert!(handle.close_by_cross(Slot::Second).await.unwrap());
    sleep(Duration::from_millis(500)).await;

    let countdown = handle.snapshot().await.unwrap().countdown.unwrap();
    assert_eq!(countdown.toast, head);
    assert_eq!(countdown.percent, 100);

    sleep(Duration::from_millis(2_000)).await;
    assert_eq!(shown(&handle).await, ["Saved"]);
    sleep(Duration::from_millis(3_100)).await;
    assert!(shown(&handle).await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn tracing_presenter_runs_headless() {
    let (handle, task) = ToastManager::spawn(&ToastSettings::default(), TracingPresenter, Silent);
    handle.set_notification(Notification::error("Failed")).await.unwrap();
    assert_eq!(shown(&handle).await, ["Failed"]);

    handle.shutdown();
    task.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn lone_toast_expires_and_container_hides() {
    let (handle, recorder, _cue) = start();
    handle.set_notification(Notification::success("Saved")).await.unwrap();

    sleep(Duration::from_millis(5_600)).await;
    let snapshot = handle.snapshot().await.unwrap();
    assert!(!snapshot.container_visible);
    assert!(snapshot.slots.is_empty());
    assert_eq!(snapshot.queued, 0);
    assert_eq!(recorder.ops().last(), Some(&RenderOp::HideContainer));
}

#[tokio::test(start_paused = true)]
async fn unsupported_position_keeps_previous_one() {
    let (handle, _recorder, _cue) = start();
    assert!(handle.set_position("bottom-left").await.unwrap());
    assert!(!handle.set_position("middle").await.unwrap());
    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.position.as_str(), "bottom-left");
}

#[tokio::test(start_paused = true)]
async fn dismissed_head_gets_no_more_progress() {
    let (handle, recorder, _cue) = start();
    let first = handle.notify(Notification::success("Saved")).await.unwrap();
    let second = handle.notify(Notification::info("Note")).await.unwrap();

    sleep(Duration::from_millis(1_000)).await;
    assert!(handle.close(first).await.unwrap());
    sleep(Duration::from_millis(7_000)).await;

    let ops = recorder.ops();
    let exit_at = ops
        .iter()
        .position(|op| matches!(op, RenderOp::BeginExit { id, .. } if *id == first))
        .unwrap();
    assert!(!ops[exit_at..]
        .iter()
        .any(|op| matches!(op, RenderOp::Progress { id, .. } if *id == first)));
    assert!(ops[exit_at..]
        .iter()
        .any(|op| matches!(op, RenderOp::Progress { id, percent: 0 } if *id == second)));
    assert_eq!(handle.snapshot().await.unwrap().queued, 0);
}

#[tokio::test(start_paused = true)]
async fn new_timer_applies_to_next_countdown() {
    let (handle, _recorder, _cue) = start();
    handle.set_notification(Notification::success("Saved")).await.unwrap();
    handle.set_notification(Notification::info("Note")).await.unwrap();
    assert!(handle.set_timer(Duration::from_millis(1_000)).await.unwrap());

    sleep(Duration::from_millis(1_200)).await;
    assert_eq!(shown(&handle).await, ["Saved", "Note"]);

    sleep(Duration::from_millis(4_400)).await;
    assert_eq!(shown(&handle).await, ["Note"]);

    sleep(Duration::from_millis(1_000)).await;
    assert!(shown(&handle).await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn stopped_manager_reports_closed() {
    let recorder = Recorder::default();
    let (handle, task) =
        ToastManager::spawn(&ToastSettings::default(), recorder, CountingCue::default());
    handle.shutdown();
    task.await.unwrap();

    let err = handle
        .set_notification(Notification::plain("late"))
        .await
        .unwrap_err();
    assert!(err.is_closed());
    assert!(handle.try_set_notification(Notification::plain("late")).is_err());
}
