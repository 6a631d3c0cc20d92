use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tokio::time::sleep;
use toaster::Result;
use toaster::ToastHandle;
use toaster::audio::{self, AudioCue, Silent};
use toaster::config::Config;
use toaster::present::{Presenter, TerminalPresenter, TracingPresenter};
use toaster::queue::Snapshot;
use toaster::telemetry::init_tracing;
use toaster::{ToastManager, error::Error as ToastError};
use tracing::{info, warn};

use super::cli::Cli;
use super::commands::{HELP, Line, parse_line};

const DEFAULT_CONFIG: &str = "toaster.toml";
const DRAIN_POLL: Duration = Duration::from_millis(100);

pub async fn run(cli: Cli) -> Result<()> {
    init_tracing(cli.log_filter.as_deref(), cli.json_logs)?;

    let required = cli.config.is_some();
    let config_path = cli.config.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
    let mut config = Config::from_env_and_file(&config_path, required)?;

    if let Some(position) = cli.position {
        config.toast.position = position;
    }
    if let Some(timer) = cli.timer {
        if timer.is_zero() {
            return Err(ToastError::from(toaster::error::ConfigError::InvalidField {
                field: "cli.timer",
                message: "timer must be greater than zero".to_string(),
            }));
        }
        config.toast.timer = timer;
    }

    let cue: Box<dyn AudioCue + Send> = if cli.no_audio {
        Box::new(Silent)
    } else {
        audio::cue_from_settings(&config.audio)
    };

    info!(
        position = %config.toast.position,
        timer = ?config.toast.timer,
        audio = config.audio.enabled && !cli.no_audio,
        "starting toast queue"
    );
    let presenter: Box<dyn Presenter + Send> = if std::io::stdout().is_terminal() {
        Box::new(TerminalPresenter::new(std::io::stdout()))
    } else {
        Box::new(TracingPresenter)
    };
    let (handle, manager) = ToastManager::spawn(&config.toast, presenter, cue);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut interrupted = false;
    loop {
        tokio::select! {
            biased;
            _ = signal::ctrl_c() => {
                info!("shutdown signal received");
                interrupted = true;
                break;
            }
            line = lines.next_line() => match line? {
                Some(line) => {
                    if !dispatch(&handle, &line, cli.json).await? {
                        break;
                    }
                }
                None => break,
            },
        }
    }

    if cli.wait && !interrupted {
        wait_for_drain(&handle).await?;
    }

    handle.shutdown();
    if let Err(err) = manager.await {
        warn!(error = %err, "toast manager terminated unexpectedly");
    }
    Ok(())
}

/// Returns `false` when the session should end.
async fn dispatch(handle: &ToastHandle, line: &str, json: bool) -> Result<bool> {
    let parsed = match parse_line(line) {
        Ok(parsed) => parsed,
        Err(message) => {
            warn!(line, "{message}");
            return Ok(true);
        }
    };

    match parsed {
        Line::Notify(notification) => handle.set_notification(notification).await?,
        Line::Close(slot) => {
            if !handle.close_by_cross(slot).await? {
                warn!(%slot, "nothing to close in that slot");
            }
        }
        Line::Position(raw) => {
            handle.set_position(raw).await?;
        }
        Line::Timer(timer) => {
            handle.set_timer(timer).await?;
        }
        Line::Show => print_snapshot(&handle.snapshot().await?, json)?,
        Line::Help => println!("{HELP}"),
        Line::Quit => return Ok(false),
        Line::Blank => {}
    }
    Ok(true)
}

fn print_snapshot(snapshot: &Snapshot, json: bool) -> Result<()> {
    if json {
        let text = serde_json::to_string_pretty(snapshot).map_err(ToastError::from)?;
        println!("{text}");
        return Ok(());
    }

    println!(
        "position={} timer={}ms visible={} queued={} overflow={}",
        snapshot.position,
        snapshot.timer_ms,
        snapshot.container_visible,
        snapshot.queued,
        snapshot.overflow
    );
    for view in &snapshot.slots {
        let countdown = snapshot
            .countdown
            .filter(|cd| cd.toast == view.toast.id)
            .map(|cd| format!(" {}%", cd.percent))
            .unwrap_or_default();
        println!(
            "  slot {} {} [{}] {}{countdown}",
            view.slot, view.toast.id, view.toast.notification.kind, view.toast.notification.message
        );
    }
    Ok(())
}

async fn wait_for_drain(handle: &ToastHandle) -> Result<()> {
    loop {
        let snapshot = handle.snapshot().await?;
        if snapshot.queued == 0 && snapshot.leaving == 0 {
            return Ok(());
        }
        tokio::select! {
            _ = signal::ctrl_c() => return Ok(()),
            () = sleep(DRAIN_POLL) => {}
        }
    }
}
