//! Timed notices during recording: the trial-duration countdown and the
//! keep-verbalizing reminder.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::time::Instant;

/// How often the countdown text is refreshed.
const TICK_INTERVAL: Duration = Duration::from_millis(250);

/// How often the participant is nudged to keep talking.
const REMINDER_INTERVAL: Duration = Duration::from_secs(10);

/// Format remaining time as `m:ss`, rounding seconds up so the display
/// never shows `0:00` while time is still left.
pub fn format_remaining(remaining_ms: u64) -> String {
    let mut minutes = remaining_ms / 60_000;
    let mut seconds = (remaining_ms % 60_000).div_ceil(1000);
    if seconds == 60 {
        seconds = 0;
        minutes += 1;
    }
    format!("{minutes}:{seconds:02}")
}

/// Tick the countdown until the deadline passes or the flag is raised,
/// handing each rendered remaining time to `on_tick`.
pub async fn run_countdown<F>(deadline: Instant, cancel: &AtomicBool, mut on_tick: F)
where
    F: FnMut(&str),
{
    let mut interval = tokio::time::interval(TICK_INTERVAL);
    loop {
        interval.tick().await;
        if cancel.load(Ordering::SeqCst) {
            return;
        }
        let now = Instant::now();
        if now >= deadline {
            on_tick(&format_remaining(0));
            return;
        }
        let remaining = (deadline - now).as_millis() as u64;
        on_tick(&format_remaining(remaining));
    }
}

/// Remind the participant to keep verbalizing while they draw, every
/// ten seconds until the recording phase ends (flag raised).
pub async fn run_speech_reminder<F>(cancel: &AtomicBool, mut on_remind: F)
where
    F: FnMut(),
{
    let mut interval = tokio::time::interval(REMINDER_INTERVAL);
    // The immediate first tick is not a reminder.
    interval.tick().await;
    loop {
        interval.tick().await;
        if cancel.load(Ordering::SeqCst) {
            return;
        }
        on_remind();
    }
}
