//! Recording-phase event loop.

use tokio::sync::mpsc;
use tracing::debug;

use crate::audio::AudioRecorder;
use crate::session::CaptureSession;
use crate::state::SessionError;

/// Host-side input event during the drawing phase.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    PointerDown { x: f32, y: f32 },
    PointerMove { x: f32, y: f32 },
    PointerUp,
    PointerLeave,
    KeyDown(char),
    KeyUp(char),
    SelectColor(String),
    Undo,
    Redo,
    Clear,
    /// The finished button was pressed.
    Finish,
}

/// Pump host events into the session until the drawing phase ends.
///
/// The phase ends when the finished button is pressed, an end-trial key
/// is hit, the event channel closes, or the configured trial duration
/// elapses. Whichever fires first, the session is finished exactly once
/// and left in `AwaitingTranscription`.
pub async fn drive_recording<R: AudioRecorder>(
    session: &mut CaptureSession<R>,
    events: &mut mpsc::Receiver<SessionEvent>,
) -> Result<(), SessionError> {
    let deadline = session.deadline();
    loop {
        tokio::select! {
            _ = deadline_expiry(deadline) => {
                debug!("Trial duration elapsed, forcing end of drawing phase");
                return session.finish(None).await;
            }
            event = events.recv() => match event {
                None | Some(SessionEvent::Finish) => return session.finish(None).await,
                Some(SessionEvent::KeyDown(key)) if session.is_choice_key(key) => {
                    return session.finish(Some(key)).await;
                }
                Some(event) => apply_event(session, event),
            }
        }
    }
}

async fn deadline_expiry(deadline: Option<tokio::time::Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

fn apply_event<R: AudioRecorder>(session: &mut CaptureSession<R>, event: SessionEvent) {
    match event {
        SessionEvent::PointerDown { x, y } => session.pointer_down(x, y),
        SessionEvent::PointerMove { x, y } => session.pointer_move(x, y),
        SessionEvent::PointerUp => session.pointer_up(),
        SessionEvent::PointerLeave => session.pointer_leave(),
        SessionEvent::KeyDown(key) => session.key_down(key),
        SessionEvent::KeyUp(key) => session.key_up(key),
        SessionEvent::SelectColor(color) => session.select_color(color),
        SessionEvent::Undo => {
            session.undo();
        }
        SessionEvent::Redo => {
            session.redo();
        }
        SessionEvent::Clear => session.clear_drawing(),
        SessionEvent::Finish => {}
    }
}
