//! Time-accurate replay of the full history ledger.
//!
//! The original recording is reconstructed as a lazy sequence of
//! [`ReplayFrame`]s: each frame says how long to hold (an explicit
//! timer, or immediate when the gap is under the collapsing threshold)
//! and which [`RenderOp`] to apply to the replay canvas. Undo/redo
//! markers become catch-up [`RenderOp::Redraw`] frames that clear the
//! canvas and repaint everything visible at that moment, reproducing
//! the erasures the participant saw.
//!
//! Realizing the delays is the caller's concern; the schedule itself is
//! a plain iterator, deterministic and restartable from the ledger.

mod schedule;

pub use schedule::{Delay, RenderOp, ReplayFrame, ReplaySchedule};
