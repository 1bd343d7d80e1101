//! Sketchcap sketching core - stroke capture and replay data structures
//!
//! This crate provides the core pieces of the sketch-capture widget:
//! - [`types::Stroke`] - A drawing gesture or undo/redo marker
//! - [`ledger`] - Active/full-history stroke ledgers with undo/redo
//! - [`replay`] - Time-accurate replay scheduling from the full history
//! - [`surface`] - CPU RGBA surface for live and replay rendering
//! - [`render`] - Stroke rasterization and replay render-op application
//! - [`color`] - Hex color parsing for stroke palettes

pub mod color;
pub mod constants;
pub mod ledger;
pub mod render;
pub mod replay;
pub mod surface;
pub mod types;

pub use color::*;
pub use constants::*;
pub use ledger::*;
pub use render::*;
pub use replay::*;
pub use surface::*;
pub use types::*;
