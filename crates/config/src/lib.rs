//! Shared configuration for the sketchcap capture widget
//!
//! This crate provides the single source of truth for the recognized
//! trial options: canvas geometry, stroke styling, prompt placement,
//! optional controls and their labels, the draw key, trial duration,
//! and which trial artifacts get persisted.
//!
//! Configuration errors are not recoverable: [`SketchpadConfig::validate`]
//! fails fast and initialization aborts.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use sketching::color::{parse_hex, ColorError};

pub use sketching::constants::DEFAULT_STROKE_WIDTH;

/// Default canvas edge length in pixels
pub const DEFAULT_CANVAS_SIZE: u32 = 500;

/// Default stroke color
pub const DEFAULT_STROKE_COLOR: &str = "#000000";

/// Default canvas background color
pub const DEFAULT_BACKGROUND_COLOR: &str = "#ffffff";

/// Default canvas border color
pub const DEFAULT_BORDER_COLOR: &str = "#000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Canvas dimensions must be non-zero ({width}x{height})")]
    EmptyCanvas { width: u32, height: u32 },
    #[error("Stroke width must be positive: {0}")]
    InvalidStrokeWidth(f32),
    #[error("Invalid {field} color: {source}")]
    InvalidColor {
        field: &'static str,
        source: ColorError,
    },
    #[error("Redo control requires the undo control to be shown")]
    RedoWithoutUndo,
}

/// The shape of the canvas element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CanvasShape {
    #[default]
    Rectangle,
    Circle,
}

/// Where the prompt content is placed relative to the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PromptLocation {
    #[default]
    AboveCanvas,
    BelowCanvas,
    BelowButton,
}

/// Recognized options for one capture trial.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SketchpadConfig {
    /// Canvas shape; a circle uses `canvas_diameter` for both dimensions
    pub canvas_shape: CanvasShape,
    /// Width of the canvas in pixels (rectangle only)
    pub canvas_width: u32,
    /// Height of the canvas in pixels (rectangle only)
    pub canvas_height: u32,
    /// Diameter of the canvas in pixels (circle only)
    pub canvas_diameter: u32,
    /// Width of the border around the canvas
    pub canvas_border_width: u32,
    /// Color of the border around the canvas
    pub canvas_border_color: String,
    /// Background color of the canvas
    pub background_color: String,
    /// Source of an image drawn as the canvas background, beneath the
    /// strokes. The host resolves it to pixel data.
    pub background_image: Option<String>,
    /// Width of strokes on the canvas
    pub stroke_width: f32,
    /// Initial stroke color
    pub stroke_color: String,
    /// Palette of selectable stroke colors
    pub stroke_color_palette: Vec<String>,
    /// Prompt content shown with the canvas
    pub prompt: Option<String>,
    /// Location of the prompt content
    pub prompt_location: PromptLocation,
    /// Whether the final image is persisted as a data URL
    pub save_final_image: bool,
    /// Whether the full stroke history is persisted
    pub save_strokes: bool,
    /// Key that acts like the mouse button for ink flow
    pub key_to_draw: Option<char>,
    /// Whether to show the button that ends the trial
    pub show_finished_button: bool,
    pub finished_button_label: String,
    /// Whether to show the button that clears the drawing
    pub show_clear_button: bool,
    pub clear_button_label: String,
    /// Whether to show the undo button
    pub show_undo_button: bool,
    pub undo_button_label: String,
    /// Whether to show the redo button (needs the undo button too)
    pub show_redo_button: bool,
    pub redo_button_label: String,
    /// Keys that end the trial when pressed
    pub choices: Vec<char>,
    /// Length of time before the trial ends, in ms. None never times out.
    pub trial_duration: Option<u64>,
    /// Whether to show a countdown for the remaining trial duration
    pub show_countdown_trial_duration: bool,
}

impl Default for SketchpadConfig {
    fn default() -> Self {
        Self {
            canvas_shape: CanvasShape::Rectangle,
            canvas_width: DEFAULT_CANVAS_SIZE,
            canvas_height: DEFAULT_CANVAS_SIZE,
            canvas_diameter: DEFAULT_CANVAS_SIZE,
            canvas_border_width: 0,
            canvas_border_color: DEFAULT_BORDER_COLOR.to_string(),
            background_color: DEFAULT_BACKGROUND_COLOR.to_string(),
            background_image: None,
            stroke_width: DEFAULT_STROKE_WIDTH,
            stroke_color: DEFAULT_STROKE_COLOR.to_string(),
            stroke_color_palette: Vec::new(),
            prompt: None,
            prompt_location: PromptLocation::AboveCanvas,
            save_final_image: true,
            save_strokes: true,
            key_to_draw: None,
            show_finished_button: true,
            finished_button_label: "Finished".to_string(),
            show_clear_button: true,
            clear_button_label: "Clear".to_string(),
            show_undo_button: true,
            undo_button_label: "Undo".to_string(),
            show_redo_button: true,
            redo_button_label: "Redo".to_string(),
            choices: Vec::new(),
            trial_duration: None,
            show_countdown_trial_duration: false,
        }
    }
}

impl SketchpadConfig {
    /// Effective canvas dimensions for the configured shape.
    pub fn canvas_size(&self) -> (u32, u32) {
        match self.canvas_shape {
            CanvasShape::Rectangle => (self.canvas_width, self.canvas_height),
            CanvasShape::Circle => (self.canvas_diameter, self.canvas_diameter),
        }
    }

    /// Background color as RGBA. Call after `validate`.
    pub fn background_rgba(&self) -> Result<[f32; 4], ConfigError> {
        parse_hex(&self.background_color).map_err(|source| ConfigError::InvalidColor {
            field: "background",
            source,
        })
    }

    /// Fail-fast validation of the whole option set.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (width, height) = self.canvas_size();
        if width == 0 || height == 0 {
            return Err(ConfigError::EmptyCanvas { width, height });
        }
        if self.stroke_width <= 0.0 {
            return Err(ConfigError::InvalidStrokeWidth(self.stroke_width));
        }
        if self.show_redo_button && !self.show_undo_button {
            return Err(ConfigError::RedoWithoutUndo);
        }

        let color_fields: [(&'static str, &str); 3] = [
            ("stroke", &self.stroke_color),
            ("background", &self.background_color),
            ("border", &self.canvas_border_color),
        ];
        for (field, value) in color_fields {
            parse_hex(value).map_err(|source| ConfigError::InvalidColor { field, source })?;
        }
        for color in &self.stroke_color_palette {
            parse_hex(color).map_err(|source| ConfigError::InvalidColor {
                field: "palette",
                source,
            })?;
        }
        Ok(())
    }
}
