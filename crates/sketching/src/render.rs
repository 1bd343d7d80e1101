//! Stroke rasterization onto a CPU surface.
//!
//! Live capture and replay each own their own [`SketchRenderer`]; the
//! drawing surface is never shared between the two.

use tracing::warn;

use crate::color::parse_hex;
use crate::constants::FALLBACK_PEN_COLOR;
use crate::replay::RenderOp;
use crate::surface::CpuSurface;
use crate::types::{PointEvent, Stroke};

#[derive(Debug, Clone, Copy)]
struct Pen {
    x: f32,
    y: f32,
    color: [f32; 4],
}

/// Applies render ops and whole strokes to an owned surface.
pub struct SketchRenderer {
    surface: CpuSurface,
    stroke_width: f32,
    background: [f32; 4],
    background_image: Option<CpuSurface>,
    pen: Option<Pen>,
}

impl SketchRenderer {
    /// Create a renderer over a fresh surface cleared to the background.
    pub fn new(width: u32, height: u32, stroke_width: f32, background: [f32; 4]) -> Self {
        let mut surface = CpuSurface::new(width, height);
        surface.clear(background);
        Self {
            surface,
            stroke_width,
            background,
            background_image: None,
            pen: None,
        }
    }

    /// Install an image as the canvas background, beneath the strokes.
    /// Scaled to the surface size and painted immediately, so it should
    /// go in before drawing begins; every later clear and catch-up
    /// redraw repaints it.
    pub fn set_background_image(&mut self, image: &image::RgbaImage) {
        let resized = image::imageops::resize(
            image,
            self.surface.width,
            self.surface.height,
            image::imageops::FilterType::Triangle,
        );
        let mut background = CpuSurface::new(self.surface.width, self.surface.height);
        for (x, y, pixel) in resized.enumerate_pixels() {
            background.set_pixel(
                x,
                y,
                [
                    pixel[0] as f32 / 255.0,
                    pixel[1] as f32 / 255.0,
                    pixel[2] as f32 / 255.0,
                    pixel[3] as f32 / 255.0,
                ],
            );
        }
        self.background_image = Some(background);
        self.clear();
    }

    pub fn surface(&self) -> &CpuSurface {
        &self.surface
    }

    pub fn into_surface(self) -> CpuSurface {
        self.surface
    }

    /// Start a pen path. Draws nothing until the first segment, like a
    /// canvas moveTo.
    pub fn begin_path(&mut self, x: f32, y: f32, color: &str) {
        let color = parse_hex(color).unwrap_or_else(|e| {
            warn!("unparseable stroke color, using fallback: {e}");
            FALLBACK_PEN_COLOR
        });
        self.pen = Some(Pen { x, y, color });
    }

    /// Extend the pen path with a stamped segment.
    pub fn line_to(&mut self, x: f32, y: f32) {
        let Some(pen) = self.pen else {
            warn!("line_to with no open path, ignoring");
            return;
        };
        self.stamp_segment(pen.x, pen.y, x, y, pen.color);
        self.pen = Some(Pen { x, y, ..pen });
    }

    /// Clear to the background image or color and drop any open path.
    pub fn clear(&mut self) {
        match &self.background_image {
            Some(image) => self.surface = image.clone(),
            None => self.surface.clear(self.background),
        }
        self.pen = None;
    }

    /// Paint one complete stroke from its recorded geometry. Markers
    /// contribute nothing.
    pub fn paint_stroke(&mut self, stroke: &Stroke) {
        for point in &stroke.points {
            match point {
                PointEvent::Start { x, y, color, .. } => self.begin_path(*x, *y, color),
                PointEvent::Move { x, y, .. } => self.line_to(*x, *y),
                PointEvent::End { .. } | PointEvent::Mark { .. } => {}
            }
        }
        self.pen = None;
    }

    /// Apply a replay render op. `history` backs the stroke indices a
    /// redraw refers to.
    pub fn apply(&mut self, op: &RenderOp, history: &[Stroke]) {
        match op {
            RenderOp::Begin { x, y, color } => self.begin_path(*x, *y, color),
            RenderOp::Line { x, y } => self.line_to(*x, *y),
            RenderOp::Redraw { visible } => {
                self.clear();
                for &index in visible {
                    match history.get(index) {
                        Some(stroke) => self.paint_stroke(stroke),
                        None => warn!(index, "redraw index out of range"),
                    }
                }
            }
        }
    }

    /// Stamp a thick segment by walking it in half-pixel steps.
    fn stamp_segment(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: [f32; 4]) {
        let dx = x1 - x0;
        let dy = y1 - y0;
        let length = (dx * dx + dy * dy).sqrt();
        let steps = (length * 2.0).ceil().max(1.0) as u32;

        for step in 0..=steps {
            let f = step as f32 / steps as f32;
            self.stamp_point(x0 + dx * f, y0 + dy * f, color);
        }
    }

    /// Stamp a disc of the stroke width at the given center.
    fn stamp_point(&mut self, cx: f32, cy: f32, color: [f32; 4]) {
        let radius = (self.stroke_width / 2.0).max(0.5);
        let r2 = radius * radius;

        let x_min = (cx - radius).floor().max(0.0) as u32;
        let y_min = (cy - radius).floor().max(0.0) as u32;
        let x_max = (cx + radius).ceil().min(self.surface.width as f32) as u32;
        let y_max = (cy + radius).ceil().min(self.surface.height as f32) as u32;

        for y in y_min..y_max {
            for x in x_min..x_max {
                let px = x as f32 + 0.5 - cx;
                let py = y as f32 + 0.5 - cy;
                if px * px + py * py <= r2 {
                    self.surface.set_pixel(x, y, color);
                }
            }
        }
    }
}
