//! CPU surface for sketch rendering - f32 RGBA storage with PNG export.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("PNG encoding failed: {0}")]
    PngEncode(#[from] image::ImageError),
    #[error("Surface dimensions do not form a valid image")]
    InvalidDimensions,
}

/// An RGBA CPU surface for sketch rendering.
/// Stores pixels as [f32; 4] in 0..1.
#[derive(Clone)]
pub struct CpuSurface {
    /// Surface dimensions
    pub width: u32,
    pub height: u32,
    /// Pixel data in row-major order, each pixel is [r, g, b, a] as f32
    pixels: Vec<[f32; 4]>,
}

impl CpuSurface {
    /// Create a new surface with the given dimensions, initialized to transparent black
    pub fn new(width: u32, height: u32) -> Self {
        let pixel_count = (width as usize) * (height as usize);
        Self {
            width,
            height,
            pixels: vec![[0.0, 0.0, 0.0, 0.0]; pixel_count],
        }
    }

    /// Clear the surface to a solid color
    pub fn clear(&mut self, color: [f32; 4]) {
        self.pixels.fill(color);
    }

    /// Get a pixel at the given coordinates
    /// Returns None if coordinates are out of bounds
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[f32; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = (y as usize) * (self.width as usize) + (x as usize);
        Some(self.pixels[index])
    }

    /// Set a pixel at the given coordinates
    /// Does nothing if coordinates are out of bounds
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, color: [f32; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let index = (y as usize) * (self.width as usize) + (x as usize);
        self.pixels[index] = color;
    }

    /// Convert to packed 8-bit RGBA bytes.
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * 4);
        for pixel in &self.pixels {
            for channel in pixel {
                out.push((channel.clamp(0.0, 1.0) * 255.0).round() as u8);
            }
        }
        out
    }

    /// Encode the surface as a `data:image/png;base64,` URL, the form
    /// the final sketch is persisted in.
    pub fn to_png_data_url(&self) -> Result<String, SurfaceError> {
        let image = image::RgbaImage::from_raw(self.width, self.height, self.to_rgba8())
            .ok_or(SurfaceError::InvalidDimensions)?;

        let mut bytes = std::io::Cursor::new(Vec::new());
        image.write_to(&mut bytes, image::ImageFormat::Png)?;

        Ok(format!(
            "data:image/png;base64,{}",
            BASE64.encode(bytes.into_inner())
        ))
    }
}
