//! Rendering module
//!
//! The simulation draws through the [`Surface`] trait. On the web this is a
//! `CanvasRenderingContext2d`; tests and the native demo use an in-memory
//! recording surface.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod recording;
pub mod shapes;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasSurface;
pub use recording::{DrawCommand, RecordingSurface};

use glam::Vec2;

use crate::error::RenderError;

/// An sRGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// CSS `rgba()` string at the given alpha
    pub fn to_css(&self, alpha: f32) -> String {
        format!(
            "rgba({}, {}, {}, {:.3})",
            self.r,
            self.g,
            self.b,
            alpha.clamp(0.0, 1.0)
        )
    }
}

/// Fill style for one draw call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paint {
    pub color: Rgb,
    /// Global alpha (0-1)
    pub alpha: f32,
    /// Glow (shadow blur) radius in canvas units, 0 = no glow
    pub glow: f32,
}

impl Paint {
    pub fn flat(color: Rgb, alpha: f32) -> Self {
        Self {
            color,
            alpha,
            glow: 0.0,
        }
    }
}

/// A 2D drawing target
pub trait Surface {
    /// Fill an axis-aligned rectangle
    fn fill_rect(&mut self, origin: Vec2, size: Vec2, paint: Paint) -> Result<(), RenderError>;

    /// Fill a disc
    fn draw_disc(&mut self, center: Vec2, radius: f32, paint: Paint) -> Result<(), RenderError>;

    /// Fill a closed polygon
    fn draw_polygon(&mut self, points: &[Vec2], paint: Paint) -> Result<(), RenderError>;
}
