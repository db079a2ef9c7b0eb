//! In-memory surface that records draw calls

use glam::Vec2;

use super::{Paint, Surface};
use crate::error::RenderError;

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Rect { origin: Vec2, size: Vec2, paint: Paint },
    Disc { center: Vec2, radius: f32, paint: Paint },
    Polygon { points: Vec<Vec2>, paint: Paint },
}

/// Surface used by tests and the native demo
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub commands: Vec<DrawCommand>,
    /// Fail every call once this many commands have been recorded
    fail_after: Option<usize>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// A surface that breaks after `n` successful calls
    pub fn failing_after(n: usize) -> Self {
        Self {
            commands: Vec::new(),
            fail_after: Some(n),
        }
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Number of particle shapes drawn (everything except rects)
    pub fn shape_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| !matches!(c, DrawCommand::Rect { .. }))
            .count()
    }

    fn record(&mut self, command: DrawCommand) -> Result<(), RenderError> {
        if self.fail_after.is_some_and(|n| self.commands.len() >= n) {
            return Err(RenderError::SurfaceLost);
        }
        self.commands.push(command);
        Ok(())
    }
}

impl Surface for RecordingSurface {
    fn fill_rect(&mut self, origin: Vec2, size: Vec2, paint: Paint) -> Result<(), RenderError> {
        self.record(DrawCommand::Rect { origin, size, paint })
    }

    fn draw_disc(&mut self, center: Vec2, radius: f32, paint: Paint) -> Result<(), RenderError> {
        self.record(DrawCommand::Disc {
            center,
            radius,
            paint,
        })
    }

    fn draw_polygon(&mut self, points: &[Vec2], paint: Paint) -> Result<(), RenderError> {
        self.record(DrawCommand::Polygon {
            points: points.to_vec(),
            paint,
        })
    }
}
