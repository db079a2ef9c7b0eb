//! Canvas 2D surface

use glam::Vec2;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{Paint, Surface};
use crate::error::RenderError;

/// Draws onto an `HtmlCanvasElement` through its 2D context
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
}

fn js_message(value: JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

impl CanvasSurface {
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, RenderError> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| RenderError::canvas("getContext", js_message(e)))?
            .ok_or(RenderError::SurfaceLost)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| RenderError::SurfaceLost)?;
        Ok(Self { ctx })
    }

    fn apply(&self, paint: &Paint) {
        let css = paint.color.to_css(1.0);
        self.ctx.set_global_alpha(paint.alpha.clamp(0.0, 1.0) as f64);
        self.ctx.set_fill_style(&JsValue::from_str(&css));
        if paint.glow > 0.0 {
            self.ctx.set_shadow_color(&css);
            self.ctx.set_shadow_blur(paint.glow as f64);
        } else {
            self.ctx.set_shadow_blur(0.0);
        }
    }
}

impl Surface for CanvasSurface {
    fn fill_rect(&mut self, origin: Vec2, size: Vec2, paint: Paint) -> Result<(), RenderError> {
        self.apply(&paint);
        self.ctx
            .fill_rect(origin.x as f64, origin.y as f64, size.x as f64, size.y as f64);
        Ok(())
    }

    fn draw_disc(&mut self, center: Vec2, radius: f32, paint: Paint) -> Result<(), RenderError> {
        self.apply(&paint);
        self.ctx.begin_path();
        self.ctx
            .arc(
                center.x as f64,
                center.y as f64,
                radius as f64,
                0.0,
                std::f64::consts::TAU,
            )
            .map_err(|e| RenderError::canvas("arc", js_message(e)))?;
        self.ctx.fill();
        Ok(())
    }

    fn draw_polygon(&mut self, points: &[Vec2], paint: Paint) -> Result<(), RenderError> {
        let Some((first, rest)) = points.split_first() else {
            return Ok(());
        };
        self.apply(&paint);
        self.ctx.begin_path();
        self.ctx.move_to(first.x as f64, first.y as f64);
        for p in rest {
            self.ctx.line_to(p.x as f64, p.y as f64);
        }
        self.ctx.close_path();
        self.ctx.fill();
        Ok(())
    }
}
