use glam::Vec2;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::color::Hsl;
use crate::error::{BackdropError, RenderError, Result};
use crate::surface::{Canvas2d, Surface};
use crate::viewport::Viewport;

fn draw_err(e: JsValue) -> RenderError {
    RenderError::Draw(format!("{e:?}"))
}

/// `<canvas>` with a 2D context. Drawing coordinates are CSS pixels; the
/// backing store is scaled by the viewport's pixel ratio.
pub struct Canvas2dSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    css_size: Vec2,
}

impl Canvas2dSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| BackdropError::ContextUnavailable(format!("{e:?}")))?
            .ok_or_else(|| BackdropError::ContextUnavailable("2d context not supported".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| BackdropError::ContextUnavailable("unexpected 2d context type".into()))?;
        Ok(Self {
            canvas,
            ctx,
            css_size: Vec2::ZERO,
        })
    }
}

impl Surface for Canvas2dSurface {
    fn resize(&mut self, viewport: &Viewport) -> Result<(), RenderError> {
        let (width, height) = viewport.pixel_size();
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        let ratio = viewport.pixel_ratio as f64;
        self.ctx
            .set_transform(ratio, 0.0, 0.0, ratio, 0.0, 0.0)
            .map_err(|e| RenderError::SurfaceLost(format!("{e:?}")))?;
        self.css_size = Vec2::new(viewport.width, viewport.height);
        Ok(())
    }
}

impl Canvas2d for Canvas2dSurface {
    fn clear(&mut self) -> Result<(), RenderError> {
        self.ctx
            .clear_rect(0.0, 0.0, self.css_size.x as f64, self.css_size.y as f64);
        Ok(())
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Hsl, alpha: f32) -> Result<(), RenderError> {
        self.ctx.save();
        self.ctx.set_global_alpha(alpha as f64);
        self.ctx.set_fill_style_str(&color.css());
        self.ctx.begin_path();
        let arc = self.ctx.arc(
            center.x as f64,
            center.y as f64,
            radius as f64,
            0.0,
            std::f64::consts::TAU,
        );
        if arc.is_ok() {
            self.ctx.fill();
        }
        self.ctx.restore();
        arc.map_err(draw_err)
    }

    fn stroke_line(
        &mut self,
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Hsl,
        alpha: f32,
    ) -> Result<(), RenderError> {
        self.ctx.save();
        self.ctx.set_global_alpha(alpha as f64);
        self.ctx.set_stroke_style_str(&color.css());
        self.ctx.set_line_width(width as f64);
        self.ctx.begin_path();
        self.ctx.move_to(from.x as f64, from.y as f64);
        self.ctx.line_to(to.x as f64, to.y as f64);
        self.ctx.stroke();
        self.ctx.restore();
        Ok(())
    }
}
