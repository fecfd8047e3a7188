use std::collections::HashMap;

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};
use zap_motion::{Cursor, HostCommand, MotionError, Rect, Result, Surface, TextAlign};

/// [`Surface`] backed by a `<canvas>` 2D context.
///
/// The context is translated so that the world origin sits at
/// `size * translation_factor` inside the canvas. The backing store follows
/// the element's client size; whenever it changes the transform and the round
/// line caps/joins are re-applied.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    translation_factor: Vec2,
    images: HashMap<String, HtmlImageElement>,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement, translation_factor: Vec2) -> Result<Self> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| MotionError::SurfaceUnavailable(format!("{:?}", e)))?
            .ok_or_else(|| MotionError::SurfaceUnavailable("2D context not available".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| {
                MotionError::SurfaceUnavailable("context is not a CanvasRenderingContext2d".into())
            })?;

        let mut surface = Self {
            canvas,
            ctx,
            translation_factor,
            images: HashMap::new(),
        };
        surface.apply_transform();
        Ok(surface)
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    /// Make `image` drawable under `name` by [`Visual::Image`](zap_motion::Visual::Image).
    pub fn register_image(&mut self, name: impl Into<String>, image: HtmlImageElement) {
        self.images.insert(name.into(), image);
    }

    /// Create an image element loading `src` and register it under `src`.
    pub fn load_image(&mut self, src: &str) -> Result<()> {
        let image = HtmlImageElement::new()
            .map_err(|e| MotionError::SurfaceUnavailable(format!("{:?}", e)))?;
        image.set_src(src);
        self.register_image(src, image);
        Ok(())
    }

    /// Backing store size in pixels.
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.canvas.width() as f32, self.canvas.height() as f32)
    }

    /// Top-left corner of the canvas in page coordinates.
    pub fn page_origin(&self) -> Vec2 {
        let rect = self.canvas.get_bounding_client_rect();
        Vec2::new(rect.left() as f32, rect.top() as f32)
    }

    /// Sync the backing store with the client size. Returns `true` if it changed.
    pub fn resize(&mut self) -> bool {
        let width = self.canvas.client_width().max(0) as u32;
        let height = self.canvas.client_height().max(0) as u32;
        if width == self.canvas.width() && height == self.canvas.height() {
            return false;
        }
        // Resizing resets the context state.
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.apply_transform();
        log::debug!("canvas resized to {}x{}", width, height);
        true
    }

    /// Clear the whole frame in translated coordinates.
    pub fn clear(&self) {
        let size = self.size();
        let origin = -self.translation_factor * size;
        self.ctx.clear_rect(
            origin.x as f64,
            origin.y as f64,
            size.x as f64,
            size.y as f64,
        );
    }

    /// Carry out a host command against the page.
    pub fn apply(&self, command: &HostCommand) {
        match command {
            HostCommand::OpenUrl(url) => {
                let opened = web_sys::window().map(|w| w.open_with_url(url));
                if !matches!(opened, Some(Ok(_))) {
                    log::warn!("failed to open {}", url);
                }
            }
            HostCommand::SetCursor(cursor) => self.set_cursor(*cursor),
        }
    }

    fn set_cursor(&self, cursor: Cursor) {
        if self
            .canvas
            .style()
            .set_property("cursor", cursor.as_css())
            .is_err()
        {
            log::warn!("failed to set cursor to {}", cursor.as_css());
        }
    }

    fn apply_transform(&mut self) {
        let size = self.size() * self.translation_factor;
        if self.ctx.translate(size.x as f64, size.y as f64).is_err() {
            log::warn!("canvas translate failed");
        }
        self.ctx.set_line_cap("round");
        self.ctx.set_line_join("round");
    }
}

impl Surface for CanvasSurface {
    fn begin_frame(&mut self) {
        self.resize();
        self.clear();
    }

    fn set_path(&mut self, points: &[Vec2]) {
        self.ctx.begin_path();
        let Some(last) = points.last() else { return };
        self.ctx.move_to(last.x as f64, last.y as f64);
        for p in points {
            self.ctx.line_to(p.x as f64, p.y as f64);
        }
    }

    fn stroke(&mut self, color: &str, line_width: f32) {
        self.ctx.set_stroke_style_str(color);
        self.ctx.set_line_width(line_width as f64);
        self.ctx.stroke();
    }

    fn fill(&mut self, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill();
    }

    fn draw_image(&mut self, asset: &str, dest: Rect) {
        let Some(image) = self.images.get(asset) else {
            log::debug!("image {} not registered", asset);
            return;
        };
        if !image.complete() || image.natural_width() == 0 {
            return;
        }
        let drawn = self
            .ctx
            .draw_image_with_html_image_element_and_sw_and_sh_and_dx_and_dy_and_dw_and_dh(
                image,
                0.0,
                0.0,
                image.natural_width() as f64,
                image.natural_height() as f64,
                dest.x as f64,
                dest.y as f64,
                dest.width as f64,
                dest.height as f64,
            );
        if drawn.is_err() {
            log::debug!("drawing image {} failed", asset);
        }
    }

    fn fill_text(&mut self, text: &str, font: &str, align: TextAlign, color: &str, pos: Vec2) {
        self.ctx.set_font(font);
        self.ctx.set_text_align(align.as_css());
        self.ctx.set_fill_style_str(color);
        if self.ctx.fill_text(text, pos.x as f64, pos.y as f64).is_err() {
            log::debug!("fill_text failed");
        }
    }

    fn push_clip(&mut self) {
        self.ctx.save();
        self.ctx.clip();
    }

    fn pop_clip(&mut self) {
        self.ctx.restore();
    }
}
