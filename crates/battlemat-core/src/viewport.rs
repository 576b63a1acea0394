//! Viewport module for pan/zoom over the board's SVG-space.
//!
//! Pan and zoom only ever change the visible rectangle (the view box), so
//! entities and hit-testing stay in one fixed coordinate space.

use crate::config::BoardConfig;
use kurbo::{Affine, Point, Rect, Size, Vec2};
use serde::{Deserialize, Serialize};

/// The visible SVG-space rectangle plus the screen surface it is drawn into.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Viewport {
    /// Visible area in SVG-space (`minX, minY, width, height`).
    pub view_box: Rect,
    /// Screen-space rectangle of the rendering surface.
    pub surface: Rect,
    /// Full grid content in SVG-space.
    content: Rect,
    zoom_factor: f64,
    max_zoom_out: f64,
    max_zoom_in: f64,
}

impl Viewport {
    /// Create a viewport fitted to the content.
    pub fn new(content: Rect, surface: Rect, config: &BoardConfig) -> Self {
        let mut viewport = Self {
            view_box: content,
            surface,
            content,
            zoom_factor: config.zoom_factor,
            max_zoom_out: config.max_zoom_out,
            max_zoom_in: config.max_zoom_in,
        };
        viewport.reset_view();
        viewport
    }

    /// Create a viewport for the board described by `config`.
    pub fn for_board(config: &BoardConfig, surface: Size) -> Self {
        let content = Rect::new(0.0, 0.0, config.content_width(), config.content_height());
        Self::new(content, Rect::from_origin_size(Point::ZERO, surface), config)
    }

    /// The content rectangle the viewport is clamped against.
    pub fn content(&self) -> Rect {
        self.content
    }

    /// Screen pixels per SVG unit.
    ///
    /// The view box is fitted inside the surface ("meet"), so the smaller of
    /// the two axis ratios wins.
    pub fn scale(&self) -> f64 {
        let sx = self.surface.width() / self.view_box.width();
        let sy = self.surface.height() / self.view_box.height();
        sx.min(sy)
    }

    /// SVG-space to screen-space transform.
    pub fn transform(&self) -> Affine {
        let scale = self.scale();
        // Letterboxing centers the view box inside the surface.
        let pad_x = (self.surface.width() - self.view_box.width() * scale) / 2.0;
        let pad_y = (self.surface.height() - self.view_box.height() * scale) / 2.0;
        Affine::translate(Vec2::new(self.surface.x0 + pad_x, self.surface.y0 + pad_y))
            * Affine::scale(scale)
            * Affine::translate(Vec2::new(-self.view_box.x0, -self.view_box.y0))
    }

    /// Map a raw device pointer position to SVG-space.
    pub fn screen_to_svg(&self, screen_point: Point) -> Point {
        self.transform().inverse() * screen_point
    }

    /// Map an SVG-space point to screen-space.
    pub fn svg_to_screen(&self, svg_point: Point) -> Point {
        self.transform() * svg_point
    }

    /// Button zoom: keeps the view box center fixed.
    pub fn zoom(&mut self, inward: bool) {
        let center = self.view_box.center();
        self.zoom_about(center, inward);
    }

    /// Wheel zoom: keeps the pointer's projected SVG position fixed.
    pub fn zoom_at(&mut self, screen_point: Point, inward: bool) {
        let anchor = self.screen_to_svg(screen_point);
        self.zoom_about(anchor, inward);
    }

    fn zoom_about(&mut self, anchor: Point, inward: bool) {
        let factor = if inward {
            1.0 / self.zoom_factor
        } else {
            self.zoom_factor
        };
        let width = self.view_box.width();
        let min_width = self.content.width() / self.max_zoom_in;
        let max_width = self.content.width() * self.max_zoom_out;
        let new_width = (width * factor).clamp(min_width, max_width);
        if (new_width - width).abs() < f64::EPSILON {
            return;
        }

        let ratio = new_width / width;
        let new_height = self.view_box.height() * ratio;
        let x0 = anchor.x - (anchor.x - self.view_box.x0) * ratio;
        let y0 = anchor.y - (anchor.y - self.view_box.y0) * ratio;
        self.view_box = Rect::new(x0, y0, x0 + new_width, y0 + new_height);
        log::debug!("Zoomed viewport to {:.1}x{:.1}", new_width, new_height);
    }

    /// Pan by a delta in screen pixels.
    pub fn pan_by(&mut self, dx_screen: f64, dy_screen: f64) {
        let scale = self.scale();
        if scale <= 0.0 || !scale.is_finite() {
            return;
        }
        // Dragging the content right moves the view box left.
        let delta = Vec2::new(-dx_screen / scale, -dy_screen / scale);
        self.view_box = self.view_box + delta;
        self.clamp_to_content();
    }

    /// Keep the view box over the content, centering any axis on which the
    /// view box is larger than the content.
    fn clamp_to_content(&mut self) {
        let width = self.view_box.width();
        let height = self.view_box.height();
        let x0 = clamp_axis(self.view_box.x0, width, self.content.x0, self.content.width());
        let y0 = clamp_axis(self.view_box.y0, height, self.content.y0, self.content.height());
        self.view_box = Rect::new(x0, y0, x0 + width, y0 + height);
    }

    /// Fit the whole content into the surface, preserving aspect ratio.
    pub fn reset_view(&mut self) {
        let surface_w = self.surface.width().max(1.0);
        let surface_h = self.surface.height().max(1.0);
        let aspect = surface_w / surface_h;
        let content_w = self.content.width();
        let content_h = self.content.height();

        let (width, height) = if content_w / content_h > aspect {
            (content_w, content_w / aspect)
        } else {
            (content_h * aspect, content_h)
        };
        let center = self.content.center();
        self.view_box = Rect::from_center_size(center, Size::new(width, height));
    }

    /// Resize the rendering surface, keeping the view box over the content.
    pub fn set_surface(&mut self, surface: Rect) {
        self.surface = surface;
        self.clamp_to_content();
    }
}

fn clamp_axis(start: f64, extent: f64, content_start: f64, content_extent: f64) -> f64 {
    if extent >= content_extent {
        content_start + (content_extent - extent) / 2.0
    } else {
        start.clamp(content_start, content_start + content_extent - extent)
    }
}
