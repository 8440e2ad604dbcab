use std::path::Path;
use image::{ImageFormat, Rgba, RgbaImage};
use vello_cpu::kurbo::{BezPath, Cap, Circle, Rect as KurboRect, Shape, Stroke};
use vello_cpu::{Pixmap, RenderContext};

use super::{RenderStats, Surface, is_polygon_fully_offscreen, is_rect_fully_offscreen};
use crate::{
    log,
    utils::{Color, Rect, Size, Vec2},
};

const CIRCLE_TOLERANCE: f64 = 0.1;

// ----------------------------------------------
// ImageSurface
// ----------------------------------------------

// RGBA8 image fed by a vello_cpu render context. Draw calls are batched in
// the context and composited over the image on `flush()`; pixel reads only
// see what has been flushed. Pixel (x,y) covers [x,x+1) x [y,y+1).
pub struct ImageSurface {
    image: RgbaImage,
    ctx: RenderContext,
    has_pending_draws: bool,
    stats: RenderStats,
}

impl ImageSurface {
    pub fn new(size: Size, clear_color: Color) -> Self {
        assert!(size.is_valid(), "Invalid surface size: {size}");

        let (Ok(width), Ok(height)) = (u16::try_from(size.width), u16::try_from(size.height)) else {
            panic!("Surface size {size} exceeds the rasterizer limit of {}px.", u16::MAX);
        };

        let image = RgbaImage::from_pixel(
            width as u32,
            height as u32,
            Rgba(clear_color.to_rgba_u8()));

        let mut ctx = RenderContext::new(width, height);
        ctx.set_stroke(pixel_stroke());

        Self { image, ctx, has_pending_draws: false, stats: RenderStats::default() }
    }

    #[inline]
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    #[inline]
    pub fn pixel(&self, x: i32, y: i32) -> Option<[u8; 4]> {
        if x < 0 || y < 0 || x >= self.width() || y >= self.height() {
            return None;
        }
        Some(self.image.get_pixel(x as u32, y as u32).0)
    }

    #[inline]
    pub fn has_pending_draws(&self) -> bool {
        self.has_pending_draws
    }

    pub fn save_png(&self, path: &Path) -> Result<(), String> {
        if self.has_pending_draws {
            log::warn!(log::channel!("render"), "Saving {path:?} with unflushed draw calls.");
        }

        self.image.save_with_format(path, ImageFormat::Png).map_err(|err| {
            log::error!(log::channel!("render"), "Failed to write PNG {path:?}: {err}");
            err.to_string()
        })
    }

    // ----------------------
    // Internal:
    // ----------------------

    #[inline]
    fn width(&self) -> i32 {
        self.image.width() as i32
    }

    #[inline]
    fn height(&self) -> i32 {
        self.image.height() as i32
    }

    #[inline]
    fn set_color(&mut self, color: Color) {
        self.ctx.set_paint(peniko::Color::new([color.r, color.g, color.b, color.a]));
        self.has_pending_draws = true;
    }

    // Renders the batched draws into a transparent layer.
    fn render_layer(&mut self) -> Option<RgbaImage> {
        let (width, height) = (self.image.width(), self.image.height());

        let mut pixmap = Pixmap::new(width as u16, height as u16);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        self.ctx.reset();
        self.ctx.set_stroke(pixel_stroke());

        let pixels = pixmap.take_unpremultiplied();
        let mut bytes = Vec::with_capacity(pixels.len() * 4);
        for p in pixels {
            bytes.extend_from_slice(&[p.r, p.g, p.b, p.a]);
        }

        RgbaImage::from_raw(width, height, bytes)
    }
}

impl Surface for ImageSurface {
    #[inline]
    fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    #[inline]
    fn stats(&self) -> &RenderStats {
        &self.stats
    }

    #[inline]
    fn reset_stats(&mut self) {
        self.stats = RenderStats::default();
    }

    fn flush(&mut self) {
        if !self.has_pending_draws {
            return;
        }
        self.has_pending_draws = false;

        match self.render_layer() {
            Some(layer) => image::imageops::overlay(&mut self.image, &layer, 0, 0),
            None => log::error!(log::channel!("render"), "Rasterized layer does not match the surface size."),
        }
    }

    // Overwrites everything, pending draws included.
    fn clear(&mut self, color: Color) {
        self.ctx.reset();
        self.ctx.set_stroke(pixel_stroke());
        self.has_pending_draws = false;

        let rgba = Rgba(color.to_rgba_u8());
        for pixel in self.image.pixels_mut() {
            *pixel = rgba;
        }
        self.stats.draw_calls += 1;
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        if is_rect_fully_offscreen(&self.rect(), &rect) {
            return;
        }

        self.set_color(color);
        self.ctx.fill_rect(&to_kurbo_rect(rect));

        self.stats.rects_drawn += 1;
        self.stats.draw_calls += 1;
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
        if points.len() < 3 || is_polygon_fully_offscreen(&self.rect(), points) {
            return;
        }

        self.set_color(color);
        self.ctx.fill_path(&polygon_path(points));

        self.stats.polygons_drawn += 1;
        self.stats.draw_calls += 1;
    }

    // End points snap to the center of the pixel containing them, so a
    // 1px stroke with square caps covers whole pixels on straight runs.
    fn draw_line(&mut self, from_pos: Vec2, to_pos: Vec2, color: Color) {
        if is_rect_fully_offscreen(&self.rect(), &Rect::from_points(&[from_pos, to_pos])) {
            return;
        }

        let mut path = BezPath::new();
        path.move_to(pixel_center(from_pos));
        path.line_to(pixel_center(to_pos));

        self.set_color(color);
        self.ctx.stroke_path(&path);

        self.stats.lines_drawn += 1;
        self.stats.draw_calls += 1;
    }

    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color, filled: bool) {
        if radius <= 0.0 {
            return;
        }

        let circle_bounds = Rect::from_center_and_size(center, Vec2::new(radius * 2.0, radius * 2.0));
        if is_rect_fully_offscreen(&self.rect(), &circle_bounds) {
            return;
        }

        let path = Circle::new((center.x as f64, center.y as f64), radius as f64).to_path(CIRCLE_TOLERANCE);

        self.set_color(color);
        if filled {
            self.ctx.fill_path(&path);
        } else {
            self.ctx.stroke_path(&path);
        }

        self.stats.circles_drawn += 1;
        self.stats.draw_calls += 1;
    }

    // `pos` is the top-left of the first glyph. Each lit glyph cell is a
    // unit square on the pixel grid.
    fn draw_text(&mut self, pos: Vec2, text: &str, color: Color) {
        let origin_x = pos.x.floor() as f64;
        let origin_y = pos.y.floor() as f64;

        let mut path = BezPath::new();
        for (index, ch) in text.chars().enumerate() {
            let Some(rows) = glyph_rows(ch) else {
                continue;
            };

            let pen_x = origin_x + (index as i32 * GLYPH_ADVANCE) as f64;
            for (row_index, row_bits) in rows.iter().enumerate() {
                for col in 0..GLYPH_WIDTH {
                    if row_bits & (1 << (GLYPH_WIDTH - 1 - col)) != 0 {
                        let x = pen_x + col as f64;
                        let y = origin_y + row_index as f64;
                        path.extend(KurboRect::new(x, y, x + 1.0, y + 1.0).path_elements(CIRCLE_TOLERANCE));
                    }
                }
            }
        }

        if !path.elements().is_empty() {
            self.set_color(color);
            self.ctx.fill_path(&path);
        }

        self.stats.texts_drawn += 1;
        self.stats.draw_calls += 1;
    }

    // `source` must be flushed by its owner; this surface is flushed first
    // so earlier draws stay underneath the pasted pixels.
    fn blit(&mut self, source: &ImageSurface, dest_pos: Vec2) {
        self.flush();

        image::imageops::overlay(
            &mut self.image,
            &source.image,
            dest_pos.x.round() as i64,
            dest_pos.y.round() as i64);

        self.stats.blits += 1;
        self.stats.draw_calls += 1;
    }
}

// ----------------------------------------------
// Path helpers
// ----------------------------------------------

fn pixel_stroke() -> Stroke {
    let mut stroke = Stroke::new(1.0);
    stroke.start_cap = Cap::Square;
    stroke.end_cap = Cap::Square;
    stroke
}

#[inline]
fn pixel_center(point: Vec2) -> (f64, f64) {
    (point.x.floor() as f64 + 0.5, point.y.floor() as f64 + 0.5)
}

#[inline]
fn to_kurbo_rect(rect: Rect) -> KurboRect {
    KurboRect::new(rect.min.x as f64, rect.min.y as f64, rect.max.x as f64, rect.max.y as f64)
}

fn polygon_path(points: &[Vec2]) -> BezPath {
    let mut path = BezPath::new();
    path.move_to((points[0].x as f64, points[0].y as f64));
    for point in &points[1..] {
        path.line_to((point.x as f64, point.y as f64));
    }
    path.close_path();
    path
}

// ----------------------------------------------
// Built-in 3x5 bitmap font
// ----------------------------------------------

pub const GLYPH_WIDTH: i32 = 3;
pub const GLYPH_HEIGHT: i32 = 5;
pub const GLYPH_ADVANCE: i32 = GLYPH_WIDTH + 1;

#[inline]
pub fn text_size(text: &str) -> Vec2 {
    let count = text.chars().count() as i32;
    if count == 0 {
        return Vec2::zero();
    }
    Vec2::new((count * GLYPH_ADVANCE - 1) as f32, GLYPH_HEIGHT as f32)
}

// Covers digits and the punctuation used by coordinate labels.
// Anything else is drawn as blank space.
fn glyph_rows(ch: char) -> Option<[u8; 5]> {
    let rows = match ch {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '[' => [0b110, 0b100, 0b100, 0b100, 0b110],
        ']' => [0b011, 0b001, 0b001, 0b001, 0b011],
        '(' => [0b010, 0b100, 0b100, 0b100, 0b010],
        ')' => [0b010, 0b001, 0b001, 0b001, 0b010],
        _ => return None,
    };
    Some(rows)
}
