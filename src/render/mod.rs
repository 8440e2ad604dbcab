use crate::utils::{Color, Rect, Size, Vec2};

pub mod software;
pub mod recorder;


pub use software::ImageSurface;
pub use recorder::{DrawCommand, RecordingSurface};

// ----------------------------------------------
// RenderStats
// ----------------------------------------------

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub rects_drawn: u32,
    pub polygons_drawn: u32,
    pub lines_drawn: u32,
    pub circles_drawn: u32,
    pub texts_drawn: u32,
    pub blits: u32,
    pub draw_calls: u32,
}

// ----------------------------------------------
// Surface
// ----------------------------------------------

// A pixel-space drawing target. Coordinates are relative to the surface's
// top-left corner; anything outside [0, size) is clipped.
pub trait Surface {
    fn size(&self) -> Size;
    fn stats(&self) -> &RenderStats;
    fn reset_stats(&mut self);

    // ----------------------
    // Draw commands:
    // ----------------------

    fn clear(&mut self, color: Color);
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn fill_polygon(&mut self, points: &[Vec2], color: Color);
    fn draw_line(&mut self, from_pos: Vec2, to_pos: Vec2, color: Color);
    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color, filled: bool);
    fn draw_text(&mut self, pos: Vec2, text: &str, color: Color);
    fn blit(&mut self, source: &ImageSurface, dest_pos: Vec2);

    // Resolves batched draw calls into pixels. No-op for immediate targets.
    fn flush(&mut self) {}

    #[inline]
    fn rect(&self) -> Rect {
        Rect::from_pos_and_size(Vec2::zero(), self.size().to_vec2())
    }

    // 1px outline. Closed polygons connect the last point back to the first.
    fn stroke_polygon(&mut self, points: &[Vec2], color: Color, is_closed: bool) {
        if points.len() < 2 {
            return;
        }

        for pair in points.windows(2) {
            self.draw_line(pair[0], pair[1], color);
        }

        if is_closed {
            let first = points[0];
            let last = points[points.len() - 1];
            if first != last {
                self.draw_line(last, first, color);
            }
        }
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color) {
        if is_rect_fully_offscreen(&self.rect(), &rect) {
            return; // Cull if fully offscreen.
        }

        let points = [
            Vec2::new(rect.min.x, rect.min.y),
            Vec2::new(rect.max.x, rect.min.y),
            Vec2::new(rect.max.x, rect.max.y),
            Vec2::new(rect.min.x, rect.max.y),
        ];

        self.stroke_polygon(&points, color, true);
    }
}

// ----------------------------------------------
// Culling helpers
// ----------------------------------------------

#[inline]
pub fn is_rect_fully_offscreen(viewport: &Rect, rect: &Rect) -> bool {
    rect.max.x < viewport.min.x ||
    rect.max.y < viewport.min.y ||
    rect.min.x > viewport.max.x ||
    rect.min.y > viewport.max.y
}

#[inline]
pub fn is_polygon_fully_offscreen(viewport: &Rect, points: &[Vec2]) -> bool {
    points.is_empty() || is_rect_fully_offscreen(viewport, &Rect::from_points(points))
}
