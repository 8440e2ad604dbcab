use super::{ImageSurface, RenderStats, Surface};
use crate::utils::{Color, Rect, Size, Vec2};

// ----------------------------------------------
// DrawCommand
// ----------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    FillRect(Rect, Color),
    FillPolygon(Vec<Vec2>, Color),
    Line(Vec2, Vec2, Color),
    Circle { center: Vec2, radius: f32, color: Color, filled: bool },
    Text(Vec2, String, Color),
    Blit(Size, Vec2),
}

// ----------------------------------------------
// RecordingSurface
// ----------------------------------------------

// Surface that keeps the draw calls instead of rasterizing them.
// Lets callers inspect exactly what a viewport drew.
pub struct RecordingSurface {
    size: Size,
    commands: Vec<DrawCommand>,
    stats: RenderStats,
}

impl RecordingSurface {
    pub fn new(size: Size) -> Self {
        Self { size, commands: Vec::new(), stats: RenderStats::default() }
    }

    #[inline]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    #[inline]
    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    pub fn lines_with_color(&self, color: Color) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        self.commands.iter().filter_map(move |cmd| match cmd {
            DrawCommand::Line(from, to, c) if *c == color => Some((*from, *to)),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Text(_, text, _) => Some(text.as_str()),
            _ => None,
        })
    }

    #[inline]
    fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
        self.stats.draw_calls += 1;
    }
}

impl Surface for RecordingSurface {
    #[inline]
    fn size(&self) -> Size {
        self.size
    }

    #[inline]
    fn stats(&self) -> &RenderStats {
        &self.stats
    }

    #[inline]
    fn reset_stats(&mut self) {
        self.stats = RenderStats::default();
    }

    fn clear(&mut self, color: Color) {
        self.push(DrawCommand::Clear(color));
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.stats.rects_drawn += 1;
        self.push(DrawCommand::FillRect(rect, color));
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
        self.stats.polygons_drawn += 1;
        self.push(DrawCommand::FillPolygon(points.to_vec(), color));
    }

    fn draw_line(&mut self, from_pos: Vec2, to_pos: Vec2, color: Color) {
        self.stats.lines_drawn += 1;
        self.push(DrawCommand::Line(from_pos, to_pos, color));
    }

    fn draw_circle(&mut self, center: Vec2, radius: f32, color: Color, filled: bool) {
        self.stats.circles_drawn += 1;
        self.push(DrawCommand::Circle { center, radius, color, filled });
    }

    fn draw_text(&mut self, pos: Vec2, text: &str, color: Color) {
        self.stats.texts_drawn += 1;
        self.push(DrawCommand::Text(pos, text.to_string(), color));
    }

    fn blit(&mut self, source: &ImageSurface, dest_pos: Vec2) {
        self.stats.blits += 1;
        self.push(DrawCommand::Blit(source.size(), dest_pos));
    }
}
