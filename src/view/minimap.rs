use super::{Viewport, ViewportFlags};
use crate::{
    log,
    app::input::{InputState, MouseButton},
    engine::{config::{RenderConfigs, ViewerConfigs}, time::Seconds},
    render::{ImageSurface, Surface},
    tile::{GridMap, unit::UnitRegistry},
    utils::{Color, Rect, Size, Vec2},
};

// ----------------------------------------------
// Minimap
// ----------------------------------------------

// Overview of the whole map. Clicking or dragging on it recenters the
// primary viewport, which is passed in on each call.
pub struct Minimap {
    viewport: Viewport,
    pressed_here: bool,
}

impl Minimap {
    pub fn new(screen_rect: Rect, map: &GridMap, configs: &ViewerConfigs) -> Self {
        Self {
            viewport: Viewport::new(screen_rect, map, ViewportFlags::IsMinimap, configs),
            pressed_here: false,
        }
    }

    // Bottom-right corner of the window. Height is a fraction of the window
    // height and width follows the map aspect ratio.
    pub fn layout(window_size: Size, map_aspect_ratio: f32, height_fraction: f32) -> Rect {
        let window = window_size.to_vec2();
        let height = (window.y * height_fraction).max(1.0);
        let width = (height * map_aspect_ratio).clamp(1.0, window.x);
        Rect::new(window.x - width, window.y - height, width, height)
    }

    #[inline]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    #[inline]
    pub fn screen_rect(&self) -> Rect {
        self.viewport.screen_rect()
    }

    #[inline]
    pub fn is_point_within(&self, point: Vec2) -> bool {
        self.viewport.is_point_within(point)
    }

    pub fn update(&mut self, seconds: Seconds, input: &InputState, map: &GridMap, has_pointer: bool, primary: &mut Viewport) {
        self.viewport.update(seconds, input, map, has_pointer);
        self.handle_drag(input, has_pointer, primary);
    }

    // A press that starts on the minimap recenters the primary camera on the
    // point under the cursor, and keeps doing so while the button is held.
    fn handle_drag(&mut self, input: &InputState, has_pointer: bool, primary: &mut Viewport) {
        if input.mouse_pressed(MouseButton::Left) && has_pointer {
            self.pressed_here = true;
        }

        let is_held = input.is_mouse_down(MouseButton::Left) || input.mouse_pressed(MouseButton::Left);

        if self.pressed_here && is_held {
            if let Some(cursor) = input.cursor_pos().filter(|pos| self.is_point_within(*pos)) {
                let target = self.viewport.screen_to_world(cursor);
                primary.center_on(target);
                log::verbose!(log::channel!("minimap"), "Centered primary camera on {target}.");
            }
        }

        if !input.is_mouse_down(MouseButton::Left) {
            self.pressed_here = false;
        }
    }

    // ----------------------
    // Drawing:
    // ----------------------

    pub fn draw(&mut self,
                map: &GridMap,
                units: Option<&UnitRegistry>,
                configs: &RenderConfigs,
                primary: &Viewport) -> &ImageSurface {

        self.viewport.draw(map, units, configs);

        if let Some(outline) = self.camera_outline(primary) {
            let surface = self.viewport.surface_mut();
            surface.stroke_rect(outline, configs.minimap_camera_color);
            surface.flush();
        }

        self.viewport.surface()
    }

    pub fn draw_to(&mut self,
                   target: &mut dyn Surface,
                   map: &GridMap,
                   units: Option<&UnitRegistry>,
                   configs: &RenderConfigs,
                   primary: &Viewport) {

        self.viewport.draw_to(target, map, units, configs);

        if let Some(outline) = self.camera_outline(primary) {
            target.stroke_rect(outline, configs.minimap_camera_color);
        }
    }

    // The primary camera window in minimap surface pixels. None if nothing
    // is left after clamping.
    pub fn camera_outline(&self, primary: &Viewport) -> Option<Rect> {
        let camera_rect = primary.camera().rect();
        let surface_size = self.viewport.screen_rect().size();

        let min = self.viewport.world_to_surface(camera_rect.min);
        let max = self.viewport.world_to_surface(camera_rect.max);

        // Kept off the outermost pixel rows and columns. compose_frame
        // strokes the minimap border over them, hiding anything drawn there.
        let lo = Vec2::new(1.0, 1.0);
        let hi = Vec2::new(surface_size.x - 2.0, surface_size.y - 2.0);

        let min = min.clamp(lo, hi);
        let max = max.clamp(lo, hi);

        let outline = Rect::from_extents(min, max);
        if outline.width() > 0.0 && outline.height() > 0.0 {
            Some(outline)
        } else {
            None
        }
    }
}

// ----------------------------------------------
// Frame composition
// ----------------------------------------------

// Pastes the primary then the minimap into `frame`. The 1px minimap
// border covers the outermost row and column of its pixels.
pub fn compose_frame(frame: &mut ImageSurface, primary: &Viewport, minimap: &Minimap, border_color: Color) {
    frame.blit(primary.surface(), primary.screen_rect().min);

    let minimap_rect = minimap.screen_rect();
    frame.blit(minimap.viewport().surface(), minimap_rect.min);

    let border = Rect::from_extents(minimap_rect.min, minimap_rect.max - Vec2::one());
    frame.stroke_rect(border, border_color);
    frame.flush();
}
