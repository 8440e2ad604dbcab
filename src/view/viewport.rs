use bitflags::bitflags;

use super::{Camera, ViewTransform};
use crate::{
    log,
    app::input::{InputKey, InputState, MouseButton},
    engine::{config::{RenderConfigs, ViewerConfigs}, time::Seconds},
    render::{ImageSurface, Surface},
    tile::{
        GridMap, TileOutline,
        rendering::{MapRenderFlags, MapRenderStats, MapRenderer, TileInteraction},
        unit::UnitRegistry,
    },
    utils::{coords::Cell, Rect, Size, Vec2},
};

// ----------------------------------------------
// ViewportFlags
// ----------------------------------------------

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct ViewportFlags: u32 {
        const CanZoom   = 1 << 0;
        const CanMove   = 1 << 1;
        const IsPrimary = 1 << 2;
        const IsMinimap = 1 << 3;
    }
}

// ----------------------------------------------
// DragState
// ----------------------------------------------

// Tracks a left-button gesture that started on this viewport.
#[derive(Copy, Clone, Debug, Default)]
struct DragState {
    press_origin: Option<Vec2>, // Set while a press that began here is held.
    prev_cursor: Vec2,
    is_dragging: bool,
}

impl DragState {
    #[inline]
    fn is_active(&self) -> bool {
        self.press_origin.is_some()
    }

    #[inline]
    fn begin(&mut self, cursor: Vec2) {
        *self = Self { press_origin: Some(cursor), prev_cursor: cursor, is_dragging: false };
    }

    #[inline]
    fn reset(&mut self) {
        *self = Self::default();
    }
}

// ----------------------------------------------
// Viewport
// ----------------------------------------------

pub struct Viewport {
    screen_rect: Rect,
    camera: Camera,
    flags: ViewportFlags,

    zoom_level: f32,
    min_zoom: f32,
    max_zoom: f32,
    units_per_pixel: f32,
    pixels_per_unit: f32,

    move_speed: f32,
    zoom_speed: f32,
    scroll_zoom_step: f32,
    drag_threshold_px: f32,

    hover_tile: Option<Cell>,
    selected_tile: Option<Cell>,
    drag: DragState,
    moved: bool,

    surface: ImageSurface,
    renderer: MapRenderer,
}

impl Viewport {
    pub fn new_primary(screen_rect: Rect, map: &GridMap, configs: &ViewerConfigs) -> Self {
        Self::new(screen_rect,
                  map,
                  ViewportFlags::CanZoom | ViewportFlags::CanMove | ViewportFlags::IsPrimary,
                  configs)
    }

    // `screen_rect` is where this viewport lands in the composited frame.
    // The camera starts centered on the map. A minimap camera fits the whole
    // map and is unbounded; any other camera fills the screen with as much of
    // the map as fits and is clamped to the map rect.
    pub fn new(screen_rect: Rect, map: &GridMap, flags: ViewportFlags, configs: &ViewerConfigs) -> Self {
        assert!(screen_rect.is_valid(), "Invalid viewport rect: {screen_rect}");

        let screen_size = screen_rect.size();
        let screen_ratio = screen_size.x / screen_size.y;
        let map_ratio = map.aspect_ratio();

        let units_per_pixel = (map.width() / screen_size.x).min(map.height() / screen_size.y);
        let pixels_per_unit = 1.0 / units_per_pixel;

        let is_minimap = flags.intersects(ViewportFlags::IsMinimap);

        let (camera_size, bounds) = if is_minimap {
            let size = if map_ratio > screen_ratio {
                Vec2::new(map.width(), map.width() / screen_ratio)
            } else {
                Vec2::new(map.height() * screen_ratio, map.height())
            };
            (size, None)
        } else {
            let size = if map_ratio > screen_ratio {
                Vec2::new(map.height() * screen_ratio, map.height())
            } else {
                Vec2::new(map.width(), map.width() / screen_ratio)
            };
            (size, Some(map.rect()))
        };

        let camera = Camera::new(map.center(), camera_size.x, camera_size.y, bounds, &configs.camera);

        let render_flags = if is_minimap {
            MapRenderFlags::DrawOccupants
        } else {
            MapRenderFlags::from_configs(&configs.render)
        };

        let surface_size = Size::new(screen_size.x.round() as i32, screen_size.y.round() as i32);

        log::info!(log::channel!("viewport"),
                   "New {} viewport at {screen_rect}: {camera}, {:.3} pixels per unit.",
                   if is_minimap { "minimap" } else { "primary" }, pixels_per_unit);

        Self {
            screen_rect,
            camera,
            flags,
            zoom_level: 1.0_f32.clamp(configs.camera.min_zoom, configs.camera.max_zoom),
            min_zoom: configs.camera.min_zoom,
            max_zoom: configs.camera.max_zoom,
            units_per_pixel,
            pixels_per_unit,
            move_speed: configs.camera.move_speed,
            zoom_speed: configs.camera.zoom_speed,
            scroll_zoom_step: configs.camera.scroll_zoom_step,
            drag_threshold_px: configs.input.drag_threshold_px,
            hover_tile: None,
            selected_tile: None,
            drag: DragState::default(),
            moved: false,
            surface: ImageSurface::new(surface_size, configs.render.background_color),
            renderer: MapRenderer::new(render_flags),
        }
    }

    // ----------------------
    // Accessors:
    // ----------------------

    #[inline] pub fn screen_rect(&self) -> Rect { self.screen_rect }
    #[inline] pub fn camera(&self) -> &Camera { &self.camera }
    #[inline] pub fn flags(&self) -> ViewportFlags { self.flags }
    #[inline] pub fn zoom_level(&self) -> f32 { self.zoom_level }
    #[inline] pub fn pixels_per_unit(&self) -> f32 { self.pixels_per_unit }
    #[inline] pub fn units_per_pixel(&self) -> f32 { self.units_per_pixel }
    #[inline] pub fn hover_tile(&self) -> Option<Cell> { self.hover_tile }
    #[inline] pub fn selected_tile(&self) -> Option<Cell> { self.selected_tile }
    #[inline] pub fn is_dragging(&self) -> bool { self.drag.is_dragging }
    #[inline] pub fn surface(&self) -> &ImageSurface { &self.surface }
    #[inline] pub fn render_flags(&self) -> MapRenderFlags { self.renderer.flags() }
    #[inline] pub fn render_stats(&self) -> &MapRenderStats { self.renderer.stats() }

    #[inline] pub fn is_primary(&self) -> bool { self.flags.intersects(ViewportFlags::IsPrimary) }
    #[inline] pub fn is_minimap(&self) -> bool { self.flags.intersects(ViewportFlags::IsMinimap) }
    #[inline] pub fn can_zoom(&self) -> bool { self.flags.intersects(ViewportFlags::CanZoom) }
    #[inline] pub fn can_move(&self) -> bool { self.flags.intersects(ViewportFlags::CanMove) }

    // Whether the camera moved this frame through a drag or minimap navigation.
    #[inline]
    pub fn moved(&self) -> bool {
        self.moved
    }

    // Pixels per world unit at the current zoom.
    #[inline]
    pub fn scale(&self) -> f32 {
        self.pixels_per_unit / self.zoom_level
    }

    #[inline]
    pub fn is_point_within(&self, point: Vec2) -> bool {
        self.screen_rect.contains_point(point)
    }

    #[inline]
    pub fn select_tile(&mut self, cell: Option<Cell>) {
        self.selected_tile = cell;
    }

    // ----------------------
    // Coordinate transforms:
    // ----------------------

    #[inline]
    pub fn view_transform(&self) -> ViewTransform {
        ViewTransform::new(self.camera.rect(), self.screen_rect)
    }

    // World point to pixels local to this viewport's surface.
    #[inline]
    pub fn world_to_surface(&self, point: Vec2) -> Vec2 {
        self.view_transform().world_to_surface(point)
    }

    // World point to absolute frame pixels.
    #[inline]
    pub fn world_to_screen(&self, point: Vec2) -> Vec2 {
        self.view_transform().world_to_screen(point)
    }

    // Absolute frame pixels to world point.
    #[inline]
    pub fn screen_to_world(&self, point: Vec2) -> Vec2 {
        self.view_transform().screen_to_world(point)
    }

    // Tile outline in absolute frame pixels.
    pub fn tile_screen_points(&self, map: &GridMap, cell: Cell) -> TileOutline {
        let view = self.view_transform();
        map.tile(cell)
            .outline()
            .iter()
            .map(|point| view.world_to_screen(*point))
            .collect()
    }

    // ----------------------
    // Camera control:
    // ----------------------

    pub fn move_cam(&mut self, delta: Vec2) {
        if self.can_move() {
            self.camera.move_by(delta);
        }
    }

    // Recenters the camera on a world point, clamped to the camera bounds.
    pub fn center_on(&mut self, point: Vec2) {
        self.camera.set_center(point);
        self.moved = true;
    }

    // Negative deltas zoom in, positive deltas zoom out. The world point
    // under the cursor stays under the cursor. Needs the cursor on this viewport.
    pub fn zoom_cam(&mut self, delta: f32, cursor: Option<Vec2>) {
        if !self.can_zoom() {
            return;
        }

        let Some(cursor) = cursor.filter(|pos| self.is_point_within(*pos)) else {
            return;
        };

        let mut delta = delta;
        if self.zoom_level + delta < self.min_zoom {
            delta = self.min_zoom - self.zoom_level;
        }

        self.zoom_level = (self.zoom_level + delta).clamp(self.min_zoom, self.max_zoom);

        if delta == 0.0 {
            return;
        }

        let before = self.screen_to_world(cursor);

        let center = self.camera.raw_center();
        let width = self.camera.width() * (1.0 + delta);
        let height = self.camera.height() * (1.0 + delta);
        self.camera.change(Some(center), Some(width), Some(height));

        let after = self.screen_to_world(cursor);
        let center = self.camera.raw_center() + (before - after);
        self.camera.set_center(center);
    }

    // `direction` comes from the arrow/WASD keys. Speed is relative to the camera width.
    pub fn move_by_keys(&mut self, direction: Vec2, seconds: Seconds) {
        if !self.can_move() || direction.is_zero() {
            return;
        }
        let speed = seconds * self.camera.width() * self.move_speed;
        self.move_cam(direction * speed);
    }

    // Positive direction zooms out, negative zooms in.
    pub fn handle_zoom(&mut self, direction: f32, seconds: Seconds, cursor: Option<Vec2>) {
        self.zoom_cam(direction * self.zoom_speed * seconds, cursor);
    }

    // Drag in pixels to camera motion. Scale only: the camera offset plays no part.
    pub fn pan_drag(&mut self, mouse_delta_px: Vec2) {
        let world_delta = self.camera.size() * (mouse_delta_px / self.screen_rect.size());
        self.move_cam(-world_delta);
        self.moved = true;
    }

    pub fn screen_shake(&mut self, duration: Seconds) {
        self.camera.screen_shake(duration);
    }

    // ----------------------
    // Frame update:
    // ----------------------

    // `has_pointer` tells whether this viewport is the topmost surface under the cursor.
    pub fn update(&mut self, seconds: Seconds, input: &InputState, map: &GridMap, has_pointer: bool) {
        self.moved = false;
        self.camera.update();

        self.move_by_keys(input.direction(), seconds);

        if input.scroll() != 0 && has_pointer {
            let direction = input.scroll() as f32 * self.scroll_zoom_step;
            self.handle_zoom(direction, seconds, input.cursor_pos());
        }

        if self.is_primary() {
            self.handle_keys(input);
            self.handle_mouse(input, map, has_pointer);
        }
    }

    fn handle_keys(&mut self, input: &InputState) {
        if input.key_pressed(InputKey::G) {
            self.renderer.toggle_flags(MapRenderFlags::DrawGrid);
        }
        if input.key_pressed(InputKey::F3) {
            self.renderer.toggle_flags(MapRenderFlags::DrawDebugLabels);
        }
        if input.key_pressed(InputKey::Escape) && self.selected_tile.take().is_some() {
            log::verbose!(log::channel!("viewport"), "Selection cleared.");
        }
    }

    fn handle_mouse(&mut self, input: &InputState, map: &GridMap, has_pointer: bool) {
        let cursor = input.cursor_pos().filter(|_| has_pointer);

        if let Some(cursor) = cursor {
            if input.mouse_pressed(MouseButton::Left) {
                self.drag.begin(cursor);
            }
            // The release frame counts too, so a jump straight to the
            // release point still becomes a drag.
            let is_held = input.is_mouse_down(MouseButton::Left) || input.mouse_released(MouseButton::Left);
            if is_held && self.drag.is_active() {
                self.drag_cam(cursor);
            }
        }

        // Hover after any camera motion so it matches what is drawn.
        self.update_hover_tile(cursor, map);

        if input.mouse_released(MouseButton::Left) {
            if cursor.is_some() && self.drag.is_active() {
                self.click_tile();
            }
            self.drag.reset();
        }
    }

    // Pans once the cursor has left the threshold box around the press origin.
    fn drag_cam(&mut self, cursor: Vec2) {
        let Some(origin) = self.drag.press_origin else {
            return;
        };

        if !self.drag.is_dragging {
            let offset = cursor - origin;
            if offset.x.abs() <= self.drag_threshold_px && offset.y.abs() <= self.drag_threshold_px {
                return;
            }
            self.drag.is_dragging = true;
        }

        let delta = cursor - self.drag.prev_cursor;
        if !delta.is_zero() {
            self.pan_drag(delta);
        }
        self.drag.prev_cursor = cursor;
    }

    pub fn update_hover_tile(&mut self, cursor: Option<Vec2>, map: &GridMap) {
        self.hover_tile = cursor.map(|pos| map.nearest_tile(self.screen_to_world(pos)));
    }

    // Selection only follows a release that was not a drag.
    fn click_tile(&mut self) {
        if self.drag.is_dragging {
            return;
        }
        if let Some(cell) = self.hover_tile {
            self.selected_tile = Some(cell);
            log::info!(log::channel!("viewport"), "Selected tile {cell}.");
        }
    }

    // ----------------------
    // Drawing:
    // ----------------------

    #[inline]
    fn interaction(&self) -> TileInteraction {
        if self.is_minimap() {
            TileInteraction::none()
        } else {
            TileInteraction { hover: self.hover_tile, selected: self.selected_tile }
        }
    }

    // Repaints this viewport's own surface.
    pub fn draw(&mut self, map: &GridMap, units: Option<&UnitRegistry>, configs: &RenderConfigs) -> &ImageSurface {
        let view = self.view_transform();
        let interaction = self.interaction();
        self.renderer.draw_map(&mut self.surface, &view, map, units, interaction, configs, configs.background_color);
        self.surface.flush();
        &self.surface
    }

    // Same as `draw` but onto a caller-provided surface of the same size.
    pub fn draw_to(&mut self, target: &mut dyn Surface, map: &GridMap, units: Option<&UnitRegistry>, configs: &RenderConfigs) {
        let view = self.view_transform();
        let interaction = self.interaction();
        self.renderer.draw_map(target, &view, map, units, interaction, configs, configs.background_color);
    }

    #[inline]
    pub(super) fn surface_mut(&mut self) -> &mut ImageSurface {
        &mut self.surface
    }
}
