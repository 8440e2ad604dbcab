use bitflags::bitflags;

use super::{GridMap, Tile, TileOutline, unit::UnitRegistry};
use crate::{
    engine::config::RenderConfigs,
    render::{Surface, is_polygon_fully_offscreen, software::text_size},
    utils::{coords::Cell, Color, Rect, Vec2},
    view::ViewTransform,
};

// ----------------------------------------------
// Constants
// ----------------------------------------------

pub const MAP_BACKGROUND_COLOR: Color = Color::from_rgb_u8(20, 20, 30);
pub const DEFAULT_GRID_COLOR: Color = Color::new(1.0, 1.0, 1.0, 0.25);
pub const DEFAULT_TILE_COLOR: Color = Color::from_rgb_u8(40, 120, 40);
pub const DEFAULT_OUTLINE_COLOR: Color = Color::black();

pub const HOVER_TILE_COLOR: Color = Color::new(0.76, 0.96, 0.39, 1.0); // light green
pub const SELECTED_TILE_COLOR: Color = Color::new(0.95, 0.80, 0.30, 1.0); // amber
pub const SELECTED_HOVER_TILE_COLOR: Color = Color::new(1.0, 0.95, 0.60, 1.0); // pale yellow
pub const OCCUPANT_MARKER_COLOR: Color = Color::new(0.9, 0.2, 0.2, 1.0);

// Grid lines closer than this many pixels are skipped.
const MIN_GRID_LINE_SPACING_PX: f32 = 4.0;

// ----------------------------------------------
// MapRenderFlags
// ----------------------------------------------

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct MapRenderFlags: u32 {
        const DrawGrid        = 1 << 0;
        const DrawDebugLabels = 1 << 1;
        const DrawOccupants   = 1 << 2;
        const DrawHighlights  = 1 << 3;
    }
}

impl MapRenderFlags {
    pub fn from_configs(configs: &RenderConfigs) -> Self {
        let mut flags = Self::DrawOccupants | Self::DrawHighlights;
        flags.set(Self::DrawGrid, configs.draw_grid);
        flags.set(Self::DrawDebugLabels, configs.draw_debug_labels);
        flags
    }
}

// ----------------------------------------------
// MapRenderStats
// ----------------------------------------------

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MapRenderStats {
    pub tiles_drawn: u32,
    pub tiles_culled: u32,
    pub occupants_drawn: u32,
    pub labels_drawn: u32,
    pub grid_lines_drawn: u32,
}

// ----------------------------------------------
// TileInteraction
// ----------------------------------------------

// Hover & selection state to highlight while drawing.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TileInteraction {
    pub hover: Option<Cell>,
    pub selected: Option<Cell>,
}

impl TileInteraction {
    #[inline]
    pub fn none() -> Self {
        Self::default()
    }
}

// ----------------------------------------------
// MapRenderer
// ----------------------------------------------

pub struct MapRenderer {
    flags: MapRenderFlags,
    stats: MapRenderStats,
}

impl MapRenderer {
    pub fn new(flags: MapRenderFlags) -> Self {
        Self { flags, stats: MapRenderStats::default() }
    }

    #[inline]
    pub fn flags(&self) -> MapRenderFlags {
        self.flags
    }

    #[inline]
    pub fn set_flags(&mut self, flags: MapRenderFlags, value: bool) {
        self.flags.set(flags, value);
    }

    #[inline]
    pub fn toggle_flags(&mut self, flags: MapRenderFlags) {
        self.flags.toggle(flags);
    }

    // Stats of the last `draw_map` call.
    #[inline]
    pub fn stats(&self) -> &MapRenderStats {
        &self.stats
    }

    // Repaints the whole surface: background, optional grid overlay, then
    // every tile back-to-front.
    pub fn draw_map(&mut self,
                    surface: &mut dyn Surface,
                    view: &ViewTransform,
                    map: &GridMap,
                    units: Option<&UnitRegistry>,
                    interaction: TileInteraction,
                    configs: &RenderConfigs,
                    background_color: Color) -> MapRenderStats {

        self.stats = MapRenderStats::default();

        surface.clear(background_color);

        if self.flags.intersects(MapRenderFlags::DrawGrid) {
            self.draw_grid(surface, view, configs);
        }

        let surface_rect = surface.rect();

        for tile in map.tiles_in_draw_order() {
            let points = project_outline(tile, view);

            if is_polygon_fully_offscreen(&surface_rect, &points) {
                self.stats.tiles_culled += 1;
                continue;
            }

            let fill_color = if self.flags.intersects(MapRenderFlags::DrawHighlights) {
                tile_fill_color(tile.cell(), interaction, configs)
            } else {
                configs.tile_color
            };

            surface.fill_polygon(&points, fill_color);
            surface.stroke_polygon(&points, configs.outline_color, true);
            self.stats.tiles_drawn += 1;

            let center = view.world_to_surface(tile.position());

            if let Some(unit_id) = tile.occupant() {
                if self.flags.intersects(MapRenderFlags::DrawOccupants) {
                    let color = units
                        .and_then(|registry| registry.get(unit_id))
                        .map(|unit| unit.kind.marker_color())
                        .unwrap_or(configs.occupant_color);

                    let size = configs.occupant_marker_size;
                    let marker = Rect::from_center_and_size(center, Vec2::new(size, size));
                    surface.fill_rect(marker, color);
                    surface.stroke_rect(marker, configs.outline_color);
                    self.stats.occupants_drawn += 1;
                }
            }

            if self.flags.intersects(MapRenderFlags::DrawDebugLabels) {
                let label = tile.cell().to_string();
                let label_pos = center - text_size(&label) * 0.5;
                surface.draw_text(label_pos, &label, configs.label_color);
                self.stats.labels_drawn += 1;
            }
        }

        self.stats
    }

    // World-aligned grid lines every `grid_spacing` units across the visible camera rect.
    fn draw_grid(&mut self, surface: &mut dyn Surface, view: &ViewTransform, configs: &RenderConfigs) {
        let spacing = configs.grid_spacing;
        if spacing <= 0.0 {
            return;
        }

        let pixels_per_unit = view.pixels_per_unit();
        if spacing * pixels_per_unit.x.min(pixels_per_unit.y) < MIN_GRID_LINE_SPACING_PX {
            return;
        }

        let visible = view.camera_rect();
        let surface_size = view.screen_size();

        let mut x = (visible.min.x / spacing).ceil() * spacing;
        while x <= visible.max.x {
            let sx = view.world_to_surface(Vec2::new(x, visible.min.y)).x;
            surface.draw_line(Vec2::new(sx, 0.0), Vec2::new(sx, surface_size.y), configs.grid_color);
            self.stats.grid_lines_drawn += 1;
            x += spacing;
        }

        let mut y = (visible.min.y / spacing).ceil() * spacing;
        while y <= visible.max.y {
            let sy = view.world_to_surface(Vec2::new(visible.min.x, y)).y;
            surface.draw_line(Vec2::new(0.0, sy), Vec2::new(surface_size.x, sy), configs.grid_color);
            self.stats.grid_lines_drawn += 1;
            y += spacing;
        }
    }
}

// ----------------------------------------------
// Helpers
// ----------------------------------------------

pub fn tile_fill_color(cell: Cell, interaction: TileInteraction, configs: &RenderConfigs) -> Color {
    let is_hovered = interaction.hover == Some(cell);
    let is_selected = interaction.selected == Some(cell);

    match (is_selected, is_hovered) {
        (true, true)  => configs.selected_hover_color,
        (true, false) => configs.selected_color,
        (false, true) => configs.hover_color,
        (false, false) => configs.tile_color,
    }
}

// Tile outline in surface pixels.
#[inline]
pub fn project_outline(tile: &Tile, view: &ViewTransform) -> TileOutline {
    tile.outline()
        .iter()
        .map(|point| view.world_to_surface(*point))
        .collect()
}
