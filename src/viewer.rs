use std::path::Path;

use crate::{
    log,
    app::{InputEvent, input::InputState},
    engine::{config::ViewerConfigs, time::Seconds},
    render::{ImageSurface, Surface},
    tile::{
        GridMap,
        unit::{Unit, UnitId, UnitKind, UnitRegistry},
    },
    utils::{coords::Cell, Rect, Size, Vec2},
    view::{self, Minimap, Viewport},
};

// ----------------------------------------------
// Viewer
// ----------------------------------------------

// Owns the map, its units and both views. The caller drives it one frame
// at a time: `update` with the frame's input batch, then `draw`.
pub struct Viewer {
    configs: ViewerConfigs,
    map: GridMap,
    units: UnitRegistry,
    input: InputState,
    primary: Viewport,
    minimap: Minimap,
    frame: ImageSurface,
}

impl Viewer {
    pub fn new(configs: ViewerConfigs) -> Self {
        let map = GridMap::from_configs(&configs.map);
        Self::with_map(configs, map)
    }

    pub fn with_map(configs: ViewerConfigs, map: GridMap) -> Self {
        let window_size = Size::new(configs.window.width, configs.window.height);
        assert!(window_size.is_valid(), "Invalid window size: {window_size}");

        let window_rect = Rect::from_pos_and_size(Vec2::zero(), window_size.to_vec2());
        let minimap_rect = Minimap::layout(window_size, map.aspect_ratio(), configs.window.minimap_height_fraction);

        let primary = Viewport::new_primary(window_rect, &map, &configs);
        let minimap = Minimap::new(minimap_rect, &map, &configs);
        let frame = ImageSurface::new(window_size, configs.render.background_color);

        log::info!(log::channel!("app"), "{}: {window_size} window, {} map {}x{}.",
                   configs.window.title, map.kind(), map.cols(), map.rows());

        Self {
            configs,
            map,
            units: UnitRegistry::new(),
            input: InputState::new(),
            primary,
            minimap,
            frame,
        }
    }

    #[inline] pub fn configs(&self) -> &ViewerConfigs { &self.configs }
    #[inline] pub fn map(&self) -> &GridMap { &self.map }
    #[inline] pub fn units(&self) -> &UnitRegistry { &self.units }
    #[inline] pub fn input(&self) -> &InputState { &self.input }
    #[inline] pub fn primary(&self) -> &Viewport { &self.primary }
    #[inline] pub fn primary_mut(&mut self) -> &mut Viewport { &mut self.primary }
    #[inline] pub fn minimap(&self) -> &Minimap { &self.minimap }
    #[inline] pub fn frame(&self) -> &ImageSurface { &self.frame }

    #[inline]
    pub fn selected_tile(&self) -> Option<Cell> {
        self.primary.selected_tile()
    }

    #[inline]
    pub fn hover_tile(&self) -> Option<Cell> {
        self.primary.hover_tile()
    }

    // ----------------------
    // Units:
    // ----------------------

    // Spawns a unit on `cell`. Fails if the cell is outside the map or taken.
    pub fn spawn_unit(&mut self, name: &str, kind: UnitKind, cell: Cell) -> Option<UnitId> {
        if !self.map.is_cell_within_bounds(cell) {
            log::warn!(log::channel!("app"), "Cannot spawn '{name}' outside the map at {cell}.");
            return None;
        }

        if let Some(occupant) = self.map.occupant(cell) {
            log::warn!(log::channel!("app"), "Cannot spawn '{name}' at {cell}: occupied by {occupant}.");
            return None;
        }

        let id = self.units.spawn(Unit::new(name, kind));
        self.map.place_unit(cell, id);

        log::info!(log::channel!("app"), "Spawned {kind} '{name}' {id} at {cell}.");
        Some(id)
    }

    pub fn despawn_unit(&mut self, cell: Cell) -> Option<Unit> {
        let id = self.map.remove_unit(cell)?;
        self.units.despawn(id)
    }

    // ----------------------
    // Frame loop:
    // ----------------------

    pub fn update(&mut self, seconds: Seconds, events: &[InputEvent]) {
        self.input.begin_frame(events);
        view::update_views(&mut self.primary, &mut self.minimap, seconds, &self.input, &self.map);
    }

    pub fn draw(&mut self) -> &ImageSurface {
        let render = &self.configs.render;

        self.primary.draw(&self.map, Some(&self.units), render);
        self.minimap.draw(&self.map, Some(&self.units), render, &self.primary);

        self.frame.reset_stats();
        self.frame.clear(render.background_color);
        view::compose_frame(&mut self.frame, &self.primary, &self.minimap, self.configs.window.minimap_border_color);

        &self.frame
    }

    pub fn save_frame(&self, path: &Path) -> bool {
        match self.frame.save_png(path) {
            Ok(()) => {
                log::info!(log::channel!("app"), "Saved frame to {path:?}.");
                true
            }
            Err(_) => false, // Already logged by the surface.
        }
    }
}
