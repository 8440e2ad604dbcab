use std::path::Path;
use serde::{Serialize, Deserialize, de::DeserializeOwned};

use crate::{
    log,
    tile::{map::MapKind, HexOrientation, rendering},
    utils::Color,
};

// ----------------------------------------------
// Configs
// ----------------------------------------------

pub const CONFIGS_DIR_PATH: &str = "configs";
pub const VIEWER_CONFIGS_FILE: &str = "viewer.json";

pub trait Configs {
    // Called after a successful load so configs can fix up invalid values.
    fn post_load(&mut self) {
    }

    // Saves current configs to file as pretty-printed JSON.
    fn save_file(&self, config_json_path: &Path) -> bool
        where Self: Sized + Serialize
    {
        debug_assert!(!config_json_path.as_os_str().is_empty());

        // Make sure the parent directory exists. Ignore any errors since
        // this might fail if any element of the path already exists.
        if let Some(parent) = config_json_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }

        let json = match serde_json::to_string_pretty(self) {
            Ok(json) => json,
            Err(err) => {
                log::error!(log::channel!("config"), "Failed to serialize config file {config_json_path:?}: {err}");
                return false;
            }
        };

        if let Err(err) = std::fs::write(config_json_path, json) {
            log::error!(log::channel!("config"), "Failed to write config file {config_json_path:?}: {err}");
            return false;
        }

        true
    }

    // Either succeeds loading the config file or returns a default config.
    fn load_file(config_json_path: &Path) -> Self
        where Self: Sized + Default + DeserializeOwned
    {
        debug_assert!(!config_json_path.as_os_str().is_empty());

        let json = match std::fs::read_to_string(config_json_path) {
            Ok(json) => json,
            Err(err) => {
                log::error!(log::channel!("config"), "Failed to read config file from path {config_json_path:?}: {err}");
                return Self::default();
            }
        };

        match Self::load_str(&json) {
            Ok(configs) => {
                log::info!(log::channel!("config"), "Loaded configs from {config_json_path:?}.");
                configs
            }
            Err(err) => {
                log::error!(log::channel!("config"), "Failed to deserialize config file from path {config_json_path:?}: {err}");
                Self::default()
            }
        }
    }

    fn load_str(json: &str) -> Result<Self, String>
        where Self: Sized + DeserializeOwned
    {
        let mut configs: Self = serde_json::from_str(json).map_err(|err| err.to_string())?;
        configs.post_load();
        Ok(configs)
    }
}

// ----------------------------------------------
// ViewerConfigs
// ----------------------------------------------

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)] // Missing fields in the config file get defaults from ViewerConfigs::default().
pub struct ViewerConfigs {
    pub log_level: log::Level,
    pub window: WindowConfigs,
    pub camera: CameraConfigs,
    pub input: InputConfigs,
    pub render: RenderConfigs,
    pub map: MapConfigs,
}

impl Default for ViewerConfigs {
    fn default() -> Self {
        Self {
            log_level: log::Level::Info,
            window: WindowConfigs::default(),
            camera: CameraConfigs::default(),
            input: InputConfigs::default(),
            render: RenderConfigs::default(),
            map: MapConfigs::default(),
        }
    }
}

impl Configs for ViewerConfigs {
    fn post_load(&mut self) {
        let cam = &mut self.camera;

        if cam.min_zoom <= 0.0 || cam.min_zoom > cam.max_zoom {
            log::warn!(log::channel!("config"), "Invalid zoom range [{}, {}]. Using defaults.", cam.min_zoom, cam.max_zoom);
            let defaults = CameraConfigs::default();
            cam.min_zoom = defaults.min_zoom;
            cam.max_zoom = defaults.max_zoom;
        }

        if !(0.0..1.0).contains(&cam.shake_decay) {
            log::warn!(log::channel!("config"), "Shake decay must be in [0,1): {}", cam.shake_decay);
            cam.shake_decay = CameraConfigs::default().shake_decay;
        }

        let max_side = u16::MAX as i32;
        if self.window.width <= 0 || self.window.height <= 0 || self.window.width > max_side || self.window.height > max_side {
            log::warn!(log::channel!("config"), "Invalid window size {}x{}.", self.window.width, self.window.height);
            self.window.width  = WindowConfigs::default().width;
            self.window.height = WindowConfigs::default().height;
        }

        if self.map.rows == 0 || self.map.cols == 0 {
            log::warn!(log::channel!("config"), "Map must have at least one row and column.");
            self.map.rows = self.map.rows.max(1);
            self.map.cols = self.map.cols.max(1);
        }

        let map_defaults = MapConfigs::default();
        let map = &mut self.map;
        reset_if_not_positive("map.hex_radius", &mut map.hex_radius, map_defaults.hex_radius);
        reset_if_not_positive("map.hex_vertical_scale", &mut map.hex_vertical_scale, map_defaults.hex_vertical_scale);
        reset_if_not_positive("map.tile_width", &mut map.tile_width, map_defaults.tile_width);
        reset_if_not_positive("map.tile_height", &mut map.tile_height, map_defaults.tile_height);
    }
}

fn reset_if_not_positive(name: &str, value: &mut f32, default: f32) {
    if !(value.is_finite() && *value > 0.0) {
        log::warn!(log::channel!("config"), "{name} must be a positive size, got {value}. Using {default}.");
        *value = default;
    }
}

// ----------------------------------------------
// WindowConfigs
// ----------------------------------------------

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfigs {
    pub title: String,
    pub width: i32,
    pub height: i32,

    // Minimap height as a fraction of the window height.
    // Width follows from the map aspect ratio.
    pub minimap_height_fraction: f32,
    pub minimap_border_color: Color,
}

impl Default for WindowConfigs {
    fn default() -> Self {
        Self {
            title: "HexView".into(),
            width: 1200,
            height: 600,
            minimap_height_fraction: 0.2,
            minimap_border_color: Color::red(),
        }
    }
}

// ----------------------------------------------
// CameraConfigs
// ----------------------------------------------

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfigs {
    pub move_speed: f32,       // Camera widths per second.
    pub zoom_speed: f32,       // Zoom level units per second.
    pub scroll_zoom_step: f32, // Multiplier applied to each scroll-wheel notch.
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub shake_decay: f32,
    pub shake_strength: f32,
    pub shake_seed: u64,
}

impl Default for CameraConfigs {
    fn default() -> Self {
        Self {
            move_speed: 0.5,
            zoom_speed: 0.75,
            scroll_zoom_step: 1.0,
            min_zoom: 0.1,
            max_zoom: 1.0,
            shake_decay: 0.95,
            shake_strength: 0.05,
            shake_seed: 0x5eed_cafe,
        }
    }
}

// ----------------------------------------------
// InputConfigs
// ----------------------------------------------

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfigs {
    // Movement beyond this many pixels in either axis turns a press into a drag.
    pub drag_threshold_px: f32,
}

impl Default for InputConfigs {
    fn default() -> Self {
        Self { drag_threshold_px: 2.0 }
    }
}

// ----------------------------------------------
// RenderConfigs
// ----------------------------------------------

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfigs {
    pub draw_grid: bool,
    pub grid_spacing: f32,
    pub draw_debug_labels: bool,
    pub occupant_marker_size: f32,

    pub background_color: Color,
    pub grid_color: Color,
    pub tile_color: Color,
    pub outline_color: Color,
    pub hover_color: Color,
    pub selected_color: Color,
    pub selected_hover_color: Color,
    pub occupant_color: Color,
    pub label_color: Color,
    pub minimap_camera_color: Color,
}

impl Default for RenderConfigs {
    fn default() -> Self {
        Self {
            draw_grid: false,
            grid_spacing: 80.0,
            draw_debug_labels: false,
            occupant_marker_size: 10.0,

            background_color: rendering::MAP_BACKGROUND_COLOR,
            grid_color: rendering::DEFAULT_GRID_COLOR,
            tile_color: rendering::DEFAULT_TILE_COLOR,
            outline_color: rendering::DEFAULT_OUTLINE_COLOR,
            hover_color: rendering::HOVER_TILE_COLOR,
            selected_color: rendering::SELECTED_TILE_COLOR,
            selected_hover_color: rendering::SELECTED_HOVER_TILE_COLOR,
            occupant_color: rendering::OCCUPANT_MARKER_COLOR,
            label_color: Color::white(),
            minimap_camera_color: Color::white(),
        }
    }
}

// ----------------------------------------------
// MapConfigs
// ----------------------------------------------

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfigs {
    pub kind: MapKind,
    pub rows: u32,
    pub cols: u32,

    // Hex grids:
    pub hex_radius: f32,
    pub hex_vertical_scale: f32,
    pub hex_orientation: HexOrientation,

    // Square & isometric grids:
    pub tile_width: f32,
    pub tile_height: f32,
}

impl Default for MapConfigs {
    fn default() -> Self {
        Self {
            kind: MapKind::HexGrid,
            rows: 11,
            cols: 21,

            hex_radius: 100.0,
            hex_vertical_scale: 0.7,
            hex_orientation: HexOrientation::Flat,

            tile_width: 80.0,
            tile_height: 80.0,
        }
    }
}
