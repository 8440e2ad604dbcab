use std::path::{Path, PathBuf};
use std::process::ExitCode;

use smallvec::smallvec;

use hexview::{
    log,
    app::{InputEvent, InputEventList, input::{InputAction, InputKey, MouseButton}},
    engine::{
        config::{Configs, ViewerConfigs, CONFIGS_DIR_PATH, VIEWER_CONFIGS_FILE},
        time::FrameClock,
    },
    tile::unit::UnitKind,
    utils::{self, coords::Cell, Vec2},
    Viewer,
};

const FRAME_STEP: f32 = 1.0 / 60.0;
const DEFAULT_OUTPUT_FILE: &str = "frame.png";

// ----------------------------------------------
// Scripted input
// ----------------------------------------------

fn key(key: InputKey, action: InputAction) -> InputEvent {
    InputEvent::KeyInput(key, action)
}

fn mouse(button: MouseButton, action: InputAction) -> InputEvent {
    InputEvent::MouseButton(button, action)
}

fn idle(frames: usize) -> impl Iterator<Item = InputEventList> {
    std::iter::repeat_n(InputEventList::new(), frames)
}

// Headless stand-in for a window backend: pan, zoom, drag, click,
// minimap navigation and overlay toggles, one event batch per frame.
fn build_script(window_center: Vec2, minimap_point: Vec2) -> Vec<InputEventList> {
    let mut script: Vec<InputEventList> = Vec::new();

    // Pan right for half a second.
    script.push(smallvec![key(InputKey::D, InputAction::Press)]);
    script.extend(idle(30));
    script.push(smallvec![key(InputKey::D, InputAction::Release)]);

    // Zoom in around the window center.
    script.push(smallvec![InputEvent::MouseMove(window_center)]);
    for _ in 0..12 {
        script.push(smallvec![InputEvent::Scroll(Vec2::new(0.0, -1.0))]);
    }

    // Drag the map 100px right and 40px down.
    script.push(smallvec![mouse(MouseButton::Left, InputAction::Press)]);
    for step in 1..=10 {
        let offset = Vec2::new(10.0, 4.0) * step as f32;
        script.push(smallvec![InputEvent::MouseMove(window_center + offset)]);
    }
    script.push(smallvec![mouse(MouseButton::Left, InputAction::Release)]);

    // Click a tile left of center.
    let click_pos = window_center - Vec2::new(150.0, 60.0);
    script.push(smallvec![
        InputEvent::MouseMove(click_pos),
        mouse(MouseButton::Left, InputAction::Press),
    ]);
    script.push(smallvec![mouse(MouseButton::Left, InputAction::Release)]);

    // Jump to another part of the map through the minimap.
    script.push(smallvec![
        InputEvent::MouseMove(minimap_point),
        mouse(MouseButton::Left, InputAction::Press),
    ]);
    script.push(smallvec![mouse(MouseButton::Left, InputAction::Release)]);

    // Grid overlay and tile labels on.
    script.push(smallvec![
        key(InputKey::G, InputAction::Press),
        key(InputKey::F3, InputAction::Press),
    ]);
    script.push(smallvec![
        key(InputKey::G, InputAction::Release),
        key(InputKey::F3, InputAction::Release),
        InputEvent::MouseMove(click_pos),
    ]);

    script
}

// ----------------------------------------------
// main()
// ----------------------------------------------

fn main() -> ExitCode {
    let mut args = std::env::args().skip(1);

    let configs_path = args.next()
        .map(PathBuf::from)
        .unwrap_or_else(|| Path::new(CONFIGS_DIR_PATH).join(VIEWER_CONFIGS_FILE));

    let output_path = args.next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_FILE));

    let configs = ViewerConfigs::load_file(&configs_path);
    log::set_level(configs.log_level);

    log::info!(log::channel!("app"), "HexView v{}", utils::version());

    let mut viewer = Viewer::new(configs);

    let unit_cell = Cell::new(10, 10);
    if viewer.spawn_unit("Alpha", UnitKind::Marine, unit_cell).is_none() {
        log::warn!(log::channel!("app"), "Demo unit not placed.");
    }

    let window_center = viewer.primary().screen_rect().center();
    let minimap_rect = viewer.minimap().screen_rect();
    let minimap_point = minimap_rect.min + minimap_rect.size() * Vec2::new(0.25, 0.5);

    let mut script = build_script(window_center, minimap_point);
    let shake_frame = script.len();
    script.extend(idle(60));

    let mut frame_clock = FrameClock::with_fixed_step(FRAME_STEP);

    for (index, events) in script.iter().enumerate() {
        frame_clock.begin_frame();

        // Shake once the scripted input is done and let it settle.
        if index == shake_frame {
            viewer.primary_mut().screen_shake(0.5);
        }

        viewer.update(frame_clock.delta_time(), events);

        if viewer.primary().moved() {
            log::verbose!(log::channel!("app"), "Frame {}: camera at {}.",
                          frame_clock.frame_count(), viewer.primary().camera().center());
        }

        frame_clock.end_frame();
    }

    if let Some(cell) = viewer.selected_tile() {
        log::info!(log::channel!("app"), "Selected tile: {cell}");
    } else {
        log::info!(log::channel!("app"), "No tile selected.");
    }

    viewer.draw();

    if viewer.save_frame(&output_path) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
