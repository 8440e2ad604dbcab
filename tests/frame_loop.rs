use std::path::Path;

use hexview::{
    app::{InputEvent, input::{InputAction, InputKey, MouseButton}},
    engine::config::{Configs, ViewerConfigs},
    tile::{map::MapKind, unit::UnitKind},
    utils::{coords::Cell, Vec2},
    Viewer,
};

const FRAME_SECS: f32 = 1.0 / 60.0;

fn small_window_configs() -> ViewerConfigs {
    let mut configs = ViewerConfigs::default();
    configs.window.width = 400;
    configs.window.height = 200;
    configs
}

fn click_at(viewer: &mut Viewer, pos: Vec2) {
    viewer.update(FRAME_SECS, &[
        InputEvent::MouseMove(pos),
        InputEvent::MouseButton(MouseButton::Left, InputAction::Press),
    ]);
    viewer.update(FRAME_SECS, &[InputEvent::MouseButton(MouseButton::Left, InputAction::Release)]);
}

#[test]
fn shipped_configs_match_defaults() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("configs").join("viewer.json");
    let configs = ViewerConfigs::load_file(&path);
    let defaults = ViewerConfigs::default();

    assert_eq!(configs.map.kind, MapKind::HexGrid);
    assert_eq!(configs.map.cols, defaults.map.cols);
    assert_eq!(configs.map.rows, defaults.map.rows);
    assert_eq!(configs.window.width, defaults.window.width);
    assert_eq!(configs.camera.shake_seed, defaults.camera.shake_seed);
    assert_eq!(configs.render.background_color, defaults.render.background_color);
}

#[test]
fn units_spawn_on_free_cells_only() {
    let mut viewer = Viewer::new(small_window_configs());

    let id = viewer.spawn_unit("Alpha", UnitKind::Tank, Cell::new(10, 10));
    assert!(id.is_some());
    assert_eq!(viewer.map().occupant(Cell::new(10, 10)), id);

    assert!(viewer.spawn_unit("Bravo", UnitKind::Marine, Cell::new(10, 10)).is_none());
    assert!(viewer.spawn_unit("Charlie", UnitKind::Fighter, Cell::new(99, 0)).is_none());
    assert_eq!(viewer.units().len(), 1);

    let unit = viewer.despawn_unit(Cell::new(10, 10)).expect("unit should be despawned");
    assert_eq!(unit.name, "Alpha");
    assert_eq!(unit.movement_points, 3);
    assert!(viewer.units().is_empty());
    assert_eq!(viewer.map().occupant(Cell::new(10, 10)), None);
}

#[test]
fn despawn_outside_the_map_is_a_no_op() {
    let mut viewer = Viewer::new(small_window_configs());
    viewer.spawn_unit("Alpha", UnitKind::Tank, Cell::new(0, 0));

    assert!(viewer.despawn_unit(Cell::new(-1, 500)).is_none());
    assert!(viewer.despawn_unit(Cell::new(viewer.map().cols(), 0)).is_none());
    assert!(viewer.despawn_unit(Cell::new(1, 1)).is_none());
    assert_eq!(viewer.units().len(), 1);
}

#[test]
fn zero_sized_tiles_in_configs_still_build_a_viewer() {
    let json = r#"{ "window": { "width": 400, "height": 200 }, "map": { "kind": "HexGrid", "hex_radius": 0.0 } }"#;
    let configs = ViewerConfigs::load_str(json).expect("configs should parse");

    let mut viewer = Viewer::new(configs);
    assert!(viewer.map().rect().width() > 0.0);

    viewer.update(FRAME_SECS, &[]);
    assert_eq!(viewer.draw().image().width(), 400);
}

#[test]
fn scripted_frame_loop() {
    let mut viewer = Viewer::new(small_window_configs());
    viewer.spawn_unit("Alpha", UnitKind::Marine, Cell::new(10, 10));

    let map_rect = viewer.map().rect();
    let start = viewer.primary().camera().center();
    assert!(start.approx_equal(viewer.map().center(), 1e-3));

    // Pan right until the camera hits the map edge.
    viewer.update(FRAME_SECS, &[InputEvent::KeyInput(InputKey::Right, InputAction::Press)]);
    for _ in 0..30 {
        viewer.update(FRAME_SECS, &[]);
    }
    viewer.update(FRAME_SECS, &[InputEvent::KeyInput(InputKey::Right, InputAction::Release)]);

    let camera = viewer.primary().camera();
    assert!(camera.center().x > start.x);
    assert!((camera.raw_rect().max.x - map_rect.max.x).abs() < 1e-2);

    // Click the tile under the window center.
    let window_center = viewer.primary().screen_rect().center();
    click_at(&mut viewer, window_center);

    let expected = viewer.map().nearest_tile(viewer.primary().screen_to_world(window_center));
    assert_eq!(viewer.selected_tile(), Some(expected));
    assert_eq!(viewer.hover_tile(), Some(expected));

    // The minimap shows the whole map, so its center takes the primary back to the map center.
    let minimap_center = viewer.minimap().screen_rect().center();
    viewer.update(FRAME_SECS, &[
        InputEvent::MouseMove(minimap_center),
        InputEvent::MouseButton(MouseButton::Left, InputAction::Press),
    ]);

    assert!(viewer.primary().moved());
    assert!((viewer.primary().camera().center().x - start.x).abs() < 1.0);
    assert_eq!(viewer.selected_tile(), Some(expected));

    viewer.update(FRAME_SECS, &[InputEvent::MouseButton(MouseButton::Left, InputAction::Release)]);
    assert!(!viewer.primary().moved());

    // Shake settles back onto the raw center.
    viewer.primary_mut().screen_shake(0.25);
    for _ in 0..200 {
        viewer.update(FRAME_SECS, &[]);
    }
    let camera = viewer.primary().camera();
    assert!(!camera.is_shaking());
    assert_eq!(camera.center(), camera.raw_center());

    let frame = viewer.draw();
    assert_eq!(frame.image().width(), 400);
    assert_eq!(frame.image().height(), 200);

    let minimap_rect = viewer.minimap().screen_rect();
    let border_x = minimap_rect.center().x as i32;
    let border_y = minimap_rect.min.y as i32;
    assert_eq!(viewer.frame().pixel(border_x, border_y), Some([255, 0, 0, 255]));
    assert!(viewer.primary().render_stats().tiles_drawn > 0);

    let output = std::env::temp_dir().join("hexview_frame_loop_test.png");
    assert!(viewer.save_frame(&output));
    assert!(output.exists());
    let _ = std::fs::remove_file(&output);
}
