use strum::IntoEnumIterator;

use super::*;
use super::rendering::*;
use super::unit::{Unit, UnitKind, UnitRegistry};
use crate::{
    engine::config::RenderConfigs,
    render::{DrawCommand, RecordingSurface, Surface},
    utils::{approx_equal, Color, Size},
    view::ViewTransform,
};

const EPSILON: f32 = 1e-3;

fn assert_vec_eq(actual: Vec2, expected: Vec2) {
    assert!(actual.approx_equal(expected, EPSILON), "expected {expected}, got {actual}");
}

fn all_cells(map: &GridMap) -> impl Iterator<Item = Cell> + '_ {
    (0..map.rows()).flat_map(move |row| (0..map.cols()).map(move |col| Cell::new(col, row)))
}

fn sample_maps() -> Vec<GridMap> {
    vec![
        GridMap::hex(5, 6, 10.0, 0.7, HexOrientation::Flat),
        GridMap::hex(5, 6, 10.0, 1.0, HexOrientation::Pointy),
        GridMap::square(4, 7, 80.0, 60.0),
        GridMap::isometric(6, 4, 64.0, 32.0),
        GridMap::isometric_hex(4, 5, 12.0, HexOrientation::Flat),
    ]
}

// ----------------------------------------------
// Layout
// ----------------------------------------------

#[test]
fn flat_hex_positions() {
    let map = GridMap::hex(3, 3, 10.0, 1.0, HexOrientation::Flat);
    let hex_height = SQRT_3 * 10.0;

    assert_vec_eq(map.tile(Cell::new(0, 0)).position(), Vec2::zero());
    // Odd columns are pushed down half a tile.
    assert_vec_eq(map.tile(Cell::new(1, 0)).position(), Vec2::new(15.0, hex_height * 0.5));
    assert_vec_eq(map.tile(Cell::new(0, 1)).position(), Vec2::new(0.0, hex_height));
    assert_vec_eq(map.tile(Cell::new(1, 1)).position(), Vec2::new(15.0, hex_height * 1.5));
    assert_vec_eq(map.tile(Cell::new(2, 2)).position(), Vec2::new(30.0, hex_height * 2.0));
}

#[test]
fn pointy_hex_positions() {
    let map = GridMap::hex(3, 3, 10.0, 1.0, HexOrientation::Pointy);
    let hex_width = SQRT_3 * 10.0;

    assert_vec_eq(map.tile(Cell::new(1, 0)).position(), Vec2::new(hex_width, 0.0));
    // Odd rows are pushed right half a tile.
    assert_vec_eq(map.tile(Cell::new(0, 1)).position(), Vec2::new(hex_width * 0.5, 15.0));
    assert_vec_eq(map.tile(Cell::new(0, 2)).position(), Vec2::new(0.0, 30.0));
}

#[test]
fn square_and_isometric_positions() {
    let square = GridMap::square(3, 3, 80.0, 40.0);
    assert_vec_eq(square.tile(Cell::new(2, 1)).position(), Vec2::new(160.0, 40.0));

    let iso = GridMap::isometric(3, 4, 64.0, 32.0);
    assert_vec_eq(iso.tile(Cell::new(0, 0)).position(), Vec2::new(128.0, 16.0));
    assert_vec_eq(iso.tile(Cell::new(1, 0)).position(), Vec2::new(160.0, 32.0));
    assert_vec_eq(iso.tile(Cell::new(0, 1)).position(), Vec2::new(96.0, 32.0));
}

#[test]
fn tiles_are_row_major_with_unique_positions() {
    for map in sample_maps() {
        assert_eq!(map.tiles().len(), (map.rows() * map.cols()) as usize);

        for (index, tile) in map.tiles().iter().enumerate() {
            let expected = Cell::new(index as i32 % map.cols(), index as i32 / map.cols());
            assert_eq!(tile.cell(), expected);
        }

        for (i, a) in map.tiles().iter().enumerate() {
            for b in &map.tiles()[i + 1..] {
                assert!(!a.position().approx_equal(b.position(), EPSILON),
                        "{} and {} share a position", a.cell(), b.cell());
            }
        }
    }
}

#[test]
fn draw_order_is_sorted_by_world_y() {
    for map in sample_maps() {
        let ys: Vec<f32> = map.tiles_in_draw_order().map(|tile| tile.position().y).collect();
        assert_eq!(ys.len(), map.tiles().len());
        assert!(ys.windows(2).all(|pair| pair[0] <= pair[1]));
    }
}

#[test]
fn map_geometry() {
    let square = GridMap::square(10, 10, 80.0, 80.0);
    assert_eq!((square.x1(), square.y1()), (-80.0, -80.0));
    assert_eq!((square.width(), square.height()), (880.0, 880.0));

    let hex = GridMap::hex(11, 21, 100.0, 0.7, HexOrientation::Flat);
    let v_spacing = 0.7 * SQRT_3 * 100.0;
    assert!(approx_equal(hex.x1(), -150.0, EPSILON));
    assert!(approx_equal(hex.width(), 150.0 * 22.0, EPSILON));
    assert!(approx_equal(hex.height(), v_spacing * 12.5, 0.01));

    let iso = GridMap::isometric(3, 5, 64.0, 32.0);
    assert_eq!(iso.x1(), 0.0);
    assert_eq!(iso.y1(), -32.0);
    assert_eq!(iso.width(), 12.0 * 32.0);
    assert_eq!(iso.height(), 12.0 * 16.0);
}

#[test]
#[should_panic]
fn empty_map_is_rejected() {
    let _ = GridMap::square(0, 5, 10.0, 10.0);
}

#[test]
#[should_panic]
fn zero_sized_tiles_are_rejected() {
    let _ = GridMap::hex(2, 2, 0.0, 1.0, HexOrientation::Flat);
}

// ----------------------------------------------
// Outlines
// ----------------------------------------------

#[test]
fn hex_outlines() {
    let flat = compute_outline(&TileShape::Hex { radius: 10.0, vertical_scale: 0.5, orientation: HexOrientation::Flat }, Vec2::zero());
    assert_eq!(flat.len(), 6);
    assert_vec_eq(flat[0], Vec2::new(10.0, 0.0));
    assert_vec_eq(flat[1], Vec2::new(5.0, SQRT_3 * 5.0 * 0.5));
    assert_vec_eq(flat[3], Vec2::new(-10.0, 0.0));

    let pointy = compute_outline(&TileShape::Hex { radius: 10.0, vertical_scale: 1.0, orientation: HexOrientation::Pointy }, Vec2::new(1.0, 1.0));
    assert_eq!(pointy.len(), 6);
    assert_vec_eq(pointy[0], Vec2::new(1.0 + SQRT_3 * 5.0, 6.0));
    assert_vec_eq(pointy[1], Vec2::new(1.0, 11.0));
}

#[test]
fn square_and_isometric_outlines_are_closed() {
    let square = compute_outline(&TileShape::Square { width: 8.0, height: 4.0 }, Vec2::new(10.0, 10.0));
    assert_eq!(square.len(), 5);
    assert_eq!(square[0], Vec2::new(6.0, 8.0));
    assert_eq!(square[2], Vec2::new(14.0, 12.0));
    assert_eq!(square[0], square[4]);

    let diamond = compute_outline(&TileShape::Isometric { width: 8.0, height: 4.0 }, Vec2::new(10.0, 10.0));
    assert_eq!(diamond.len(), 5);
    assert_eq!(diamond[0], Vec2::new(10.0, 8.0));  // top
    assert_eq!(diamond[1], Vec2::new(14.0, 10.0)); // right
    assert_eq!(diamond[2], Vec2::new(10.0, 12.0)); // bottom
    assert_eq!(diamond[3], Vec2::new(6.0, 10.0));  // left
    assert_eq!(diamond[0], diamond[4]);
}

// ----------------------------------------------
// Nearest tile
// ----------------------------------------------

#[test]
fn nearest_tile_at_tile_position_is_that_tile() {
    for map in sample_maps() {
        for tile in map.tiles() {
            assert_eq!(map.nearest_tile(tile.position()), tile.cell(), "{} map", map.kind());
            // Same answer every time.
            assert_eq!(map.nearest_tile(tile.position()), tile.cell());
        }
    }
}

#[test]
fn square_nearest_tile_uses_index_arithmetic() {
    let map = GridMap::square(10, 10, 80.0, 80.0);

    assert_eq!(map.nearest_tile(Vec2::new(160.0, 160.0)), Cell::new(2, 2));
    assert_eq!(map.nearest_tile(Vec2::new(199.0, 41.0)), Cell::new(2, 1));
    assert_eq!(map.nearest_tile(Vec2::new(10000.0, 10000.0)), Cell::new(9, 9));
    assert_eq!(map.nearest_tile(Vec2::new(-500.0, -20.0)), Cell::new(0, 0));
}

#[test]
fn points_outside_the_map_resolve_to_an_edge_tile() {
    let map = GridMap::hex(3, 3, 10.0, 1.0, HexOrientation::Flat);

    assert_eq!(map.nearest_tile(Vec2::new(-1000.0, -1000.0)), Cell::new(0, 0));
    assert_eq!(map.nearest_tile(Vec2::new(10000.0, 10000.0)), Cell::new(2, 2));
}

#[test]
fn nearest_tile_ties_go_to_first_in_row_major_order() {
    let map = GridMap::hex(3, 3, 10.0, 1.0, HexOrientation::Flat);
    let midway = map.tile(Cell::new(0, 1)).position() * 0.5;

    assert_eq!(map.nearest_tile(midway), Cell::new(0, 0));
}

#[test]
fn nearest_tile_undoes_vertical_squash() {
    // Tile [1,0] sits half a row lower than [0,0]. In raw world units the
    // point is closer to [0,0], but once y is stretched back by 1/0.5 the
    // vertical gap to [0,0] dominates.
    let map = GridMap::isometric_hex(1, 2, 10.0, HexOrientation::Flat);
    let offset_y = map.tile(Cell::new(1, 0)).position().y;
    assert!(approx_equal(offset_y, SQRT_3 * 10.0 * 0.5 * 0.5, EPSILON));

    let point = Vec2::new(6.5, offset_y);
    assert!(point.distance(map.tile(Cell::new(0, 0)).position()) <
            point.distance(map.tile(Cell::new(1, 0)).position()));

    assert_eq!(map.nearest_tile(point), Cell::new(1, 0));
}

// ----------------------------------------------
// Neighbours
// ----------------------------------------------

#[test]
fn flat_hex_neighbors_follow_column_parity() {
    let map = GridMap::hex(5, 5, 10.0, 1.0, HexOrientation::Flat);
    assert_eq!(map.edge_count(), 6);

    // Even column.
    let even = Cell::new(2, 2);
    let expected_even = [(3, 2), (2, 3), (1, 2), (1, 1), (2, 1), (3, 1)];
    for (edge, (x, y)) in expected_even.iter().enumerate() {
        assert_eq!(map.neighbor(even, edge), Some(Cell::new(*x, *y)));
    }

    // Odd column.
    let odd = Cell::new(1, 2);
    let expected_odd = [(2, 3), (1, 3), (0, 3), (0, 2), (1, 1), (2, 2)];
    for (edge, (x, y)) in expected_odd.iter().enumerate() {
        assert_eq!(map.neighbor(odd, edge), Some(Cell::new(*x, *y)));
    }
}

#[test]
fn neighbors_are_symmetric_across_opposite_edges() {
    for map in sample_maps() {
        for cell in all_cells(&map) {
            for edge in 0..map.edge_count() {
                if let Some(neighbor) = map.neighbor(cell, edge) {
                    assert_eq!(map.neighbor(neighbor, map.opposite_edge(edge)), Some(cell),
                               "{} map, {cell} edge {edge}", map.kind());
                }
            }
        }
    }
}

#[test]
fn neighbors_outside_the_map_are_none() {
    let square = GridMap::square(3, 3, 10.0, 10.0);
    assert_eq!(square.edge_count(), 4);
    assert_eq!(square.neighbor(Cell::new(0, 0), 0), None); // N
    assert_eq!(square.neighbor(Cell::new(0, 0), 3), None); // W
    assert_eq!(square.neighbor(Cell::new(0, 0), 1), Some(Cell::new(1, 0)));
    assert_eq!(square.neighbor(Cell::new(0, 0), 7), None);
    assert_eq!(square.neighbors(Cell::new(1, 1)).count(), 4);
    assert_eq!(square.neighbors(Cell::new(2, 2)).count(), 2);
    assert_eq!(square.opposite_edge(1), 3);
}

// ----------------------------------------------
// Occupants / Units
// ----------------------------------------------

#[test]
fn place_and_remove_units() {
    let mut map = GridMap::square(3, 3, 10.0, 10.0);
    let mut units = UnitRegistry::new();

    let marine = units.spawn(Unit::new("Marine", UnitKind::Marine));
    let tank = units.spawn(Unit::new("Tank", UnitKind::Tank));
    let cell = Cell::new(1, 2);

    assert_eq!(map.place_unit(cell, marine), None);
    assert_eq!(map.occupant(cell), Some(marine));
    assert!(map.tile(cell).has_occupant());

    // Replacing hands back the previous occupant.
    assert_eq!(map.place_unit(cell, tank), Some(marine));
    assert_eq!(map.remove_unit(cell), Some(tank));
    assert_eq!(map.occupant(cell), None);

    assert_eq!(map.occupant(Cell::new(5, 5)), None);
    assert_eq!(map.remove_unit(Cell::new(5, 5)), None);
    assert_eq!(map.remove_unit(Cell::new(-1, 0)), None);
}

#[test]
fn unit_registry() {
    let mut units = UnitRegistry::new();
    assert!(units.is_empty());

    for kind in UnitKind::iter() {
        units.spawn(Unit::new(&kind.to_string(), kind));
    }
    assert_eq!(units.len(), 3);

    let movement: Vec<u32> = units.iter().map(|(_, unit)| unit.movement_points).collect();
    assert_eq!(movement, [2, 3, 4]);

    let (first_id, _) = units.iter().next().unwrap();
    assert_eq!(units.despawn(first_id).map(|unit| unit.kind), Some(UnitKind::Marine));
    assert!(units.get(first_id).is_none());
    assert!(units.despawn(first_id).is_none());
    assert_eq!(units.len(), 2);
}

// ----------------------------------------------
// MapRenderer
// ----------------------------------------------

fn full_map_view(map: &GridMap, screen_size: Size) -> ViewTransform {
    ViewTransform::new(map.rect(), Rect::from_pos_and_size(Vec2::zero(), screen_size.to_vec2()))
}

fn fill_colors(surface: &RecordingSurface) -> Vec<Color> {
    surface.commands().iter().filter_map(|cmd| match cmd {
        DrawCommand::FillPolygon(_, color) => Some(*color),
        _ => None,
    }).collect()
}

#[test]
fn renderer_draws_every_visible_tile() {
    let map = GridMap::hex(3, 4, 10.0, 1.0, HexOrientation::Flat);
    let configs = RenderConfigs::default();
    let mut surface = RecordingSurface::new(Size::new(200, 100));
    let mut renderer = MapRenderer::new(MapRenderFlags::from_configs(&configs));

    let stats = renderer.draw_map(&mut surface, &full_map_view(&map, Size::new(200, 100)),
                                  &map, None, TileInteraction::none(), &configs, MAP_BACKGROUND_COLOR);

    assert_eq!(stats.tiles_drawn, 12);
    assert_eq!(stats.tiles_culled, 0);
    assert_eq!(surface.commands()[0], DrawCommand::Clear(MAP_BACKGROUND_COLOR));
    assert!(fill_colors(&surface).iter().all(|color| *color == configs.tile_color));
}

#[test]
fn renderer_culls_tiles_outside_the_view() {
    let map = GridMap::square(4, 4, 10.0, 10.0);
    let configs = RenderConfigs::default();
    let mut surface = RecordingSurface::new(Size::new(100, 100));
    let mut renderer = MapRenderer::new(MapRenderFlags::empty());

    // Camera looking at empty space far from the map.
    let view = ViewTransform::new(Rect::new(1000.0, 1000.0, 50.0, 50.0), surface.rect());
    let stats = renderer.draw_map(&mut surface, &view, &map, None, TileInteraction::none(), &configs, Color::black());

    assert_eq!(stats.tiles_drawn, 0);
    assert_eq!(stats.tiles_culled, 16);
}

#[test]
fn renderer_highlights_hover_and_selection() {
    let configs = RenderConfigs::default();

    let hovered = Cell::new(0, 0);
    let selected = Cell::new(1, 0);
    let interaction = TileInteraction { hover: Some(hovered), selected: Some(selected) };

    assert_eq!(tile_fill_color(hovered, interaction, &configs), configs.hover_color);
    assert_eq!(tile_fill_color(selected, interaction, &configs), configs.selected_color);
    assert_eq!(tile_fill_color(Cell::new(2, 0), interaction, &configs), configs.tile_color);

    let both = TileInteraction { hover: Some(selected), selected: Some(selected) };
    assert_eq!(tile_fill_color(selected, both, &configs), configs.selected_hover_color);

    // Disabling highlights paints every tile with the base color.
    let map = GridMap::square(1, 3, 10.0, 10.0);
    let mut surface = RecordingSurface::new(Size::new(60, 20));
    let mut renderer = MapRenderer::new(MapRenderFlags::empty());
    renderer.draw_map(&mut surface, &full_map_view(&map, Size::new(60, 20)),
                      &map, None, interaction, &configs, Color::black());
    assert!(fill_colors(&surface).iter().all(|color| *color == configs.tile_color));
}

#[test]
fn renderer_draws_occupants_and_labels() {
    let mut map = GridMap::square(2, 2, 10.0, 10.0);
    let mut units = UnitRegistry::new();
    let tank = units.spawn(Unit::new("Tank", UnitKind::Tank));
    map.place_unit(Cell::new(1, 1), tank);

    let mut configs = RenderConfigs::default();
    configs.draw_debug_labels = true;

    let mut surface = RecordingSurface::new(Size::new(90, 90));
    let mut renderer = MapRenderer::new(MapRenderFlags::from_configs(&configs));
    let stats = renderer.draw_map(&mut surface, &full_map_view(&map, Size::new(90, 90)),
                                  &map, Some(&units), TileInteraction::none(), &configs, Color::black());

    assert_eq!(stats.occupants_drawn, 1);
    assert_eq!(stats.labels_drawn, 4);

    let markers: Vec<_> = surface.commands().iter().filter_map(|cmd| match cmd {
        DrawCommand::FillRect(rect, color) => Some((*rect, *color)),
        _ => None,
    }).collect();
    assert_eq!(markers.len(), 1);
    assert_eq!(markers[0].1, UnitKind::Tank.marker_color());
    assert!(approx_equal(markers[0].0.width(), configs.occupant_marker_size, EPSILON));

    let labels: Vec<&str> = surface.texts().collect();
    assert_eq!(labels, ["[0,0]", "[1,0]", "[0,1]", "[1,1]"]);
}

#[test]
fn grid_overlay_toggles() {
    let map = GridMap::square(2, 2, 80.0, 80.0);
    let configs = RenderConfigs::default();
    let mut surface = RecordingSurface::new(Size::new(240, 240));
    let view = full_map_view(&map, Size::new(240, 240));

    let mut renderer = MapRenderer::new(MapRenderFlags::DrawGrid);
    let with_grid = renderer.draw_map(&mut surface, &view, &map, None, TileInteraction::none(), &configs, Color::black());
    // Map rect spans [-80, 160] on both axes: lines at -80, 0, 80 and 160.
    assert_eq!(with_grid.grid_lines_drawn, 8);

    renderer.toggle_flags(MapRenderFlags::DrawGrid);
    let without_grid = renderer.draw_map(&mut surface, &view, &map, None, TileInteraction::none(), &configs, Color::black());
    assert_eq!(without_grid.grid_lines_drawn, 0);
}
