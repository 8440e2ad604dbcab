use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

use super::{HexOrientation, Tile, TileShape, unit::UnitId};
use crate::{
    log,
    engine::config::MapConfigs,
    utils::{coords::Cell, Rect, Vec2},
};

// ----------------------------------------------
// MapKind
// ----------------------------------------------

#[derive(Copy, Clone, Debug, Display, EnumIter, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MapKind {
    #[default]
    HexGrid,
    TileGrid,
    IsometricTileGrid,
    IsometricHexGrid,
}

// Isometric hex grids are regular hex grids squashed to half height.
pub const ISOMETRIC_HEX_VERTICAL_SCALE: f32 = 0.5;

// ----------------------------------------------
// MapGeometry
// ----------------------------------------------

// World-space extents of the whole map, including a margin around the tiles.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MapGeometry {
    pub x1: f32,
    pub y1: f32,
    pub width: f32,
    pub height: f32,
}

impl MapGeometry {
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x1, self.y1, self.width, self.height)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.rect().center()
    }
}

pub fn compute_geometry(shape: &TileShape, rows: i32, cols: i32) -> MapGeometry {
    let spacing = shape.spacing();
    let (rows, cols) = (rows as f32, cols as f32);

    match *shape {
        TileShape::Hex { orientation: HexOrientation::Flat, .. } => MapGeometry {
            x1: -spacing.x,
            y1: -spacing.y,
            width: spacing.x * (cols + 1.0),
            height: spacing.y * (rows + 1.5),
        },
        TileShape::Hex { orientation: HexOrientation::Pointy, .. } => MapGeometry {
            x1: -spacing.x,
            y1: -spacing.y,
            width: spacing.x * (cols + 1.5),
            height: spacing.y * (rows + 1.5),
        },
        TileShape::Square { width, height } => MapGeometry {
            x1: -width,
            y1: -height,
            width: width * (cols + 1.0),
            height: height * (rows + 1.0),
        },
        TileShape::Isometric { width, height } => MapGeometry {
            x1: (cols - rows - 2.0) * width * 0.5,
            y1: -height,
            width: (cols + rows + 4.0) * width * 0.5,
            height: (cols + rows + 4.0) * height * 0.5,
        },
    }
}

// ----------------------------------------------
// Tile layout
// ----------------------------------------------

// World-space center of the tile at `cell`.
pub fn tile_position(shape: &TileShape, cols: i32, cell: Cell) -> Vec2 {
    let (col, row) = (cell.x as f32, cell.y as f32);
    let spacing = shape.spacing();

    match *shape {
        TileShape::Hex { orientation: HexOrientation::Flat, .. } => {
            let offset = if cell.x % 2 != 0 { spacing.y * 0.5 } else { 0.0 };
            Vec2::new(col * spacing.x, row * spacing.y + offset)
        }
        TileShape::Hex { orientation: HexOrientation::Pointy, .. } => {
            let offset = if cell.y % 2 != 0 { spacing.x * 0.5 } else { 0.0 };
            Vec2::new(col * spacing.x + offset, row * spacing.y)
        }
        TileShape::Square { width, height } => {
            Vec2::new(col * width, row * height)
        }
        TileShape::Isometric { width, height } => {
            let half_w = width * 0.5;
            let half_h = height * 0.5;
            Vec2::new(cols as f32 * half_w + (col - row) * half_w,
                      half_h + (col + row) * half_h)
        }
    }
}

// Row-major list of tile centers.
pub fn generate_positions(shape: &TileShape, rows: i32, cols: i32) -> Vec<Vec2> {
    let mut positions = Vec::with_capacity((rows * cols) as usize);
    for row in 0..rows {
        for col in 0..cols {
            positions.push(tile_position(shape, cols, Cell::new(col, row)));
        }
    }
    positions
}

// ----------------------------------------------
// Neighbours
// ----------------------------------------------

// Offsets per edge for [even, odd] column (flat) or row (pointy).
// Flat edges:   0=SE 1=S 2=SW 3=NW 4=N 5=NE
// Pointy edges: 0=SE 1=SW 2=W 3=NW 4=NE 5=E
const FLAT_HEX_NEIGHBORS: [[(i32, i32); 2]; 6] = [
    [( 1,  0), ( 1,  1)],
    [( 0,  1), ( 0,  1)],
    [(-1,  0), (-1,  1)],
    [(-1, -1), (-1,  0)],
    [( 0, -1), ( 0, -1)],
    [( 1, -1), ( 1,  0)],
];

const POINTY_HEX_NEIGHBORS: [[(i32, i32); 2]; 6] = [
    [( 0,  1), ( 1,  1)],
    [(-1,  1), ( 0,  1)],
    [(-1,  0), (-1,  0)],
    [(-1, -1), ( 0, -1)],
    [( 0, -1), ( 1, -1)],
    [( 1,  0), ( 1,  0)],
];

// N, E, S, W
const SQUARE_NEIGHBORS: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

// NE, SE, SW, NW in screen terms.
const ISOMETRIC_NEIGHBORS: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

// ----------------------------------------------
// GridMap
// ----------------------------------------------

pub struct GridMap {
    kind: MapKind,
    shape: TileShape,
    rows: i32,
    cols: i32,
    tiles: Vec<Tile>,       // Row-major.
    draw_order: Vec<usize>, // Tile indices sorted back-to-front by world y.
    geometry: MapGeometry,
}

impl GridMap {
    pub fn new(kind: MapKind, shape: TileShape, rows: i32, cols: i32) -> Self {
        assert!(rows > 0 && cols > 0, "Map must have at least one row and column: {cols}x{rows}");
        assert!(shape.is_valid(), "Invalid tile dimensions: {shape:?}");

        let tiles: Vec<Tile> = generate_positions(&shape, rows, cols)
            .into_iter()
            .enumerate()
            .map(|(index, position)| {
                let cell = Cell::new(index as i32 % cols, index as i32 / cols);
                Tile::new(cell, position, &shape)
            })
            .collect();

        let mut draw_order: Vec<usize> = (0..tiles.len()).collect();
        draw_order.sort_by(|a, b| {
            let (pa, pb) = (tiles[*a].position(), tiles[*b].position());
            pa.y.total_cmp(&pb.y).then(pa.x.total_cmp(&pb.x))
        });

        let geometry = compute_geometry(&shape, rows, cols);

        log::info!(log::channel!("map"), "Generated {kind} map: {cols}x{rows} tiles, world rect {}.", geometry.rect());

        Self { kind, shape, rows, cols, tiles, draw_order, geometry }
    }

    pub fn hex(rows: i32, cols: i32, radius: f32, vertical_scale: f32, orientation: HexOrientation) -> Self {
        Self::new(MapKind::HexGrid, TileShape::Hex { radius, vertical_scale, orientation }, rows, cols)
    }

    pub fn isometric_hex(rows: i32, cols: i32, radius: f32, orientation: HexOrientation) -> Self {
        let shape = TileShape::Hex { radius, vertical_scale: ISOMETRIC_HEX_VERTICAL_SCALE, orientation };
        Self::new(MapKind::IsometricHexGrid, shape, rows, cols)
    }

    pub fn square(rows: i32, cols: i32, tile_width: f32, tile_height: f32) -> Self {
        Self::new(MapKind::TileGrid, TileShape::Square { width: tile_width, height: tile_height }, rows, cols)
    }

    pub fn isometric(rows: i32, cols: i32, tile_width: f32, tile_height: f32) -> Self {
        Self::new(MapKind::IsometricTileGrid, TileShape::Isometric { width: tile_width, height: tile_height }, rows, cols)
    }

    pub fn from_configs(configs: &MapConfigs) -> Self {
        let rows = configs.rows as i32;
        let cols = configs.cols as i32;
        match configs.kind {
            MapKind::HexGrid => {
                Self::hex(rows, cols, configs.hex_radius, configs.hex_vertical_scale, configs.hex_orientation)
            }
            MapKind::IsometricHexGrid => {
                Self::isometric_hex(rows, cols, configs.hex_radius, configs.hex_orientation)
            }
            MapKind::TileGrid => {
                Self::square(rows, cols, configs.tile_width, configs.tile_height)
            }
            MapKind::IsometricTileGrid => {
                Self::isometric(rows, cols, configs.tile_width, configs.tile_height)
            }
        }
    }

    // ----------------------
    // Geometry:
    // ----------------------

    #[inline] pub fn kind(&self) -> MapKind { self.kind }
    #[inline] pub fn shape(&self) -> &TileShape { &self.shape }
    #[inline] pub fn rows(&self) -> i32 { self.rows }
    #[inline] pub fn cols(&self) -> i32 { self.cols }
    #[inline] pub fn x1(&self) -> f32 { self.geometry.x1 }
    #[inline] pub fn y1(&self) -> f32 { self.geometry.y1 }
    #[inline] pub fn width(&self) -> f32 { self.geometry.width }
    #[inline] pub fn height(&self) -> f32 { self.geometry.height }
    #[inline] pub fn geometry(&self) -> &MapGeometry { &self.geometry }
    #[inline] pub fn rect(&self) -> Rect { self.geometry.rect() }
    #[inline] pub fn center(&self) -> Vec2 { self.geometry.center() }

    #[inline]
    pub fn aspect_ratio(&self) -> f32 {
        self.geometry.width / self.geometry.height
    }

    // ----------------------
    // Tile access:
    // ----------------------

    #[inline]
    pub fn is_cell_within_bounds(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.cols && cell.y < self.rows
    }

    #[inline]
    fn cell_to_index(&self, cell: Cell) -> usize {
        (cell.y * self.cols + cell.x) as usize
    }

    #[inline]
    pub fn try_tile(&self, cell: Cell) -> Option<&Tile> {
        if !self.is_cell_within_bounds(cell) {
            return None;
        }
        self.tiles.get(self.cell_to_index(cell))
    }

    #[inline]
    pub fn tile(&self, cell: Cell) -> &Tile {
        assert!(self.is_cell_within_bounds(cell), "Cell {cell} is outside of the map!");
        &self.tiles[self.cell_to_index(cell)]
    }

    #[inline]
    fn tile_mut(&mut self, cell: Cell) -> &mut Tile {
        assert!(self.is_cell_within_bounds(cell), "Cell {cell} is outside of the map!");
        let index = self.cell_to_index(cell);
        &mut self.tiles[index]
    }

    // Row-major.
    #[inline]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    // Back-to-front by world y.
    #[inline]
    pub fn tiles_in_draw_order(&self) -> impl Iterator<Item = &Tile> + '_ {
        self.draw_order.iter().map(|index| &self.tiles[*index])
    }

    // ----------------------
    // Nearest tile query:
    // ----------------------

    // Always yields a tile; points outside the map resolve to the closest
    // edge tile. Ties go to the first tile in row-major order.
    pub fn nearest_tile(&self, point: Vec2) -> Cell {
        match self.shape {
            TileShape::Square { width, height } => {
                let col = ((point.x + width * 0.5) / width).floor();
                let row = ((point.y + height * 0.5) / height).floor();
                Cell::new(
                    (col.max(0.0) as i32).min(self.cols - 1),
                    (row.max(0.0) as i32).min(self.rows - 1))
            }
            TileShape::Hex { .. } | TileShape::Isometric { .. } => {
                let y_scale = self.shape.nearest_y_scale();
                let target = Vec2::new(point.x, point.y * y_scale);

                let mut nearest = self.tiles[0].cell();
                let mut nearest_dist_sqr = f32::INFINITY;

                for tile in &self.tiles {
                    let pos = tile.position();
                    let dist_sqr = (Vec2::new(pos.x, pos.y * y_scale) - target).length_squared();
                    if dist_sqr < nearest_dist_sqr {
                        nearest_dist_sqr = dist_sqr;
                        nearest = tile.cell();
                    }
                }

                nearest
            }
        }
    }

    #[inline]
    pub fn nearest_tile_ref(&self, point: Vec2) -> &Tile {
        self.tile(self.nearest_tile(point))
    }

    // ----------------------
    // Neighbours:
    // ----------------------

    #[inline]
    pub fn edge_count(&self) -> usize {
        if self.shape.is_hex() { 6 } else { 4 }
    }

    #[inline]
    pub fn opposite_edge(&self, edge: usize) -> usize {
        let count = self.edge_count();
        debug_assert!(edge < count);
        (edge + count / 2) % count
    }

    // Cell across the given edge, or None if it falls outside the map.
    pub fn neighbor(&self, cell: Cell, edge: usize) -> Option<Cell> {
        if edge >= self.edge_count() || !self.is_cell_within_bounds(cell) {
            return None;
        }

        let (dx, dy) = match self.shape {
            TileShape::Hex { orientation: HexOrientation::Flat, .. } => {
                FLAT_HEX_NEIGHBORS[edge][(cell.x & 1) as usize]
            }
            TileShape::Hex { orientation: HexOrientation::Pointy, .. } => {
                POINTY_HEX_NEIGHBORS[edge][(cell.y & 1) as usize]
            }
            TileShape::Square { .. } => SQUARE_NEIGHBORS[edge],
            TileShape::Isometric { .. } => ISOMETRIC_NEIGHBORS[edge],
        };

        let neighbor = cell.offset(dx, dy);
        self.is_cell_within_bounds(neighbor).then_some(neighbor)
    }

    pub fn neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        (0..self.edge_count()).filter_map(move |edge| self.neighbor(cell, edge))
    }

    // ----------------------
    // Occupants:
    // ----------------------

    #[inline]
    pub fn occupant(&self, cell: Cell) -> Option<UnitId> {
        self.try_tile(cell).and_then(|tile| tile.occupant())
    }

    // Returns the unit previously on the tile, if any.
    pub fn place_unit(&mut self, cell: Cell, unit: UnitId) -> Option<UnitId> {
        let previous = self.tile_mut(cell).set_occupant(Some(unit));
        log::verbose!(log::channel!("map"), "Placed unit {unit} at {cell}.");
        previous
    }

    // None for empty tiles and cells outside the map.
    pub fn remove_unit(&mut self, cell: Cell) -> Option<UnitId> {
        if !self.is_cell_within_bounds(cell) {
            return None;
        }
        self.tile_mut(cell).set_occupant(None)
    }
}
