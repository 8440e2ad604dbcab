use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};
use strum_macros::Display;

use crate::utils::{coords::Cell, Rect, Vec2};
use unit::UnitId;

pub mod map;
pub mod unit;
pub mod rendering;

#[cfg(test)]
mod tests;

pub use map::{GridMap, MapKind};

// ----------------------------------------------
// Constants
// ----------------------------------------------

pub const SQRT_3: f32 = 1.732_050_8;

// Hex outlines have 6 points. Square and isometric outlines are
// 4 corners with the first repeated to close the loop.
pub const MAX_OUTLINE_POINTS: usize = 6;

pub type TileOutline = ArrayVec<Vec2, MAX_OUTLINE_POINTS>;

// ----------------------------------------------
// HexOrientation
// ----------------------------------------------

#[derive(Copy, Clone, Debug, Display, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HexOrientation {
    // Flat top & bottom edges. Odd columns are shifted down half a tile.
    #[default]
    Flat,
    // Pointy top & bottom vertices. Odd rows are shifted right half a tile.
    Pointy,
}

// ----------------------------------------------
// TileShape
// ----------------------------------------------

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum TileShape {
    Hex {
        radius: f32,
        vertical_scale: f32,
        orientation: HexOrientation,
    },
    Square {
        width: f32,
        height: f32,
    },
    Isometric {
        width: f32,
        height: f32,
    },
}

impl TileShape {
    // World-space width & height of one tile.
    pub fn tile_size(&self) -> Vec2 {
        match *self {
            Self::Hex { radius, vertical_scale, orientation } => match orientation {
                HexOrientation::Flat   => Vec2::new(2.0 * radius, vertical_scale * SQRT_3 * radius),
                HexOrientation::Pointy => Vec2::new(SQRT_3 * radius, 2.0 * radius * vertical_scale),
            },
            Self::Square { width, height } | Self::Isometric { width, height } => Vec2::new(width, height),
        }
    }

    // Distance between neighbouring tile centers along each axis.
    pub fn spacing(&self) -> Vec2 {
        let size = self.tile_size();
        match *self {
            Self::Hex { orientation: HexOrientation::Flat, .. }   => Vec2::new(0.75 * size.x, size.y),
            Self::Hex { orientation: HexOrientation::Pointy, .. } => Vec2::new(size.x, 0.75 * size.y),
            Self::Square { .. } | Self::Isometric { .. } => size,
        }
    }

    // Scale applied to the y axis before comparing distances in nearest-tile
    // queries, undoing the vertical squash of the shape.
    pub fn nearest_y_scale(&self) -> f32 {
        match *self {
            Self::Hex { vertical_scale, .. } => 1.0 / vertical_scale,
            Self::Isometric { width, height } => width / height,
            Self::Square { .. } => 1.0,
        }
    }

    #[inline]
    pub fn is_hex(&self) -> bool {
        matches!(self, Self::Hex { .. })
    }

    pub fn is_valid(&self) -> bool {
        match *self {
            Self::Hex { radius, vertical_scale, .. } => radius > 0.0 && vertical_scale > 0.0,
            Self::Square { width, height } | Self::Isometric { width, height } => width > 0.0 && height > 0.0,
        }
    }
}

// ----------------------------------------------
// Outline generation
// ----------------------------------------------

pub fn compute_outline(shape: &TileShape, center: Vec2) -> TileOutline {
    let mut outline = TileOutline::new();

    match *shape {
        TileShape::Hex { radius, vertical_scale, orientation } => {
            let start_angle: f32 = match orientation {
                HexOrientation::Flat   => 0.0,
                HexOrientation::Pointy => 30.0,
            };
            for i in 0..6 {
                let angle = (start_angle + 60.0 * i as f32).to_radians();
                outline.push(Vec2::new(
                    center.x + radius * angle.cos(),
                    center.y + radius * angle.sin() * vertical_scale));
            }
        }
        TileShape::Square { width, height } => {
            let half = Vec2::new(width, height) * 0.5;
            let top_left = center - half;
            outline.push(top_left);
            outline.push(Vec2::new(center.x + half.x, center.y - half.y));
            outline.push(center + half);
            outline.push(Vec2::new(center.x - half.x, center.y + half.y));
            outline.push(top_left);
        }
        TileShape::Isometric { width, height } => {
            let top = Vec2::new(center.x, center.y - height * 0.5);
            outline.push(top);
            outline.push(Vec2::new(center.x + width * 0.5, center.y));
            outline.push(Vec2::new(center.x, center.y + height * 0.5));
            outline.push(Vec2::new(center.x - width * 0.5, center.y));
            outline.push(top);
        }
    }

    outline
}

// ----------------------------------------------
// Tile
// ----------------------------------------------

#[derive(Clone, Debug)]
pub struct Tile {
    cell: Cell,
    position: Vec2,
    outline: TileOutline,
    occupant: Option<UnitId>,
}

impl Tile {
    pub fn new(cell: Cell, position: Vec2, shape: &TileShape) -> Self {
        Self {
            cell,
            position,
            outline: compute_outline(shape, position),
            occupant: None,
        }
    }

    // Grid coordinates (column, row).
    #[inline]
    pub fn cell(&self) -> Cell {
        self.cell
    }

    // World-space center.
    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[inline]
    pub fn outline(&self) -> &[Vec2] {
        &self.outline
    }

    #[inline]
    pub fn bounds(&self) -> Rect {
        Rect::from_points(&self.outline)
    }

    #[inline]
    pub fn occupant(&self) -> Option<UnitId> {
        self.occupant
    }

    #[inline]
    pub fn has_occupant(&self) -> bool {
        self.occupant.is_some()
    }

    #[inline]
    fn set_occupant(&mut self, occupant: Option<UnitId>) -> Option<UnitId> {
        std::mem::replace(&mut self.occupant, occupant)
    }
}
