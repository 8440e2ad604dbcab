use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use serde::{Deserialize, Serialize};

pub mod coords;

// ----------------------------------------------
// Vec2
// ----------------------------------------------

// Point or offset in any of the three spaces (world, surface, screen).
// Nothing in the type says which; the producing function does.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0)
    }

    #[inline]
    pub const fn one() -> Self {
        Self::new(1.0, 1.0)
    }

    #[inline]
    #[must_use]
    pub fn length_squared(self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    #[inline]
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        (self - other).length_squared().sqrt()
    }

    #[inline]
    #[must_use]
    pub fn min(self, other: Self) -> Self {
        Self::new(self.x.min(other.x), self.y.min(other.y))
    }

    #[inline]
    #[must_use]
    pub fn max(self, other: Self) -> Self {
        Self::new(self.x.max(other.x), self.y.max(other.y))
    }

    // Per-axis clamp.
    #[inline]
    #[must_use]
    pub fn clamp(self, lo: Self, hi: Self) -> Self {
        Self::new(self.x.clamp(lo.x, hi.x), self.y.clamp(lo.y, hi.y))
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self == Self::zero()
    }

    #[inline]
    pub fn approx_equal(self, other: Self, epsilon: f32) -> bool {
        approx_equal(self.x, other.x, epsilon) && approx_equal(self.y, other.y, epsilon)
    }
}

// Component-wise Vec2 (op) Vec2 and Vec2 (op) f32.
macro_rules! impl_vec2_op {
    ($trait:ident, $method:ident, $op:tt) => {
        impl $trait for Vec2 {
            type Output = Vec2;
            #[inline]
            fn $method(self, rhs: Vec2) -> Vec2 {
                Vec2::new(self.x $op rhs.x, self.y $op rhs.y)
            }
        }

        impl $trait<f32> for Vec2 {
            type Output = Vec2;
            #[inline]
            fn $method(self, rhs: f32) -> Vec2 {
                Vec2::new(self.x $op rhs, self.y $op rhs)
            }
        }
    };
}

impl_vec2_op!(Add, add, +);
impl_vec2_op!(Sub, sub, -);
impl_vec2_op!(Mul, mul, *);
impl_vec2_op!(Div, div, /);

impl Neg for Vec2 {
    type Output = Vec2;
    #[inline]
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

impl fmt::Display for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2},{:.2})", self.x, self.y)
    }
}

// ----------------------------------------------
// Color
// ----------------------------------------------

// Linear RGBA in [0,1]. Serialized as { r, g, b, a } in config files.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    #[inline]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn from_rgb_u8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
    }

    #[inline] pub const fn white() -> Self { Self::new(1.0, 1.0, 1.0, 1.0) }
    #[inline] pub const fn black() -> Self { Self::new(0.0, 0.0, 0.0, 1.0) }
    #[inline] pub const fn red()   -> Self { Self::new(1.0, 0.0, 0.0, 1.0) }
    #[inline] pub const fn green() -> Self { Self::new(0.0, 1.0, 0.0, 1.0) }

    // Out of range channels saturate.
    #[inline]
    pub fn to_rgba_u8(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a].map(|channel| (channel.clamp(0.0, 1.0) * 255.0).round() as u8)
    }
}

impl Default for Color {
    #[inline]
    fn default() -> Self {
        Self::black()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b, a] = self.to_rgba_u8();
        write!(f, "#{r:02x}{g:02x}{b:02x}{a:02x}")
    }
}

// ----------------------------------------------
// Size
// ----------------------------------------------

// Whole-pixel (or whole-cell) extents.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    #[inline]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    #[inline]
    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

// ----------------------------------------------
// Rect
// ----------------------------------------------

// Axis-aligned box, y down: `min` is top-left, `max` bottom-right.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    #[inline]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::from_pos_and_size(Vec2::new(x, y), Vec2::new(width, height))
    }

    #[inline]
    pub fn from_pos_and_size(pos: Vec2, size: Vec2) -> Self {
        Self { min: pos, max: pos + size }
    }

    #[inline]
    pub fn from_center_and_size(center: Vec2, size: Vec2) -> Self {
        Self::from_pos_and_size(center - size * 0.5, size)
    }

    // Any two opposite corners.
    #[inline]
    pub fn from_extents(a: Vec2, b: Vec2) -> Self {
        Self { min: a.min(b), max: a.max(b) }
    }

    // Bounding box. Inverted (min > max) when `points` is empty.
    pub fn from_points(points: &[Vec2]) -> Self {
        let empty = Self {
            min: Vec2::new(f32::MAX, f32::MAX),
            max: Vec2::new(f32::MIN, f32::MIN),
        };
        points.iter().fold(empty, |bounds, &point| Self {
            min: bounds.min.min(point),
            max: bounds.max.max(point),
        })
    }

    #[inline] pub fn width(&self)  -> f32  { self.max.x - self.min.x }
    #[inline] pub fn height(&self) -> f32  { self.max.y - self.min.y }
    #[inline] pub fn size(&self)   -> Vec2 { self.max - self.min }
    #[inline] pub fn center(&self) -> Vec2 { (self.min + self.max) * 0.5 }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.width() > 0.0 && self.height() > 0.0
    }

    #[inline]
    pub fn aspect_ratio(&self) -> f32 {
        debug_assert!(self.height() != 0.0, "Aspect ratio of a zero-height rect!");
        self.width() / self.height()
    }

    // Edges count as inside.
    #[inline]
    pub fn contains_point(&self, point: Vec2) -> bool {
        (self.min.x..=self.max.x).contains(&point.x) && (self.min.y..=self.max.y).contains(&point.y)
    }

    // Touching edges do not count.
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.min.x < other.max.x && other.min.x < self.max.x &&
        self.min.y < other.max.y && other.min.y < self.max.y
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} -> {}]", self.min, self.max)
    }
}

// ----------------------------------------------
// Math helpers
// ----------------------------------------------

#[inline]
pub fn approx_equal(a: f32, b: f32, epsilon: f32) -> bool {
    (a - b).abs() < epsilon
}

// -1, 0 or +1.
#[inline]
pub fn sign(value: f32) -> i32 {
    (value > 0.0) as i32 - (value < 0.0) as i32
}

#[inline]
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
