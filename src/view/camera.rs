use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

use crate::{
    engine::config::CameraConfigs,
    utils::{Rect, Vec2},
};

// Shake time below this snaps to zero.
const SHAKE_CUTOFF: f32 = 1e-3;

// ----------------------------------------------
// Camera
// ----------------------------------------------

// A world-space window defined by a center point and a size.
//
// The raw center is what panning, zooming and clamping operate on. The
// effective center adds the transient shake offset and is what rendering
// and picking see. When `bounds` is set every mutation re-clamps the
// raw window so it stays inside them.
pub struct Camera {
    raw_center: Vec2,
    width: f32,
    height: f32,

    // Fixed at construction. Used to keep the aspect ratio when clamping shrinks one axis.
    w_to_h_ratio: f32,
    h_to_w_ratio: f32,

    bounds: Option<Rect>,

    shake_offset: Vec2,
    shaking_time: f32,
    shake_strength: f32,
    shake_decay: f32,
    rng: Pcg64,
}

impl Camera {
    pub fn new(center: Vec2, width: f32, height: f32, bounds: Option<Rect>, configs: &CameraConfigs) -> Self {
        assert!(width > 0.0 && height > 0.0, "Invalid camera size: {width}x{height}");

        let mut camera = Self {
            raw_center: center,
            width,
            height,
            w_to_h_ratio: width / height,
            h_to_w_ratio: height / width,
            bounds,
            shake_offset: Vec2::zero(),
            shaking_time: 0.0,
            shake_strength: configs.shake_strength,
            shake_decay: configs.shake_decay,
            rng: Pcg64::seed_from_u64(configs.shake_seed),
        };

        camera.adjust();
        camera
    }

    // ----------------------
    // Mutation:
    // ----------------------

    // Partial update. Fields left as `None` keep their current value.
    pub fn change(&mut self, center: Option<Vec2>, width: Option<f32>, height: Option<f32>) {
        if let Some(center) = center {
            self.raw_center = center;
        }
        if let Some(width) = width {
            debug_assert!(width > 0.0);
            self.width = width;
        }
        if let Some(height) = height {
            debug_assert!(height > 0.0);
            self.height = height;
        }
        self.adjust();
    }

    #[inline]
    pub fn set_center(&mut self, center: Vec2) {
        self.change(Some(center), None, None);
    }

    #[inline]
    pub fn move_by(&mut self, delta: Vec2) {
        self.set_center(self.raw_center + delta);
    }

    #[inline]
    pub fn set_bounds(&mut self, bounds: Option<Rect>) {
        self.bounds = bounds;
        self.adjust();
    }

    // Keeps the raw window inside the bounds, if any. The order of the
    // checks is significant: oversize axes are recentered and shrunk first,
    // then each edge is pushed back inside.
    fn adjust(&mut self) {
        let Some(bounds) = self.bounds else {
            return;
        };

        if self.width > bounds.width() {
            self.raw_center.x = bounds.center().x;
            self.width = bounds.width();
            self.height = self.width * self.h_to_w_ratio;
        }

        if self.height > bounds.height() {
            self.raw_center.y = bounds.center().y;
            self.height = bounds.height();
            self.width = self.height * self.w_to_h_ratio;
        }

        let half_size = self.size() * 0.5;

        if self.raw_center.x - half_size.x < bounds.min.x {
            self.raw_center.x = bounds.min.x + half_size.x;
        }
        if self.raw_center.x + half_size.x > bounds.max.x {
            self.raw_center.x = bounds.max.x - half_size.x;
        }

        if self.raw_center.y - half_size.y < bounds.min.y {
            self.raw_center.y = bounds.min.y + half_size.y;
        }
        if self.raw_center.y + half_size.y > bounds.max.y {
            self.raw_center.y = bounds.max.y - half_size.y;
        }
    }

    // ----------------------
    // Screen shake:
    // ----------------------

    pub fn screen_shake(&mut self, duration: f32) {
        self.shaking_time = duration.max(0.0);
    }

    // Advances the shake by one tick. Each axis jumps to -1, 0 or +1 times
    // the current strength scaled by the camera size.
    pub fn update(&mut self) {
        if self.shaking_time <= 0.0 {
            return;
        }

        let amount = self.shaking_time * self.shake_strength;
        let dir_x = self.rng.random_range(-1..=1) as f32;
        let dir_y = self.rng.random_range(-1..=1) as f32;
        self.shake_offset = Vec2::new(dir_x * amount * self.width, dir_y * amount * self.height);

        self.shaking_time *= self.shake_decay;
        if self.shaking_time < SHAKE_CUTOFF {
            self.shaking_time = 0.0;
            self.shake_offset = Vec2::zero();
        }
    }

    #[inline]
    pub fn is_shaking(&self) -> bool {
        self.shaking_time > 0.0
    }

    #[inline]
    pub fn shaking_time(&self) -> f32 {
        self.shaking_time
    }

    #[inline]
    pub fn shake_offset(&self) -> Vec2 {
        self.shake_offset
    }

    // ----------------------
    // Queries:
    // ----------------------

    // Effective center, including shake.
    #[inline]
    pub fn center(&self) -> Vec2 {
        self.raw_center + self.shake_offset
    }

    #[inline]
    pub fn raw_center(&self) -> Vec2 {
        self.raw_center
    }

    #[inline] pub fn width(&self) -> f32 { self.width }
    #[inline] pub fn height(&self) -> f32 { self.height }
    #[inline] pub fn size(&self) -> Vec2 { Vec2::new(self.width, self.height) }

    #[inline] pub fn x1(&self) -> f32 { self.center().x - self.width * 0.5 }
    #[inline] pub fn y1(&self) -> f32 { self.center().y - self.height * 0.5 }
    #[inline] pub fn x2(&self) -> f32 { self.center().x + self.width * 0.5 }
    #[inline] pub fn y2(&self) -> f32 { self.center().y + self.height * 0.5 }

    #[inline] pub fn w_to_h_ratio(&self) -> f32 { self.w_to_h_ratio }
    #[inline] pub fn h_to_w_ratio(&self) -> f32 { self.h_to_w_ratio }

    #[inline]
    pub fn bounds(&self) -> Option<Rect> {
        self.bounds
    }

    // Effective window, including shake.
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::from_center_and_size(self.center(), self.size())
    }

    // Window around the raw center. This is what clamping keeps inside the bounds.
    #[inline]
    pub fn raw_rect(&self) -> Rect {
        Rect::from_center_and_size(self.raw_center, self.size())
    }

    // Point in normalized camera coordinates: (0,0) top-left, (1,1) bottom-right.
    #[inline]
    pub fn norm(&self, point: Vec2) -> Vec2 {
        Vec2::new((point.x - self.x1()) / self.width, (point.y - self.y1()) / self.height)
    }

    // Whether an object of `size` centered at `point` overlaps the camera window.
    #[inline]
    pub fn is_within(&self, point: Vec2, size: Vec2) -> bool {
        Rect::from_center_and_size(point, size).intersects(&self.rect())
    }
}

impl std::fmt::Display for Camera {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Camera(center: {}, size: {:.2}x{:.2})", self.center(), self.width, self.height)
    }
}
