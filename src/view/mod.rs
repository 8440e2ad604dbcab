use strum_macros::Display;

use crate::{
    app::input::InputState,
    engine::time::Seconds,
    tile::GridMap,
    utils::{Rect, Vec2},
};

pub mod camera;
pub mod viewport;
pub mod minimap;


pub use camera::Camera;
pub use viewport::{Viewport, ViewportFlags};
pub use minimap::{Minimap, compose_frame};

// ----------------------------------------------
// Coordinate Spaces
// ----------------------------------------------

/*
World space   : Map units. Tile positions and outlines live here.
Camera space  : The world rect [cam_min, cam_min + cam_size] visible in a viewport.
Surface space : Pixels local to a viewport's own surface, origin at its top-left.
Screen space  : Pixels in the composited frame. Surface space offset by the
                viewport's `screen_rect` origin.

 world_to_surface(p) = (p - cam_min) / cam_size * screen_size
 world_to_screen(p)  = world_to_surface(p) + screen_rect.min
 screen_to_world(p)  = cam_min + cam_size * (p - screen_rect.min) / screen_size
*/

// ----------------------------------------------
// ViewTransform
// ----------------------------------------------

// Snapshot of a camera window mapped onto a screen rect.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ViewTransform {
    pub cam_min: Vec2,
    pub cam_size: Vec2,
    pub screen_rect: Rect,
}

impl ViewTransform {
    #[inline]
    pub fn new(camera_rect: Rect, screen_rect: Rect) -> Self {
        debug_assert!(camera_rect.is_valid() && screen_rect.is_valid());
        Self {
            cam_min: camera_rect.min,
            cam_size: camera_rect.size(),
            screen_rect,
        }
    }

    #[inline]
    pub fn screen_size(&self) -> Vec2 {
        self.screen_rect.size()
    }

    #[inline]
    pub fn camera_rect(&self) -> Rect {
        Rect::from_pos_and_size(self.cam_min, self.cam_size)
    }

    // Surface-local rect, origin at (0,0).
    #[inline]
    pub fn surface_rect(&self) -> Rect {
        Rect::from_pos_and_size(Vec2::zero(), self.screen_size())
    }

    // Pixels per world unit along each axis.
    #[inline]
    pub fn pixels_per_unit(&self) -> Vec2 {
        self.screen_size() / self.cam_size
    }

    #[inline]
    pub fn world_to_surface(&self, point: Vec2) -> Vec2 {
        (point - self.cam_min) / self.cam_size * self.screen_size()
    }

    #[inline]
    pub fn surface_to_world(&self, point: Vec2) -> Vec2 {
        self.cam_min + self.cam_size * (point / self.screen_size())
    }

    #[inline]
    pub fn world_to_screen(&self, point: Vec2) -> Vec2 {
        self.world_to_surface(point) + self.screen_rect.min
    }

    #[inline]
    pub fn screen_to_world(&self, point: Vec2) -> Vec2 {
        self.surface_to_world(point - self.screen_rect.min)
    }
}

// ----------------------------------------------
// ViewId
// ----------------------------------------------

#[derive(Copy, Clone, Debug, PartialEq, Eq, Display)]
pub enum ViewId {
    Primary,
    Minimap,
}

// Topmost view under the cursor. The minimap is drawn over the primary
// viewport so it is tested first.
pub fn view_at(cursor: Option<Vec2>, primary: &Viewport, minimap: &Minimap) -> Option<ViewId> {
    let cursor = cursor?;
    if minimap.is_point_within(cursor) {
        Some(ViewId::Minimap)
    } else if primary.is_point_within(cursor) {
        Some(ViewId::Primary)
    } else {
        None
    }
}

// Per-frame update of both views. The primary goes first so minimap
// navigation this frame is not undone by its `moved` reset.
pub fn update_views(primary: &mut Viewport, minimap: &mut Minimap, seconds: Seconds, input: &InputState, map: &GridMap) {
    let target = view_at(input.cursor_pos(), primary, minimap);
    primary.update(seconds, input, map, target == Some(ViewId::Primary));
    minimap.update(seconds, input, map, target == Some(ViewId::Minimap), primary);
}
