use smallvec::SmallVec;
use strum_macros::{Display, EnumIter};

use super::InputEvent;
use crate::utils::{self, Vec2};

// ----------------------------------------------
// Keys / Buttons / Actions
// ----------------------------------------------

#[derive(Copy, Clone, Debug, Display, EnumIter, PartialEq, Eq, Hash)]
pub enum InputKey {
    Left,
    Right,
    Up,
    Down,
    A,
    D,
    W,
    S,
    G,
    F3,
    Escape,
}

#[derive(Copy, Clone, Debug, Display, EnumIter, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
pub enum InputAction {
    Press,
    Release,
}

// ----------------------------------------------
// InputState
// ----------------------------------------------

// Per-frame view of the input, re-derived from each event batch.
// Only the held keys, held buttons and the cursor position carry over
// from one frame to the next; everything else is edge-triggered.
#[derive(Clone, Debug, Default)]
pub struct InputState {
    cursor_pos: Option<Vec2>,
    scroll: i32,

    keys_down: SmallVec<[InputKey; 8]>,
    keys_pressed: SmallVec<[InputKey; 8]>,

    buttons_down: SmallVec<[MouseButton; 3]>,
    buttons_pressed: SmallVec<[MouseButton; 3]>,
    buttons_released: SmallVec<[MouseButton; 3]>,
}

impl InputState {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_frame(&mut self, events: &[InputEvent]) {
        self.keys_pressed.clear();
        self.buttons_pressed.clear();
        self.buttons_released.clear();

        let mut scroll_delta = 0.0;

        for event in events {
            match *event {
                InputEvent::KeyInput(key, InputAction::Press) => {
                    if !self.keys_down.contains(&key) {
                        self.keys_down.push(key);
                        self.keys_pressed.push(key);
                    }
                }
                InputEvent::KeyInput(key, InputAction::Release) => {
                    self.keys_down.retain(|k| *k != key);
                }
                InputEvent::MouseMove(pos) => {
                    self.cursor_pos = Some(pos);
                }
                InputEvent::MouseButton(button, InputAction::Press) => {
                    if !self.buttons_down.contains(&button) {
                        self.buttons_down.push(button);
                        self.buttons_pressed.push(button);
                    }
                }
                InputEvent::MouseButton(button, InputAction::Release) => {
                    if self.buttons_down.contains(&button) {
                        self.buttons_down.retain(|b| *b != button);
                        self.buttons_released.push(button);
                    }
                }
                InputEvent::Scroll(delta) => {
                    scroll_delta += delta.y;
                }
            }
        }

        self.scroll = utils::sign(scroll_delta);
    }

    // Absolute cursor position in frame pixels, if the cursor was ever seen.
    #[inline]
    pub fn cursor_pos(&self) -> Option<Vec2> {
        self.cursor_pos
    }

    // Sign of this frame's wheel movement: +1 wheel up (zoom out), -1 wheel down (zoom in).
    #[inline]
    pub fn scroll(&self) -> i32 {
        self.scroll
    }

    // Movement direction from the held arrow/WASD keys, each axis in {-1, 0, 1}.
    pub fn direction(&self) -> Vec2 {
        let axis = |neg: [InputKey; 2], pos: [InputKey; 2]| -> f32 {
            let mut value = 0.0;
            if neg.iter().any(|k| self.is_key_down(*k)) {
                value -= 1.0;
            }
            if pos.iter().any(|k| self.is_key_down(*k)) {
                value += 1.0;
            }
            value
        };

        Vec2::new(
            axis([InputKey::Left, InputKey::A], [InputKey::Right, InputKey::D]),
            axis([InputKey::Up,   InputKey::W], [InputKey::Down,  InputKey::S]),
        )
    }

    #[inline]
    pub fn is_key_down(&self, key: InputKey) -> bool {
        self.keys_down.contains(&key)
    }

    #[inline]
    pub fn key_pressed(&self, key: InputKey) -> bool {
        self.keys_pressed.contains(&key)
    }

    #[inline]
    pub fn is_mouse_down(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }

    #[inline]
    pub fn mouse_pressed(&self, button: MouseButton) -> bool {
        self.buttons_pressed.contains(&button)
    }

    #[inline]
    pub fn mouse_released(&self, button: MouseButton) -> bool {
        self.buttons_released.contains(&button)
    }
}
