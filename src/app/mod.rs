use smallvec::SmallVec;

use crate::utils::Vec2;
use input::{InputAction, InputKey, MouseButton};

pub mod input;


// ----------------------------------------------
// InputEvent
// ----------------------------------------------

// Raw input delivered by whatever drives the frame loop (a window backend
// or a scripted replay). The viewer never polls a platform API itself.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum InputEvent {
    KeyInput(InputKey, InputAction),
    MouseMove(Vec2), // Absolute cursor position in frame pixels.
    MouseButton(MouseButton, InputAction),
    Scroll(Vec2),    // Wheel delta, positive y = wheel up.
}

pub type InputEventList = SmallVec<[InputEvent; 16]>;
