//! Mouse button table.

use easel_core::Button;
use winit::event::MouseButton;

pub fn button_from(button: MouseButton) -> Button {
    match button {
        MouseButton::Left => Button::Left,
        MouseButton::Right => Button::Right,
        MouseButton::Middle => Button::Middle,
        MouseButton::Back => Button::X1,
        MouseButton::Forward => Button::X2,
        MouseButton::Other(_) => Button::Unknown,
    }
}
