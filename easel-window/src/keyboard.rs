//! Physical key and modifier tables.

use easel_core::{Key, Modifiers};
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};

/// The easel key for a physical key, [`Key::Unknown`] if there is none.
pub fn key_from(physical: PhysicalKey) -> Key {
    match physical {
        PhysicalKey::Code(code) => key_from_code(code),
        PhysicalKey::Unidentified(_) => Key::Unknown,
    }
}

pub fn modifiers_from(state: ModifiersState) -> Modifiers {
    let mut m = Modifiers::empty();
    m.set(Modifiers::SHIFT, state.shift_key());
    m.set(Modifiers::CONTROL, state.control_key());
    m.set(Modifiers::ALT, state.alt_key());
    m.set(Modifiers::SUPER, state.super_key());
    m
}

fn key_from_code(code: KeyCode) -> Key {
    match code {
        KeyCode::KeyA => Key::A,
        KeyCode::KeyB => Key::B,
        KeyCode::KeyC => Key::C,
        KeyCode::KeyD => Key::D,
        KeyCode::KeyE => Key::E,
        KeyCode::KeyF => Key::F,
        KeyCode::KeyG => Key::G,
        KeyCode::KeyH => Key::H,
        KeyCode::KeyI => Key::I,
        KeyCode::KeyJ => Key::J,
        KeyCode::KeyK => Key::K,
        KeyCode::KeyL => Key::L,
        KeyCode::KeyM => Key::M,
        KeyCode::KeyN => Key::N,
        KeyCode::KeyO => Key::O,
        KeyCode::KeyP => Key::P,
        KeyCode::KeyQ => Key::Q,
        KeyCode::KeyR => Key::R,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyT => Key::T,
        KeyCode::KeyU => Key::U,
        KeyCode::KeyV => Key::V,
        KeyCode::KeyW => Key::W,
        KeyCode::KeyX => Key::X,
        KeyCode::KeyY => Key::Y,
        KeyCode::KeyZ => Key::Z,
        KeyCode::Digit0 => Key::Digit0,
        KeyCode::Digit1 => Key::Digit1,
        KeyCode::Digit2 => Key::Digit2,
        KeyCode::Digit3 => Key::Digit3,
        KeyCode::Digit4 => Key::Digit4,
        KeyCode::Digit5 => Key::Digit5,
        KeyCode::Digit6 => Key::Digit6,
        KeyCode::Digit7 => Key::Digit7,
        KeyCode::Digit8 => Key::Digit8,
        KeyCode::Digit9 => Key::Digit9,
        KeyCode::Escape => Key::Escape,
        KeyCode::ControlLeft => Key::LeftControl,
        KeyCode::ShiftLeft => Key::LeftShift,
        KeyCode::AltLeft => Key::LeftAlt,
        KeyCode::SuperLeft => Key::LeftSuper,
        KeyCode::ControlRight => Key::RightControl,
        KeyCode::ShiftRight => Key::RightShift,
        KeyCode::AltRight => Key::RightAlt,
        KeyCode::SuperRight => Key::RightSuper,
        KeyCode::ContextMenu => Key::Menu,
        KeyCode::BracketLeft => Key::LeftBracket,
        KeyCode::BracketRight => Key::RightBracket,
        KeyCode::Semicolon => Key::Semicolon,
        KeyCode::Comma => Key::Comma,
        KeyCode::Period => Key::Period,
        KeyCode::Quote => Key::Apostrophe,
        KeyCode::Slash => Key::Slash,
        KeyCode::Backslash => Key::Backslash,
        KeyCode::Backquote => Key::GraveAccent,
        KeyCode::Equal => Key::Equal,
        KeyCode::Minus => Key::Minus,
        KeyCode::Space => Key::Space,
        KeyCode::Enter | KeyCode::NumpadEnter => Key::Enter,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Tab => Key::Tab,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::End => Key::End,
        KeyCode::Home => Key::Home,
        KeyCode::Insert => Key::Insert,
        KeyCode::Delete => Key::Delete,
        KeyCode::NumpadAdd => Key::KpAdd,
        KeyCode::NumpadSubtract => Key::KpSubtract,
        KeyCode::NumpadMultiply => Key::KpMultiply,
        KeyCode::NumpadDivide => Key::KpDivide,
        KeyCode::ArrowLeft => Key::Left,
        KeyCode::ArrowRight => Key::Right,
        KeyCode::ArrowUp => Key::Up,
        KeyCode::ArrowDown => Key::Down,
        KeyCode::Numpad0 => Key::Kp0,
        KeyCode::Numpad1 => Key::Kp1,
        KeyCode::Numpad2 => Key::Kp2,
        KeyCode::Numpad3 => Key::Kp3,
        KeyCode::Numpad4 => Key::Kp4,
        KeyCode::Numpad5 => Key::Kp5,
        KeyCode::Numpad6 => Key::Kp6,
        KeyCode::Numpad7 => Key::Kp7,
        KeyCode::Numpad8 => Key::Kp8,
        KeyCode::Numpad9 => Key::Kp9,
        KeyCode::F1 => Key::F1,
        KeyCode::F2 => Key::F2,
        KeyCode::F3 => Key::F3,
        KeyCode::F4 => Key::F4,
        KeyCode::F5 => Key::F5,
        KeyCode::F6 => Key::F6,
        KeyCode::F7 => Key::F7,
        KeyCode::F8 => Key::F8,
        KeyCode::F9 => Key::F9,
        KeyCode::F10 => Key::F10,
        KeyCode::F11 => Key::F11,
        KeyCode::F12 => Key::F12,
        KeyCode::F13 => Key::F13,
        KeyCode::F14 => Key::F14,
        KeyCode::F15 => Key::F15,
        KeyCode::Pause => Key::Pause,
        _ => Key::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::NativeKeyCode;

    #[test]
    fn test_letters_and_digits() {
        assert_eq!(key_from(PhysicalKey::Code(KeyCode::KeyA)), Key::A);
        assert_eq!(key_from(PhysicalKey::Code(KeyCode::KeyZ)), Key::Z);
        assert_eq!(key_from(PhysicalKey::Code(KeyCode::Digit7)), Key::Digit7);
        assert_eq!(key_from(PhysicalKey::Code(KeyCode::Numpad7)), Key::Kp7);
    }

    #[test]
    fn test_named_keys() {
        assert_eq!(key_from(PhysicalKey::Code(KeyCode::Quote)), Key::Apostrophe);
        assert_eq!(key_from(PhysicalKey::Code(KeyCode::Backquote)), Key::GraveAccent);
        assert_eq!(key_from(PhysicalKey::Code(KeyCode::NumpadEnter)), Key::Enter);
        assert_eq!(key_from(PhysicalKey::Code(KeyCode::SuperRight)), Key::RightSuper);
        assert_eq!(key_from(PhysicalKey::Code(KeyCode::F15)), Key::F15);
    }

    #[test]
    fn test_unmapped_keys_are_unknown() {
        assert_eq!(key_from(PhysicalKey::Code(KeyCode::F24)), Key::Unknown);
        assert_eq!(
            key_from(PhysicalKey::Unidentified(NativeKeyCode::Unidentified)),
            Key::Unknown
        );
    }

    #[test]
    fn test_modifiers() {
        assert_eq!(modifiers_from(ModifiersState::empty()), Modifiers::empty());
        assert_eq!(
            modifiers_from(ModifiersState::SHIFT | ModifiersState::SUPER),
            Modifiers::SHIFT | Modifiers::SUPER
        );
        assert_eq!(
            modifiers_from(ModifiersState::CONTROL | ModifiersState::ALT),
            Modifiers::CONTROL | Modifiers::ALT
        );
    }
}
