//! Window events in a form independent of the platform layer.
//!
//! `easel-window` translates platform events into these types; everything
//! downstream (demos, tests) only ever sees an [`Event`].

use bitflags::bitflags;

use crate::geom::Point;

bitflags! {
    /// Modifier keys held while an event fired.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT   = 1 << 0;
        const CONTROL = 1 << 1;
        const ALT     = 1 << 2;
        const SUPER   = 1 << 3;
    }
}

/// A mouse button.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Button {
    Left,
    Right,
    Middle,
    X1,
    X2,
    Unknown,
}

/// A physical keyboard key, named after the US layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,
    Digit0,
    Digit1,
    Digit2,
    Digit3,
    Digit4,
    Digit5,
    Digit6,
    Digit7,
    Digit8,
    Digit9,
    Escape,
    LeftControl,
    LeftShift,
    LeftAlt,
    LeftSuper,
    RightControl,
    RightShift,
    RightAlt,
    RightSuper,
    Menu,
    LeftBracket,
    RightBracket,
    Semicolon,
    Comma,
    Period,
    Apostrophe,
    Slash,
    Backslash,
    GraveAccent,
    Equal,
    Minus,
    Space,
    Enter,
    Backspace,
    Tab,
    PageUp,
    PageDown,
    End,
    Home,
    Insert,
    Delete,
    KpAdd,
    KpSubtract,
    KpMultiply,
    KpDivide,
    Left,
    Right,
    Up,
    Down,
    Kp0,
    Kp1,
    Kp2,
    Kp3,
    Kp4,
    Kp5,
    Kp6,
    Kp7,
    Kp8,
    Kp9,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    F13,
    F14,
    F15,
    Pause,
    Unknown,
}

/// A single window event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// The user asked to close the window.
    Close,
    /// The client area was resized.
    Resize { width: u32, height: u32 },
    /// A character was typed.
    KeyRune { rune: char, modifiers: Modifiers },
    KeyPress { key: Key, modifiers: Modifiers },
    /// A key is held down and the platform generated a repeat.
    KeyRepeat { key: Key, modifiers: Modifiers },
    KeyRelease { key: Key, modifiers: Modifiers },
    /// The cursor moved from `from` to `pos`.
    MouseMove { pos: Point, from: Point },
    MousePress {
        pos: Point,
        button: Button,
        modifiers: Modifiers,
    },
    MouseRelease {
        pos: Point,
        button: Button,
        modifiers: Modifiers,
    },
    /// Horizontal scroll in whole lines; positive is rightward.
    ScrollX { offset: i32, modifiers: Modifiers },
    /// Vertical scroll in whole lines; positive is upward.
    ScrollY { offset: i32, modifiers: Modifiers },
    /// The cursor entered (`true`) or left (`false`) the window.
    MouseEnter(bool),
}

// ===================================================================
// Tests
// ===================================================================
