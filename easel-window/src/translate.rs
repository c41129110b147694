//! Platform event translation.
//!
//! One [`EventTranslator`] exists per window. Besides mapping `winit`
//! events onto [`Event`], it remembers the last cursor position (the
//! `from` of move events and the position of button events) and the
//! modifier state, which `winit` reports as separate events.

use winit::event::{ElementState, Ime, MouseScrollDelta, WindowEvent};
use winit::keyboard::PhysicalKey;

use easel_core::{Event, Modifiers, Point};

use crate::keyboard::{key_from, modifiers_from};
use crate::mouse::button_from;

/// Pixels of a high-precision scroll that count as one line.
const PIXELS_PER_LINE: f64 = 20.0;

#[derive(Clone, Debug, Default)]
pub struct EventTranslator {
    cursor: Option<Point>,
    modifiers: Modifiers,
}

impl EventTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last known cursor position inside the window.
    pub fn cursor(&self) -> Option<Point> {
        self.cursor
    }

    /// Record a cursor position set by the program.
    pub fn set_cursor(&mut self, pos: Point) {
        self.cursor = Some(pos);
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Events for one platform event, in order. Empty if the event has no
    /// counterpart.
    pub fn translate(&mut self, event: WindowEvent) -> Vec<Event> {
        let mut out = Vec::new();
        match event {
            WindowEvent::CloseRequested => out.push(Event::Close),
            WindowEvent::Resized(size) => out.push(Event::Resize {
                width: size.width,
                height: size.height,
            }),
            WindowEvent::ModifiersChanged(m) => self.modifiers = modifiers_from(m.state()),
            WindowEvent::KeyboardInput {
                event,
                is_synthetic: false,
                ..
            } => self.key_input(
                event.physical_key,
                event.state,
                event.repeat,
                event.text.as_deref(),
                &mut out,
            ),
            WindowEvent::Ime(Ime::Commit(text)) => self.runes(&text, &mut out),
            WindowEvent::CursorMoved { position, .. } => {
                let pos = Point::new(position.x.round() as i32, position.y.round() as i32);
                let from = self.cursor.unwrap_or(pos);
                self.cursor = Some(pos);
                out.push(Event::MouseMove { pos, from });
            }
            WindowEvent::CursorEntered { .. } => out.push(Event::MouseEnter(true)),
            WindowEvent::CursorLeft { .. } => out.push(Event::MouseEnter(false)),
            WindowEvent::MouseInput { state, button, .. } => {
                let pos = self.cursor.unwrap_or(Point::ZERO);
                let button = button_from(button);
                let modifiers = self.modifiers;
                out.push(match state {
                    ElementState::Pressed => Event::MousePress {
                        pos,
                        button,
                        modifiers,
                    },
                    ElementState::Released => Event::MouseRelease {
                        pos,
                        button,
                        modifiers,
                    },
                });
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let (dx, dy) = scroll_lines(delta);
                if dx != 0 {
                    out.push(Event::ScrollX {
                        offset: dx,
                        modifiers: self.modifiers,
                    });
                }
                if dy != 0 {
                    out.push(Event::ScrollY {
                        offset: dy,
                        modifiers: self.modifiers,
                    });
                }
            }
            other => log::debug!("Dropped window event: {:?}", other),
        }
        out
    }

    /// Translate a key event. Split from [`EventTranslator::translate`]
    /// because `winit` key events cannot be built outside `winit`.
    pub fn key_input(
        &mut self,
        physical: PhysicalKey,
        state: ElementState,
        repeat: bool,
        text: Option<&str>,
        out: &mut Vec<Event>,
    ) {
        let key = key_from(physical);
        let modifiers = self.modifiers;
        out.push(match (state, repeat) {
            (ElementState::Pressed, false) => Event::KeyPress { key, modifiers },
            (ElementState::Pressed, true) => Event::KeyRepeat { key, modifiers },
            (ElementState::Released, _) => Event::KeyRelease { key, modifiers },
        });
        if state == ElementState::Pressed {
            if let Some(text) = text {
                self.runes(text, out);
            }
        }
    }

    fn runes(&self, text: &str, out: &mut Vec<Event>) {
        out.extend(
            text.chars()
                .filter(|c| !c.is_control())
                .map(|rune| Event::KeyRune {
                    rune,
                    modifiers: self.modifiers,
                }),
        );
    }
}

/// Whole lines scrolled; a non-zero pixel scroll counts as at least one.
fn scroll_lines(delta: MouseScrollDelta) -> (i32, i32) {
    match delta {
        MouseScrollDelta::LineDelta(x, y) => (x.round() as i32, y.round() as i32),
        MouseScrollDelta::PixelDelta(pos) => (pixel_lines(pos.x), pixel_lines(pos.y)),
    }
}

fn pixel_lines(px: f64) -> i32 {
    let lines = (px / PIXELS_PER_LINE).round() as i32;
    if lines == 0 && px != 0.0 {
        px.signum() as i32
    } else {
        lines
    }
}

// ===================================================================
// Tests
// ===================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use easel_core::{pt, Button, Key};
    use winit::dpi::{PhysicalPosition, PhysicalSize};
    use winit::event::{DeviceId, MouseButton, TouchPhase};
    use winit::keyboard::{KeyCode, ModifiersState};

    fn device() -> DeviceId {
        // SAFETY: a dummy id is only compared, never passed to the platform.
        unsafe { DeviceId::dummy() }
    }

    fn moved(x: f64, y: f64) -> WindowEvent {
        WindowEvent::CursorMoved {
            device_id: device(),
            position: PhysicalPosition::new(x, y),
        }
    }

    fn modifiers(state: ModifiersState) -> WindowEvent {
        WindowEvent::ModifiersChanged(state.into())
    }

    #[test]
    fn test_close_is_exactly_close() {
        let mut t = EventTranslator::new();
        assert_eq!(t.translate(WindowEvent::CloseRequested), vec![Event::Close]);
    }

    #[test]
    fn test_resize() {
        let mut t = EventTranslator::new();
        assert_eq!(
            t.translate(WindowEvent::Resized(PhysicalSize::new(640, 480))),
            vec![Event::Resize {
                width: 640,
                height: 480
            }]
        );
    }

    #[test]
    fn test_key_press_with_shift() {
        let mut t = EventTranslator::new();
        assert!(t.translate(modifiers(ModifiersState::SHIFT)).is_empty());

        let mut out = Vec::new();
        t.key_input(
            PhysicalKey::Code(KeyCode::KeyA),
            ElementState::Pressed,
            false,
            Some("A"),
            &mut out,
        );
        assert_eq!(
            out,
            vec![
                Event::KeyPress {
                    key: Key::A,
                    modifiers: Modifiers::SHIFT
                },
                Event::KeyRune {
                    rune: 'A',
                    modifiers: Modifiers::SHIFT
                },
            ]
        );
    }

    #[test]
    fn test_key_repeat_and_release() {
        let mut t = EventTranslator::new();
        let mut out = Vec::new();
        let key = PhysicalKey::Code(KeyCode::Space);
        t.key_input(key, ElementState::Pressed, true, None, &mut out);
        t.key_input(key, ElementState::Released, false, Some(" "), &mut out);
        assert_eq!(
            out,
            vec![
                Event::KeyRepeat {
                    key: Key::Space,
                    modifiers: Modifiers::empty()
                },
                Event::KeyRelease {
                    key: Key::Space,
                    modifiers: Modifiers::empty()
                },
            ]
        );
    }

    #[test]
    fn test_control_characters_are_not_runes() {
        let mut t = EventTranslator::new();
        let mut out = Vec::new();
        t.key_input(
            PhysicalKey::Code(KeyCode::Enter),
            ElementState::Pressed,
            false,
            Some("\r"),
            &mut out,
        );
        assert_eq!(out.len(), 1);
        assert!(matches!(out[0], Event::KeyPress { key: Key::Enter, .. }));
    }

    #[test]
    fn test_ime_commit_runes() {
        let mut t = EventTranslator::new();
        let events = t.translate(WindowEvent::Ime(Ime::Commit("日本".into())));
        let runes: Vec<char> = events
            .iter()
            .filter_map(|e| match e {
                Event::KeyRune { rune, .. } => Some(*rune),
                _ => None,
            })
            .collect();
        assert_eq!(runes, vec!['日', '本']);
    }

    #[test]
    fn test_mouse_move_tracks_previous_position() {
        let mut t = EventTranslator::new();
        assert_eq!(
            t.translate(moved(10.0, 20.0)),
            vec![Event::MouseMove {
                pos: pt(10, 20),
                from: pt(10, 20)
            }]
        );
        assert_eq!(
            t.translate(moved(15.4, 19.6)),
            vec![Event::MouseMove {
                pos: pt(15, 20),
                from: pt(10, 20)
            }]
        );
        assert_eq!(t.cursor(), Some(pt(15, 20)));
    }

    #[test]
    fn test_mouse_buttons_use_cursor_and_modifiers() {
        let mut t = EventTranslator::new();
        t.translate(moved(3.0, 4.0));
        t.translate(modifiers(ModifiersState::CONTROL));
        let press = t.translate(WindowEvent::MouseInput {
            device_id: device(),
            state: ElementState::Pressed,
            button: MouseButton::Right,
        });
        assert_eq!(
            press,
            vec![Event::MousePress {
                pos: pt(3, 4),
                button: Button::Right,
                modifiers: Modifiers::CONTROL
            }]
        );
        let release = t.translate(WindowEvent::MouseInput {
            device_id: device(),
            state: ElementState::Released,
            button: MouseButton::Back,
        });
        assert!(matches!(
            release[0],
            Event::MouseRelease {
                button: Button::X1,
                ..
            }
        ));
    }

    #[test]
    fn test_scroll_lines_and_pixels() {
        let mut t = EventTranslator::new();
        let lines = t.translate(WindowEvent::MouseWheel {
            device_id: device(),
            delta: MouseScrollDelta::LineDelta(0.0, -2.0),
            phase: TouchPhase::Moved,
        });
        assert_eq!(
            lines,
            vec![Event::ScrollY {
                offset: -2,
                modifiers: Modifiers::empty()
            }]
        );

        let pixels = t.translate(WindowEvent::MouseWheel {
            device_id: device(),
            delta: MouseScrollDelta::PixelDelta(PhysicalPosition::new(3.0, 45.0)),
            phase: TouchPhase::Moved,
        });
        assert_eq!(
            pixels,
            vec![
                Event::ScrollX {
                    offset: 1,
                    modifiers: Modifiers::empty()
                },
                Event::ScrollY {
                    offset: 2,
                    modifiers: Modifiers::empty()
                },
            ]
        );
    }

    #[test]
    fn test_enter_and_leave() {
        let mut t = EventTranslator::new();
        assert_eq!(
            t.translate(WindowEvent::CursorEntered { device_id: device() }),
            vec![Event::MouseEnter(true)]
        );
        assert_eq!(
            t.translate(WindowEvent::CursorLeft { device_id: device() }),
            vec![Event::MouseEnter(false)]
        );
    }

    #[test]
    fn test_unrecognized_events_are_dropped() {
        let mut t = EventTranslator::new();
        assert!(t.translate(WindowEvent::Focused(true)).is_empty());
        assert!(t.translate(WindowEvent::RedrawRequested).is_empty());
    }
}
