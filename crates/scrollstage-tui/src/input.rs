use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use scrollstage_core::NavKey;

/// Wheel delta reported per notch, in the units browsers use
pub const WHEEL_DELTA: f32 = 120.0;

/// Input action that can be performed
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Quit,
    /// Switch between paged and native scrolling
    ToggleMode,
    Nav(NavKey),
    PageDown,
    PageUp,
    JumpToTop,
    JumpToBottom,
    CarouselPrev,
    CarouselNext,
    Wheel {
        delta_y: f32,
        ctrl: bool,
        column: u16,
        row: u16,
    },
    /// Left button down: start of a drag gesture
    Press { column: u16, row: u16 },
    Drag { column: u16, row: u16 },
    Release,
    None,
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), KeyModifiers::NONE) | (KeyCode::Esc, _) => Action::Quit,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,

        (KeyCode::Down, _) | (KeyCode::Char('j'), KeyModifiers::NONE) => Action::Nav(NavKey::ArrowDown),
        (KeyCode::Up, _) | (KeyCode::Char('k'), KeyModifiers::NONE) => Action::Nav(NavKey::ArrowUp),
        (KeyCode::PageDown, _) | (KeyCode::Char(' '), KeyModifiers::NONE) => Action::PageDown,
        (KeyCode::PageUp, _) => Action::PageUp,
        (KeyCode::Home, _) | (KeyCode::Char('g'), KeyModifiers::NONE) => Action::JumpToTop,
        (KeyCode::End, _) | (KeyCode::Char('G'), _) => Action::JumpToBottom,

        (KeyCode::Left, _) | (KeyCode::Char('h'), KeyModifiers::NONE) => Action::CarouselPrev,
        (KeyCode::Right, _) | (KeyCode::Char('l'), KeyModifiers::NONE) => Action::CarouselNext,

        (KeyCode::Char('n'), KeyModifiers::NONE) => Action::ToggleMode,
        _ => Action::None,
    }
}

/// Handle a mouse event: wheel notches and left-button drags (the terminal's
/// stand-in for touch)
pub fn handle_mouse_event(mouse: MouseEvent) -> Action {
    let (column, row) = (mouse.column, mouse.row);
    let ctrl = mouse.modifiers.contains(KeyModifiers::CONTROL);

    match mouse.kind {
        MouseEventKind::ScrollDown => Action::Wheel {
            delta_y: WHEEL_DELTA,
            ctrl,
            column,
            row,
        },
        MouseEventKind::ScrollUp => Action::Wheel {
            delta_y: -WHEEL_DELTA,
            ctrl,
            column,
            row,
        },
        MouseEventKind::Down(MouseButton::Left) => Action::Press { column, row },
        MouseEventKind::Drag(MouseButton::Left) => Action::Drag { column, row },
        MouseEventKind::Up(MouseButton::Left) => Action::Release,
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: crossterm::event::KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn mouse(kind: MouseEventKind, modifiers: KeyModifiers) -> MouseEvent {
        MouseEvent {
            kind,
            column: 4,
            row: 9,
            modifiers,
        }
    }

    #[test]
    fn test_arrow_keys() {
        assert_eq!(
            handle_key_event(key(KeyCode::Down, KeyModifiers::NONE)),
            Action::Nav(NavKey::ArrowDown)
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Char('k'), KeyModifiers::NONE)),
            Action::Nav(NavKey::ArrowUp)
        );
        assert_eq!(handle_key_event(key(KeyCode::Char('c'), KeyModifiers::CONTROL)), Action::Quit);
        assert_eq!(handle_key_event(key(KeyCode::Char('x'), KeyModifiers::NONE)), Action::None);
    }

    #[test]
    fn test_jump_keys() {
        assert_eq!(handle_key_event(key(KeyCode::Home, KeyModifiers::NONE)), Action::JumpToTop);
        assert_eq!(handle_key_event(key(KeyCode::Char('g'), KeyModifiers::NONE)), Action::JumpToTop);
        assert_eq!(handle_key_event(key(KeyCode::End, KeyModifiers::NONE)), Action::JumpToBottom);
        assert_eq!(handle_key_event(key(KeyCode::Char('G'), KeyModifiers::SHIFT)), Action::JumpToBottom);
    }

    #[test]
    fn test_wheel_sign_and_modifier() {
        assert_eq!(
            handle_mouse_event(mouse(MouseEventKind::ScrollDown, KeyModifiers::NONE)),
            Action::Wheel {
                delta_y: WHEEL_DELTA,
                ctrl: false,
                column: 4,
                row: 9
            }
        );
        assert_eq!(
            handle_mouse_event(mouse(MouseEventKind::ScrollUp, KeyModifiers::CONTROL)),
            Action::Wheel {
                delta_y: -WHEEL_DELTA,
                ctrl: true,
                column: 4,
                row: 9
            }
        );
    }

    #[test]
    fn test_drag_sequence() {
        assert_eq!(
            handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), KeyModifiers::NONE)),
            Action::Press { column: 4, row: 9 }
        );
        assert_eq!(
            handle_mouse_event(mouse(MouseEventKind::Up(MouseButton::Left), KeyModifiers::NONE)),
            Action::Release
        );
        assert_eq!(
            handle_mouse_event(mouse(MouseEventKind::Moved, KeyModifiers::NONE)),
            Action::None
        );
    }
}
