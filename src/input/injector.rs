//! Trait abstraction for synthetic pointer and keyboard input
//!
//! Every call is fire-and-forget: backends log their own failures and the
//! caller never sees them.

use super::keycodes::VirtualKeyCode;

/// Mouse buttons that can be pressed by a mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Screen position in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns this point moved by `(dx, dy)`.
    #[must_use]
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }
}

/// Issues cursor moves and synthetic mouse/key events.
#[cfg_attr(test, mockall::automock)]
pub trait InputInjector {
    /// Current cursor position, `None` if it cannot be read.
    fn cursor_position(&mut self) -> Option<Point>;

    fn move_cursor_to(&mut self, position: Point);

    fn mouse_down(&mut self, button: MouseButton);

    fn mouse_up(&mut self, button: MouseButton);

    /// Scrolls the wheel; positive scrolls up.
    fn scroll(&mut self, amount: i32);

    fn set_key_state(&mut self, key: VirtualKeyCode, down: bool);

    /// Whether a real backend is bound.
    fn is_available(&self) -> bool {
        true
    }

    /// Backend name for logs.
    fn backend(&self) -> &'static str;
}

/// Injector used when no platform backend could be opened.
#[derive(Debug, Default)]
pub struct NoopInjector;

impl InputInjector for NoopInjector {
    fn cursor_position(&mut self) -> Option<Point> {
        None
    }

    fn move_cursor_to(&mut self, _position: Point) {}

    fn mouse_down(&mut self, _button: MouseButton) {}

    fn mouse_up(&mut self, _button: MouseButton) {}

    fn scroll(&mut self, _amount: i32) {}

    fn set_key_state(&mut self, _key: VirtualKeyCode, _down: bool) {}

    fn is_available(&self) -> bool {
        false
    }

    fn backend(&self) -> &'static str {
        "none"
    }
}
