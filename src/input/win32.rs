//! # Win32 Injector
//!
//! Reads and sets the cursor with `GetCursorPos` / `SetCursorPos` and sends
//! button, wheel and key events with `SendInput`.

use tracing::debug;
use windows::Win32::Foundation::POINT;
use windows::Win32::UI::Input::KeyboardAndMouse::{
    SendInput, INPUT, INPUT_0, INPUT_KEYBOARD, INPUT_MOUSE, KEYBDINPUT, KEYBD_EVENT_FLAGS,
    KEYEVENTF_KEYUP, MOUSEEVENTF_LEFTDOWN, MOUSEEVENTF_LEFTUP, MOUSEEVENTF_MIDDLEDOWN,
    MOUSEEVENTF_MIDDLEUP, MOUSEEVENTF_RIGHTDOWN, MOUSEEVENTF_RIGHTUP, MOUSEEVENTF_WHEEL,
    MOUSEINPUT, MOUSE_EVENT_FLAGS, VIRTUAL_KEY,
};
use windows::Win32::UI::WindowsAndMessaging::{GetCursorPos, SetCursorPos};

use super::injector::{InputInjector, MouseButton, Point};
use super::keycodes::VirtualKeyCode;

/// Input injector backed by user32.
#[derive(Debug, Default)]
pub struct Win32Injector;

impl Win32Injector {
    pub fn new() -> Self {
        Self
    }

    fn send(&self, input: INPUT) {
        // SAFETY: the slice holds one fully initialized INPUT of the size passed
        let sent = unsafe { SendInput(&[input], std::mem::size_of::<INPUT>() as i32) };
        if sent != 1 {
            debug!("SendInput rejected the event");
        }
    }

    fn send_mouse(&self, flags: MOUSE_EVENT_FLAGS, data: i32) {
        self.send(INPUT {
            r#type: INPUT_MOUSE,
            Anonymous: INPUT_0 {
                mi: MOUSEINPUT {
                    dx: 0,
                    dy: 0,
                    mouseData: data,
                    dwFlags: flags,
                    time: 0,
                    dwExtraInfo: 0,
                },
            },
        });
    }
}

impl InputInjector for Win32Injector {
    fn cursor_position(&mut self) -> Option<Point> {
        let mut point = POINT::default();
        // SAFETY: `point` is a valid, writable POINT
        match unsafe { GetCursorPos(&mut point) } {
            Ok(()) => Some(Point::new(point.x, point.y)),
            Err(e) => {
                debug!("GetCursorPos failed: {}", e);
                None
            }
        }
    }

    fn move_cursor_to(&mut self, position: Point) {
        // SAFETY: plain value arguments
        if let Err(e) = unsafe { SetCursorPos(position.x, position.y) } {
            debug!("SetCursorPos failed: {}", e);
        }
    }

    fn mouse_down(&mut self, button: MouseButton) {
        let flags = match button {
            MouseButton::Left => MOUSEEVENTF_LEFTDOWN,
            MouseButton::Right => MOUSEEVENTF_RIGHTDOWN,
            MouseButton::Middle => MOUSEEVENTF_MIDDLEDOWN,
        };
        self.send_mouse(flags, 0);
    }

    fn mouse_up(&mut self, button: MouseButton) {
        let flags = match button {
            MouseButton::Left => MOUSEEVENTF_LEFTUP,
            MouseButton::Right => MOUSEEVENTF_RIGHTUP,
            MouseButton::Middle => MOUSEEVENTF_MIDDLEUP,
        };
        self.send_mouse(flags, 0);
    }

    fn scroll(&mut self, amount: i32) {
        self.send_mouse(MOUSEEVENTF_WHEEL, amount);
    }

    fn set_key_state(&mut self, key: VirtualKeyCode, down: bool) {
        let flags = if down { KEYBD_EVENT_FLAGS(0) } else { KEYEVENTF_KEYUP };
        self.send(INPUT {
            r#type: INPUT_KEYBOARD,
            Anonymous: INPUT_0 {
                ki: KEYBDINPUT {
                    wVk: VIRTUAL_KEY(key.code()),
                    wScan: 0,
                    dwFlags: flags,
                    time: 0,
                    dwExtraInfo: 0,
                },
            },
        });
    }

    fn backend(&self) -> &'static str {
        "win32"
    }
}
