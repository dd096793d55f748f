//! # uinput Injector
//!
//! Creates a virtual pointer/keyboard through `/dev/uinput` and emits
//! relative motion, wheel, button and key events on it.
//!
//! uinput is relative-only, so the absolute cursor position cannot be read
//! back. The injector keeps a virtual cursor that starts at the origin:
//! [`cursor_position`](InputInjector::cursor_position) returns it and
//! [`move_cursor_to`](InputInjector::move_cursor_to) emits the difference.
//! The resulting on-screen motion is identical to an absolute read-modify-write.
//!
//! Wheel amounts use the Windows convention (120 per notch). They are sent as
//! `REL_WHEEL_HI_RES`, with whole notches also reported on `REL_WHEEL` for
//! clients that ignore high-resolution scrolling.

use evdev::uinput::{VirtualDevice, VirtualDeviceBuilder};
use evdev::{AttributeSet, EventType, InputEvent, Key, RelativeAxisType};
use tracing::{debug, info};

use super::injector::{InputInjector, MouseButton, Point};
use super::keycodes::VirtualKeyCode;
use crate::error::{PadmouseError, Result};

/// Name of the virtual device as shown by the input stack
const DEVICE_NAME: &str = "padmouse virtual input";

/// Wheel units per notch
const WHEEL_DELTA: i32 = 120;

/// Virtual key codes and their evdev keys.
const KEY_TABLE: &[(u16, Key)] = &[
    (0x08, Key::KEY_BACKSPACE),
    (0x09, Key::KEY_TAB),
    (0x0D, Key::KEY_ENTER),
    (0x10, Key::KEY_LEFTSHIFT),
    (0x11, Key::KEY_LEFTCTRL),
    (0x12, Key::KEY_LEFTALT),
    (0x13, Key::KEY_PAUSE),
    (0x14, Key::KEY_CAPSLOCK),
    (0x1B, Key::KEY_ESC),
    (0x20, Key::KEY_SPACE),
    (0x21, Key::KEY_PAGEUP),
    (0x22, Key::KEY_PAGEDOWN),
    (0x23, Key::KEY_END),
    (0x24, Key::KEY_HOME),
    (0x25, Key::KEY_LEFT),
    (0x26, Key::KEY_UP),
    (0x27, Key::KEY_RIGHT),
    (0x28, Key::KEY_DOWN),
    (0x2C, Key::KEY_SYSRQ),
    (0x2D, Key::KEY_INSERT),
    (0x2E, Key::KEY_DELETE),
    (0x2F, Key::KEY_HELP),
    (0x30, Key::KEY_0),
    (0x31, Key::KEY_1),
    (0x32, Key::KEY_2),
    (0x33, Key::KEY_3),
    (0x34, Key::KEY_4),
    (0x35, Key::KEY_5),
    (0x36, Key::KEY_6),
    (0x37, Key::KEY_7),
    (0x38, Key::KEY_8),
    (0x39, Key::KEY_9),
    (0x41, Key::KEY_A),
    (0x42, Key::KEY_B),
    (0x43, Key::KEY_C),
    (0x44, Key::KEY_D),
    (0x45, Key::KEY_E),
    (0x46, Key::KEY_F),
    (0x47, Key::KEY_G),
    (0x48, Key::KEY_H),
    (0x49, Key::KEY_I),
    (0x4A, Key::KEY_J),
    (0x4B, Key::KEY_K),
    (0x4C, Key::KEY_L),
    (0x4D, Key::KEY_M),
    (0x4E, Key::KEY_N),
    (0x4F, Key::KEY_O),
    (0x50, Key::KEY_P),
    (0x51, Key::KEY_Q),
    (0x52, Key::KEY_R),
    (0x53, Key::KEY_S),
    (0x54, Key::KEY_T),
    (0x55, Key::KEY_U),
    (0x56, Key::KEY_V),
    (0x57, Key::KEY_W),
    (0x58, Key::KEY_X),
    (0x59, Key::KEY_Y),
    (0x5A, Key::KEY_Z),
    (0x5B, Key::KEY_LEFTMETA),
    (0x5C, Key::KEY_RIGHTMETA),
    (0x5D, Key::KEY_COMPOSE),
    (0x5F, Key::KEY_SLEEP),
    (0x60, Key::KEY_KP0),
    (0x61, Key::KEY_KP1),
    (0x62, Key::KEY_KP2),
    (0x63, Key::KEY_KP3),
    (0x64, Key::KEY_KP4),
    (0x65, Key::KEY_KP5),
    (0x66, Key::KEY_KP6),
    (0x67, Key::KEY_KP7),
    (0x68, Key::KEY_KP8),
    (0x69, Key::KEY_KP9),
    (0x6A, Key::KEY_KPASTERISK),
    (0x6B, Key::KEY_KPPLUS),
    (0x6D, Key::KEY_KPMINUS),
    (0x6E, Key::KEY_KPDOT),
    (0x6F, Key::KEY_KPSLASH),
    (0x70, Key::KEY_F1),
    (0x71, Key::KEY_F2),
    (0x72, Key::KEY_F3),
    (0x73, Key::KEY_F4),
    (0x74, Key::KEY_F5),
    (0x75, Key::KEY_F6),
    (0x76, Key::KEY_F7),
    (0x77, Key::KEY_F8),
    (0x78, Key::KEY_F9),
    (0x79, Key::KEY_F10),
    (0x7A, Key::KEY_F11),
    (0x7B, Key::KEY_F12),
    (0x90, Key::KEY_NUMLOCK),
    (0x91, Key::KEY_SCROLLLOCK),
    (0xA0, Key::KEY_LEFTSHIFT),
    (0xA1, Key::KEY_RIGHTSHIFT),
    (0xA2, Key::KEY_LEFTCTRL),
    (0xA3, Key::KEY_RIGHTCTRL),
    (0xA4, Key::KEY_LEFTALT),
    (0xA5, Key::KEY_RIGHTALT),
    (0xBA, Key::KEY_SEMICOLON),
    (0xBB, Key::KEY_EQUAL),
    (0xBC, Key::KEY_COMMA),
    (0xBD, Key::KEY_MINUS),
    (0xBE, Key::KEY_DOT),
    (0xBF, Key::KEY_SLASH),
    (0xC0, Key::KEY_GRAVE),
    (0xDB, Key::KEY_LEFTBRACE),
    (0xDC, Key::KEY_BACKSLASH),
    (0xDD, Key::KEY_RIGHTBRACE),
    (0xDE, Key::KEY_APOSTROPHE),
];

/// Translates a virtual key code to the evdev key emitted for it.
fn evdev_key(key: VirtualKeyCode) -> Option<Key> {
    KEY_TABLE
        .iter()
        .find(|(code, _)| *code == key.code())
        .map(|(_, evdev_key)| *evdev_key)
}

fn button_key(button: MouseButton) -> Key {
    match button {
        MouseButton::Left => Key::BTN_LEFT,
        MouseButton::Right => Key::BTN_RIGHT,
        MouseButton::Middle => Key::BTN_MIDDLE,
    }
}

fn key_event(key: Key, down: bool) -> InputEvent {
    InputEvent::new(EventType::KEY, key.code(), i32::from(down))
}

fn rel_event(axis: RelativeAxisType, value: i32) -> InputEvent {
    InputEvent::new(EventType::RELATIVE, axis.0, value)
}

/// Adds `amount` wheel units to `remainder`.
///
/// Returns the whole notches to report and the units carried to the next call.
fn accumulate_wheel(remainder: i32, amount: i32) -> (i32, i32) {
    let total = remainder.saturating_add(amount);
    (total / WHEEL_DELTA, total % WHEEL_DELTA)
}

/// Input injector backed by a uinput virtual device.
pub struct UinputInjector {
    device: VirtualDevice,
    cursor: Point,
    wheel_remainder: i32,
}

impl std::fmt::Debug for UinputInjector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UinputInjector")
            .field("cursor", &self.cursor)
            .finish_non_exhaustive()
    }
}

impl UinputInjector {
    /// Creates the virtual device.
    ///
    /// # Errors
    ///
    /// Returns `Injector` if `/dev/uinput` cannot be opened (usually missing
    /// permissions) or the device cannot be registered.
    pub fn open() -> Result<Self> {
        let mut keys = AttributeSet::<Key>::new();
        for (_, key) in KEY_TABLE {
            keys.insert(*key);
        }
        for button in [MouseButton::Left, MouseButton::Right, MouseButton::Middle] {
            keys.insert(button_key(button));
        }

        let mut axes = AttributeSet::<RelativeAxisType>::new();
        axes.insert(RelativeAxisType::REL_X);
        axes.insert(RelativeAxisType::REL_Y);
        axes.insert(RelativeAxisType::REL_WHEEL);
        axes.insert(RelativeAxisType::REL_WHEEL_HI_RES);

        let uinput_error = |e: std::io::Error| PadmouseError::Injector(format!("uinput: {}", e));
        let device = VirtualDeviceBuilder::new()
            .map_err(uinput_error)?
            .name(DEVICE_NAME)
            .with_keys(&keys)
            .map_err(uinput_error)?
            .with_relative_axes(&axes)
            .map_err(uinput_error)?
            .build()
            .map_err(uinput_error)?;

        info!("Created virtual input device '{}'", DEVICE_NAME);
        Ok(Self {
            device,
            cursor: Point::default(),
            wheel_remainder: 0,
        })
    }

    fn emit(&mut self, events: &[InputEvent]) {
        if let Err(e) = self.device.emit(events) {
            debug!("Failed to emit {} input events: {}", events.len(), e);
        }
    }
}

impl InputInjector for UinputInjector {
    fn cursor_position(&mut self) -> Option<Point> {
        Some(self.cursor)
    }

    fn move_cursor_to(&mut self, position: Point) {
        let dx = position.x.saturating_sub(self.cursor.x);
        let dy = position.y.saturating_sub(self.cursor.y);
        self.cursor = position;
        if dx != 0 || dy != 0 {
            self.emit(&[
                rel_event(RelativeAxisType::REL_X, dx),
                rel_event(RelativeAxisType::REL_Y, dy),
            ]);
        }
    }

    fn mouse_down(&mut self, button: MouseButton) {
        self.emit(&[key_event(button_key(button), true)]);
    }

    fn mouse_up(&mut self, button: MouseButton) {
        self.emit(&[key_event(button_key(button), false)]);
    }

    fn scroll(&mut self, amount: i32) {
        let (notches, remainder) = accumulate_wheel(self.wheel_remainder, amount);
        self.wheel_remainder = remainder;

        let mut events = vec![rel_event(RelativeAxisType::REL_WHEEL_HI_RES, amount)];
        if notches != 0 {
            events.push(rel_event(RelativeAxisType::REL_WHEEL, notches));
        }
        self.emit(&events);
    }

    fn set_key_state(&mut self, key: VirtualKeyCode, down: bool) {
        match evdev_key(key) {
            Some(evdev_key) => self.emit(&[key_event(evdev_key, down)]),
            None => debug!("No evdev key for virtual key {:#04x}", key.code()),
        }
    }

    fn backend(&self) -> &'static str {
        "uinput"
    }
}
