//! # Controller Frame Module
//!
//! The immutable per-tick snapshot of a controller and the fixed set of logical
//! controls that can carry a mapping.
//!
//! ## Button Bitmask
//!
//! Digital buttons use the XInput `wButtons` layout on every platform, so the
//! edge detector and the settings format are backend independent.
//!
//! | Control | Mask |
//! |---------|------|
//! | D-Pad Up | 0x0001 |
//! | D-Pad Down | 0x0002 |
//! | D-Pad Left | 0x0004 |
//! | D-Pad Right | 0x0008 |
//! | Start | 0x0010 |
//! | Back | 0x0020 |
//! | Left Stick Click | 0x0040 |
//! | Right Stick Click | 0x0080 |
//! | LB | 0x0100 |
//! | RB | 0x0200 |
//! | A | 0x1000 |
//! | B | 0x2000 |
//! | X | 0x4000 |
//! | Y | 0x8000 |
//!
//! ## Analog Ranges
//!
//! - Sticks: -32768 to 32767, Y axes positive when pushed up
//! - Triggers: 0 (released) to 255 (fully pressed)

use std::fmt;

/// Button masks in the XInput `wButtons` layout.
pub mod buttons {
    pub const DPAD_UP: u16 = 0x0001;
    pub const DPAD_DOWN: u16 = 0x0002;
    pub const DPAD_LEFT: u16 = 0x0004;
    pub const DPAD_RIGHT: u16 = 0x0008;
    pub const START: u16 = 0x0010;
    pub const BACK: u16 = 0x0020;
    pub const LEFT_THUMB: u16 = 0x0040;
    pub const RIGHT_THUMB: u16 = 0x0080;
    pub const LEFT_SHOULDER: u16 = 0x0100;
    pub const RIGHT_SHOULDER: u16 = 0x0200;
    pub const A: u16 = 0x1000;
    pub const B: u16 = 0x2000;
    pub const X: u16 = 0x4000;
    pub const Y: u16 = 0x8000;
}

/// Largest stick deflection.
pub const STICK_MAX: i16 = i16::MAX;

/// Fully pressed trigger.
pub const TRIGGER_MAX: u8 = u8::MAX;

/// Trigger magnitude above which an analog trigger counts as pressed (~15% pull).
pub const TRIGGER_THRESHOLD: u8 = 40;

/// Snapshot of one controller, produced once per tick by a
/// [`DevicePoller`](super::poller::DevicePoller).
///
/// # Examples
///
/// ```
/// use padmouse::controller::frame::ControllerFrame;
///
/// let frame = ControllerFrame { right_trigger: 200, ..ControllerFrame::default() };
/// assert!(frame.right_trigger_pressed());
/// assert!(!frame.left_trigger_pressed());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControllerFrame {
    /// Backend packet counter. Informational only.
    pub packet_number: u32,
    /// Digital buttons, see [`buttons`].
    pub buttons: u16,
    pub left_trigger: u8,
    pub right_trigger: u8,
    pub left_stick_x: i16,
    pub left_stick_y: i16,
    pub right_stick_x: i16,
    pub right_stick_y: i16,
}

impl ControllerFrame {
    /// Left trigger past [`TRIGGER_THRESHOLD`].
    #[must_use]
    pub fn left_trigger_pressed(&self) -> bool {
        self.left_trigger > TRIGGER_THRESHOLD
    }

    /// Right trigger past [`TRIGGER_THRESHOLD`].
    #[must_use]
    pub fn right_trigger_pressed(&self) -> bool {
        self.right_trigger > TRIGGER_THRESHOLD
    }
}

/// Where a control's boolean state comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlSource {
    /// A bit of [`ControllerFrame::buttons`].
    Button(u16),
    /// The left analog trigger compared against [`TRIGGER_THRESHOLD`].
    LeftTrigger,
    /// The right analog trigger compared against [`TRIGGER_THRESHOLD`].
    RightTrigger,
}

/// Logical controls that can be bound to an action.
///
/// The declaration order is the order edges are reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Control {
    A,
    B,
    X,
    Y,
    LeftBumper,
    RightBumper,
    LeftTrigger,
    RightTrigger,
    Back,
    Start,
    LeftStickClick,
    RightStickClick,
    DPadUp,
    DPadDown,
    DPadLeft,
    DPadRight,
}

impl Control {
    /// Number of mappable controls.
    pub const COUNT: usize = 16;

    /// All controls in reporting order.
    pub const ALL: [Control; Control::COUNT] = [
        Control::A,
        Control::B,
        Control::X,
        Control::Y,
        Control::LeftBumper,
        Control::RightBumper,
        Control::LeftTrigger,
        Control::RightTrigger,
        Control::Back,
        Control::Start,
        Control::LeftStickClick,
        Control::RightStickClick,
        Control::DPadUp,
        Control::DPadDown,
        Control::DPadLeft,
        Control::DPadRight,
    ];

    /// Dense index of this control, matching its position in [`Control::ALL`].
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub fn source(self) -> ControlSource {
        match self {
            Control::A => ControlSource::Button(buttons::A),
            Control::B => ControlSource::Button(buttons::B),
            Control::X => ControlSource::Button(buttons::X),
            Control::Y => ControlSource::Button(buttons::Y),
            Control::LeftBumper => ControlSource::Button(buttons::LEFT_SHOULDER),
            Control::RightBumper => ControlSource::Button(buttons::RIGHT_SHOULDER),
            Control::LeftTrigger => ControlSource::LeftTrigger,
            Control::RightTrigger => ControlSource::RightTrigger,
            Control::Back => ControlSource::Button(buttons::BACK),
            Control::Start => ControlSource::Button(buttons::START),
            Control::LeftStickClick => ControlSource::Button(buttons::LEFT_THUMB),
            Control::RightStickClick => ControlSource::Button(buttons::RIGHT_THUMB),
            Control::DPadUp => ControlSource::Button(buttons::DPAD_UP),
            Control::DPadDown => ControlSource::Button(buttons::DPAD_DOWN),
            Control::DPadLeft => ControlSource::Button(buttons::DPAD_LEFT),
            Control::DPadRight => ControlSource::Button(buttons::DPAD_RIGHT),
        }
    }

    /// Short name used in the persisted settings keys (`map<Name>`).
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Control::A => "A",
            Control::B => "B",
            Control::X => "X",
            Control::Y => "Y",
            Control::LeftBumper => "LB",
            Control::RightBumper => "RB",
            Control::LeftTrigger => "LT",
            Control::RightTrigger => "RT",
            Control::Back => "Back",
            Control::Start => "Start",
            Control::LeftStickClick => "LStick",
            Control::RightStickClick => "RStick",
            Control::DPadUp => "DPadUp",
            Control::DPadDown => "DPadDown",
            Control::DPadLeft => "DPadLeft",
            Control::DPadRight => "DPadRight",
        }
    }

    /// Key of this control's mapping in the persisted settings record.
    ///
    /// ```
    /// use padmouse::controller::frame::Control;
    ///
    /// assert_eq!(Control::LeftStickClick.settings_key(), "mapLStick");
    /// ```
    #[must_use]
    pub fn settings_key(self) -> String {
        format!("map{}", self.name())
    }
}

impl fmt::Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_frame_is_neutral() {
        let frame = ControllerFrame::default();
        assert_eq!(frame.buttons, 0);
        assert_eq!(frame.left_stick_x, 0);
        assert_eq!(frame.right_stick_y, 0);
        assert!(!frame.left_trigger_pressed());
        assert!(!frame.right_trigger_pressed());
    }

    #[test]
    fn test_trigger_threshold_is_exclusive() {
        let mut frame = ControllerFrame::default();
        frame.left_trigger = TRIGGER_THRESHOLD;
        assert!(!frame.left_trigger_pressed());

        frame.left_trigger = TRIGGER_THRESHOLD + 1;
        assert!(frame.left_trigger_pressed());

        frame.right_trigger = TRIGGER_MAX;
        assert!(frame.right_trigger_pressed());
    }

    #[test]
    fn test_all_controls_in_index_order() {
        for (i, control) in Control::ALL.iter().enumerate() {
            assert_eq!(control.index(), i);
        }
    }

    #[test]
    fn test_button_masks_are_distinct() {
        let mut seen = 0u16;
        for control in Control::ALL {
            if let ControlSource::Button(mask) = control.source() {
                assert_eq!(mask.count_ones(), 1, "{} should map to one bit", control);
                assert_eq!(seen & mask, 0, "{} shares a bit", control);
                seen |= mask;
            }
        }
        // 14 digital controls, the two triggers are analog
        assert_eq!(seen.count_ones(), 14);
    }

    #[test]
    fn test_settings_keys() {
        assert_eq!(Control::A.settings_key(), "mapA");
        assert_eq!(Control::LeftBumper.settings_key(), "mapLB");
        assert_eq!(Control::RightTrigger.settings_key(), "mapRT");
        assert_eq!(Control::RightStickClick.settings_key(), "mapRStick");
        assert_eq!(Control::DPadRight.settings_key(), "mapDPadRight");
    }
}
