//! # evdev Controller Backend
//!
//! Polls game controllers through the Linux evdev interface.
//!
//! ## Controller Detection
//!
//! All `/dev/input/event*` nodes are scanned in sorted order and every device
//! reporting both `BTN_SOUTH` and `ABS_X` is taken as a gamepad. The first four
//! become slots 0-3. While no slot holds an open device the directory is
//! rescanned at most every two seconds.
//!
//! ## State Reads
//!
//! Instead of consuming the event stream, each poll asks the kernel for the
//! current key and absolute-axis state (`EVIOCGKEY` / `EVIOCGABS`). That keeps
//! polling non-blocking and matches the snapshot semantics of XInput.
//!
//! ## Button Codes (EV_KEY)
//!
//! | evdev Code | Control |
//! |------------|---------|
//! | BTN_SOUTH | A |
//! | BTN_EAST | B |
//! | BTN_WEST | X |
//! | BTN_NORTH | Y |
//! | BTN_TL / BTN_TR | LB / RB |
//! | BTN_SELECT / BTN_START | Back / Start |
//! | BTN_THUMBL / BTN_THUMBR | Stick clicks |
//! | BTN_DPAD_* | D-Pad (when reported as keys) |
//! | BTN_TL2 / BTN_TR2 | Triggers, only when no analog trigger axis exists |
//!
//! ## Axis Codes (EV_ABS)
//!
//! | evdev Code | Input |
//! |------------|-------|
//! | ABS_X / ABS_Y | Left stick |
//! | ABS_RX / ABS_RY | Right stick |
//! | ABS_Z / ABS_RZ | Left / right trigger |
//! | ABS_HAT0X / ABS_HAT0Y | D-Pad |
//!
//! Axis values are rescaled from the device's reported range to the XInput
//! ranges, and the Y axes are flipped so that up is positive.

use evdev::{AbsoluteAxisType, AttributeSet, Device, Key};
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::frame::{buttons, ControllerFrame, TRIGGER_MAX};
use super::poller::{DevicePoller, DEVICE_SLOTS};
use crate::error::{PadmouseError, Result};

/// Directory holding the evdev nodes
const INPUT_DIR: &str = "/dev/input";

/// Minimum time between device scans while no controller is open
const RESCAN_INTERVAL: Duration = Duration::from_secs(2);

/// Digital buttons and their bit in the frame bitmask.
///
/// Face buttons follow the positional convention of the kernel gamepad API:
/// west is the left face button (X), north the top one (Y).
const BUTTON_KEYS: [(Key, u16); 14] = [
    (Key::BTN_SOUTH, buttons::A),
    (Key::BTN_EAST, buttons::B),
    (Key::BTN_WEST, buttons::X),
    (Key::BTN_NORTH, buttons::Y),
    (Key::BTN_TL, buttons::LEFT_SHOULDER),
    (Key::BTN_TR, buttons::RIGHT_SHOULDER),
    (Key::BTN_SELECT, buttons::BACK),
    (Key::BTN_START, buttons::START),
    (Key::BTN_THUMBL, buttons::LEFT_THUMB),
    (Key::BTN_THUMBR, buttons::RIGHT_THUMB),
    (Key::BTN_DPAD_UP, buttons::DPAD_UP),
    (Key::BTN_DPAD_DOWN, buttons::DPAD_DOWN),
    (Key::BTN_DPAD_LEFT, buttons::DPAD_LEFT),
    (Key::BTN_DPAD_RIGHT, buttons::DPAD_RIGHT),
];

/// Current value and range of one absolute axis.
#[derive(Debug, Clone, Copy, Default)]
struct AxisReading {
    value: i32,
    minimum: i32,
    maximum: i32,
}

impl AxisReading {
    fn is_present(&self) -> bool {
        self.maximum > self.minimum
    }
}

/// An open gamepad bound to a slot.
struct Gamepad {
    device: Device,
    path: PathBuf,
    packet_number: u32,
    last_frame: ControllerFrame,
}

impl Gamepad {
    fn read_frame(&mut self) -> io::Result<ControllerFrame> {
        let keys = self.device.get_key_state()?;
        let abs = self.device.get_abs_state()?;
        let axis = |axis: AbsoluteAxisType| {
            let info = &abs[axis.0 as usize];
            AxisReading {
                value: info.value,
                minimum: info.minimum,
                maximum: info.maximum,
            }
        };

        let mut frame = ControllerFrame {
            packet_number: self.packet_number,
            buttons: button_mask(&keys),
            left_trigger: trigger_value(axis(AbsoluteAxisType::ABS_Z), keys.contains(Key::BTN_TL2)),
            right_trigger: trigger_value(axis(AbsoluteAxisType::ABS_RZ), keys.contains(Key::BTN_TR2)),
            left_stick_x: scale_stick(axis(AbsoluteAxisType::ABS_X)),
            left_stick_y: invert(scale_stick(axis(AbsoluteAxisType::ABS_Y))),
            right_stick_x: scale_stick(axis(AbsoluteAxisType::ABS_RX)),
            right_stick_y: invert(scale_stick(axis(AbsoluteAxisType::ABS_RY))),
        };
        frame.buttons |= hat_mask(
            axis(AbsoluteAxisType::ABS_HAT0X).value,
            axis(AbsoluteAxisType::ABS_HAT0Y).value,
        );

        // Mirror XInput: the packet number moves only when the state does
        let changed = ControllerFrame { packet_number: self.last_frame.packet_number, ..frame } != self.last_frame;
        if changed {
            self.packet_number = self.packet_number.wrapping_add(1);
            frame.packet_number = self.packet_number;
        }
        self.last_frame = frame;

        Ok(frame)
    }
}

/// Controller poller backed by evdev.
///
/// # Examples
///
/// ```no_run
/// use padmouse::controller::evdev::EvdevPoller;
/// use padmouse::controller::poller::DevicePoller;
///
/// let mut poller = EvdevPoller::open()?;
/// if let Some(frame) = poller.poll(0) {
///     println!("Buttons: {:#06x}", frame.buttons);
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct EvdevPoller {
    input_dir: PathBuf,
    slots: Vec<Option<Gamepad>>,
    last_scan: Option<Instant>,
}

impl std::fmt::Debug for EvdevPoller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvdevPoller")
            .field("input_dir", &self.input_dir)
            .field("connected", &self.connected())
            .finish_non_exhaustive()
    }
}

impl EvdevPoller {
    /// Opens the poller on `/dev/input` and binds the gamepads present now.
    ///
    /// Finding no gamepad is not an error; slots stay empty until a rescan
    /// finds one.
    ///
    /// # Errors
    ///
    /// Returns `Controller` if the input directory does not exist.
    pub fn open() -> Result<Self> {
        Self::open_dir(INPUT_DIR)
    }

    /// Opens the poller on a custom input directory.
    pub fn open_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let input_dir = dir.as_ref().to_path_buf();
        if !input_dir.is_dir() {
            return Err(PadmouseError::Controller(format!(
                "{} directory not found",
                input_dir.display()
            )));
        }

        let mut poller = Self {
            input_dir,
            slots: Vec::new(),
            last_scan: None,
        };
        poller.rescan();
        Ok(poller)
    }

    /// Number of slots holding an open gamepad.
    pub fn connected(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    fn rescan_due(&self) -> bool {
        self.slots.iter().all(Option::is_none)
            && self
                .last_scan
                .map_or(true, |at| at.elapsed() >= RESCAN_INTERVAL)
    }

    fn rescan(&mut self) {
        self.last_scan = Some(Instant::now());
        match discover(&self.input_dir) {
            Ok(found) => {
                for pad in &found {
                    info!("Found game controller at: {}", pad.path.display());
                }
                self.slots = found.into_iter().map(Some).collect();
            }
            Err(e) => {
                debug!("Controller scan failed: {}", e);
                self.slots.clear();
            }
        }
    }
}

impl DevicePoller for EvdevPoller {
    fn poll(&mut self, index: u8) -> Option<ControllerFrame> {
        if index == 0 && self.rescan_due() {
            self.rescan();
        }

        let slot = self.slots.get_mut(index as usize)?;
        let pad = slot.as_mut()?;

        match pad.read_frame() {
            Ok(frame) => Some(frame),
            Err(e) => {
                warn!("Controller at {} stopped responding: {}", pad.path.display(), e);
                *slot = None;
                None
            }
        }
    }

    fn backend(&self) -> &'static str {
        "evdev"
    }
}

/// Scans `dir` for gamepads, in path order, up to [`DEVICE_SLOTS`].
fn discover(dir: &Path) -> Result<Vec<Gamepad>> {
    let mut entries: Vec<_> = std::fs::read_dir(dir)
        .map_err(|e| PadmouseError::Controller(format!("Failed to read {}: {}", dir.display(), e)))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| PadmouseError::Controller(format!("Failed to read directory entry: {}", e)))?;

    // Sort entries for deterministic slot assignment
    entries.sort_by_key(|entry| entry.path());

    let mut found = Vec::new();
    for entry in entries {
        if found.len() >= DEVICE_SLOTS as usize {
            break;
        }

        let path = entry.path();
        let is_event_node = path
            .file_name()
            .map_or(false, |name| name.to_string_lossy().starts_with("event"));
        if !is_event_node {
            continue;
        }

        match Device::open(&path) {
            Ok(device) => {
                let id = device.input_id();
                debug!(
                    "Found input device: {} (vendor: 0x{:04x}, product: 0x{:04x})",
                    path.display(),
                    id.vendor(),
                    id.product()
                );

                if is_gamepad(&device) {
                    found.push(Gamepad {
                        device,
                        path,
                        packet_number: 0,
                        last_frame: ControllerFrame::default(),
                    });
                }
            }
            Err(e) => {
                // Permission denied or other errors - skip device
                debug!("Could not open {}: {}", path.display(), e);
            }
        }
    }

    Ok(found)
}

fn is_gamepad(device: &Device) -> bool {
    let has_face_button = device
        .supported_keys()
        .map_or(false, |keys| keys.contains(Key::BTN_SOUTH));
    let has_stick = device
        .supported_absolute_axes()
        .map_or(false, |axes| axes.contains(AbsoluteAxisType::ABS_X));
    has_face_button && has_stick
}

fn button_mask(keys: &AttributeSet<Key>) -> u16 {
    BUTTON_KEYS
        .iter()
        .filter(|(key, _)| keys.contains(*key))
        .fold(0, |mask, (_, bit)| mask | bit)
}

/// D-Pad bits from hat axes (-1 = left/up, 1 = right/down).
fn hat_mask(hat_x: i32, hat_y: i32) -> u16 {
    let mut mask = 0;
    if hat_x < 0 {
        mask |= buttons::DPAD_LEFT;
    } else if hat_x > 0 {
        mask |= buttons::DPAD_RIGHT;
    }
    if hat_y < 0 {
        mask |= buttons::DPAD_UP;
    } else if hat_y > 0 {
        mask |= buttons::DPAD_DOWN;
    }
    mask
}

/// Rescales an axis reading to -32768..=32767.
fn scale_stick(reading: AxisReading) -> i16 {
    if !reading.is_present() {
        return 0;
    }
    let span = f64::from(reading.maximum) - f64::from(reading.minimum);
    let t = (f64::from(reading.value.clamp(reading.minimum, reading.maximum)) - f64::from(reading.minimum)) / span;
    (t * 65535.0 - 32768.0).round() as i16
}

/// Rescales a trigger reading to 0..=255, falling back to the digital click.
fn trigger_value(reading: AxisReading, clicked: bool) -> u8 {
    if !reading.is_present() {
        return if clicked { TRIGGER_MAX } else { 0 };
    }
    let span = f64::from(reading.maximum) - f64::from(reading.minimum);
    let t = (f64::from(reading.value.clamp(reading.minimum, reading.maximum)) - f64::from(reading.minimum)) / span;
    (t * f64::from(TRIGGER_MAX)).round() as u8
}

fn invert(value: i16) -> i16 {
    value.checked_neg().unwrap_or(i16::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(value: i32, minimum: i32, maximum: i32) -> AxisReading {
        AxisReading { value, minimum, maximum }
    }

    #[test]
    fn test_scale_stick_xinput_range_is_identity() {
        for value in [-32768, -1000, 0, 1000, 32767] {
            assert_eq!(scale_stick(reading(value, -32768, 32767)), value as i16);
        }
    }

    #[test]
    fn test_scale_stick_byte_range() {
        // DualSense style 0-255 sticks
        assert_eq!(scale_stick(reading(0, 0, 255)), -32768);
        assert_eq!(scale_stick(reading(255, 0, 255)), 32767);
        assert!(scale_stick(reading(128, 0, 255)).abs() < 200);
    }

    #[test]
    fn test_scale_stick_clamps_out_of_range() {
        assert_eq!(scale_stick(reading(300, 0, 255)), 32767);
        assert_eq!(scale_stick(reading(-5, 0, 255)), -32768);
    }

    #[test]
    fn test_scale_stick_missing_axis() {
        assert_eq!(scale_stick(AxisReading::default()), 0);
    }

    #[test]
    fn test_trigger_value_analog() {
        assert_eq!(trigger_value(reading(0, 0, 1023), false), 0);
        assert_eq!(trigger_value(reading(1023, 0, 1023), false), 255);
        assert_eq!(trigger_value(reading(255, 0, 255), false), 255);
    }

    #[test]
    fn test_trigger_value_digital_fallback() {
        assert_eq!(trigger_value(AxisReading::default(), true), TRIGGER_MAX);
        assert_eq!(trigger_value(AxisReading::default(), false), 0);
    }

    #[test]
    fn test_invert_saturates() {
        assert_eq!(invert(i16::MIN), i16::MAX);
        assert_eq!(invert(100), -100);
        assert_eq!(invert(0), 0);
    }

    #[test]
    fn test_hat_mask() {
        assert_eq!(hat_mask(0, 0), 0);
        assert_eq!(hat_mask(-1, 0), buttons::DPAD_LEFT);
        assert_eq!(hat_mask(1, 0), buttons::DPAD_RIGHT);
        assert_eq!(hat_mask(0, -1), buttons::DPAD_UP);
        assert_eq!(hat_mask(1, 1), buttons::DPAD_RIGHT | buttons::DPAD_DOWN);
    }

    #[test]
    fn test_button_mask() {
        let mut keys = AttributeSet::<Key>::new();
        keys.insert(Key::BTN_SOUTH);
        keys.insert(Key::BTN_START);
        keys.insert(Key::BTN_TL2); // not part of the bitmask
        assert_eq!(button_mask(&keys), buttons::A | buttons::START);
    }

    #[test]
    fn test_open_missing_dir() {
        let result = EvdevPoller::open_dir("/nonexistent/input");
        assert!(matches!(result, Err(PadmouseError::Controller(_))));
    }

    #[test]
    fn test_empty_dir_has_no_slots() {
        let dir = tempfile::tempdir().unwrap();
        let mut poller = EvdevPoller::open_dir(dir.path()).unwrap();
        assert_eq!(poller.connected(), 0);
        for index in 0..DEVICE_SLOTS {
            assert!(poller.poll(index).is_none());
        }
    }

    // Integration test - only runs with real hardware
    #[test]
    #[ignore]
    fn test_poll_with_real_hardware() {
        // This test requires a connected game controller
        let mut poller = EvdevPoller::open().expect("input directory missing");
        assert!(poller.connected() > 0, "Should detect a connected controller");
        assert!(poller.poll(0).is_some());
    }
}
