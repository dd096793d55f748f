//! # XInput Controller Backend
//!
//! Polls Xbox-compatible controllers through `XInputGetState`. XInput already
//! reports frames in the layout of [`ControllerFrame`], so no rescaling happens.

use windows::Win32::UI::Input::XboxController::{XInputGetState, XINPUT_STATE};

use super::frame::ControllerFrame;
use super::poller::DevicePoller;

/// `ERROR_SUCCESS` returned by `XInputGetState` for a connected slot
const ERROR_SUCCESS: u32 = 0;

/// Controller poller backed by XInput.
#[derive(Debug, Default)]
pub struct XInputPoller;

impl XInputPoller {
    pub fn new() -> Self {
        Self
    }
}

impl DevicePoller for XInputPoller {
    fn poll(&mut self, index: u8) -> Option<ControllerFrame> {
        let mut state = XINPUT_STATE::default();
        // SAFETY: `state` is a valid, writable XINPUT_STATE for the call's duration
        let result = unsafe { XInputGetState(u32::from(index), &mut state) };
        if result != ERROR_SUCCESS {
            // 1167 (ERROR_DEVICE_NOT_CONNECTED) is the normal empty-slot answer
            return None;
        }

        let pad = state.Gamepad;
        Some(ControllerFrame {
            packet_number: state.dwPacketNumber,
            buttons: pad.wButtons.0,
            left_trigger: pad.bLeftTrigger,
            right_trigger: pad.bRightTrigger,
            left_stick_x: pad.sThumbLX,
            left_stick_y: pad.sThumbLY,
            right_stick_x: pad.sThumbRX,
            right_stick_y: pad.sThumbRY,
        })
    }

    fn backend(&self) -> &'static str {
        "xinput"
    }
}
