//! # Controller Module
//!
//! Game controller input handling.
//!
//! This module handles:
//! - The per-tick [`ControllerFrame`](frame::ControllerFrame) snapshot and the
//!   logical [`Control`](frame::Control) set
//! - The [`DevicePoller`](poller::DevicePoller) capability and its backends
//!   (evdev on Linux, XInput on Windows, a no-op fallback elsewhere)

pub mod frame;
pub mod poller;

#[cfg(target_os = "linux")]
pub mod evdev;

#[cfg(windows)]
pub mod xinput;

use tracing::warn;

use crate::error::Result;
use poller::{DevicePoller, NoopPoller};

/// Opens the platform controller backend.
///
/// When the backend cannot be bound the engine still runs, with a poller that
/// never reports a controller.
pub fn open_platform_poller() -> Box<dyn DevicePoller> {
    match platform_poller() {
        Ok(poller) => poller,
        Err(e) => {
            warn!("Controller backend unavailable, polling disabled: {}", e);
            Box::new(NoopPoller)
        }
    }
}

#[cfg(target_os = "linux")]
fn platform_poller() -> Result<Box<dyn DevicePoller>> {
    Ok(Box::new(evdev::EvdevPoller::open()?))
}

#[cfg(windows)]
fn platform_poller() -> Result<Box<dyn DevicePoller>> {
    Ok(Box::new(xinput::XInputPoller::new()))
}

#[cfg(not(any(target_os = "linux", windows)))]
fn platform_poller() -> Result<Box<dyn DevicePoller>> {
    Err(crate::error::PadmouseError::Controller(
        "no controller backend for this platform".to_string(),
    ))
}
