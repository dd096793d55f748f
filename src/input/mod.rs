//! # Input Module
//!
//! Synthetic pointer and keyboard output.
//!
//! This module handles:
//! - Virtual key codes and their display names
//! - The [`InputInjector`](injector::InputInjector) capability and its backends
//!   (uinput on Linux, `SendInput` on Windows, a no-op fallback elsewhere)

pub mod injector;
pub mod keycodes;

#[cfg(target_os = "linux")]
pub mod uinput;

#[cfg(windows)]
pub mod win32;

use tracing::warn;

use crate::error::Result;
use injector::{InputInjector, NoopInjector};

/// Opens the platform injector.
///
/// When the backend cannot be bound the engine keeps running and its output
/// is dropped.
pub fn open_platform_injector() -> Box<dyn InputInjector> {
    match platform_injector() {
        Ok(injector) => injector,
        Err(e) => {
            warn!("Input injector unavailable, output disabled: {}", e);
            Box::new(NoopInjector)
        }
    }
}

#[cfg(target_os = "linux")]
fn platform_injector() -> Result<Box<dyn InputInjector>> {
    Ok(Box::new(uinput::UinputInjector::open()?))
}

#[cfg(windows)]
fn platform_injector() -> Result<Box<dyn InputInjector>> {
    Ok(Box::new(win32::Win32Injector::new()))
}

#[cfg(not(any(target_os = "linux", windows)))]
fn platform_injector() -> Result<Box<dyn InputInjector>> {
    Err(crate::error::PadmouseError::Injector(
        "no input backend for this platform".to_string(),
    ))
}
