//! Trait abstraction for controller polling to enable testing and degraded startup

use super::frame::ControllerFrame;

/// Number of controller slots queried each tick (XInput user indices 0-3).
pub const DEVICE_SLOTS: u8 = 4;

/// Reads the current state of a controller slot.
pub trait DevicePoller {
    /// Returns the slot's current frame, or `None` when nothing is connected there.
    fn poll(&mut self, index: u8) -> Option<ControllerFrame>;

    /// Whether a real backend is bound. A `false` here means every poll is `None`.
    fn is_available(&self) -> bool {
        true
    }

    /// Backend name for logs.
    fn backend(&self) -> &'static str;
}

/// Poller used when no platform backend could be opened.
#[derive(Debug, Default)]
pub struct NoopPoller;

impl DevicePoller for NoopPoller {
    fn poll(&mut self, _index: u8) -> Option<ControllerFrame> {
        None
    }

    fn is_available(&self) -> bool {
        false
    }

    fn backend(&self) -> &'static str {
        "none"
    }
}


#[cfg(test)]
mod tests {
    use super::mocks::ScriptedPoller;
    use super::*;

    #[test]
    fn test_noop_poller_never_connects() {
        let mut poller = NoopPoller;
        for index in 0..DEVICE_SLOTS {
            assert!(poller.poll(index).is_none());
        }
        assert!(!poller.is_available());
    }

    #[test]
    fn test_scripted_poller_slots() {
        let mut poller = ScriptedPoller::new();
        let frame = ControllerFrame { packet_number: 7, ..ControllerFrame::default() };

        poller.connect(2, frame);
        assert_eq!(poller.poll(0), None);
        assert_eq!(poller.poll(2), Some(frame));

        poller.disconnect(2);
        assert_eq!(poller.poll(2), None);
        assert_eq!(poller.take_polled(), vec![0, 2, 2]);
    }
}
