//! # Translation Engine
//!
//! Runs one poll → translate → status cycle per [`TranslationEngine::tick`].
//!
//! ## Tick
//!
//! 1. Poll slots `0..4` in order. The first slot that returns a frame is used
//!    for this tick; nothing binds the engine to a slot between ticks.
//! 2. No frame: the tick is [`EngineMode::Idle`]. Only status is emitted and
//!    the previous control states are left as they were.
//! 3. A frame: edges against the previous tick are dispatched through the
//!    mapping table, the left stick moves the cursor and the right stick
//!    scrolls. While settings are disabled none of that happens, but the
//!    previous control states are still updated so re-enabling does not
//!    replay held controls.
//! 4. Status is published at most once per status interval.
//!
//! The caller supplies the settings snapshot and a [`TickTime`], so a tick is
//! fully deterministic given its poller and injector. The status throttle runs
//! on the monotonic half of the tick time, so wall-clock jumps never stall or
//! flood status reports. The wall-clock half only stamps them.
//!
//! ## Known Limitation
//!
//! Dropping the engine does not release keys or buttons that a held control
//! pressed. A key held through shutdown stays down at the OS level until it
//! is pressed and released again.

pub mod axis;
pub mod dispatch;
pub mod edge;
pub mod status;

use chrono::{DateTime, Utc};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::controller::frame::ControllerFrame;
use crate::controller::poller::{DevicePoller, DEVICE_SLOTS};
use crate::input::injector::InputInjector;
use crate::settings::Settings;
use dispatch::dispatch;
use edge::{detect_edges, ControlStates};
use status::{Status, StatusSink};

/// Whether the last tick found a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineMode {
    Idle,
    Active { index: u8 },
}

impl EngineMode {
    #[must_use]
    pub fn active_index(self) -> Option<u8> {
        match self {
            EngineMode::Idle => None,
            EngineMode::Active { index } => Some(index),
        }
    }
}

/// Clock readings taken once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickTime {
    /// Drives the status throttle.
    pub monotonic: Instant,
    /// Stamped on published status.
    pub wall: DateTime<Utc>,
}

/// State carried from one tick to the next.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineState {
    pub previous: ControlStates,
    pub last_status_at: Option<Instant>,
}

/// Owns the device poller, the input injector and the status sink.
pub struct TranslationEngine {
    poller: Box<dyn DevicePoller>,
    injector: Box<dyn InputInjector>,
    sink: Box<dyn StatusSink>,
    status_interval: Duration,
    state: EngineState,
    mode: Option<EngineMode>,
}

impl TranslationEngine {
    pub fn new(
        poller: Box<dyn DevicePoller>,
        injector: Box<dyn InputInjector>,
        sink: Box<dyn StatusSink>,
        status_interval_ms: u64,
    ) -> Self {
        Self {
            poller,
            injector,
            sink,
            status_interval: Duration::from_millis(status_interval_ms),
            state: EngineState::default(),
            mode: None,
        }
    }

    #[must_use]
    pub fn state(&self) -> &EngineState {
        &self.state
    }

    /// Mode of the most recent tick, `Idle` before the first one.
    #[must_use]
    pub fn mode(&self) -> EngineMode {
        self.mode.unwrap_or(EngineMode::Idle)
    }

    /// Runs one tick against `settings`.
    pub fn tick(&mut self, settings: &Settings, now: TickTime) -> EngineMode {
        let mode = match self.find_controller() {
            Some((index, frame)) => {
                self.translate(&frame, settings);
                EngineMode::Active { index }
            }
            None => EngineMode::Idle,
        };

        self.log_transition(mode);
        self.emit_status(mode, settings, now);
        mode
    }

    fn find_controller(&mut self) -> Option<(u8, ControllerFrame)> {
        (0..DEVICE_SLOTS).find_map(|index| self.poller.poll(index).map(|frame| (index, frame)))
    }

    fn translate(&mut self, frame: &ControllerFrame, settings: &Settings) {
        let current = ControlStates::from_frame(frame);
        let previous = self.state.previous;
        self.state.previous = current;

        if current.buttons != previous.buttons {
            debug!("Buttons changed: 0x{:04X} -> 0x{:04X}", previous.buttons, current.buttons);
        }

        if !settings.enabled {
            return;
        }

        for edge in detect_edges(&previous, &current) {
            debug!("{} {}", edge.control, if edge.is_down { "down" } else { "up" });
            dispatch(edge, &settings.mappings, &mut *self.injector);
        }

        let (dx, dy) = axis::cursor_delta(frame, settings);
        if dx != 0 || dy != 0 {
            // Relative move: read the cursor, offset it, write it back
            if let Some(position) = self.injector.cursor_position() {
                self.injector.move_cursor_to(position.offset(dx, dy));
            }
        }

        if let Some(amount) = axis::scroll_delta(frame, settings) {
            self.injector.scroll(amount);
        }
    }

    fn log_transition(&mut self, mode: EngineMode) {
        if self.mode == Some(mode) {
            return;
        }

        match mode {
            EngineMode::Idle => warn!("No controller found"),
            EngineMode::Active { index } => info!("Controller connected at index {}", index),
        }
        self.mode = Some(mode);
    }

    fn emit_status(&mut self, mode: EngineMode, settings: &Settings, now: TickTime) {
        let due = match self.state.last_status_at {
            None => true,
            Some(last) => now.monotonic.saturating_duration_since(last) >= self.status_interval,
        };
        if !due {
            return;
        }

        self.state.last_status_at = Some(now.monotonic);
        self.sink.publish(Status {
            connected: mode != EngineMode::Idle,
            enabled: settings.enabled,
            active_index: mode.active_index(),
            timestamp: now.wall.timestamp_millis(),
        });
    }
}
