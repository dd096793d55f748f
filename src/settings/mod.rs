//! # Settings Module
//!
//! User-editable sensitivity values and the control mapping table.
//!
//! Settings are persisted as a flat JSON record with camelCase keys:
//!
//! ```json
//! {
//!   "sensitivityX": 50,
//!   "sensitivityY": 50,
//!   "scrollSpeed": 50,
//!   "deadzone": 5000,
//!   "enabled": true,
//!   "mapA": "left",
//!   "mapB": "right",
//!   "mapRT": "combo:17,67"
//! }
//! ```
//!
//! Every field is validated on its own. A missing or malformed field keeps its
//! default value, so one bad entry never discards the rest of the record.

pub mod store;
pub mod update;

pub use store::SettingsStore;
pub use update::{SettingsHandle, SettingsUpdate};

use serde_json::{Map, Value};
use tracing::warn;

use crate::controller::frame::{Control, STICK_MAX};
use crate::error::PadmouseError;
use crate::input::injector::MouseButton;
use crate::mapping::{ActionSpec, MappingTable};

/// Flat key/value form of [`Settings`].
pub type SettingsRecord = Map<String, Value>;

const KEY_SENSITIVITY_X: &str = "sensitivityX";
const KEY_SENSITIVITY_Y: &str = "sensitivityY";
const KEY_SCROLL_SPEED: &str = "scrollSpeed";
const KEY_DEADZONE: &str = "deadzone";
const KEY_ENABLED: &str = "enabled";

/// Default cursor sensitivity on both axes
pub const DEFAULT_SENSITIVITY: u32 = 50;
/// Default scroll speed
pub const DEFAULT_SCROLL_SPEED: u32 = 50;
/// Default stick deadzone in raw axis units
pub const DEFAULT_DEADZONE: u16 = 5000;
/// Largest accepted sensitivity or scroll speed
pub const MAX_SPEED: u32 = 10_000;

/// Snapshot of the user settings read by the engine each tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub sensitivity_x: u32,
    pub sensitivity_y: u32,
    /// `0` disables scrolling.
    pub scroll_speed: u32,
    /// Always below [`STICK_MAX`].
    pub deadzone: u16,
    pub enabled: bool,
    pub mappings: MappingTable,
}

impl Default for Settings {
    fn default() -> Self {
        let mappings = MappingTable::default()
            .with(Control::A, ActionSpec::MouseClick(MouseButton::Left))
            .with(Control::B, ActionSpec::MouseClick(MouseButton::Right));

        Self {
            sensitivity_x: DEFAULT_SENSITIVITY,
            sensitivity_y: DEFAULT_SENSITIVITY,
            scroll_speed: DEFAULT_SCROLL_SPEED,
            deadzone: DEFAULT_DEADZONE,
            enabled: true,
            mappings,
        }
    }
}

impl Settings {
    /// Builds settings from a persisted record, filling gaps from the defaults.
    #[must_use]
    pub fn from_record(record: &SettingsRecord) -> Self {
        Self::default().merged(&SettingsPatch::from_record(record))
    }

    /// Encodes every field, including `none` mappings.
    #[must_use]
    pub fn to_record(&self) -> SettingsRecord {
        let mut record = SettingsRecord::new();
        record.insert(KEY_SENSITIVITY_X.into(), self.sensitivity_x.into());
        record.insert(KEY_SENSITIVITY_Y.into(), self.sensitivity_y.into());
        record.insert(KEY_SCROLL_SPEED.into(), self.scroll_speed.into());
        record.insert(KEY_DEADZONE.into(), self.deadzone.into());
        record.insert(KEY_ENABLED.into(), self.enabled.into());
        for (control, action) in self.mappings.iter() {
            record.insert(control.settings_key(), action.to_string().into());
        }
        record
    }

    /// Returns a copy with every field present in `patch` replaced.
    #[must_use]
    pub fn merged(&self, patch: &SettingsPatch) -> Self {
        let mut merged = self.clone();
        merged.apply(patch);
        merged
    }

    pub fn apply(&mut self, patch: &SettingsPatch) {
        if let Some(value) = patch.sensitivity_x {
            self.sensitivity_x = value;
        }
        if let Some(value) = patch.sensitivity_y {
            self.sensitivity_y = value;
        }
        if let Some(value) = patch.scroll_speed {
            self.scroll_speed = value;
        }
        if let Some(value) = patch.deadzone {
            self.deadzone = value;
        }
        if let Some(value) = patch.enabled {
            self.enabled = value;
        }
        for (control, action) in &patch.mappings {
            self.mappings.set(*control, action.clone());
        }
    }
}

/// Partial settings update. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsPatch {
    pub sensitivity_x: Option<u32>,
    pub sensitivity_y: Option<u32>,
    pub scroll_speed: Option<u32>,
    pub deadzone: Option<u16>,
    pub enabled: Option<bool>,
    pub mappings: Vec<(Control, ActionSpec)>,
}

impl SettingsPatch {
    /// Reads the fields present in `record`.
    ///
    /// Invalid fields are dropped with a warning. Unknown keys are ignored.
    #[must_use]
    pub fn from_record(record: &SettingsRecord) -> Self {
        let mut patch = Self {
            sensitivity_x: read_field(record, KEY_SENSITIVITY_X, as_speed),
            sensitivity_y: read_field(record, KEY_SENSITIVITY_Y, as_speed),
            scroll_speed: read_field(record, KEY_SCROLL_SPEED, as_speed),
            deadzone: read_field(record, KEY_DEADZONE, as_deadzone),
            enabled: read_field(record, KEY_ENABLED, Value::as_bool),
            mappings: Vec::new(),
        };

        for control in Control::ALL {
            let key = control.settings_key();
            let Some(value) = record.get(&key) else {
                continue;
            };
            match value.as_str().map(str::parse::<ActionSpec>) {
                Some(Ok(action)) => patch.mappings.push((control, action)),
                Some(Err(e)) => warn!("Ignoring {}: {}", key, PadmouseError::from(e)),
                None => warn!("Ignoring {}: expected a string, got {}", key, value),
            }
        }

        patch
    }

    /// Patch that only sets one control's action.
    #[must_use]
    pub fn mapping(control: Control, action: ActionSpec) -> Self {
        Self {
            mappings: vec![(control, action)],
            ..Self::default()
        }
    }
}

fn read_field<T>(record: &SettingsRecord, key: &str, parse: impl Fn(&Value) -> Option<T>) -> Option<T> {
    let value = record.get(key)?;
    let parsed = parse(value);
    if parsed.is_none() {
        warn!("Ignoring invalid {} value: {}", key, value);
    }
    parsed
}

fn as_speed(value: &Value) -> Option<u32> {
    value
        .as_u64()
        .filter(|v| *v <= u64::from(MAX_SPEED))
        .and_then(|v| u32::try_from(v).ok())
}

fn as_deadzone(value: &Value) -> Option<u16> {
    value
        .as_u64()
        .filter(|v| *v < STICK_MAX as u64)
        .and_then(|v| u16::try_from(v).ok())
}
