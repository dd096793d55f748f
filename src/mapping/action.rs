//! # Action Specs
//!
//! What a control does when it changes state, and the text form it is stored
//! in.
//!
//! ## Text Encoding
//!
//! | Text | Action |
//! |------|--------|
//! | `none` | Nothing |
//! | `left` / `right` / `middle` | Mouse button |
//! | `key:<code>` | One key, decimal virtual key code |
//! | `combo:<code>,<code>,...` | Keys pressed in list order |
//!
//! Text is parsed once, when settings are loaded or patched. The engine only
//! ever sees the parsed [`ActionSpec`].
//!
//! ```
//! use padmouse::input::keycodes::VirtualKeyCode;
//! use padmouse::mapping::action::ActionSpec;
//!
//! let copy: ActionSpec = "combo:17,67".parse()?;
//! assert_eq!(copy, ActionSpec::KeyCombo(vec![VirtualKeyCode(17), VirtualKeyCode(67)]));
//! assert_eq!(copy.to_string(), "combo:17,67");
//! assert_eq!(copy.label(), "Ctrl+C");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::input::injector::MouseButton;
use crate::input::keycodes::VirtualKeyCode;

const KEY_PREFIX: &str = "key:";
const COMBO_PREFIX: &str = "combo:";

/// Errors for mapping text that does not describe an action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionParseError {
    #[error("unknown action '{0}'")]
    Unknown(String),

    #[error("invalid key code '{0}' (expected 1-254)")]
    InvalidKeyCode(String),

    #[error("combo has no keys")]
    EmptyCombo,
}

/// Action bound to a control.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ActionSpec {
    #[default]
    None,
    MouseClick(MouseButton),
    /// Held for as long as the control is held.
    KeyTap(VirtualKeyCode),
    /// Pressed in order, released in reverse order.
    KeyCombo(Vec<VirtualKeyCode>),
}

impl ActionSpec {
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, ActionSpec::None)
    }

    /// Human-readable label, e.g. `Left Click` or `Ctrl+Shift+Esc`.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            ActionSpec::None => "None".to_string(),
            ActionSpec::MouseClick(MouseButton::Left) => "Left Click".to_string(),
            ActionSpec::MouseClick(MouseButton::Right) => "Right Click".to_string(),
            ActionSpec::MouseClick(MouseButton::Middle) => "Middle Click".to_string(),
            ActionSpec::KeyTap(key) => key.to_string(),
            ActionSpec::KeyCombo(keys) => keys
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("+"),
        }
    }
}

fn parse_key_code(text: &str) -> Result<VirtualKeyCode, ActionParseError> {
    let trimmed = text.trim();
    match trimmed.parse::<u16>() {
        Ok(code) if (1..=VirtualKeyCode::MAX).contains(&code) => Ok(VirtualKeyCode(code)),
        _ => Err(ActionParseError::InvalidKeyCode(trimmed.to_string())),
    }
}

impl FromStr for ActionSpec {
    type Err = ActionParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "" | "none" => return Ok(ActionSpec::None),
            "left" => return Ok(ActionSpec::MouseClick(MouseButton::Left)),
            "right" => return Ok(ActionSpec::MouseClick(MouseButton::Right)),
            "middle" => return Ok(ActionSpec::MouseClick(MouseButton::Middle)),
            _ => {}
        }

        if let Some(code) = text.strip_prefix(KEY_PREFIX) {
            return parse_key_code(code).map(ActionSpec::KeyTap);
        }

        if let Some(list) = text.strip_prefix(COMBO_PREFIX) {
            if list.trim().is_empty() {
                return Err(ActionParseError::EmptyCombo);
            }
            let keys = list
                .split(',')
                .map(parse_key_code)
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(ActionSpec::KeyCombo(keys));
        }

        Err(ActionParseError::Unknown(text.to_string()))
    }
}

impl fmt::Display for ActionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionSpec::None => f.write_str("none"),
            ActionSpec::MouseClick(MouseButton::Left) => f.write_str("left"),
            ActionSpec::MouseClick(MouseButton::Right) => f.write_str("right"),
            ActionSpec::MouseClick(MouseButton::Middle) => f.write_str("middle"),
            ActionSpec::KeyTap(key) => write!(f, "{}{}", KEY_PREFIX, key.code()),
            ActionSpec::KeyCombo(keys) => {
                f.write_str(COMBO_PREFIX)?;
                for (i, key) in keys.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", key.code())?;
                }
                Ok(())
            }
        }
    }
}
