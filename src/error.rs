//! # Error Types
//!
//! Custom error types for Padmouse using `thiserror`.

use thiserror::Error;

use crate::mapping::action::ActionParseError;

/// Main error type for Padmouse
#[derive(Debug, Error)]
pub enum PadmouseError {
    /// Configuration file could not be parsed
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// Configuration parsed but a value is out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Settings record could not be encoded or decoded
    #[error("Settings error: {0}")]
    Settings(#[from] serde_json::Error),

    /// Mapping text could not be parsed into an action
    #[error("Mapping error: {0}")]
    Action(#[from] ActionParseError),

    /// Controller backend errors
    #[error("Controller error: {0}")]
    Controller(String),

    /// Settings update channel has no receiver
    #[error("Settings update channel closed")]
    SettingsChannelClosed,

    /// Input injection backend errors
    #[error("Input injector error: {0}")]
    Injector(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Padmouse
pub type Result<T> = std::result::Result<T, PadmouseError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::action::ActionSpec;

    #[test]
    fn test_action_error_converts() {
        fn parse(text: &str) -> Result<ActionSpec> {
            Ok(text.parse::<ActionSpec>()?)
        }

        let err = parse("combo:").unwrap_err();
        assert!(matches!(err, PadmouseError::Action(ActionParseError::EmptyCombo)));
        assert_eq!(err.to_string(), "Mapping error: combo has no keys");
    }

    #[test]
    fn test_settings_error_converts() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: PadmouseError = json_err.into();
        assert!(err.to_string().starts_with("Settings error:"));
    }
}
