//! # Virtual Key Codes
//!
//! Keys are identified by Windows virtual key codes on every platform. The
//! persisted mapping format stores them as decimal numbers (`key:65`), and
//! the Linux injector translates them to evdev keys when emitting.
//!
//! [`VirtualKeyCode`]'s `Display` gives the short key label shown to users
//! (`A`, `F5`, `Ctrl`, `Num4`, `;`), falling back to `Key <code>`.

use std::fmt;

/// Platform-level key identifier, independent of keyboard layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VirtualKeyCode(pub u16);

impl VirtualKeyCode {
    /// Largest valid virtual key code.
    pub const MAX: u16 = 0xFE;

    #[must_use]
    pub fn code(self) -> u16 {
        self.0
    }

    fn special_name(self) -> Option<&'static str> {
        let name = match self.0 {
            8 => "Back",
            9 => "Tab",
            13 => "Enter",
            16 => "Shift",
            17 => "Ctrl",
            18 => "Alt",
            19 => "Pause",
            20 => "Caps",
            27 => "Esc",
            32 => "Space",
            33 => "PgUp",
            34 => "PgDn",
            35 => "End",
            36 => "Home",
            37 => "Left",
            38 => "Up",
            39 => "Right",
            40 => "Down",
            45 => "Ins",
            46 => "Del",
            91 => "Win",
            93 => "Menu",
            106 => "Num*",
            107 => "Num+",
            109 => "Num-",
            110 => "Num.",
            111 => "Num/",
            186 => ";",
            187 => "=",
            188 => ",",
            189 => "-",
            190 => ".",
            191 => "/",
            192 => "`",
            219 => "[",
            220 => "\\",
            221 => "]",
            222 => "'",
            _ => return None,
        };
        Some(name)
    }
}

impl fmt::Display for VirtualKeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            // Letters and digits share their ASCII code
            code @ (0x30..=0x39 | 0x41..=0x5A) => write!(f, "{}", char::from(code as u8)),
            code @ 0x60..=0x69 => write!(f, "Num{}", code - 0x60),
            code @ 0x70..=0x7B => write!(f, "F{}", code - 0x6F),
            code => match self.special_name() {
                Some(name) => f.write_str(name),
                None => write!(f, "Key {}", code),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_and_digit_names() {
        assert_eq!(VirtualKeyCode(65).to_string(), "A");
        assert_eq!(VirtualKeyCode(90).to_string(), "Z");
        assert_eq!(VirtualKeyCode(48).to_string(), "0");
        assert_eq!(VirtualKeyCode(57).to_string(), "9");
    }

    #[test]
    fn test_function_key_names() {
        assert_eq!(VirtualKeyCode(112).to_string(), "F1");
        assert_eq!(VirtualKeyCode(123).to_string(), "F12");
    }

    #[test]
    fn test_numpad_names() {
        assert_eq!(VirtualKeyCode(96).to_string(), "Num0");
        assert_eq!(VirtualKeyCode(105).to_string(), "Num9");
        assert_eq!(VirtualKeyCode(107).to_string(), "Num+");
    }

    #[test]
    fn test_special_names() {
        assert_eq!(VirtualKeyCode(17).to_string(), "Ctrl");
        assert_eq!(VirtualKeyCode(27).to_string(), "Esc");
        assert_eq!(VirtualKeyCode(186).to_string(), ";");
        assert_eq!(VirtualKeyCode(220).to_string(), "\\");
    }

    #[test]
    fn test_unknown_key_name() {
        assert_eq!(VirtualKeyCode(0xE7).to_string(), "Key 231");
    }
}
