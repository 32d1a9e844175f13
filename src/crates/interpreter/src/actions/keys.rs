//! Key names and `pressKey` chord parsing

use std::fmt;

use serde::Serialize;

use crate::error::ActionError;

macro_rules! keys {
    ($($variant:ident),+ $(,)?) => {
        /// Keys that can be held down on the input device.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
        pub enum Key {
            $($variant),+
        }

        impl Key {
            /// Look a key up by its exact name, e.g. `PageDown`.
            pub fn from_name(name: &str) -> Option<Key> {
                match name {
                    $(stringify!($variant) => Some(Key::$variant),)+
                    _ => None,
                }
            }

            pub fn name(self) -> &'static str {
                match self {
                    $(Key::$variant => stringify!($variant),)+
                }
            }
        }
    };
}

keys!(
    ControlLeft, ControlRight, ShiftLeft, ShiftRight, AltLeft, AltRight,
    MetaLeft, MetaRight, LeftSuper, RightSuper,
    Enter, Escape, Tab, Space, Backspace, Delete, Insert,
    Home, End, PageUp, PageDown,
    ArrowUp, ArrowDown, ArrowLeft, ArrowRight,
    F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12,
    Slash, Backslash, Comma, Period, Minus, Equal, Semicolon, Quote, Grave,
    LeftBracket, RightBracket,
    CapsLock, NumLock, ScrollLock, PrintScreen, Pause, Menu,
    VolumeUp, VolumeDown, VolumeMute,
    AudioPlay, AudioStop, AudioNext, AudioPrev,
);

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn alias(part: &str) -> Option<Key> {
    let key = match part {
        "ctrl" | "control" => Key::ControlLeft,
        "shift" => Key::ShiftLeft,
        "alt" | "option" => Key::AltLeft,
        "win" | "super" | "meta" | "cmd" => Key::MetaLeft,
        "leftsuper" => Key::LeftSuper,
        "rightsuper" => Key::RightSuper,
        "enter" | "return" => Key::Enter,
        "esc" | "escape" => Key::Escape,
        "tab" => Key::Tab,
        "space" => Key::Space,
        "slash" | "/" => Key::Slash,
        "backslash" | "\\" => Key::Backslash,
        "backspace" => Key::Backspace,
        "delete" | "del" => Key::Delete,
        "home" => Key::Home,
        "end" => Key::End,
        "pageup" => Key::PageUp,
        "pagedown" => Key::PageDown,
        "arrowup" | "up" => Key::ArrowUp,
        "arrowdown" | "down" => Key::ArrowDown,
        "arrowleft" | "left" => Key::ArrowLeft,
        "arrowright" | "right" => Key::ArrowRight,
        "f1" => Key::F1,
        "f2" => Key::F2,
        "f3" => Key::F3,
        "f4" => Key::F4,
        "f5" => Key::F5,
        "f6" => Key::F6,
        "f7" => Key::F7,
        "f8" => Key::F8,
        "f9" => Key::F9,
        "f10" => Key::F10,
        "f11" => Key::F11,
        "f12" => Key::F12,
        _ => return None,
    };
    Some(key)
}

/// A parsed `pressKey` argument.
///
/// `keys` are pressed in order, `chars` are typed while they are held, and
/// the keys are released in reverse order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chord {
    pub keys: Vec<Key>,
    pub chars: Vec<char>,
}

impl Chord {
    /// Parse a `+`-separated chord such as `Ctrl+Shift+T`.
    ///
    /// Each part is, in order of precedence: a known alias, a single
    /// alphanumeric character to type, or a key name after capitalizing its
    /// first letter.
    pub fn parse(input: &str) -> Result<Chord, ActionError> {
        let mut chord = Chord::default();

        for part in input.split('+').map(str::trim) {
            if let Some(key) = alias(&part.to_ascii_lowercase()) {
                chord.keys.push(key);
                continue;
            }

            let mut chars = part.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii_alphanumeric() => chord.chars.push(c),
                _ => {
                    let key = Key::from_name(&capitalize(part))
                        .ok_or_else(|| ActionError::UnknownKey(part.to_string()))?;
                    chord.keys.push(key);
                }
            }
        }

        Ok(chord)
    }

    /// Chord holding a single key.
    pub fn single(key: Key) -> Chord {
        Chord {
            keys: vec![key],
            chars: Vec::new(),
        }
    }
}

fn capitalize(part: &str) -> String {
    let mut chars = part.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_chord() {
        let chord = Chord::parse("Ctrl+Shift+T").unwrap();
        assert_eq!(chord.keys, vec![Key::ControlLeft, Key::ShiftLeft]);
        assert_eq!(chord.chars, vec!['T']);
    }

    #[test]
    fn test_aliases_are_case_insensitive() {
        let chord = Chord::parse("WIN + arrowDown").unwrap();
        assert_eq!(chord.keys, vec![Key::MetaLeft, Key::ArrowDown]);
        assert_eq!(Chord::parse("/").unwrap().keys, vec![Key::Slash]);
        assert_eq!(Chord::parse("\\").unwrap().keys, vec![Key::Backslash]);
    }

    #[test]
    fn test_capitalized_lookup() {
        assert_eq!(Chord::parse("printScreen").unwrap().keys, vec![Key::PrintScreen]);
        assert_eq!(Chord::parse("VolumeUp").unwrap().keys, vec![Key::VolumeUp]);
    }

    #[test]
    fn test_unknown_part() {
        let err = Chord::parse("Ctrl+Hyper").unwrap_err();
        assert!(matches!(err, ActionError::UnknownKey(ref p) if p == "Hyper"));
        assert!(Chord::parse("").is_err());
    }

    #[test]
    fn test_key_names_round_trip_through_lookup() {
        assert_eq!(Key::from_name(Key::LeftSuper.name()), Some(Key::LeftSuper));
        assert_eq!(Key::F11.to_string(), "F11");
    }
}
