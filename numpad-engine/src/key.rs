//! Numpad key symbols and their Linux input key codes.
//!
//! The alphabet is closed: every cell of the layout carries one of the 19
//! symbols below, and each symbol resolves to a base key plus an optional
//! shift modifier.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseSymbolError;

/// A Linux input event key code (`KEY_*` from `input-event-codes.h`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyCode(pub u16);

impl KeyCode {
    pub const KEY_1: KeyCode = KeyCode(2);
    pub const KEY_2: KeyCode = KeyCode(3);
    pub const KEY_3: KeyCode = KeyCode(4);
    pub const KEY_4: KeyCode = KeyCode(5);
    pub const KEY_5: KeyCode = KeyCode(6);
    pub const KEY_6: KeyCode = KeyCode(7);
    pub const KEY_7: KeyCode = KeyCode(8);
    pub const KEY_8: KeyCode = KeyCode(9);
    pub const KEY_9: KeyCode = KeyCode(10);
    pub const KEY_0: KeyCode = KeyCode(11);
    pub const KEY_MINUS: KeyCode = KeyCode(12);
    pub const KEY_EQUAL: KeyCode = KeyCode(13);
    pub const KEY_BACKSPACE: KeyCode = KeyCode(14);
    pub const KEY_ENTER: KeyCode = KeyCode(28);
    pub const KEY_LEFTSHIFT: KeyCode = KeyCode(42);
    pub const KEY_DOT: KeyCode = KeyCode(52);
    pub const KEY_SLASH: KeyCode = KeyCode(53);
    pub const KEY_KPASTERISK: KeyCode = KeyCode(55);
    pub const KEY_KPPLUS: KeyCode = KeyCode(78);

    /// Raw numeric code
    pub fn raw(self) -> u16 {
        self.0
    }
}

/// Logical key produced by a numpad cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeySymbol {
    Zero,
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Dot,
    Plus,
    Minus,
    Asterisk,
    Slash,
    Percent,
    Equal,
    Enter,
    Backspace,
}

/// The key events needed to type one symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyStroke {
    pub code: KeyCode,
    /// Hold left shift around the base key
    pub shifted: bool,
}

impl KeySymbol {
    /// Every symbol, in label order
    pub const ALL: [KeySymbol; 19] = [
        KeySymbol::Zero,
        KeySymbol::One,
        KeySymbol::Two,
        KeySymbol::Three,
        KeySymbol::Four,
        KeySymbol::Five,
        KeySymbol::Six,
        KeySymbol::Seven,
        KeySymbol::Eight,
        KeySymbol::Nine,
        KeySymbol::Dot,
        KeySymbol::Plus,
        KeySymbol::Minus,
        KeySymbol::Asterisk,
        KeySymbol::Slash,
        KeySymbol::Percent,
        KeySymbol::Equal,
        KeySymbol::Enter,
        KeySymbol::Backspace,
    ];

    /// Label as printed on the overlay (e.g. `"7"`, `"backspace"`)
    pub fn label(self) -> &'static str {
        match self {
            KeySymbol::Zero => "0",
            KeySymbol::One => "1",
            KeySymbol::Two => "2",
            KeySymbol::Three => "3",
            KeySymbol::Four => "4",
            KeySymbol::Five => "5",
            KeySymbol::Six => "6",
            KeySymbol::Seven => "7",
            KeySymbol::Eight => "8",
            KeySymbol::Nine => "9",
            KeySymbol::Dot => ".",
            KeySymbol::Plus => "+",
            KeySymbol::Minus => "-",
            KeySymbol::Asterisk => "*",
            KeySymbol::Slash => "/",
            KeySymbol::Percent => "%",
            KeySymbol::Equal => "=",
            KeySymbol::Enter => "enter",
            KeySymbol::Backspace => "backspace",
        }
    }

    /// Key code and modifier for this symbol
    pub fn stroke(self) -> KeyStroke {
        let (code, shifted) = match self {
            KeySymbol::Zero => (KeyCode::KEY_0, false),
            KeySymbol::One => (KeyCode::KEY_1, false),
            KeySymbol::Two => (KeyCode::KEY_2, false),
            KeySymbol::Three => (KeyCode::KEY_3, false),
            KeySymbol::Four => (KeyCode::KEY_4, false),
            KeySymbol::Five => (KeyCode::KEY_5, false),
            KeySymbol::Six => (KeyCode::KEY_6, false),
            KeySymbol::Seven => (KeyCode::KEY_7, false),
            KeySymbol::Eight => (KeyCode::KEY_8, false),
            KeySymbol::Nine => (KeyCode::KEY_9, false),
            KeySymbol::Dot => (KeyCode::KEY_DOT, false),
            KeySymbol::Plus => (KeyCode::KEY_KPPLUS, false),
            KeySymbol::Minus => (KeyCode::KEY_MINUS, false),
            KeySymbol::Asterisk => (KeyCode::KEY_KPASTERISK, false),
            KeySymbol::Slash => (KeyCode::KEY_SLASH, false),
            KeySymbol::Percent => (KeyCode::KEY_5, true), // Shift+5
            KeySymbol::Equal => (KeyCode::KEY_EQUAL, false),
            KeySymbol::Enter => (KeyCode::KEY_ENTER, false),
            KeySymbol::Backspace => (KeyCode::KEY_BACKSPACE, false),
        };
        KeyStroke { code, shifted }
    }
}

/// Every key code the virtual keyboard must advertise, shift included
pub fn required_key_codes() -> Vec<KeyCode> {
    let mut codes: Vec<KeyCode> = KeySymbol::ALL.iter().map(|s| s.stroke().code).collect();
    codes.push(KeyCode::KEY_LEFTSHIFT);
    codes.sort();
    codes.dedup();
    codes
}

impl fmt::Display for KeySymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for KeySymbol {
    type Err = ParseSymbolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        KeySymbol::ALL
            .iter()
            .copied()
            .find(|sym| sym.label() == lower)
            .ok_or_else(|| ParseSymbolError(s.to_string()))
    }
}
