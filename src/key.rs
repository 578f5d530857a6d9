//! Keyboard reader.

use crate::error::Result;
use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};
use std::io::{self, Bytes, Read, Stdin};
use std::str::from_utf8;

/// The set of keys recognized by [`Keyboard`]s.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Key {
    None,
    Control(u8),
    Char(char),
    Backspace,
    Delete,
    Insert,
    ShiftTab,
    Up,
    Down,
    Right,
    Left,
    Home,
    End,
    PageUp,
    PageDown,
    Function(u8),
}

/// Map of key names to [`Key`]s.
pub type KeyMap = HashMap<String, Key>;

/// Names of keys that are not control characters, as well as friendlier names
/// for a few control characters. Names earlier in the list take precedence when
/// displaying keys.
pub const KEY_MAPPINGS: [(&str, Key); 25] = [
    ("tab", Key::Control(9)),
    ("ret", Key::Control(13)),
    ("ESC", Key::Control(27)),
    ("bs", Key::Backspace),
    ("del", Key::Delete),
    ("ins", Key::Insert),
    ("S-tab", Key::ShiftTab),
    ("up", Key::Up),
    ("down", Key::Down),
    ("left", Key::Left),
    ("right", Key::Right),
    ("home", Key::Home),
    ("end", Key::End),
    ("pg_up", Key::PageUp),
    ("pg_down", Key::PageDown),
    ("F1", Key::Function(1)),
    ("F2", Key::Function(2)),
    ("F3", Key::Function(3)),
    ("F4", Key::Function(4)),
    ("F5", Key::Function(5)),
    ("F6", Key::Function(6)),
    ("F7", Key::Function(7)),
    ("F8", Key::Function(8)),
    ("F9", Key::Function(9)),
    ("F10", Key::Function(10)),
];

/// Returns a map of every recognized key name, including `C-@` through `C-_` for
/// control characters.
pub fn init_key_map() -> KeyMap {
    let mut key_map = KeyMap::new();
    for (name, key) in KEY_MAPPINGS {
        key_map.insert(name.to_string(), key);
    }
    for b in 0..32 {
        key_map.insert(control_name(b), Key::Control(b));
    }
    key_map
}

fn control_name(b: u8) -> String {
    format!("C-{}", ((b + 64) as char).to_ascii_lowercase())
}

impl Display for Key {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some((name, _)) = KEY_MAPPINGS.iter().find(|(_, key)| key == self) {
            write!(f, "{name}")
        } else {
            match self {
                Key::Control(b) => write!(f, "{}", control_name(*b)),
                Key::Char(c) => write!(f, "{c}"),
                Key::Function(n) => write!(f, "F{n}"),
                _ => write!(f, "{self:?}"),
            }
        }
    }
}

/// A keyboard that reads bytes from the terminal and produces corresponding [`Key`]s.
pub struct Keyboard {
    term: Bytes<Stdin>,
}

impl Keyboard {
    /// Creates a new keyboard reader.
    pub fn new() -> Keyboard {
        Keyboard {
            term: io::stdin().bytes(),
        }
    }

    fn next(&mut self) -> Result<Option<u8>> {
        Ok(self.term.next().transpose()?)
    }

    /// Reads the next key.
    ///
    /// Reads one or more bytes from the underlying terminal and returns the
    /// corresponding [`Key`].
    ///
    /// A value of [`Key::None`] will be returned under any of the following
    /// conditions:
    ///
    /// - no bytes are available to read after waiting for `1/10` second
    /// - a byte or sequence of bytes is unrecognized
    /// - a byte or sequence of bytes is malformed, such as a `UTF-8` character
    ///
    /// # Errors
    ///
    /// Returns [`Err`] if an I/O error occurred while reading bytes from the
    /// underlying terminal.
    pub fn read(&mut self) -> Result<Key> {
        let key = match self.next()? {
            Some(27) => self.read_escape()?,
            Some(b @ 0..=31) => Key::Control(b),
            Some(b @ 32..=126) => Key::Char(b as char),
            Some(127) => Key::Backspace,
            Some(b) => self.read_unicode(b)?,
            None => Key::None,
        };
        Ok(key)
    }

    /// Reads a sequence of bytes prefixed with `ESC`.
    ///
    /// In most cases, this reads an ANSI escape sequence. However, it may produce
    /// [`Key::Control(27)`] itself if no further bytes are read, or [`Key::None`] if
    /// the sequence is unrecognized.
    fn read_escape(&mut self) -> Result<Key> {
        let key = match self.next()? {
            Some(b'[') => self.read_ansi()?,
            Some(b'O') => match self.next()? {
                // F1-F4
                Some(b @ b'P'..=b'S') => Key::Function(b - b'P' + 1),
                _ => Key::None,
            },
            None => Key::Control(27),
            _ => Key::None,
        };
        Ok(key)
    }

    /// Reads a sequence of bytes prefixed with `ESC [`.
    ///
    /// Key modifiers are consumed but otherwise ignored, so a modified arrow key
    /// reads the same as its plain form.
    fn read_ansi(&mut self) -> Result<Key> {
        let (key_code, next_b) = match self.next()? {
            Some(b @ b'0'..=b'9') => self.read_number(b)?,
            b => (1, b),
        };

        // Optional key modifier.
        let next_b = match next_b {
            Some(b';') => match self.next()? {
                Some(b @ b'0'..=b'9') => self.read_number(b)?.1,
                b => b,
            },
            b => b,
        };

        let key = match next_b {
            Some(b'~') => map_vt(key_code),
            Some(b) => map_xterm(b),
            None => Key::None,
        };
        Ok(key)
    }

    /// Reads a number with a maximum of 2 digits whose first digit is `b`.
    ///
    /// Returns a tuple containing the number itself and the next byte read from the
    /// terminal.
    fn read_number(&mut self, b: u8) -> Result<(u8, Option<u8>)> {
        let n = b - b'0';
        let result = match self.next()? {
            Some(b @ b'0'..=b'9') => (n * 10 + (b - b'0'), self.next()?),
            b => (n, b),
        };
        Ok(result)
    }

    /// Reads a `UTF-8` sequence of bytes where `b` is the first byte.
    ///
    /// `UTF-8` encoding is strictly limited to 2-4 bytes, so anything outside this
    /// range is considered malformed, yielding [`Key::None`].
    fn read_unicode(&mut self, b: u8) -> Result<Key> {
        let n = b.leading_ones() as usize;
        let key = if n < 2 || n > 4 {
            Key::None
        } else {
            let mut buf = [0; 4];
            buf[0] = b;
            for i in 1..n {
                if let Some(b) = self.next()? {
                    buf[i] = b;
                } else {
                    // Expected number of bytes not read, so assumed to be malformed.
                    return Ok(Key::None);
                }
            }
            match from_utf8(&buf[..n]).ok().and_then(|s| s.chars().next()) {
                Some(c) => Key::Char(c),
                None => Key::None,
            }
        };
        Ok(key)
    }
}

/// Returns the key corresponding to the VT-style key code, or [`Key::None`] if
/// unrecognized.
fn map_vt(key_code: u8) -> Key {
    match key_code {
        1 | 7 => Key::Home,
        2 => Key::Insert,
        3 => Key::Delete,
        4 | 8 => Key::End,
        5 => Key::PageUp,
        6 => Key::PageDown,
        // F1-F5
        code @ 11..=15 => Key::Function(code - 10),
        // F6-F10
        code @ 17..=21 => Key::Function(code - 11),
        _ => Key::None,
    }
}

/// Returns the key corresponding to the xterm-style key code, or [`Key::None`] if
/// unrecognized.
fn map_xterm(key_code: u8) -> Key {
    match key_code {
        b'A' => Key::Up,
        b'B' => Key::Down,
        b'C' => Key::Right,
        b'D' => Key::Left,
        b'F' => Key::End,
        b'H' => Key::Home,
        b'Z' => Key::ShiftTab,
        // F1-F4
        code @ b'P'..=b'S' => Key::Function(code - b'P' + 1),
        _ => Key::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_names() {
        let key_map = init_key_map();
        assert_eq!(key_map.get("C-a"), Some(&Key::Control(1)));
        assert_eq!(key_map.get("C-@"), Some(&Key::Control(0)));
        assert_eq!(key_map.get("C-_"), Some(&Key::Control(31)));
        assert_eq!(key_map.get("tab"), Some(&Key::Control(9)));
        assert_eq!(key_map.get("F5"), Some(&Key::Function(5)));
        assert!(key_map.get("C-A").is_none());
    }

    #[test]
    fn display_prefers_friendly_names() {
        assert_eq!(Key::Control(9).to_string(), "tab");
        assert_eq!(Key::Control(13).to_string(), "ret");
        assert_eq!(Key::Control(7).to_string(), "C-g");
        assert_eq!(Key::Char('x').to_string(), "x");
        assert_eq!(Key::PageDown.to_string(), "pg_down");
    }

    #[test]
    fn escape_sequences() {
        assert_eq!(map_vt(3), Key::Delete);
        assert_eq!(map_vt(15), Key::Function(5));
        assert_eq!(map_vt(17), Key::Function(6));
        assert_eq!(map_xterm(b'A'), Key::Up);
        assert_eq!(map_xterm(b'Q'), Key::Function(2));
        assert_eq!(map_xterm(b'x'), Key::None);
    }
}
