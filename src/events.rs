//! Key event vocabulary shared with the embedding automation layer.

/// Modifier bitmask values understood by the collaborator.
pub const MOD_NONE: u32 = 0;
pub const MOD_SHIFT: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    Down,
    Up,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseEvent {
    Moved,
    Pressed,
    Released,
}

/// Abstract key identity: the produced value, the physical key code and the
/// text inserted on key-down (empty for non-printing keys).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyDescriptor {
    pub key: String,
    pub code: String,
    pub text: String,
}

impl KeyDescriptor {
    pub fn backspace() -> Self {
        KeyDescriptor {
            key: "Backspace".into(),
            code: "Backspace".into(),
            text: String::new(),
        }
    }

    pub fn shift_left() -> Self {
        KeyDescriptor {
            key: "Shift".into(),
            code: "ShiftLeft".into(),
            text: String::new(),
        }
    }

    pub fn is_printable(&self) -> bool {
        !self.text.is_empty()
    }
}

/// A character resolved to its physical keystroke: descriptor plus whether
/// the shift modifier is required to produce it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyStroke {
    pub descriptor: KeyDescriptor,
    pub shifted: bool,
}

impl KeyStroke {
    pub fn from_char(c: char) -> Self {
        if c.is_ascii_alphabetic() {
            return KeyStroke {
                descriptor: KeyDescriptor {
                    key: c.to_string(),
                    code: format!("Key{}", c.to_ascii_uppercase()),
                    text: c.to_string(),
                },
                shifted: c.is_ascii_uppercase(),
            };
        }
        if c.is_ascii_digit() {
            return KeyStroke {
                descriptor: KeyDescriptor {
                    key: c.to_string(),
                    code: format!("Digit{}", c),
                    text: c.to_string(),
                },
                shifted: false,
            };
        }
        if c == ' ' {
            return KeyStroke {
                descriptor: KeyDescriptor {
                    key: " ".into(),
                    code: "Space".into(),
                    text: " ".into(),
                },
                shifted: false,
            };
        }
        if let Some(code) = punct_code(c) {
            return KeyStroke {
                descriptor: KeyDescriptor {
                    key: c.to_string(),
                    code: code.into(),
                    text: c.to_string(),
                },
                shifted: false,
            };
        }
        if let Some((base, code)) = shift_punct(c) {
            return KeyStroke {
                descriptor: KeyDescriptor {
                    key: base.to_string(),
                    code: code.into(),
                    text: c.to_string(),
                },
                shifted: true,
            };
        }
        // Unknown characters pass through with no physical code; the
        // collaborator decides what to do with them.
        KeyStroke {
            descriptor: KeyDescriptor {
                key: c.to_string(),
                code: String::new(),
                text: c.to_string(),
            },
            shifted: false,
        }
    }
}

fn punct_code(c: char) -> Option<&'static str> {
    Some(match c {
        ',' => "Comma",
        '.' => "Period",
        ';' => "Semicolon",
        '\'' => "Quote",
        '-' => "Minus",
        '=' => "Equal",
        '/' => "Slash",
        '\\' => "Backslash",
        '[' => "BracketLeft",
        ']' => "BracketRight",
        '`' => "Backquote",
        _ => return None,
    })
}

/// Shifted punctuation: (unshifted base key, physical code).
fn shift_punct(c: char) -> Option<(char, &'static str)> {
    Some(match c {
        '!' => ('1', "Digit1"),
        '@' => ('2', "Digit2"),
        '#' => ('3', "Digit3"),
        '$' => ('4', "Digit4"),
        '%' => ('5', "Digit5"),
        '^' => ('6', "Digit6"),
        '&' => ('7', "Digit7"),
        '*' => ('8', "Digit8"),
        '(' => ('9', "Digit9"),
        ')' => ('0', "Digit0"),
        '_' => ('-', "Minus"),
        '+' => ('=', "Equal"),
        '{' => ('[', "BracketLeft"),
        '}' => (']', "BracketRight"),
        '|' => ('\\', "Backslash"),
        ':' => (';', "Semicolon"),
        '"' => ('\'', "Quote"),
        '<' => (',', "Comma"),
        '>' => ('.', "Period"),
        '?' => ('/', "Slash"),
        '~' => ('`', "Backquote"),
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercase_letter_maps_plain() {
        let ks = KeyStroke::from_char('a');
        assert_eq!(ks.descriptor.code, "KeyA");
        assert!(!ks.shifted);
    }

    #[test]
    fn uppercase_letter_needs_shift() {
        let ks = KeyStroke::from_char('T');
        assert_eq!(ks.descriptor.code, "KeyT");
        assert_eq!(ks.descriptor.text, "T");
        assert!(ks.shifted);
    }

    #[test]
    fn shifted_punct_maps_to_base_key() {
        let ks = KeyStroke::from_char('!');
        assert_eq!(ks.descriptor.key, "1");
        assert_eq!(ks.descriptor.code, "Digit1");
        assert!(ks.shifted);
    }

    #[test]
    fn backspace_is_not_printable() {
        assert!(!KeyDescriptor::backspace().is_printable());
        assert!(KeyStroke::from_char(' ').descriptor.is_printable());
    }
}
