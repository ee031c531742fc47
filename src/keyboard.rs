//! Anatomical hand model: static per-key attributes shared by every layer.
//!
//! Fingers are numbered 0 = left pinky .. 3 = left index, 4 = right index ..
//! 7 = right pinky, 8 = thumb. Rows: 0 = number, 1 = top, 2 = home,
//! 3 = bottom, 4 = space.

/// Which finger types each key. Unmapped characters land on the right middle
/// cluster (finger 5), a neutral default.
pub fn finger_of(c: char) -> u8 {
    match c.to_ascii_lowercase() {
        'q' | 'a' | 'z' | '1' | '`' => 0,
        'w' | 's' | 'x' | '2' => 1,
        'e' | 'd' | 'c' | '3' => 2,
        'r' | 'f' | 'v' | 't' | 'g' | 'b' | '4' | '5' => 3,
        'y' | 'h' | 'n' | 'u' | 'j' | 'm' | '6' | '7' => 4,
        'i' | 'k' | ',' | '8' => 5,
        'o' | 'l' | '.' | '9' => 6,
        'p' | ';' | '/' | '0' | '-' | '=' | '[' | ']' | '\'' | '\\' => 7,
        ' ' => 8,
        _ => 5,
    }
}

pub fn row_of(c: char) -> u8 {
    match c.to_ascii_lowercase() {
        '`' | '1' | '2' | '3' | '4' | '5' | '6' | '7' | '8' | '9' | '0' | '-' | '=' => 0,
        'q' | 'w' | 'e' | 'r' | 't' | 'y' | 'u' | 'i' | 'o' | 'p' | '[' | ']' | '\\' => 1,
        'a' | 's' | 'd' | 'f' | 'g' | 'h' | 'j' | 'k' | 'l' | ';' | '\'' => 2,
        'z' | 'x' | 'c' | 'v' | 'b' | 'n' | 'm' | ',' | '.' | '/' => 3,
        ' ' => 4,
        _ => 2,
    }
}

/// Speed class per finger: pinkies slowest, index fingers fastest, the thumb
/// (space) faster still.
pub fn finger_speed(finger: u8) -> f64 {
    match finger {
        0 | 7 => 1.35,
        1 | 6 => 1.15,
        2 | 5 => 1.00,
        3 | 4 => 0.90,
        8 => 0.75,
        _ => 1.0,
    }
}

/// Hold class per finger: same ordering as speed but milder spread.
pub fn finger_hold(finger: u8) -> f64 {
    match finger {
        0 | 7 => 1.25,
        1 | 6 => 1.12,
        2 | 5 => 1.00,
        3 | 4 => 0.88,
        8 => 0.80,
        _ => 1.0,
    }
}

pub fn same_hand(f1: u8, f2: u8) -> bool {
    if f1 == 8 || f2 == 8 {
        return false;
    }
    (f1 <= 3 && f2 <= 3) || (f1 >= 4 && f2 >= 4)
}

pub fn row_distance(r1: u8, r2: u8) -> u8 {
    r1.abs_diff(r2)
}

// QWERTY column groups; two distinct keys in the same group form a
// same-finger bigram. Digits deliberately excluded.
const FINGER_COLUMNS: [&str; 8] = [
    "qaz", "wsx", "edc", "rfvtgb", "yhnujm", "ik,", "ol.", "p;/'-=[]\\",
];

pub fn is_same_finger_pair(a: char, b: char) -> bool {
    let (a, b) = (a.to_ascii_lowercase(), b.to_ascii_lowercase());
    if a == b {
        return false;
    }
    FINGER_COLUMNS
        .iter()
        .any(|col| col.contains(a) && col.contains(b))
}

/// Physically neighboring keys, used when the error model needs a plausible
/// wrong key. `None` for anything off the letter block.
pub fn adjacent_keys(c: char) -> Option<&'static str> {
    Some(match c.to_ascii_lowercase() {
        'a' => "sqwz",
        'b' => "vghn",
        'c' => "xdfv",
        'd' => "serfcx",
        'e' => "wsdfr",
        'f' => "dertgcv",
        'g' => "frtyhhbv",
        'h' => "gtyjnb",
        'i' => "ujko",
        'j' => "hyuknm",
        'k' => "juilm",
        'l' => "kop",
        'm' => "njk",
        'n' => "bhjm",
        'o' => "iklp",
        'p' => "ol",
        'q' => "wa",
        'r' => "edft",
        's' => "awedxz",
        't' => "rfgy",
        'u' => "yhji",
        'v' => "cfgb",
        'w' => "qase",
        'x' => "zsdc",
        'y' => "tghu",
        'z' => "asx",
        _ => return None,
    })
}

/// English letter relative frequency (percent). Defaults to 0.5 for anything
/// unlisted so rare symbols read as hard.
pub fn letter_frequency(c: char) -> f64 {
    match c.to_ascii_lowercase() {
        'e' => 13.0,
        't' => 9.1,
        'a' => 8.2,
        'o' => 7.5,
        'i' => 7.0,
        'n' => 6.7,
        's' => 6.3,
        'h' => 6.1,
        'r' => 6.0,
        'd' => 4.3,
        'l' => 4.0,
        'c' => 2.8,
        'u' => 2.8,
        'm' => 2.4,
        'w' => 2.4,
        'f' => 2.2,
        'g' => 2.0,
        'y' => 2.0,
        'p' => 1.9,
        'b' => 1.5,
        'v' => 1.0,
        'k' => 0.8,
        'j' => 0.15,
        'x' => 0.15,
        'q' => 0.10,
        'z' => 0.07,
        _ => 0.5,
    }
}

/// English bigrams typed faster than baseline by practiced typists.
pub const FAST_BIGRAMS: [&str; 27] = [
    "th", "he", "in", "er", "an", "on", "en", "at", "ou", "ed", "is", "it", "al", "ar", "or", "ti",
    "te", "st", "se", "le", "ng", "io", "re", "nd", "ha", "to", "of",
];

/// Awkward bigrams typed slower than baseline (stretches, same-column hops).
pub const SLOW_BIGRAMS: [&str; 38] = [
    "bf", "zx", "qp", "pq", "xz", "fb", "mj", "jm", "vb", "bv", "ce", "ec", "nu", "un", "my", "ym",
    "br", "rb", "gr", "rg", "az", "za", "sx", "xs", "dc", "cd", "fv", "vf", "gt", "tg", "hy", "yh",
    "ju", "uj", "ki", "ik", "lo", "ol",
];
