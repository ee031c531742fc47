//! Context-aware error generation: whether to corrupt a keystroke, what kind
//! of corruption, and the knobs governing its correction.

use fastrand::Rng;
use strum_macros::{Display, EnumIter, EnumString};

use crate::keyboard;
use crate::profile::Profile;
use crate::sampling::weighted_index;
use crate::words;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum TypoKind {
    /// Keyboard-adjacent wrong character.
    Adjacent,
    /// Characters i and i+1 swapped.
    Transpose,
    /// Commonly-confused character pair (b/v, i/o, ...).
    Confusion,
    /// Intended character typed twice.
    DoubleTap,
    /// Character omitted entirely; the omission stands.
    Skip,
    /// Whole word replaced by a known misspelling.
    CommonTypo,
}

/// Decision surface the orchestrator consults. The production implementation
/// is [`ErrorEngine`]; tests substitute scripted policies to force exact
/// error sequences.
pub trait ErrorPolicy {
    /// The only place error probability is decided. Everything else assumes
    /// an error has already been triggered.
    fn should_make_error(
        &mut self,
        ch: char,
        char_index: usize,
        word: &str,
        word_index: usize,
        prev_char: Option<char>,
    ) -> bool;

    fn get_error_type(&mut self, ch: char, char_index: usize, word: &str) -> TypoKind;

    fn adjacent_typo(&mut self, ch: char) -> char;

    fn confusion_typo(&mut self, ch: char) -> char;

    /// Pick a misspelling for a whole-word substitution. `None` when the
    /// word has no dictionary entry.
    fn common_typo(&mut self, word: &str) -> Option<&'static str>;

    fn should_correct(&mut self) -> bool;

    /// Should the error go unnoticed for a few more characters?
    fn should_delay_notice(&mut self) -> bool;

    fn delayed_chars_count(&mut self) -> usize;

    /// Chance of backspacing one too many characters during a correction.
    fn should_over_backspace(&mut self) -> bool;
}

/// Stateless policy reading the round profile; the RNG is the only thing it
/// carries between calls.
pub struct ErrorEngine<'p> {
    profile: &'p Profile,
    rng: Rng,
}

impl<'p> ErrorEngine<'p> {
    pub fn new(profile: &'p Profile, seed: Option<u64>) -> Self {
        let rng = if let Some(s) = seed {
            Rng::with_seed(s)
        } else {
            Rng::new()
        };
        ErrorEngine { profile, rng }
    }

    fn random_letter(&mut self) -> char {
        const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
        LETTERS[self.rng.usize(0..LETTERS.len())] as char
    }
}

impl ErrorPolicy for ErrorEngine<'_> {
    fn should_make_error(
        &mut self,
        ch: char,
        char_index: usize,
        word: &str,
        word_index: usize,
        prev_char: Option<char>,
    ) -> bool {
        let p = self.profile;
        let mut chance = p.typo_chance;

        // Position weighting: near-zero on the first char, peak at 3-5.
        chance *= match char_index {
            0 => 0.05,
            1..=2 => 0.5,
            3..=5 => 1.5,
            _ => 1.0,
        };

        let finger = keyboard::finger_of(ch);
        if finger == 0 || finger == 7 {
            chance *= 1.5;
        }
        if keyboard::row_of(ch) == 0 {
            chance *= 1.8;
        }
        if word.chars().count() > 6 && char_index > 3 {
            chance *= 1.2;
        }
        if word_index > 40 {
            chance *= 1.0 + ((word_index - 40) as f64 / 200.0).min(0.3);
        }
        // Same finger, different row: hard transition.
        if let Some(prev) = prev_char {
            let pf = keyboard::finger_of(prev);
            if pf == finger && pf != 8 && keyboard::row_of(prev) != keyboard::row_of(ch) {
                chance *= 1.6;
            }
        }

        self.rng.f64() < chance.min(0.25)
    }

    fn get_error_type(&mut self, ch: char, char_index: usize, word: &str) -> TypoKind {
        // Whole-word substitution is costly to simulate and rare for fast
        // typists, so its trigger rate falls off past 100 WPM.
        if char_index == 0 && words::common_typos(&word.to_lowercase()).is_some() {
            let wpm = self.profile.target_wpm as f64;
            let rate = if wpm <= 100.0 {
                0.06
            } else {
                (0.06 - 0.001 * (wpm - 100.0)).max(0.01)
            };
            if self.rng.f64() < rate {
                return TypoKind::CommonTypo;
            }
        }

        let entries = self.profile.error_weights.entries();
        let weights: Vec<f64> = entries.iter().map(|(_, w)| *w).collect();
        let kind = entries[weighted_index(&mut self.rng, &weights)].0;

        // Inapplicable kinds degrade to a plain adjacent hit.
        match kind {
            TypoKind::Transpose if char_index + 1 >= word.chars().count() => TypoKind::Adjacent,
            TypoKind::DoubleTap if ch == ' ' => TypoKind::Adjacent,
            other => other,
        }
    }

    fn adjacent_typo(&mut self, ch: char) -> char {
        if let Some(neighbors) = keyboard::adjacent_keys(ch) {
            let bytes = neighbors.as_bytes();
            let wrong = bytes[self.rng.usize(0..bytes.len())] as char;
            if ch.is_uppercase() {
                return wrong.to_ascii_uppercase();
            }
            return wrong;
        }
        self.random_letter()
    }

    fn confusion_typo(&mut self, ch: char) -> char {
        match words::confusion_of(ch) {
            Some(wrong) if ch.is_uppercase() => wrong.to_ascii_uppercase(),
            Some(wrong) => wrong,
            None => self.adjacent_typo(ch),
        }
    }

    fn common_typo(&mut self, word: &str) -> Option<&'static str> {
        let typos = words::common_typos(&word.to_lowercase())?;
        Some(typos[self.rng.usize(0..typos.len())])
    }

    fn should_correct(&mut self) -> bool {
        self.rng.f64() > self.profile.leave_mistake_chance
    }

    fn should_delay_notice(&mut self) -> bool {
        self.rng.f64() < self.profile.delayed_notice_chance
    }

    fn delayed_chars_count(&mut self) -> usize {
        let (lo, hi) = self.profile.delayed_notice_chars;
        self.rng.usize(lo..=hi)
    }

    fn should_over_backspace(&mut self) -> bool {
        self.rng.f64() < self.profile.over_backspace_chance
    }
}
