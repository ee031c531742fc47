//! Shared test fixtures: a recording collaborator and scripted error
//! policies that force exact error sequences.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use keyghost::error::{KeyGhostError, KgResult};
use keyghost::errors_model::{ErrorPolicy, TypoKind};
use keyghost::events::{KeyDescriptor, KeyEvent, MouseEvent};
use keyghost::session::Collaborator;

#[derive(Debug, Clone, PartialEq)]
pub enum Recorded {
    Key {
        event: KeyEvent,
        key: String,
        modifiers: u32,
    },
    Mouse {
        event: MouseEvent,
    },
    Wait {
        seconds: f64,
    },
}

/// Collaborator that records every call instead of touching a browser.
/// `wait` records the requested duration; nothing actually sleeps.
#[derive(Default)]
pub struct MockCollaborator {
    pub recorded: Vec<Recorded>,
    pub reads: VecDeque<Option<Vec<String>>>,
    pub new_word_batches: VecDeque<Vec<String>>,
    pub complete: bool,
    pub fail_key_dispatch: bool,
}

impl MockCollaborator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_words(words: &[&str]) -> Self {
        let mut mock = Self::default();
        mock.reads
            .push_back(Some(words.iter().map(|w| w.to_string()).collect()));
        mock
    }

    /// Key names of all Down events, excluding the shift modifier itself.
    pub fn down_keys(&self) -> Vec<String> {
        self.recorded
            .iter()
            .filter_map(|r| match r {
                Recorded::Key {
                    event: KeyEvent::Down,
                    key,
                    ..
                } if key != "Shift" => Some(key.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn total_wait(&self) -> f64 {
        self.recorded
            .iter()
            .map(|r| match r {
                Recorded::Wait { seconds } => *seconds,
                _ => 0.0,
            })
            .sum()
    }

    /// Every key that went down must have come back up by the end.
    pub fn assert_all_keys_released(&self) {
        let mut net: HashMap<&str, i64> = HashMap::new();
        for r in &self.recorded {
            if let Recorded::Key { event, key, .. } = r {
                let count = net.entry(key.as_str()).or_default();
                match event {
                    KeyEvent::Down => *count += 1,
                    KeyEvent::Up => *count -= 1,
                }
            }
        }
        for (key, count) in net {
            assert_eq!(count, 0, "key {:?} left held ({} net downs)", key, count);
        }
    }
}

impl Collaborator for MockCollaborator {
    fn dispatch_key(
        &mut self,
        event: KeyEvent,
        key: &KeyDescriptor,
        modifiers: u32,
    ) -> KgResult<()> {
        if self.fail_key_dispatch {
            return Err(KeyGhostError::Dispatch("mock dispatch failure".into()));
        }
        self.recorded.push(Recorded::Key {
            event,
            key: key.key.clone(),
            modifiers,
        });
        Ok(())
    }

    fn dispatch_mouse(&mut self, event: MouseEvent, _x: f64, _y: f64) -> KgResult<()> {
        self.recorded.push(Recorded::Mouse { event });
        Ok(())
    }

    fn read_words(&mut self) -> Option<Vec<String>> {
        self.reads.pop_front().flatten()
    }

    fn read_new_words(&mut self, _from_index: usize) -> Vec<String> {
        self.new_word_batches.pop_front().unwrap_or_default()
    }

    fn is_session_complete(&mut self) -> bool {
        self.complete
    }

    fn wait(&mut self, duration: Duration) {
        self.recorded.push(Recorded::Wait {
            seconds: duration.as_secs_f64(),
        });
    }
}

/// Policy that never triggers an error.
pub struct NoErrors;

impl ErrorPolicy for NoErrors {
    fn should_make_error(
        &mut self,
        _ch: char,
        _char_index: usize,
        _word: &str,
        _word_index: usize,
        _prev_char: Option<char>,
    ) -> bool {
        false
    }

    fn get_error_type(&mut self, _ch: char, _char_index: usize, _word: &str) -> TypoKind {
        TypoKind::Adjacent
    }

    fn adjacent_typo(&mut self, ch: char) -> char {
        ch
    }

    fn confusion_typo(&mut self, ch: char) -> char {
        ch
    }

    fn common_typo(&mut self, _word: &str) -> Option<&'static str> {
        None
    }

    fn should_correct(&mut self) -> bool {
        true
    }

    fn should_delay_notice(&mut self) -> bool {
        false
    }

    fn delayed_chars_count(&mut self) -> usize {
        0
    }

    fn should_over_backspace(&mut self) -> bool {
        false
    }
}

/// Policy that fires exactly one scripted error at a fixed position, with
/// every correction knob pinned.
pub struct ForcedError {
    pub kind: TypoKind,
    pub at_word: usize,
    pub at_index: usize,
    pub wrong: char,
    pub typo_word: Option<&'static str>,
    pub correct: bool,
    pub delay_notice: bool,
    pub delayed_chars: usize,
    pub over_backspace: bool,
    fired: bool,
}

impl ForcedError {
    pub fn once(kind: TypoKind, at_index: usize, wrong: char) -> Self {
        ForcedError {
            kind,
            at_word: 0,
            at_index,
            wrong,
            typo_word: None,
            correct: true,
            delay_notice: false,
            delayed_chars: 0,
            over_backspace: false,
            fired: false,
        }
    }
}

impl ErrorPolicy for ForcedError {
    fn should_make_error(
        &mut self,
        _ch: char,
        char_index: usize,
        _word: &str,
        word_index: usize,
        _prev_char: Option<char>,
    ) -> bool {
        if !self.fired && word_index == self.at_word && char_index == self.at_index {
            self.fired = true;
            return true;
        }
        false
    }

    fn get_error_type(&mut self, _ch: char, _char_index: usize, _word: &str) -> TypoKind {
        self.kind
    }

    fn adjacent_typo(&mut self, _ch: char) -> char {
        self.wrong
    }

    fn confusion_typo(&mut self, _ch: char) -> char {
        self.wrong
    }

    fn common_typo(&mut self, _word: &str) -> Option<&'static str> {
        self.typo_word
    }

    fn should_correct(&mut self) -> bool {
        self.correct
    }

    fn should_delay_notice(&mut self) -> bool {
        self.delay_notice
    }

    fn delayed_chars_count(&mut self) -> usize {
        self.delayed_chars
    }

    fn should_over_backspace(&mut self) -> bool {
        self.over_backspace
    }
}
