//! Typing orchestration: sequences profiles, dynamics and error decisions
//! into a key-event/sleep stream for a whole word list, one round at a time.
//!
//! Single-threaded and blocking by design: the only suspension points are
//! the timed waits issued through the collaborator, and all mutable state
//! belongs to the round in progress.

use std::time::Duration;

use fastrand::Rng;
use tracing::{debug, info, warn};

use crate::config::SimulationConfig;
use crate::consistency::ConsistencyReport;
use crate::dynamics::DynamicsEngine;
use crate::error::{KeyGhostError, KgResult};
use crate::errors_model::{ErrorEngine, ErrorPolicy, TypoKind};
use crate::events::{KeyDescriptor, KeyEvent, KeyStroke, MouseEvent, MOD_NONE, MOD_SHIFT};
use crate::keyboard;
use crate::profile::Profile;
use crate::sampling::{gauss, uniform};

/// Contract implemented by the embedding automation layer. Key dispatch is
/// essential (failures propagate); mouse dispatch is cosmetic (failures are
/// swallowed). Latency on either is noise to compensate, not a correctness
/// signal.
pub trait Collaborator {
    fn dispatch_key(&mut self, event: KeyEvent, key: &KeyDescriptor, modifiers: u32)
        -> KgResult<()>;

    fn dispatch_mouse(&mut self, event: MouseEvent, x: f64, y: f64) -> KgResult<()>;

    /// Currently visible target text, or `None` if unavailable.
    fn read_words(&mut self) -> Option<Vec<String>>;

    /// Words revealed past a known boundary (open-ended sessions).
    fn read_new_words(&mut self, from_index: usize) -> Vec<String>;

    /// Polled signal used to short-circuit typing.
    fn is_session_complete(&mut self) -> bool;

    fn wait(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

struct HeldKey {
    stroke: KeyStroke,
}

/// The one virtually-held key. At most one key is down at any instant; every
/// path that emits without overlap releases first.
#[derive(Default)]
struct OverlapSlot {
    held: Option<HeldKey>,
}

impl OverlapSlot {
    fn is_held(&self) -> bool {
        self.held.is_some()
    }

    fn take(&mut self) -> Option<HeldKey> {
        self.held.take()
    }

    fn set(&mut self, key: HeldKey) {
        debug_assert!(self.held.is_none(), "double-hold: slot already occupied");
        self.held = Some(key);
    }
}

/// Per-session orchestrator. Each round gets a fresh profile, dynamics
/// engine and error engine; the typist only carries the collaborator, the
/// tuning config and the session RNG across rounds.
pub struct Typist<'a, C: Collaborator> {
    driver: &'a mut C,
    config: SimulationConfig,
    rng: Rng,
}

impl<'a, C: Collaborator> Typist<'a, C> {
    pub fn new(driver: &'a mut C, config: SimulationConfig) -> KgResult<Self> {
        config.validate()?;
        let rng = if let Some(s) = config.seed {
            Rng::with_seed(s)
        } else {
            Rng::new()
        };
        Ok(Typist {
            driver,
            config,
            rng,
        })
    }

    /// Run the configured number of rounds. A round that exhausts its word
    /// supply is skipped, not fatal; dispatch failures abort the session.
    pub fn run_session(&mut self) -> KgResult<Vec<ConsistencyReport>> {
        let rounds = self.config.rounds;
        let mut reports = Vec::with_capacity(rounds);
        for round in 0..rounds {
            match self.run_round() {
                Ok(report) => reports.push(report),
                Err(KeyGhostError::WordSupply(msg)) => {
                    warn!(round, "skipping round: {msg}");
                }
                Err(e) => return Err(e),
            }
            if round + 1 < rounds {
                let rest = uniform(&mut self.rng, 2.0, 5.0);
                self.pause(rest);
            }
        }
        Ok(reports)
    }

    /// Type one word list. Retries (bounded) when the source is unreadable
    /// or nothing got typed; a retried attempt regenerates the profile and
    /// both engines, preserving the per-round timing-signature guarantee.
    pub fn run_round(&mut self) -> KgResult<ConsistencyReport> {
        for attempt in 1..=self.config.max_retries_per_round {
            let Some(mut words) = self.driver.read_words().filter(|w| !w.is_empty()) else {
                warn!(attempt, "word source unreadable, retrying");
                self.pause(self.config.poll_interval);
                continue;
            };

            let profile = Profile::generate(self.config.target_wpm, &mut self.rng)?;
            let mut engine = DynamicsEngine::new(
                &profile,
                words.len(),
                self.config.min_sleep,
                Some(self.rng.u64(..)),
            );
            let mut errors = ErrorEngine::new(&profile, Some(self.rng.u64(..)));
            info!(
                wpm = profile.target_wpm,
                base_delay_ms = profile.base_delay * 1000.0,
                target_consistency = profile.target_consistency,
                words = words.len(),
                "round started"
            );

            let typed = self.run_words(&mut words, &mut engine, &mut errors)?;
            if typed == 0 {
                warn!(attempt, "zero words typed, retrying");
                continue;
            }

            let report = engine.consistency_report();
            if (report.key_consistency - report.target_consistency).abs() > 15.0 {
                warn!(
                    achieved = report.key_consistency,
                    target = report.target_consistency,
                    "consistency target missed"
                );
            }
            info!(
                typed,
                key_consistency = report.key_consistency,
                hold_consistency = report.hold_consistency,
                keystrokes = report.total_keystrokes,
                "round finished"
            );
            return Ok(report);
        }
        Err(KeyGhostError::WordSupply(format!(
            "no words typed after {} attempts",
            self.config.max_retries_per_round
        )))
    }

    /// Type every word in `words`, extending it from the collaborator in
    /// open-ended mode. Returns the number of words typed. A held key is
    /// released on every exit path, including errors.
    pub fn run_words<E: ErrorPolicy>(
        &mut self,
        words: &mut Vec<String>,
        engine: &mut DynamicsEngine<'_>,
        errors: &mut E,
    ) -> KgResult<usize> {
        let mut held = OverlapSlot::default();
        let result = self.words_loop(words, engine, errors, &mut held);
        if held.is_held() {
            if let Err(e) = self.release_held(&mut held) {
                warn!("failed to release held key on exit: {e}");
            }
        }
        result
    }

    fn words_loop<E: ErrorPolicy>(
        &mut self,
        words: &mut Vec<String>,
        engine: &mut DynamicsEngine<'_>,
        errors: &mut E,
        held: &mut OverlapSlot,
    ) -> KgResult<usize> {
        let open_ended = self.config.open_ended;
        let mut typed = 0;
        let mut i = 0;
        while i < words.len() {
            let mut is_last = i + 1 == words.len();

            if open_ended && is_last {
                let fresh = self.poll_for_words(words.len());
                if !fresh.is_empty() {
                    debug!(count = fresh.len(), total = words.len() + fresh.len(), "word supply extended");
                    words.extend(fresh);
                    engine.set_total_words(words.len());
                    is_last = false;
                }
            }

            let word = words[i].clone();
            self.type_word(&word, engine, errors, i, is_last, held)?;
            typed += 1;
            i += 1;

            if open_ended && i % 5 == 0 && self.driver.is_session_complete() {
                debug!(word_index = i, "session completed mid-round");
                break;
            }

            if self.rng.f64() < 0.03 {
                self.mouse_idle();
            }
        }
        self.release_held(held)?;
        Ok(typed)
    }

    /// Wait for the supply to reveal more words, drifting the mouse while
    /// idling. Gives up after the configured retry ceiling.
    fn poll_for_words(&mut self, known: usize) -> Vec<String> {
        let mut fresh = self.driver.read_new_words(known);
        if !fresh.is_empty() || self.driver.is_session_complete() {
            return fresh;
        }
        for _ in 0..self.config.max_retries_per_round {
            self.pause(self.config.poll_interval);
            if self.rng.f64() < 0.3 {
                self.mouse_idle();
            }
            fresh = self.driver.read_new_words(known);
            if !fresh.is_empty() || self.driver.is_session_complete() {
                break;
            }
        }
        fresh
    }

    /// Type a single word: NORMAL until an error triggers, then the
    /// correction sequence for its kind, then back to NORMAL. Ends with an
    /// optional space (omitted for the last word) and a rare thinking pause.
    fn type_word<E: ErrorPolicy>(
        &mut self,
        word: &str,
        engine: &mut DynamicsEngine<'_>,
        errors: &mut E,
        word_index: usize,
        is_last: bool,
        held: &mut OverlapSlot,
    ) -> KgResult<()> {
        engine.word_boundary();
        engine.set_word_context(word);
        let chars: Vec<char> = word.chars().collect();

        // Desired delay is keyDown-to-keyDown, but the previous key's hold
        // was already slept through, so each pre-key sleep is delay minus
        // the hold already spent.
        let mut prev_hold = 0.0_f64;
        let mut i = 0;

        while i < chars.len() {
            let ch = chars[i];

            if errors.should_make_error(ch, i, word, word_index, engine.prev_char()) {
                let kind = errors.get_error_type(ch, i, word);
                debug!(word = %word, index = i, kind = %kind, "error triggered");
                match kind {
                    TypoKind::CommonTypo if i == 0 => {
                        if let Some(typo) = errors.common_typo(word) {
                            self.run_common_typo(engine, errors, held, &chars, typo, &mut prev_hold)?;
                            i = chars.len();
                            continue;
                        }
                        // no dictionary entry after all; type normally
                    }
                    TypoKind::Transpose if i + 1 < chars.len() => {
                        i = self.run_transpose(engine, errors, held, &chars, i, &mut prev_hold)?;
                        continue;
                    }
                    TypoKind::Adjacent => {
                        i = self.run_adjacent(engine, errors, held, &chars, i, &mut prev_hold)?;
                        continue;
                    }
                    TypoKind::Confusion => {
                        i = self.run_confusion(engine, errors, held, ch, i, &mut prev_hold)?;
                        continue;
                    }
                    TypoKind::DoubleTap => {
                        i = self.run_double_tap(engine, errors, held, ch, i, &mut prev_hold)?;
                        continue;
                    }
                    TypoKind::Skip => {
                        engine.note_skipped(ch);
                        i += 1;
                        continue;
                    }
                    // Kind inapplicable at this position; fall through to a
                    // normal keystroke.
                    _ => {}
                }
            }

            let delay = engine.compute_delay(ch);
            let hold = engine.compute_hold(ch);
            // Hold and the two dispatch calls are "inside" the interval.
            let iki = delay - prev_hold - 2.0 * self.config.dispatch_overhead;

            if i > 0 && engine.should_overlap() {
                let overlap = engine.overlap_duration();
                self.pause(iki - overlap);
                self.type_with_overlap(held, ch, hold, overlap)?;
            } else {
                self.pause(iki);
                self.release_held(held)?;
                self.type_char(ch, hold)?;
            }
            prev_hold = hold;
            i += 1;
        }

        self.release_held(held)?;

        if !is_last {
            let p = engine.profile();
            let base_delay = p.base_delay;
            let (gap_lo, gap_hi) = p.space_gap_range;
            let think_chance = p.think_pause_chance;
            let (think_lo, think_hi) = p.think_pause_range;

            let space_delay = base_delay * uniform(&mut self.rng, gap_lo, gap_hi);
            self.pause(space_delay - prev_hold - 2.0 * self.config.dispatch_overhead);
            let space_hold = engine.compute_hold(' ');
            self.type_char(' ', space_hold)?;

            if self.rng.f64() < think_chance {
                let think = base_delay * uniform(&mut self.rng, think_lo, think_hi);
                self.pause(think);
            }
        }
        Ok(())
    }

    // --- Correction handlers, one per error kind ---

    /// Type a known misspelling of the whole word, then (maybe) backspace it
    /// all away and retype from scratch.
    fn run_common_typo<E: ErrorPolicy>(
        &mut self,
        engine: &mut DynamicsEngine<'_>,
        errors: &mut E,
        held: &mut OverlapSlot,
        chars: &[char],
        typo: &str,
        prev_hold: &mut f64,
    ) -> KgResult<()> {
        self.release_held(held)?;
        *prev_hold = 0.0;
        for tc in typo.chars() {
            self.emit_plain(engine, tc, prev_hold)?;
        }
        if errors.should_correct() {
            self.reaction_pause(engine)?;
            let mut count = typo.chars().count();
            if errors.should_over_backspace() {
                count += 1;
            }
            self.backspace_run(engine, count)?;
            engine.reset_word_position();
            *prev_hold = 0.0;
            for &cc in chars {
                self.emit_plain(engine, cc, prev_hold)?;
            }
        }
        Ok(())
    }

    /// Characters i and i+1 swapped, optionally noticed a few characters
    /// late, then backspaced and retyped.
    fn run_transpose<E: ErrorPolicy>(
        &mut self,
        engine: &mut DynamicsEngine<'_>,
        errors: &mut E,
        held: &mut OverlapSlot,
        chars: &[char],
        i: usize,
        prev_hold: &mut f64,
    ) -> KgResult<usize> {
        self.release_held(held)?;
        let delay1 = engine.compute_delay(chars[i + 1]);
        let hold1 = engine.compute_hold(chars[i + 1]);
        self.pause(delay1 - *prev_hold);
        self.type_char(chars[i + 1], hold1)?;
        let delay2 = engine.compute_delay(chars[i]);
        let hold2 = engine.compute_hold(chars[i]);
        self.pause(delay2 - hold1);
        self.type_char(chars[i], hold2)?;
        *prev_hold = hold2;

        if !errors.should_correct() {
            return Ok(i + 2);
        }

        let mut extra = 0;
        if errors.should_delay_notice() && i + 2 < chars.len() {
            let n = errors.delayed_chars_count().min(chars.len() - i - 2);
            for k in 0..n {
                self.emit_plain(engine, chars[i + 2 + k], prev_hold)?;
                extra += 1;
            }
        }

        self.reaction_pause(engine)?;
        let over = errors.should_over_backspace();
        let count = 2 + extra + usize::from(over);
        self.backspace_run(engine, count)?;

        *prev_hold = 0.0;
        let start = if over { i.saturating_sub(1) } else { i };
        let end = (i + 2 + extra).min(chars.len());
        for ci in start..end {
            self.emit_plain(engine, chars[ci], prev_hold)?;
        }
        Ok(i + 2 + extra)
    }

    /// A keyboard-adjacent wrong key, optionally noticed late, backspaced
    /// and retyped.
    fn run_adjacent<E: ErrorPolicy>(
        &mut self,
        engine: &mut DynamicsEngine<'_>,
        errors: &mut E,
        held: &mut OverlapSlot,
        chars: &[char],
        i: usize,
        prev_hold: &mut f64,
    ) -> KgResult<usize> {
        self.release_held(held)?;
        let wrong = errors.adjacent_typo(chars[i]);
        let delay = engine.compute_delay(wrong);
        let hold = engine.compute_hold(wrong);
        self.pause(delay - *prev_hold);
        self.type_char(wrong, hold)?;
        *prev_hold = hold;

        if !errors.should_correct() {
            return Ok(i + 1);
        }

        let mut extra = 0;
        if errors.should_delay_notice() && i + 1 < chars.len() {
            let n = errors.delayed_chars_count().min(chars.len() - i - 1);
            for k in 0..n {
                self.emit_plain(engine, chars[i + 1 + k], prev_hold)?;
                extra += 1;
            }
        }

        self.reaction_pause(engine)?;
        let over = errors.should_over_backspace();
        let count = 1 + extra + usize::from(over);
        self.backspace_run(engine, count)?;

        *prev_hold = 0.0;
        let start = if over { i.saturating_sub(1) } else { i };
        let end = (i + 1 + extra).min(chars.len());
        for ci in start..end {
            self.emit_plain(engine, chars[ci], prev_hold)?;
        }
        Ok(i + 1 + extra)
    }

    /// A commonly-confused key: noticed immediately, single backspace and
    /// retype of only the intended character.
    fn run_confusion<E: ErrorPolicy>(
        &mut self,
        engine: &mut DynamicsEngine<'_>,
        errors: &mut E,
        held: &mut OverlapSlot,
        ch: char,
        i: usize,
        prev_hold: &mut f64,
    ) -> KgResult<usize> {
        self.release_held(held)?;
        let wrong = errors.confusion_typo(ch);
        let delay = engine.compute_delay(wrong);
        let hold = engine.compute_hold(wrong);
        self.pause(delay - *prev_hold);
        self.type_char(wrong, hold)?;

        if errors.should_correct() {
            self.reaction_pause(engine)?;
            self.backspace_run(engine, 1)?;
            let hold2 = engine.compute_hold(ch);
            self.type_char(ch, hold2)?;
            *prev_hold = hold2;
        } else {
            *prev_hold = hold;
        }
        Ok(i + 1)
    }

    /// The intended key typed twice with a short finger-dependent gap;
    /// optionally a single backspace of the duplicate.
    fn run_double_tap<E: ErrorPolicy>(
        &mut self,
        engine: &mut DynamicsEngine<'_>,
        errors: &mut E,
        held: &mut OverlapSlot,
        ch: char,
        i: usize,
        prev_hold: &mut f64,
    ) -> KgResult<usize> {
        self.release_held(held)?;
        let delay = engine.compute_delay(ch);
        let hold = engine.compute_hold(ch);
        self.pause(delay - *prev_hold);
        self.type_char(ch, hold)?;

        let finger_mult = keyboard::finger_hold(keyboard::finger_of(ch));
        let gap = gauss(
            &mut self.rng,
            engine.profile().base_delay * 0.25 * finger_mult,
            0.015,
        );
        self.pause(gap);
        let hold2 = engine.compute_hold(ch);
        self.type_char(ch, hold2)?;

        if errors.should_correct() {
            self.reaction_pause(engine)?;
            let bs_hold = engine.compute_hold('a');
            self.backspace(bs_hold)?;
            *prev_hold = 0.0;
        } else {
            *prev_hold = hold2;
        }
        Ok(i + 1)
    }

    // --- Emission primitives ---

    /// One ordinary keystroke inside a correction sequence: no overlap, no
    /// dispatch-overhead compensation.
    fn emit_plain(
        &mut self,
        engine: &mut DynamicsEngine<'_>,
        ch: char,
        prev_hold: &mut f64,
    ) -> KgResult<()> {
        let delay = engine.compute_delay(ch);
        let hold = engine.compute_hold(ch);
        self.pause(delay - *prev_hold);
        self.type_char(ch, hold)?;
        *prev_hold = hold;
        Ok(())
    }

    fn reaction_pause(&mut self, engine: &DynamicsEngine<'_>) -> KgResult<()> {
        let (lo, hi) = engine.profile().correction_react;
        let react = uniform(&mut self.rng, lo, hi);
        self.pause(react);
        Ok(())
    }

    fn backspace_run(&mut self, engine: &mut DynamicsEngine<'_>, count: usize) -> KgResult<()> {
        let (lo, hi) = engine.profile().backspace_delay;
        for _ in 0..count {
            let hold = engine.compute_hold('a');
            self.backspace(hold)?;
            let gap = uniform(&mut self.rng, lo, hi);
            self.pause(gap);
        }
        Ok(())
    }

    /// Dispatch one character: shift down before and up after when the
    /// character needs it, with small human-scale shift timing.
    fn type_char(&mut self, ch: char, hold: f64) -> KgResult<()> {
        let stroke = KeyStroke::from_char(ch);
        if stroke.shifted {
            let shift = KeyDescriptor::shift_left();
            self.key_down(&shift, MOD_NONE)?;
            let pre = uniform(&mut self.rng, 0.012, 0.035);
            self.pause(pre);
            self.press_key(&stroke.descriptor, hold, MOD_SHIFT)?;
            let post = uniform(&mut self.rng, 0.008, 0.025);
            self.pause(post);
            self.key_up(&shift, MOD_NONE)?;
        } else {
            self.press_key(&stroke.descriptor, hold, MOD_NONE)?;
        }
        Ok(())
    }

    fn backspace(&mut self, hold: f64) -> KgResult<()> {
        self.press_key(&KeyDescriptor::backspace(), hold, MOD_NONE)
    }

    /// Full press: down, hold (compensated for the upcoming up-dispatch), up.
    fn press_key(&mut self, key: &KeyDescriptor, hold: f64, modifiers: u32) -> KgResult<()> {
        self.key_down(key, modifiers)?;
        if hold > 0.0 {
            self.pause(hold - self.config.dispatch_overhead);
        }
        self.key_up(key, modifiers)
    }

    /// True rollover: press the next key while the previous is still down,
    /// release the previous after a brief overlap, keep the next held.
    fn type_with_overlap(
        &mut self,
        held: &mut OverlapSlot,
        ch: char,
        hold: f64,
        overlap: f64,
    ) -> KgResult<()> {
        let stroke = KeyStroke::from_char(ch);
        let modifiers = if stroke.shifted { MOD_SHIFT } else { MOD_NONE };
        if stroke.shifted {
            self.key_down(&KeyDescriptor::shift_left(), MOD_NONE)?;
            let pre = uniform(&mut self.rng, 0.010, 0.025);
            self.pause(pre);
        }
        self.key_down(&stroke.descriptor, modifiers)?;
        self.pause(overlap);
        self.release_held(held)?;
        self.pause(hold - overlap);
        held.set(HeldKey { stroke });
        Ok(())
    }

    fn release_held(&mut self, held: &mut OverlapSlot) -> KgResult<()> {
        if let Some(h) = held.take() {
            let modifiers = if h.stroke.shifted { MOD_SHIFT } else { MOD_NONE };
            self.key_up(&h.stroke.descriptor, modifiers)?;
            if h.stroke.shifted {
                self.key_up(&KeyDescriptor::shift_left(), MOD_NONE)?;
            }
        }
        Ok(())
    }

    fn key_down(&mut self, key: &KeyDescriptor, modifiers: u32) -> KgResult<()> {
        self.driver.dispatch_key(KeyEvent::Down, key, modifiers)
    }

    fn key_up(&mut self, key: &KeyDescriptor, modifiers: u32) -> KgResult<()> {
        self.driver.dispatch_key(KeyEvent::Up, key, modifiers)
    }

    fn pause(&mut self, seconds: f64) {
        self.driver
            .wait(Duration::from_secs_f64(seconds.max(self.config.min_sleep)));
    }

    /// Subtle mouse micro-movements while idle. Best-effort: a failure is
    /// logged and the drift abandoned, never propagated.
    fn mouse_idle(&mut self) {
        let base_x = uniform(&mut self.rng, 700.0, 1100.0);
        let base_y = uniform(&mut self.rng, 400.0, 700.0);
        for _ in 0..self.rng.usize(1..=3) {
            let dx = gauss(&mut self.rng, 0.0, 3.0);
            let dy = gauss(&mut self.rng, 0.0, 3.0);
            if let Err(e) = self
                .driver
                .dispatch_mouse(MouseEvent::Moved, base_x + dx, base_y + dy)
            {
                debug!("mouse idle move failed: {e}");
                return;
            }
            let gap = uniform(&mut self.rng, 0.05, 0.2);
            self.pause(gap);
        }
    }
}
