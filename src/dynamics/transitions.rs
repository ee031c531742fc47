//! Finger/key relationship classification between consecutive keystrokes.
//!
//! Exactly one adjustment applies per transition, chosen by specificity, so
//! a same-finger bigram is never additionally penalized as a generic
//! same-finger move. The ordered match below is the precedence rule.

use crate::keyboard;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    /// Same literal key repeated. Strongest penalty.
    SameKey,
    /// Both keys in the same column group (e.g. "ed").
    SameFingerBigram,
    /// Same finger, not a known column pair.
    SameFinger,
    /// Hands alternate. The one bonus case.
    HandAlternation,
    /// Same hand, different finger. Mild penalty.
    SameHand,
    /// First keystroke of a round; no previous key.
    Start,
}

pub fn classify(prev: Option<char>, prev_finger: Option<u8>, next: char, next_finger: u8) -> TransitionKind {
    let (Some(prev), Some(prev_finger)) = (prev, prev_finger) else {
        return TransitionKind::Start;
    };

    if prev.eq_ignore_ascii_case(&next) {
        TransitionKind::SameKey
    } else if keyboard::is_same_finger_pair(prev, next) {
        TransitionKind::SameFingerBigram
    } else if prev_finger == next_finger && next_finger != 8 {
        TransitionKind::SameFinger
    } else if !keyboard::same_hand(prev_finger, next_finger) {
        TransitionKind::HandAlternation
    } else {
        TransitionKind::SameHand
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::finger_of;
    use rstest::rstest;

    fn classify_chars(prev: char, next: char) -> TransitionKind {
        classify(Some(prev), Some(finger_of(prev)), next, finger_of(next))
    }

    #[rstest]
    #[case('e', 'e', TransitionKind::SameKey)]
    #[case('e', 'E', TransitionKind::SameKey)]
    #[case('e', 'd', TransitionKind::SameFingerBigram)]
    #[case('r', 'b', TransitionKind::SameFingerBigram)]
    #[case('4', '5', TransitionKind::SameFinger)] // digits excluded from bigram set
    #[case('f', 'j', TransitionKind::HandAlternation)]
    #[case('a', 's', TransitionKind::SameHand)]
    fn precedence(#[case] prev: char, #[case] next: char, #[case] expected: TransitionKind) {
        assert_eq!(classify_chars(prev, next), expected);
    }

    #[test]
    fn no_history_is_start() {
        assert_eq!(classify(None, None, 'a', finger_of('a')), TransitionKind::Start);
    }

    #[test]
    fn space_transitions_never_same_finger() {
        // Thumb belongs to neither hand, so space always alternates.
        assert_eq!(classify_chars(' ', 'h'), TransitionKind::HandAlternation);
        assert_eq!(classify_chars('h', ' '), TransitionKind::HandAlternation);
    }
}
