use fastrand::Rng;
use keyghost::config::DEFAULT_MIN_SLEEP;
use keyghost::dynamics::DynamicsEngine;
use keyghost::profile::Profile;
use proptest::prelude::*;
use rstest::rstest;

const WORDS: &[&str] = &[
    "the", "quick", "brown", "fox", "jumps", "over", "lazy", "dog", "and", "then", "some", "more",
    "words", "follow", "after", "that", "with", "plenty", "of", "variety", "because", "people",
    "never", "type", "just", "one", "thing", "for", "very", "long", "time", "being", "there",
    "about", "which", "would", "could", "other", "into", "than", "them", "these", "also", "make",
    "work", "life", "world", "still", "through", "years", "where", "much", "before", "right",
    "think", "even", "back", "good", "well", "down",
];

fn engine_for<'p>(profile: &'p Profile, seed: u64) -> DynamicsEngine<'p> {
    DynamicsEngine::new(profile, WORDS.len(), DEFAULT_MIN_SLEEP, Some(seed))
}

/// Run every word through the engine the way the typing loop does.
fn type_all(engine: &mut DynamicsEngine<'_>) {
    for word in WORDS {
        engine.set_word_context(word);
        for ch in word.chars() {
            engine.compute_delay(ch);
            engine.compute_hold(ch);
        }
        engine.compute_delay(' ');
        engine.compute_hold(' ');
        engine.word_boundary();
    }
}

#[test]
fn bookkeeping_counts_every_keystroke() {
    let mut rng = Rng::with_seed(11);
    let profile = Profile::generate(110, &mut rng).unwrap();
    let mut engine = engine_for(&profile, 11);
    type_all(&mut engine);

    let expected: usize = WORDS.iter().map(|w| w.chars().count() + 1).sum();
    assert_eq!(engine.total_chars(), expected);
    assert_eq!(engine.delay_samples().len(), expected);
    assert_eq!(engine.hold_samples().len(), expected);
}

#[rstest]
#[case(50)]
#[case(110)]
#[case(200)]
fn delays_respect_floor_and_ceiling(#[case] wpm: u32) {
    let mut rng = Rng::with_seed(13);
    let profile = Profile::generate(wpm, &mut rng).unwrap();
    let mut engine = engine_for(&profile, 13);
    type_all(&mut engine);

    for &delay_ms in engine.delay_samples() {
        let delay = delay_ms / 1000.0;
        assert!(
            delay >= DEFAULT_MIN_SLEEP - 1e-12,
            "delay {} below floor",
            delay
        );
        assert!(
            delay <= profile.base_delay * 2.0 + 1e-12,
            "delay {} above 2x base {}",
            delay,
            profile.base_delay
        );
    }
}

#[rstest]
#[case(50)]
#[case(110)]
#[case(200)]
fn holds_respect_profile_bounds(#[case] wpm: u32) {
    let mut rng = Rng::with_seed(17);
    let profile = Profile::generate(wpm, &mut rng).unwrap();
    let mut engine = engine_for(&profile, 17);
    type_all(&mut engine);

    for &hold_ms in engine.hold_samples() {
        let hold = hold_ms / 1000.0;
        assert!(hold >= profile.hold_min - 1e-12);
        assert!(hold <= profile.hold_max + 1e-12);
    }
}

#[test]
fn skipped_char_advances_history_without_samples() {
    let mut rng = Rng::with_seed(19);
    let profile = Profile::generate(110, &mut rng).unwrap();
    let mut engine = engine_for(&profile, 19);

    engine.set_word_context("cat");
    engine.compute_delay('c');
    engine.compute_hold('c');
    engine.note_skipped('a');

    assert_eq!(engine.prev_char(), Some('a'));
    assert_eq!(engine.total_chars(), 1);
    assert_eq!(engine.delay_samples().len(), 1);
    assert_eq!(engine.hold_samples().len(), 1);
}

#[test]
fn overlap_duration_stays_in_profile_window() {
    let mut rng = Rng::with_seed(23);
    let profile = Profile::generate(200, &mut rng).unwrap();
    let mut engine = engine_for(&profile, 23);
    for _ in 0..500 {
        let d = engine.overlap_duration();
        assert!(d >= profile.overlap_time.0 && d <= profile.overlap_time.1);
    }
}

#[test]
fn overlap_rate_tracks_profile_chance() {
    let mut rng = Rng::with_seed(29);
    let profile = Profile::generate(200, &mut rng).unwrap();
    let mut engine = engine_for(&profile, 29);
    let hits = (0..10_000).filter(|_| engine.should_overlap()).count();
    let rate = hits as f64 / 10_000.0;
    assert!(
        (rate - profile.overlap_chance).abs() < 0.03,
        "rate {} vs chance {}",
        rate,
        profile.overlap_chance
    );
}

#[test]
fn report_rounds_to_two_decimals() {
    let mut rng = Rng::with_seed(31);
    let profile = Profile::generate(110, &mut rng).unwrap();
    let mut engine = engine_for(&profile, 31);
    type_all(&mut engine);

    let report = engine.consistency_report();
    assert_eq!(report.total_keystrokes, engine.total_chars());
    for v in [
        report.key_consistency,
        report.hold_consistency,
        report.target_consistency,
    ] {
        assert!((v * 100.0 - (v * 100.0).round()).abs() < 1e-9);
        assert!((0.0..=100.0).contains(&v));
    }
}

/// Over a full round the achieved key consistency should land near the
/// profile's target. Individual seeds wander, so require a majority.
#[test]
fn achieved_consistency_lands_near_target() {
    let mut in_band = 0;
    let seeds = [101u64, 202, 303, 404, 505, 606];
    for &seed in &seeds {
        let mut rng = Rng::with_seed(seed);
        let profile = Profile::generate(110, &mut rng).unwrap();
        let mut engine = engine_for(&profile, seed.wrapping_mul(7));
        type_all(&mut engine);
        let report = engine.consistency_report();
        if (report.key_consistency - report.target_consistency).abs() <= 15.0 {
            in_band += 1;
        }
    }
    assert!(
        in_band >= 4,
        "only {}/{} seeds landed within 15 points of target",
        in_band,
        seeds.len()
    );
}

prop_compose! {
    fn speed_and_seed()(wpm in 40u32..240, seed in 0u64..1_000_000) -> (u32, u64) {
        (wpm, seed)
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn clamps_hold_for_any_speed((wpm, seed) in speed_and_seed()) {
        let mut rng = Rng::with_seed(seed);
        let profile = Profile::generate(wpm, &mut rng).unwrap();
        let mut engine = DynamicsEngine::new(&profile, 3, DEFAULT_MIN_SLEEP, Some(seed));
        for word in ["the", "quartz", "it"] {
            engine.set_word_context(word);
            for ch in word.chars() {
                let d = engine.compute_delay(ch);
                prop_assert!(d >= DEFAULT_MIN_SLEEP - 1e-12);
                prop_assert!(d <= profile.base_delay * 2.0 + 1e-12);
                let h = engine.compute_hold(ch);
                prop_assert!(h >= profile.hold_min - 1e-12);
                prop_assert!(h <= profile.hold_max + 1e-12);
            }
            engine.word_boundary();
        }
    }
}
