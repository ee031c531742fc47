use keyghost::consistency::{inverse, sample_consistency, score};
use proptest::prelude::*;
use rstest::rstest;

#[test]
fn perfect_uniformity_scores_100() {
    assert!((score(0.0) - 100.0).abs() < 1e-9);
}

#[rstest]
#[case(10.0)]
#[case(25.0)]
#[case(50.0)]
#[case(67.5)]
#[case(85.0)]
#[case(99.0)]
fn inverse_round_trips(#[case] target: f64) {
    let cov = inverse(target);
    assert!(
        (score(cov) - target).abs() < 1e-6,
        "score(inverse({})) = {}",
        target,
        score(cov)
    );
}

#[rstest]
#[case(0.1, 0.2)]
#[case(0.2, 0.5)]
#[case(0.5, 1.0)]
#[case(1.0, 2.0)]
fn higher_cov_scores_lower(#[case] lo: f64, #[case] hi: f64) {
    assert!(score(hi) < score(lo));
}

#[test]
fn sample_consistency_matches_direct_formula() {
    // mean 100, population stddev 10 -> cov 0.1
    let values = [90.0, 100.0, 110.0];
    let expected = score((200.0_f64 / 3.0).sqrt() / 100.0);
    assert!((sample_consistency(&values) - expected).abs() < 1e-9);
}

#[test]
fn degenerate_sample_sets() {
    assert_eq!(sample_consistency(&[]), 100.0);
    assert_eq!(sample_consistency(&[42.0]), 100.0);
    assert_eq!(sample_consistency(&[0.0, 0.0, 0.0]), 100.0);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn round_trip_law(target in 1.0..99.0f64) {
        let cov = inverse(target);
        prop_assert!((score(cov) - target).abs() < 1e-6);
    }

    // Restricted to the region where tanh has not saturated to 1.0; past
    // cov ~2.3 the score is exactly 0 and only non-strict ordering holds.
    #[test]
    fn score_monotone_decreasing(a in 0.0..1.5f64, delta in 0.01..0.5f64) {
        prop_assert!(score(a + delta) < score(a));
    }

    #[test]
    fn score_bounded(cov in 0.0..100.0f64) {
        let s = score(cov);
        prop_assert!((0.0..=100.0).contains(&s));
    }
}
