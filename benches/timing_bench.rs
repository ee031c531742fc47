use criterion::{criterion_group, criterion_main, Criterion};
use fastrand::Rng;
use keyghost::config::DEFAULT_MIN_SLEEP;
use keyghost::dynamics::DynamicsEngine;
use keyghost::profile::Profile;
use std::hint::black_box;

const SAMPLE_TEXT: &str = "the quick brown fox jumps over the lazy dog while people \
    think about what they would type next because practice makes perfect";

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("profile_generate", |b| {
        let mut rng = Rng::with_seed(1);
        b.iter(|| Profile::generate(black_box(110), &mut rng).unwrap())
    });

    let mut rng = Rng::with_seed(2);
    let profile = Profile::generate(110, &mut rng).unwrap();
    let words: Vec<&str> = SAMPLE_TEXT.split_whitespace().collect();

    c.bench_function("delay_hold_stream (24 words)", |b| {
        b.iter(|| {
            let mut engine =
                DynamicsEngine::new(&profile, words.len(), DEFAULT_MIN_SLEEP, Some(3));
            let mut total = 0.0;
            for word in &words {
                engine.set_word_context(word);
                for ch in word.chars() {
                    total += engine.compute_delay(black_box(ch));
                    total += engine.compute_hold(black_box(ch));
                }
                engine.word_boundary();
            }
            total
        })
    });

    c.bench_function("consistency_report (150 samples)", |b| {
        let mut engine = DynamicsEngine::new(&profile, words.len(), DEFAULT_MIN_SLEEP, Some(4));
        for word in &words {
            engine.set_word_context(word);
            for ch in word.chars() {
                engine.compute_delay(ch);
                engine.compute_hold(ch);
            }
            engine.word_boundary();
        }
        b.iter(|| black_box(engine.consistency_report()))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
