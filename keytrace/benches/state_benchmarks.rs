use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use keytrace::{
    Configuration, Duration, ErrorCountingPolicy, Instant, TargetText, TypingSession, TypingState,
};

const WORDS: &[&str] = &[
    "the", "quick", "brown", "fox", "jumps", "over", "lazy", "dog", "while", "typing",
];

fn generate_text(word_count: usize) -> String {
    (0..word_count)
        .map(|i| WORDS[i % WORDS.len()])
        .collect::<Vec<_>>()
        .join(" ")
}

fn benchmark_state_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("state_insert");

    for word_count in [10, 100, 1000] {
        let text = TargetText::new(&generate_text(word_count)).unwrap();
        // Every tenth keystroke is wrong
        let input: Vec<char> = text
            .iter()
            .enumerate()
            .map(|(i, &c)| if i % 10 == 9 { 'x' } else { c })
            .collect();

        group.bench_with_input(
            BenchmarkId::new("type_text", format!("{}words", word_count)),
            &(text, input),
            |b, (text, input)| {
                b.iter(|| {
                    let mut state = TypingState::new(text.clone(), ErrorCountingPolicy::CountOnce);
                    let start = Instant::now();
                    for &c in input {
                        state.insert_at(black_box(Some(c)), start);
                    }
                    black_box(state.counts())
                })
            },
        );
    }

    group.finish();
}

fn benchmark_state_delete(c: &mut Criterion) {
    let mut group = c.benchmark_group("state_delete");

    let text = TargetText::new(&generate_text(100)).unwrap();
    let typed = text.len() - 1;

    for whole_word in [false, true] {
        group.bench_with_input(
            BenchmarkId::new("delete_all", if whole_word { "word" } else { "char" }),
            &whole_word,
            |b, &whole_word| {
                b.iter(|| {
                    let mut state = TypingState::new(text.clone(), ErrorCountingPolicy::CountOnce);
                    for &c in &text[..typed] {
                        state.insert(Some(c));
                    }
                    while state.delete(black_box(whole_word)).is_some() {}
                    black_box(state.cursor())
                })
            },
        );
    }

    group.finish();
}

fn benchmark_session_replay(c: &mut Criterion) {
    let mut group = c.benchmark_group("session_replay");

    for word_buffered_input in [false, true] {
        let text = generate_text(200);
        let config = Configuration {
            word_buffered_input,
            ..Default::default()
        };
        let label = if word_buffered_input { "buffered" } else { "per_char" };

        group.bench_with_input(
            BenchmarkId::new("full_session", label),
            &(text, config),
            |b, (text, config)| {
                b.iter(|| {
                    let mut session = TypingSession::new(text, config.clone()).unwrap();
                    let start = Instant::now();

                    // 60ms per keystroke with a clock tick every second
                    for (i, c) in text.chars().enumerate() {
                        let now = start + Duration::from_millis(i as u64 * 60);
                        if i % 17 == 0 {
                            session.second_elapsed_at(now);
                        }
                        session.character_typed_at(c, now);
                    }
                    session.session_force_ended_at(start + Duration::from_secs(120));

                    black_box(session.final_result())
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_state_insert,
    benchmark_state_delete,
    benchmark_session_replay
);
criterion_main!(benches);
