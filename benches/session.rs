use criterion::{Criterion, criterion_group, criterion_main};
use shanky::{
    Card, CountSpec, Deck, DeckStore, FlushPolicy, Grade, Judgement, MasteryRule, Presenter,
    Result, ReviewPolicy, Schema, SessionConfig, review_order, run_session,
};
use std::hint::black_box;

const DECK_SIZE: usize = 10_000;

struct AlwaysCorrect;

impl Presenter for AlwaysCorrect {
    fn reveal(&mut self, _deck: &Deck, _card: &Card) -> Result<()> {
        Ok(())
    }

    fn judge(&mut self, _deck: &Deck, _card: &Card, _rule: MasteryRule) -> Result<Judgement> {
        Ok(Judgement::Graded(Grade::Correct))
    }
}

fn cards() -> Vec<Card> {
    (0..DECK_SIZE)
        .map(|i| Card::new(vec![format!("q{i}"), format!("a{i}")], (i % 5) as u32 + 1))
        .collect()
}

pub(crate) fn sweep_admissions(cards: &[Card], policy: &mut ReviewPolicy) -> usize {
    review_order(cards)
        .into_iter()
        .filter(|&i| policy.should_review(cards[i].score))
        .count()
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let cards = cards();
    let mut policy = ReviewPolicy::from_seed(42);
    c.bench_function("sweep_admissions", |b| {
        b.iter(|| black_box(sweep_admissions(&cards, &mut policy)))
    });

    let dir = tempfile::tempdir().unwrap();
    let store = DeckStore::new(dir.path());
    let deck = Deck::new("bench", Schema::from_header(["q", "a", "score"]), cards);
    let config = SessionConfig {
        flush: FlushPolicy::EndOfSession,
        ..Default::default()
    };
    c.bench_function("session_100_cards", |b| {
        b.iter(|| {
            store.save(&deck).unwrap();
            let mut policy = ReviewPolicy::from_seed(7);
            black_box(
                run_session(
                    &store,
                    "bench",
                    CountSpec::Exactly(100),
                    &config,
                    &mut policy,
                    &mut AlwaysCorrect,
                )
                .unwrap(),
            )
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
