//! Runs a few automated practice sessions over a throwaway deck and prints how the
//! boxes fill up. The simulated learner recalls a card in box `n` with chance
//! `0.5 + 0.1 * n`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use shanky::{
    Card, CountSpec, Deck, DeckStore, Grade, Judgement, MasteryRule, Presenter, Result,
    SessionConfig, Shanky,
};

struct Learner {
    rng: StdRng,
}

impl Presenter for Learner {
    fn reveal(&mut self, _deck: &Deck, _card: &Card) -> Result<()> {
        Ok(())
    }

    fn judge(&mut self, _deck: &Deck, card: &Card, _rule: MasteryRule) -> Result<Judgement> {
        let recall = 0.5 + 0.1 * f64::from(card.score);
        Ok(Judgement::Graded(if self.rng.random_bool(recall.min(1.0)) {
            Grade::Correct
        } else {
            Grade::Incorrect
        }))
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let store = DeckStore::new(dir.path());
    let mut contents = String::from("number,word,score\n");
    for (i, word) in ["one", "two", "three", "four", "five", "six", "seven", "eight"]
        .iter()
        .enumerate()
    {
        contents.push_str(&format!("{},{word},1\n", i + 1));
    }
    std::fs::write(store.deck_path("numbers"), contents)?;

    let mut shanky = Shanky::with_seed(store, SessionConfig::default(), 42);
    let mut learner = Learner {
        rng: StdRng::seed_from_u64(7),
    };

    for day in 1..=10 {
        let summary = shanky.practice("numbers", CountSpec::Exactly(5), &mut learner)?;
        let stats = shanky.generate_statistics("numbers")?;
        println!(
            "day {day:>2}: {} card(s) in {} sweep(s), boxes {:?}, completeness {:.2}%",
            summary.practiced, summary.sweeps, stats.score_counts, stats.completeness
        );
    }

    Ok(())
}
