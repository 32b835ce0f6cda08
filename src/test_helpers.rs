use std::collections::VecDeque;
use std::fs;

use rand::RngCore;
use tempfile::TempDir;

use crate::deck::{Card, Deck};
use crate::error::Result;
use crate::mastery::{Grade, MasteryRule};
use crate::session::{Judgement, Presenter};
use crate::store::DeckStore;

pub(crate) fn temp_store() -> (TempDir, DeckStore) {
    let dir = TempDir::new().unwrap();
    let store = DeckStore::new(dir.path());
    (dir, store)
}

pub(crate) fn write_deck(store: &DeckStore, name: &str, contents: &str) {
    fs::write(store.deck_path(name), contents).unwrap();
}

pub(crate) fn read_deck_file(store: &DeckStore, name: &str) -> String {
    fs::read_to_string(store.deck_path(name)).unwrap()
}

/// Fails the test if the review policy draws at all.
pub(crate) struct PanicRng;

impl RngCore for PanicRng {
    fn next_u32(&mut self) -> u32 {
        panic!("review policy was consulted")
    }

    fn next_u64(&mut self) -> u64 {
        panic!("review policy was consulted")
    }

    fn fill_bytes(&mut self, _dst: &mut [u8]) {
        panic!("review policy was consulted")
    }
}

/// Returns the same word forever.
pub(crate) struct ConstRng(pub u64);

impl RngCore for ConstRng {
    fn next_u32(&mut self) -> u32 {
        (self.0 >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.0
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for (i, byte) in dst.iter_mut().enumerate() {
            *byte = self.0.to_le_bytes()[i % 8];
        }
    }
}

/// Replays canned verdicts and records what the session showed.
pub(crate) struct ScriptedPresenter {
    judgements: VecDeque<Judgement>,
    snapshot_of: Option<(DeckStore, String)>,
    pub shown: Vec<String>,
    pub rules: Vec<MasteryRule>,
    pub graded: Vec<(String, Grade, u32)>,
    /// Deck file contents at each verdict, when enabled.
    pub snapshots: Vec<String>,
}

impl ScriptedPresenter {
    pub(crate) fn new(judgements: impl IntoIterator<Item = Judgement>) -> Self {
        Self {
            judgements: judgements.into_iter().collect(),
            snapshot_of: None,
            shown: Vec::new(),
            rules: Vec::new(),
            graded: Vec::new(),
            snapshots: Vec::new(),
        }
    }

    pub(crate) fn with_snapshots(mut self, store: &DeckStore, deck: &str) -> Self {
        self.snapshot_of = Some((store.clone(), deck.to_owned()));
        self
    }
}

impl Presenter for ScriptedPresenter {
    fn reveal(&mut self, _deck: &Deck, card: &Card) -> Result<()> {
        self.shown.push(card.question().unwrap_or_default().to_owned());
        Ok(())
    }

    fn judge(&mut self, _deck: &Deck, _card: &Card, rule: MasteryRule) -> Result<Judgement> {
        self.rules.push(rule);
        if let Some((store, deck)) = &self.snapshot_of {
            self.snapshots.push(read_deck_file(store, deck));
        }
        Ok(self
            .judgements
            .pop_front()
            .expect("presenter ran out of scripted judgements"))
    }

    fn graded(&mut self, _deck: &Deck, card: &Card, grade: Grade) -> Result<()> {
        self.graded.push((
            card.question().unwrap_or_default().to_owned(),
            grade,
            card.score,
        ));
        Ok(())
    }
}

pub(crate) trait TestHelper {
    fn assert_approx_eq(&self, expected: f64);
}

impl TestHelper for f64 {
    fn assert_approx_eq(&self, expected: f64) {
        assert!(
            (self - expected).abs() < 1e-9,
            "expected {expected}, got {self}"
        );
    }
}
