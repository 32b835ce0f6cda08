use log::{info, warn};
use rand::Rng;
use rand::rngs::StdRng;

use crate::error::{Result, ShankyError};
use crate::mastery::MIN_SCORE;
use crate::policy::ReviewPolicy;
use crate::session::{CountSpec, Presenter, SessionConfig, SessionSummary, run_session};
use crate::statistics::{DeckStatistics, generate_statistics};
use crate::store::DeckStore;

/// Outcome of resetting every deck in the store.
#[derive(Debug, Default)]
pub struct ResetReport {
    /// Deck name and number of cards reset.
    pub reset: Vec<(String, usize)>,
    pub failed: Vec<(String, ShankyError)>,
}

/// The operator-facing entry points, bound to one deck directory.
#[derive(Debug)]
pub struct Shanky<R = StdRng> {
    store: DeckStore,
    policy: ReviewPolicy<R>,
    config: SessionConfig,
}

impl Shanky<StdRng> {
    pub fn new(store: DeckStore, config: SessionConfig) -> Self {
        Self::with_policy(store, ReviewPolicy::from_os_rng(), config)
    }

    /// Reproducible admissions for a given seed.
    pub fn with_seed(store: DeckStore, config: SessionConfig, seed: u64) -> Self {
        Self::with_policy(store, ReviewPolicy::from_seed(seed), config)
    }
}

impl<R: Rng> Shanky<R> {
    pub fn with_policy(store: DeckStore, policy: ReviewPolicy<R>, config: SessionConfig) -> Self {
        Self {
            store,
            policy,
            config,
        }
    }

    pub fn store(&self) -> &DeckStore {
        &self.store
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn list_decks(&self) -> Result<Vec<String>> {
        self.store.list()
    }

    pub fn practice<P>(
        &mut self,
        deck: &str,
        count: CountSpec,
        presenter: &mut P,
    ) -> Result<SessionSummary>
    where
        P: Presenter + ?Sized,
    {
        run_session(
            &self.store,
            deck,
            count,
            &self.config,
            &mut self.policy,
            presenter,
        )
    }

    /// Puts every card of `deck` back in the first box. Returns the number of cards.
    pub fn reset_deck(&self, deck: &str) -> Result<usize> {
        let mut loaded = self.store.load(deck)?;
        for card in &mut loaded.cards {
            card.score = MIN_SCORE;
        }
        self.store.save(&loaded)?;
        info!("reset {} card(s) in deck '{deck}'", loaded.len());
        Ok(loaded.len())
    }

    /// Resets every deck in the store, carrying on past decks that fail.
    pub fn reset_all_decks(&self) -> Result<ResetReport> {
        let mut report = ResetReport::default();
        for deck in self.store.list()? {
            match self.reset_deck(&deck) {
                Ok(cards) => report.reset.push((deck, cards)),
                Err(err) => {
                    warn!("could not reset deck '{deck}': {err}");
                    report.failed.push((deck, err));
                }
            }
        }
        Ok(report)
    }

    pub fn generate_statistics(&self, deck: &str) -> Result<DeckStatistics> {
        generate_statistics(&self.store, deck)
    }
}
