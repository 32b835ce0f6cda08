use std::fmt;

use log::warn;
use serde::Serialize;
use snafu::ResultExt;

use crate::error::{JsonSnafu, Result};
use crate::mastery::{MAX_SCORE, MIN_SCORE};
use crate::store::DeckStore;

/// Share of mastery credited to a card in each box, box 1 first.
pub const COMPLETENESS: [f64; 5] = [0.2, 0.4, 0.6, 0.8, 1.0];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeckStatistics {
    pub deck: String,
    /// Cards per box, box 1 first.
    pub score_counts: [usize; 5],
    pub total_cards: usize,
    /// Rows whose score is not a whole number from 1 to 5.
    pub skipped: usize,
    /// Overall completeness in percent.
    pub completeness: f64,
}

impl DeckStatistics {
    pub fn from_raw_scores<I, S>(deck: &str, scores: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut score_counts = [0; 5];
        let mut skipped = 0;
        for raw in scores {
            let raw = raw.as_ref();
            match raw.trim().parse::<u32>() {
                Ok(score) if (MIN_SCORE..=MAX_SCORE).contains(&score) => {
                    score_counts[(score - MIN_SCORE) as usize] += 1;
                }
                _ => {
                    warn!("deck '{deck}': invalid score '{raw}' skipped");
                    skipped += 1;
                }
            }
        }

        let total_cards: usize = score_counts.iter().sum();
        let credited: f64 = score_counts
            .iter()
            .zip(COMPLETENESS)
            .map(|(&count, weight)| count as f64 * weight)
            .sum();
        let completeness = if total_cards > 0 {
            credited / total_cards as f64 * 100.0
        } else {
            0.0
        };

        Self {
            deck: deck.to_owned(),
            score_counts,
            total_cards,
            skipped,
            completeness,
        }
    }

    /// Cards currently in box `score`.
    pub fn count(&self, score: u32) -> usize {
        score
            .checked_sub(MIN_SCORE)
            .and_then(|i| self.score_counts.get(i as usize))
            .copied()
            .unwrap_or(0)
    }

    /// The same report as a JSON object, for scripts.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context(JsonSnafu { deck: &self.deck })
    }
}

impl fmt::Display for DeckStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Number of cards with score:")?;
        for score in MIN_SCORE..=MAX_SCORE {
            writeln!(f, "{score}: {}", self.count(score))?;
        }
        writeln!(f, "Number of cards in deck: {}", self.total_cards)?;
        if self.skipped > 0 {
            writeln!(f, "Rows skipped for invalid scores: {}", self.skipped)?;
        }
        write!(f, "Overall completeness: {:.2}%", self.completeness)
    }
}

/// Box counts and completeness for a deck, read straight from its file without repair.
pub fn generate_statistics(store: &DeckStore, deck: &str) -> Result<DeckStatistics> {
    let scores = store.read_raw_scores(deck)?;
    Ok(DeckStatistics::from_raw_scores(deck, scores))
}
