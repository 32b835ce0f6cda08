mod commands;
mod deck;
mod error;
mod mastery;
mod policy;
mod session;
mod statistics;
mod store;
pub mod terminal;
#[cfg(test)]
mod test_helpers;

pub use commands::{ResetReport, Shanky};
pub use deck::{Card, Deck, SCORE_FIELD, Schema};
pub use error::{Result, ShankyError};
pub use mastery::{
    Grade, MAX_SCORE, MIN_SCORE, MasteryRule, Rating, graduated_score_update, update_score,
};
pub use policy::{ReviewPolicy, admission_probability, review_order};
pub use session::{
    CountSpec, DEFAULT_COUNT, FlushPolicy, Judgement, Presenter, SessionConfig, SessionEnd,
    SessionSummary, run_session,
};
pub use statistics::{COMPLETENESS, DeckStatistics, generate_statistics};
pub use store::{DeckStore, repair_score};
