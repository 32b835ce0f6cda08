use std::path::PathBuf;

use snafu::Snafu;

#[derive(Snafu, Debug)]
#[snafu(visibility(pub(crate)))]
pub enum ShankyError {
    #[snafu(display("Deck '{deck}' does not exist."))]
    DeckNotFound { deck: String },
    #[snafu(display("Deck '{deck}' is empty or corrupt."))]
    EmptyDeck { deck: String },
    #[snafu(display(
        "Deck '{deck}' has a row with {found} field(s) on line {line}, expected {expected}."
    ))]
    SchemaMismatch {
        deck: String,
        line: u64,
        expected: u64,
        found: u64,
    },
    #[snafu(display("Deck '{deck}' has no question field, only a score column."))]
    NoQuestionField { deck: String },
    #[snafu(display("Deck '{deck}' has no score column."))]
    MissingScoreColumn { deck: String },
    #[snafu(display("Invalid rating '{value}', expected a number from 0 to 5."))]
    InvalidRating { value: String },
    #[snafu(display("No cards to save for deck '{deck}'."))]
    EmptyWrite { deck: String },
    #[snafu(display("Error loading deck '{deck}': {source}"))]
    Read { deck: String, source: csv::Error },
    #[snafu(display("Error saving deck '{deck}': {source}"))]
    Write { deck: String, source: csv::Error },
    #[snafu(display("I/O error on '{}': {source}", path.display()))]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Error saving deck '{deck}': {source}"))]
    Persist {
        deck: String,
        source: tempfile::PersistError,
    },
    #[snafu(display("Could not encode statistics for deck '{deck}': {source}"))]
    Json {
        deck: String,
        source: serde_json::Error,
    },
    #[snafu(display("Prompt failed: {source}"))]
    Prompt { source: std::io::Error },
}

pub type Result<T, E = ShankyError> = std::result::Result<T, E>;
