//! CSV-backed deck storage.
//!
//! One file per deck, `<root>/<name>.csv`, header row first. Loads repair the score
//! column; saves rewrite the whole file through a temporary file and a rename, so an
//! interrupted save never leaves a truncated deck behind.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use itertools::Itertools;
use log::{debug, info};
use snafu::{ResultExt, ensure};
use tempfile::NamedTempFile;

use crate::deck::{Card, Deck, SCORE_FIELD, Schema};
use crate::error::{
    DeckNotFoundSnafu, EmptyDeckSnafu, EmptyWriteSnafu, IoSnafu, MissingScoreColumnSnafu,
    PersistSnafu, Result, SchemaMismatchSnafu, ShankyError, WriteSnafu,
};
use crate::mastery::MIN_SCORE;

const DECK_EXTENSION: &str = "csv";

/// Coerces a raw score cell to a valid mastery level.
///
/// Missing, non-numeric and sub-1 values all become 1. Values above the mastery ceiling
/// are left alone.
pub fn repair_score(raw: Option<&str>) -> u32 {
    raw.and_then(|value| value.trim().parse::<u32>().ok())
        .filter(|&score| score >= MIN_SCORE)
        .unwrap_or(MIN_SCORE)
}

#[derive(Debug, Clone)]
pub struct DeckStore {
    root: PathBuf,
}

impl DeckStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn deck_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.{DECK_EXTENSION}"))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.deck_path(name).is_file()
    }

    /// Names of every deck in the storage directory, sorted.
    ///
    /// A storage directory that does not exist yet holds no decks.
    pub fn list(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(ShankyError::Io {
                    path: self.root.clone(),
                    source,
                });
            }
        };
        let mut paths = Vec::new();
        for entry in entries {
            paths.push(entry.context(IoSnafu { path: &self.root })?.path());
        }
        Ok(paths
            .into_iter()
            .filter(|path| path.is_file())
            .filter(|path| path.extension().is_some_and(|ext| ext == DECK_EXTENSION))
            .filter_map(|path| path.file_stem()?.to_str().map(str::to_owned))
            .sorted()
            .collect())
    }

    /// Reads a deck, repairing every score on the way in.
    pub fn load(&self, name: &str) -> Result<Deck> {
        let path = self.deck_path(name);
        ensure!(path.is_file(), DeckNotFoundSnafu { deck: name });

        let mut reader = csv::Reader::from_path(&path).map_err(|e| read_error(name, e))?;
        let header = reader.headers().map_err(|e| read_error(name, e))?.clone();
        let has_score = header.iter().any(|field| field == SCORE_FIELD);
        let schema = Schema::from_header(header.iter());

        let mut cards = Vec::new();
        let mut repaired = 0;
        for record in reader.records() {
            let record = record.map_err(|e| read_error(name, e))?;
            let mut content = Vec::with_capacity(schema.content_fields().len());
            let mut raw_score = None;
            for (i, value) in record.iter().enumerate() {
                if has_score && i == schema.score_position() {
                    raw_score = Some(value);
                } else {
                    content.push(value.to_owned());
                }
            }
            let score = repair_score(raw_score);
            if raw_score != Some(score.to_string().as_str()) {
                repaired += 1;
            }
            cards.push(Card::new(content, score));
        }
        ensure!(!cards.is_empty(), EmptyDeckSnafu { deck: name });

        if repaired > 0 {
            debug!("deck '{name}': repaired {repaired} score value(s)");
        }
        info!("loaded deck '{name}' with {} card(s)", cards.len());
        Ok(Deck::new(name, schema, cards))
    }

    /// Rewrites the deck file completely: header, then every card in order.
    pub fn save(&self, deck: &Deck) -> Result<()> {
        ensure!(!deck.is_empty(), EmptyWriteSnafu { deck: &deck.name });
        let expected = deck.schema.content_fields().len();
        if let Some((i, card)) = deck
            .cards
            .iter()
            .find_position(|card| card.content.len() != expected)
        {
            return SchemaMismatchSnafu {
                deck: &deck.name,
                line: i as u64 + 2,
                expected: deck.schema.width() as u64,
                found: card.content.len() as u64 + 1,
            }
            .fail();
        }

        fs::create_dir_all(&self.root).context(IoSnafu { path: &self.root })?;
        let path = self.deck_path(&deck.name);
        let mut file = NamedTempFile::new_in(&self.root).context(IoSnafu { path: &self.root })?;
        {
            let mut writer = csv::Writer::from_writer(file.as_file_mut());
            writer
                .write_record(deck.schema.header())
                .context(WriteSnafu { deck: &deck.name })?;
            for card in &deck.cards {
                writer
                    .write_record(card.to_record(&deck.schema))
                    .context(WriteSnafu { deck: &deck.name })?;
            }
            writer.flush().context(IoSnafu { path: &path })?;
        }
        file.as_file_mut().flush().context(IoSnafu { path: &path })?;
        // the temporary file starts out owner-only; keep the deck's existing mode
        if let Ok(meta) = fs::metadata(&path) {
            fs::set_permissions(file.path(), meta.permissions())
                .context(IoSnafu { path: &path })?;
        }
        file.persist(&path).context(PersistSnafu { deck: &deck.name })?;

        info!("saved deck '{}' with {} card(s)", deck.name, deck.len());
        Ok(())
    }

    /// Score cells exactly as stored, without any repair.
    pub fn read_raw_scores(&self, name: &str) -> Result<Vec<String>> {
        let path = self.deck_path(name);
        ensure!(path.is_file(), DeckNotFoundSnafu { deck: name });

        let mut reader = csv::Reader::from_path(&path).map_err(|e| read_error(name, e))?;
        let Some(position) = reader
            .headers()
            .map_err(|e| read_error(name, e))?
            .iter()
            .position(|field| field == SCORE_FIELD)
        else {
            return MissingScoreColumnSnafu { deck: name }.fail();
        };

        let mut scores = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| read_error(name, e))?;
            scores.push(record.get(position).unwrap_or_default().to_owned());
        }
        Ok(scores)
    }
}

fn read_error(deck: &str, source: csv::Error) -> ShankyError {
    if let csv::ErrorKind::UnequalLengths {
        pos,
        expected_len,
        len,
    } = source.kind()
    {
        return ShankyError::SchemaMismatch {
            deck: deck.to_owned(),
            line: pos.as_ref().map_or(0, |p| p.line()),
            expected: *expected_len,
            found: *len,
        };
    }
    ShankyError::Read {
        deck: deck.to_owned(),
        source,
    }
}
