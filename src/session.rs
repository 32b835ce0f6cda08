use std::fmt;

use log::info;
use rand::Rng;
use snafu::ensure;
use strum::{Display, EnumString};

use crate::deck::{Card, Deck};
use crate::error::{NoQuestionFieldSnafu, Result};
use crate::mastery::{Grade, MAX_SCORE, MasteryRule};
use crate::policy::{ReviewPolicy, review_order};
use crate::store::DeckStore;

pub const DEFAULT_COUNT: usize = 10;

/// How many presentations the operator asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CountSpec {
    /// One presentation per card in the deck (`a`).
    All,
    Exactly(usize),
    /// Anything unparsable, or no answer at all.
    #[default]
    Default,
}

impl CountSpec {
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if input.eq_ignore_ascii_case("a") {
            Self::All
        } else if !input.is_empty() && input.bytes().all(|b| b.is_ascii_digit()) {
            input.parse().map_or(Self::Default, Self::Exactly)
        } else {
            Self::Default
        }
    }

    pub fn resolve(self, deck_size: usize, default_count: usize) -> usize {
        match self {
            Self::All => deck_size,
            Self::Exactly(n) => n,
            Self::Default => default_count,
        }
    }
}

impl From<&str> for CountSpec {
    fn from(input: &str) -> Self {
        Self::parse(input)
    }
}

/// When graded scores reach the deck file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum FlushPolicy {
    /// Rewrite the deck after every graded card; an interruption loses at most the card
    /// on screen.
    #[default]
    EveryCard,
    /// Rewrite once, when the session ends or is aborted.
    EndOfSession,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub default_count: usize,
    pub rule: MasteryRule,
    pub flush: FlushPolicy,
    /// Upper bound on sweeps; `None` keeps sweeping until the target is met.
    pub max_sweeps: Option<usize>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_count: DEFAULT_COUNT,
            rule: MasteryRule::default(),
            flush: FlushPolicy::default(),
            max_sweeps: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Judgement {
    Graded(Grade),
    Abort,
}

/// The operator side of a session. Both prompts block until the operator answers.
pub trait Presenter {
    /// Shows the question side and waits until the operator asks for the answer.
    fn reveal(&mut self, deck: &Deck, card: &Card) -> Result<()>;

    /// Shows the answer side and the current score, then collects a verdict.
    fn judge(&mut self, deck: &Deck, card: &Card, rule: MasteryRule) -> Result<Judgement>;

    /// Called once the new score is applied, before it is persisted.
    fn graded(&mut self, _deck: &Deck, _card: &Card, _grade: Grade) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The requested number of cards was practiced.
    Completed,
    /// The operator left mid-card.
    Aborted,
    /// Every card was already in the top box; nothing was shown.
    Mastered,
    /// `max_sweeps` ran out before the target was met.
    SweepLimit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub deck: String,
    pub target: usize,
    pub practiced: usize,
    pub sweeps: usize,
    pub end: SessionEnd,
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end {
            SessionEnd::Mastered => write!(
                f,
                "All the cards in deck '{}' are practiced to perfection! \
                 You can reset the deck if you want to practice it again.",
                self.deck
            ),
            SessionEnd::Aborted => write!(
                f,
                "Practice session for deck '{}' stopped. You practiced {} card(s).",
                self.deck, self.practiced
            ),
            SessionEnd::Completed | SessionEnd::SweepLimit => write!(
                f,
                "Practice session complete for deck '{}'. You practiced {} card(s).",
                self.deck, self.practiced
            ),
        }
    }
}

#[derive(Debug, Default)]
struct Progress {
    practiced: usize,
    sweeps: usize,
    unsaved: usize,
}

/// Runs one practice session over `deck_name`.
///
/// The deck is loaded fresh, swept in ascending score order as many times as needed,
/// and each admitted card is presented, graded and written back according to
/// `config.flush`. A card can be presented more than once when the target exceeds what
/// one sweep admits.
pub fn run_session<R, P>(
    store: &DeckStore,
    deck_name: &str,
    count: CountSpec,
    config: &SessionConfig,
    policy: &mut ReviewPolicy<R>,
    presenter: &mut P,
) -> Result<SessionSummary>
where
    R: Rng,
    P: Presenter + ?Sized,
{
    let mut deck = store.load(deck_name)?;
    ensure!(
        deck.schema.question_field().is_some(),
        NoQuestionFieldSnafu { deck: deck_name }
    );

    if deck.cards.iter().all(|card| card.score == MAX_SCORE) {
        info!("deck '{deck_name}' is fully mastered, nothing to practice");
        return Ok(SessionSummary {
            deck: deck.name,
            target: 0,
            practiced: 0,
            sweeps: 0,
            end: SessionEnd::Mastered,
        });
    }

    let target = count.resolve(deck.len(), config.default_count);
    let order = review_order(&deck.cards);
    let mut session = Session {
        store,
        config,
        policy,
        presenter,
        progress: Progress::default(),
    };
    let end = session.sweep(&mut deck, &order, target);
    let progress = session.progress;
    if progress.unsaved > 0 {
        store.save(&deck)?;
    }
    let end = end?;

    info!(
        "deck '{deck_name}': practiced {}/{target} card(s) in {} sweep(s), {end:?}",
        progress.practiced, progress.sweeps
    );
    Ok(SessionSummary {
        deck: deck.name,
        target,
        practiced: progress.practiced,
        sweeps: progress.sweeps,
        end,
    })
}

struct Session<'a, R, P: ?Sized> {
    store: &'a DeckStore,
    config: &'a SessionConfig,
    policy: &'a mut ReviewPolicy<R>,
    presenter: &'a mut P,
    progress: Progress,
}

impl<R, P> Session<'_, R, P>
where
    R: Rng,
    P: Presenter + ?Sized,
{
    /// Sweeps `deck` in `order` until `target` presentations are graded or the session
    /// ends some other way.
    fn sweep(&mut self, deck: &mut Deck, order: &[usize], target: usize) -> Result<SessionEnd> {
        let progress = &mut self.progress;
        loop {
            if progress.practiced >= target {
                return Ok(SessionEnd::Completed);
            }
            if self.config.max_sweeps.is_some_and(|max| progress.sweeps >= max) {
                return Ok(SessionEnd::SweepLimit);
            }
            progress.sweeps += 1;

            for &i in order {
                if progress.practiced >= target {
                    break;
                }
                if !self.policy.should_review(deck.cards[i].score) {
                    continue;
                }

                self.presenter.reveal(deck, &deck.cards[i])?;
                let grade = match self.presenter.judge(deck, &deck.cards[i], self.config.rule)? {
                    Judgement::Graded(grade) => grade,
                    Judgement::Abort => return Ok(SessionEnd::Aborted),
                };
                deck.cards[i].score = grade.next_score(deck.cards[i].score);
                self.presenter.graded(deck, &deck.cards[i], grade)?;

                match self.config.flush {
                    FlushPolicy::EveryCard => self.store.save(deck)?,
                    FlushPolicy::EndOfSession => progress.unsaved += 1,
                }
                progress.practiced += 1;
            }
        }
    }
}
