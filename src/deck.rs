/// Name of the reserved column holding a card's mastery level.
pub const SCORE_FIELD: &str = "score";

/// Column layout shared by every card of a deck.
///
/// Content fields keep the order they were read in. The score column keeps its own
/// position so that a load/save cycle writes the header back exactly as it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    content_fields: Vec<String>,
    score_position: usize,
}

impl Schema {
    /// Builds a schema from a header row, appending a score column if there is none.
    pub fn from_header<I, S>(header: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut content_fields = Vec::new();
        let mut score_position = None;
        for (i, field) in header.into_iter().map(Into::into).enumerate() {
            if field == SCORE_FIELD && score_position.is_none() {
                score_position = Some(i);
            } else {
                content_fields.push(field);
            }
        }
        let score_position = score_position.unwrap_or(content_fields.len());
        Self {
            content_fields,
            score_position,
        }
    }

    pub(crate) fn score_position(&self) -> usize {
        self.score_position
    }

    /// Number of columns on disk, score included.
    pub fn width(&self) -> usize {
        self.content_fields.len() + 1
    }

    /// All column names in on-disk order.
    pub fn header(&self) -> Vec<&str> {
        let mut header: Vec<&str> = self.content_fields.iter().map(String::as_str).collect();
        header.insert(self.score_position, SCORE_FIELD);
        header
    }

    pub fn content_fields(&self) -> &[String] {
        &self.content_fields
    }

    /// The first non-score field, shown as the prompt.
    pub fn question_field(&self) -> Option<&str> {
        self.content_fields.first().map(String::as_str)
    }

    /// The non-score fields after the question.
    pub fn answer_fields(&self) -> &[String] {
        self.content_fields.get(1..).unwrap_or_default()
    }
}

/// One question/answer record.
///
/// `content` is aligned with [`Schema::content_fields`] of the owning deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub content: Vec<String>,
    pub score: u32,
}

impl Card {
    pub fn new(content: Vec<String>, score: u32) -> Self {
        Self { content, score }
    }

    pub fn question(&self) -> Option<&str> {
        self.content.first().map(String::as_str)
    }

    pub fn answers(&self) -> &[String] {
        self.content.get(1..).unwrap_or_default()
    }

    /// Lays the card out as an on-disk row, score in its schema position.
    pub(crate) fn to_record(&self, schema: &Schema) -> Vec<String> {
        let mut record = self.content.clone();
        record.insert(schema.score_position(), self.score.to_string());
        record
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    pub name: String,
    pub schema: Schema,
    pub cards: Vec<Card>,
}

impl Deck {
    pub fn new(name: impl Into<String>, schema: Schema, cards: Vec<Card>) -> Self {
        Self {
            name: name.into(),
            schema,
            cards,
        }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Looks up a field of `card` by column name.
    pub fn field<'a>(&self, card: &'a Card, name: &str) -> Option<&'a str> {
        self.schema
            .content_fields
            .iter()
            .position(|f| f == name)
            .and_then(|i| card.content.get(i))
            .map(String::as_str)
    }

    /// Pairs each answer field name with the card's value for it.
    pub fn answer_pairs<'a>(&'a self, card: &'a Card) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.schema
            .answer_fields()
            .iter()
            .zip(card.answers())
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}
