//! Line-oriented console: the interactive [`Presenter`] plus the small helpers the menu
//! shares with it.

use std::io::{BufRead, Write};

use snafu::ResultExt;

use crate::deck::{Card, Deck};
use crate::error::{PromptSnafu, Result};
use crate::mastery::{Grade, MasteryRule, Rating};
use crate::session::{Judgement, Presenter};

const ABORT: &str = "x";

/// Draws `content` inside a box border.
///
/// The border is sized in chars, so double-width text (CJK, most emoji) overruns the
/// right edge.
pub fn render_card(content: &str) -> String {
    let width = content.chars().count() + 4;
    let rule = "─".repeat(width);
    let blank = " ".repeat(width);
    format!("┌{rule}┐\n│{blank}│\n│  {content}  │\n│{blank}│\n└{rule}┘\n")
}

/// Uppercases the first letter and lowercases the rest.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// `yes` in any case is correct, `x` leaves the session, anything else is a miss.
pub fn parse_judgement(input: &str) -> Judgement {
    let input = input.trim();
    if input.eq_ignore_ascii_case("yes") {
        Judgement::Graded(Grade::Correct)
    } else if input.eq_ignore_ascii_case(ABORT) {
        Judgement::Abort
    } else {
        Judgement::Graded(Grade::Incorrect)
    }
}

pub struct Terminal<I, O> {
    input: I,
    output: O,
}

impl<I: BufRead, O: Write> Terminal<I, O> {
    pub fn new(input: I, output: O) -> Self {
        Self { input, output }
    }

    pub fn into_inner(self) -> (I, O) {
        (self.input, self.output)
    }

    pub fn say(&mut self, text: impl AsRef<str>) -> Result<()> {
        writeln!(self.output, "{}", text.as_ref()).context(PromptSnafu)
    }

    /// Prints `message` without a newline and reads one line, trimmed.
    ///
    /// Returns `None` once input is exhausted.
    pub fn prompt(&mut self, message: &str) -> Result<Option<String>> {
        write!(self.output, "{message}").context(PromptSnafu)?;
        self.output.flush().context(PromptSnafu)?;
        let mut line = String::new();
        if self.input.read_line(&mut line).context(PromptSnafu)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_owned()))
    }

    fn ask_rating(&mut self) -> Result<Judgement> {
        loop {
            let Some(answer) = self.prompt(
                "Rate your recall from 0 (forgotten) to 5 (easy) (x to exit to menu.): ",
            )?
            else {
                return Ok(Judgement::Abort);
            };
            if answer.eq_ignore_ascii_case(ABORT) {
                return Ok(Judgement::Abort);
            }
            match Rating::from_input(&answer) {
                Ok(rating) => return Ok(Judgement::Graded(Grade::Rated(rating))),
                Err(err) => self.say(err.to_string())?,
            }
        }
    }
}

impl<I: BufRead, O: Write> Presenter for Terminal<I, O> {
    fn reveal(&mut self, deck: &Deck, card: &Card) -> Result<()> {
        let field = deck.schema.question_field().unwrap_or_default();
        self.say(format!("\n{}:", capitalize(field)))?;
        write!(self.output, "{}", render_card(card.question().unwrap_or_default()))
            .context(PromptSnafu)?;
        self.prompt("Press Enter when ready to see the answer... ")?;
        Ok(())
    }

    fn judge(&mut self, deck: &Deck, card: &Card, rule: MasteryRule) -> Result<Judgement> {
        self.say("Answer:")?;
        for (field, value) in deck.answer_pairs(card) {
            self.say(format!("  {}: {value}", capitalize(field)))?;
        }
        self.say(format!("  Score: {}", card.score))?;

        let judgement = match rule {
            MasteryRule::Binary => self
                .prompt("Did you get it correct? (n)/Yes (x to exit to menu.): ")?
                .map_or(Judgement::Abort, |answer| parse_judgement(&answer)),
            MasteryRule::Graduated => self.ask_rating()?,
        };
        if judgement == Judgement::Abort {
            self.say("Going back to menu")?;
        }
        Ok(judgement)
    }

    fn graded(&mut self, _deck: &Deck, card: &Card, grade: Grade) -> Result<()> {
        match grade {
            Grade::Correct => self.say("Correct! Card moved to the next level."),
            Grade::Rated(_) => self.say(format!("Card moved to level {}.", card.score)),
            Grade::Incorrect => {
                self.say("Incorrect. Card moved back to level 1.")?;
                let typed = self.prompt("Feel free to type the answer: ")?;
                let expected = card.answers().last();
                if let (Some(typed), Some(expected)) = (typed, expected) {
                    if !typed.is_empty() && typed.to_lowercase() == expected.to_lowercase() {
                        self.say("Correct")?;
                    }
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::deck::Schema;

    fn deck() -> Deck {
        let schema = Schema::from_header(["country", "capital", "score"]);
        Deck::new(
            "capitals",
            schema,
            vec![Card::new(vec!["Norway".into(), "Oslo".into()], 2)],
        )
    }

    fn terminal(input: &str) -> Terminal<Cursor<Vec<u8>>, Vec<u8>> {
        Terminal::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn output(terminal: Terminal<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(terminal.into_inner().1).unwrap()
    }

    #[test]
    fn card_box() {
        assert_eq!(
            render_card("Oslo"),
            "┌────────┐\n│        │\n│  Oslo  │\n│        │\n└────────┘\n"
        );
    }

    #[test]
    fn capitalize_matches_title_case() {
        assert_eq!(capitalize("capital city"), "Capital city");
        assert_eq!(capitalize("YES"), "Yes");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn judgement_parsing() {
        assert_eq!(parse_judgement("yes"), Judgement::Graded(Grade::Correct));
        assert_eq!(parse_judgement(" YES "), Judgement::Graded(Grade::Correct));
        assert_eq!(parse_judgement("x"), Judgement::Abort);
        assert_eq!(parse_judgement("X"), Judgement::Abort);
        assert_eq!(parse_judgement("y"), Judgement::Graded(Grade::Incorrect));
        assert_eq!(parse_judgement(""), Judgement::Graded(Grade::Incorrect));
    }

    #[test]
    fn reveal_and_judge_transcript() -> Result<()> {
        let deck = deck();
        let card = &deck.cards[0];
        let mut term = terminal("\nyes\n");
        term.reveal(&deck, card)?;
        let judgement = term.judge(&deck, card, MasteryRule::Binary)?;
        assert_eq!(judgement, Judgement::Graded(Grade::Correct));

        let out = output(term);
        assert!(out.contains("Country:\n"));
        assert!(out.contains("│  Norway  │"));
        assert!(out.contains("Answer:\n  Capital: Oslo\n  Score: 2\n"));
        Ok(())
    }

    #[test]
    fn end_of_input_aborts() -> Result<()> {
        let deck = deck();
        let mut term = terminal("");
        let judgement = term.judge(&deck, &deck.cards[0], MasteryRule::Binary)?;
        assert_eq!(judgement, Judgement::Abort);
        assert!(output(term).contains("Going back to menu"));
        Ok(())
    }

    #[test]
    fn graduated_prompt_retries_invalid_ratings() -> Result<()> {
        let deck = deck();
        let mut term = terminal("9\nmeh\n4\n");
        let judgement = term.judge(&deck, &deck.cards[0], MasteryRule::Graduated)?;
        assert_eq!(judgement, Judgement::Graded(Grade::Rated(Rating::Good)));
        assert_eq!(output(term).matches("Invalid rating").count(), 2);
        Ok(())
    }

    #[test]
    fn typed_answer_after_miss() -> Result<()> {
        let mut deck = deck();
        deck.cards[0].score = 1;
        let mut term = terminal("oslo\n");
        term.graded(&deck, &deck.cards[0], Grade::Incorrect)?;
        let out = output(term);
        assert!(out.contains("Incorrect. Card moved back to level 1."));
        assert!(out.ends_with("Correct\n"));
        Ok(())
    }
}
