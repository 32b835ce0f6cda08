use strum::{Display, EnumIter, EnumString};

use crate::error::{InvalidRatingSnafu, Result};

/// Lowest box; every card starts here and falls back here on a miss.
pub const MIN_SCORE: u32 = 1;
/// Highest box; a deck whose cards all sit here is mastered.
pub const MAX_SCORE: u32 = 5;

/// Leitner transition: promote one box on a correct answer, drop to the first box otherwise.
pub fn update_score(current: u32, correct: bool) -> u32 {
    if correct {
        current.saturating_add(1).min(MAX_SCORE)
    } else {
        MIN_SCORE
    }
}

/// Self-assessed recall quality for the graduated rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, EnumIter)]
pub enum Rating {
    Forgotten = 0,
    VeryHard = 1,
    Hard = 2,
    Neutral = 3,
    Good = 4,
    Easy = 5,
}

impl Rating {
    pub fn from_input(input: &str) -> Result<Self> {
        let value = input.trim();
        match value.parse::<u8>() {
            Ok(0) => Ok(Self::Forgotten),
            Ok(1) => Ok(Self::VeryHard),
            Ok(2) => Ok(Self::Hard),
            Ok(3) => Ok(Self::Neutral),
            Ok(4) => Ok(Self::Good),
            Ok(5) => Ok(Self::Easy),
            _ => InvalidRatingSnafu { value }.fail(),
        }
    }
}

/// Graduated transition driven by a 0-5 rating.
///
/// Easy answers jump two boxes, harder ones fall back further the worse they were.
/// There is no ceiling and the floor is 0, not 1; a 0 written to disk is lifted back to 1
/// by the next load.
pub fn graduated_score_update(current: u32, rating: Rating) -> u32 {
    match rating {
        Rating::Easy => current.saturating_add(2),
        Rating::Good => current.saturating_add(1),
        Rating::Neutral => current,
        Rating::Hard => current.saturating_sub(1),
        Rating::VeryHard => current.saturating_sub(2),
        Rating::Forgotten => current.saturating_sub(3),
    }
}

/// The operator's verdict on one presented card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grade {
    Correct,
    Incorrect,
    Rated(Rating),
}

impl Grade {
    pub fn next_score(self, current: u32) -> u32 {
        match self {
            Self::Correct => update_score(current, true),
            Self::Incorrect => update_score(current, false),
            Self::Rated(rating) => graduated_score_update(current, rating),
        }
    }
}

/// Which kind of verdict a session asks the operator for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum MasteryRule {
    /// Correct or incorrect, see [`update_score`].
    #[default]
    Binary,
    /// A 0-5 rating, see [`graduated_score_update`].
    Graduated,
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn correct_promotes_until_ceiling() {
        for s in MIN_SCORE..=MAX_SCORE {
            let next = update_score(s, true);
            assert!((2..=MAX_SCORE).contains(&next));
        }
        assert_eq!(update_score(1, true), 2);
        assert_eq!(update_score(4, true), 5);
        assert_eq!(update_score(5, true), 5);
        assert_eq!(update_score(9, true), 5);
        assert_eq!(update_score(u32::MAX, true), 5);
    }

    #[test]
    fn incorrect_always_resets() {
        for s in [0, 1, 2, 3, 4, 5, 17, u32::MAX] {
            assert_eq!(update_score(s, false), 1);
        }
    }

    #[test]
    fn graduated_rule() {
        let expected = [(Rating::Forgotten, 0), (Rating::VeryHard, 1), (Rating::Hard, 2)];
        for (rating, score) in expected {
            assert_eq!(graduated_score_update(3, rating), score);
        }
        assert_eq!(graduated_score_update(3, Rating::Neutral), 3);
        assert_eq!(graduated_score_update(3, Rating::Good), 4);
        assert_eq!(graduated_score_update(5, Rating::Easy), 7);
        assert_eq!(graduated_score_update(1, Rating::Forgotten), 0);
    }

    #[test]
    fn rating_from_input() {
        for rating in Rating::iter() {
            let input = format!(" {} ", rating as u8);
            assert_eq!(Rating::from_input(&input).unwrap(), rating);
        }
        assert!(Rating::from_input("6").is_err());
        assert!(Rating::from_input("good").is_err());
    }

    #[test]
    fn grade_dispatch() {
        assert_eq!(Grade::Correct.next_score(2), 3);
        assert_eq!(Grade::Incorrect.next_score(4), 1);
        assert_eq!(Grade::Rated(Rating::Easy).next_score(2), 4);
    }

    #[test]
    fn rule_parses_case_insensitively() {
        assert_eq!("graduated".parse::<MasteryRule>().unwrap(), MasteryRule::Graduated);
        assert_eq!("Binary".parse::<MasteryRule>().unwrap(), MasteryRule::Binary);
        assert_eq!(MasteryRule::default().to_string(), "binary");
    }
}
