//! Card parsing and display for the `"<rank>_<suit>"` identity (e.g. "10_oro")

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use super::cards_types::{Card, Rank, Suit};
use crate::errors::domain::{DomainError, ValidationKind};

impl Suit {
    pub const fn as_str(self) -> &'static str {
        match self {
            Suit::Espada => "espada",
            Suit::Basto => "basto",
            Suit::Oro => "oro",
            Suit::Copa => "copa",
        }
    }
}

impl FromStr for Suit {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "espada" => Ok(Suit::Espada),
            "basto" => Ok(Suit::Basto),
            "oro" => Ok(Suit::Oro),
            "copa" => Ok(Suit::Copa),
            _ => Err(DomainError::validation(
                ValidationKind::ParseCard,
                format!("Invalid suit: {s}"),
            )),
        }
    }
}

impl Display for Suit {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl Display for Card {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}_{}", self.rank.value(), self.suit)
    }
}

impl FromStr for Card {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_err =
            || DomainError::validation(ValidationKind::ParseCard, format!("Parse card: {s}"));

        let (rank_part, suit_part) = s.split_once('_').ok_or_else(parse_err)?;
        // Reject "+1", "01" and friends: only canonical decimal ranks.
        if rank_part.is_empty()
            || rank_part.starts_with('0')
            || !rank_part.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(parse_err());
        }
        let value: u8 = rank_part.parse().map_err(|_| parse_err())?;
        let rank = Rank::try_from(value).map_err(|_| parse_err())?;
        let suit = suit_part.parse::<Suit>().map_err(|_| parse_err())?;
        Ok(Card { suit, rank })
    }
}

/// Non-panicking helper to parse card tokens (e.g., "1_espada", "10_oro").
/// Returns Err if any token is invalid.
pub fn try_parse_cards<I, S>(tokens: I) -> Result<Vec<Card>, DomainError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tokens
        .into_iter()
        .map(|s| s.as_ref().parse::<Card>())
        .collect()
}
