//! Core card-related types: Suit, Rank, Card, DealtCard

use crate::errors::domain::{DomainError, ValidationKind};

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Suit {
    Espada,
    Basto,
    Oro,
    Copa,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Espada, Suit::Basto, Suit::Oro, Suit::Copa];
}

/// Spanish-deck ranks. Eights and nines are not part of the deck.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Rank {
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Ten,
    Eleven,
    Twelve,
}

impl Rank {
    pub const ALL: [Rank; 10] = [
        Rank::One,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Ten,
        Rank::Eleven,
        Rank::Twelve,
    ];

    /// Printed face value.
    pub const fn value(self) -> u8 {
        match self {
            Rank::One => 1,
            Rank::Two => 2,
            Rank::Three => 3,
            Rank::Four => 4,
            Rank::Five => 5,
            Rank::Six => 6,
            Rank::Seven => 7,
            Rank::Ten => 10,
            Rank::Eleven => 11,
            Rank::Twelve => 12,
        }
    }
}

impl TryFrom<u8> for Rank {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Rank::ALL
            .into_iter()
            .find(|r| r.value() == value)
            .ok_or_else(|| {
                DomainError::validation(
                    ValidationKind::ParseCard,
                    format!("Invalid rank: {value}"),
                )
            })
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Card {
    pub suit: Suit,
    pub rank: Rank,
}

impl Card {
    pub const fn new(suit: Suit, rank: Rank) -> Self {
        Self { suit, rank }
    }
}

// Note: Ord on Card is only for stable sorting (suit then rank).
// Trick resolution compares `power`, never this ordering.
impl Ord for Card {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match self.suit.cmp(&other.suit) {
            std::cmp::Ordering::Equal => self.rank.cmp(&other.rank),
            ord => ord,
        }
    }
}

impl PartialOrd for Card {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// A card as it sits in a hand or on the table: identity plus its power
/// under the muestra of the hand it was dealt in.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct DealtCard {
    pub card: Card,
    pub power: u8,
}
