//! Card game logic: card power under a muestra, piezas, flor and envido tallies

use super::cards_types::{Card, DealtCard, Rank, Suit};

/// Pieza ranks of the muestra suit, strongest first.
pub const PIEZA_RANKS: [Rank; 5] = [Rank::Two, Rank::Four, Rank::Five, Rank::Eleven, Rank::Ten];

const PIEZA_POWERS: [u8; 5] = [100, 99, 98, 97, 96];

/// The four fixed top cards of the standard ranking.
const MATAS: [(Suit, Rank, u8); 4] = [
    (Suit::Espada, Rank::One, 90),
    (Suit::Basto, Rank::One, 89),
    (Suit::Espada, Rank::Seven, 88),
    (Suit::Oro, Rank::Seven, 87),
];

pub fn is_pieza(card: Card, muestra: Card) -> bool {
    card.suit == muestra.suit && PIEZA_RANKS.contains(&card.rank)
}

fn common_power(rank: Rank) -> u8 {
    match rank {
        Rank::Three => 80,
        Rank::Two => 70,
        Rank::One => 60,
        Rank::Twelve => 50,
        Rank::Eleven => 40,
        Rank::Ten => 30,
        Rank::Seven => 20,
        Rank::Six => 10,
        Rank::Five => 5,
        Rank::Four => 1,
    }
}

/// Relative strength of `card` for the hand whose turned-up card is `muestra`.
///
/// Piezas (100..=96) beat matas (90..=87), which beat the common ranking.
pub fn power(card: Card, muestra: Card) -> u8 {
    if card.suit == muestra.suit {
        if let Some(idx) = PIEZA_RANKS.iter().position(|&r| r == card.rank) {
            return PIEZA_POWERS[idx];
        }
    }

    for (suit, rank, p) in MATAS {
        // A mata only keeps its fixed rank when it is not a pieza of this hand.
        if card.suit == suit && card.rank == rank && !is_pieza(card, muestra) {
            return p;
        }
    }

    common_power(card.rank)
}

pub fn with_power(card: Card, muestra: Card) -> DealtCard {
    DealtCard {
        card,
        power: power(card, muestra),
    }
}

/// Flor: two or more piezas, one pieza plus the other two cards sharing a
/// suit, or three cards of one suit.
pub fn has_flor(hand: &[Card], muestra: Card) -> bool {
    if hand.len() != 3 {
        return false;
    }
    let (piezas, rest): (Vec<Card>, Vec<Card>) =
        hand.iter().copied().partition(|&c| is_pieza(c, muestra));
    match piezas.len() {
        0 => rest.iter().all(|c| c.suit == rest[0].suit),
        1 => rest[0].suit == rest[1].suit,
        _ => true,
    }
}

/// Simplified envido tally: 30 plus the pieza count when holding two or
/// more piezas, otherwise 20.
pub fn envido_points(hand: &[Card], muestra: Card) -> u8 {
    let piezas = hand.iter().filter(|&&c| is_pieza(c, muestra)).count() as u8;
    if piezas >= 2 {
        30 + piezas
    } else {
        20
    }
}
