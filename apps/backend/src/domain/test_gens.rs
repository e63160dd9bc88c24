// Proptest generators for domain types.
// Cards are drawn without replacement so a generated table never repeats a card.

use proptest::prelude::*;

use crate::domain::cards_types::{Card, Rank, Suit};
use crate::domain::dealing::full_deck;

/// Generate a random Suit
pub fn suit() -> impl Strategy<Value = Suit> {
    prop_oneof![
        Just(Suit::Espada),
        Just(Suit::Basto),
        Just(Suit::Oro),
        Just(Suit::Copa),
    ]
}

/// Generate a random Rank
pub fn rank() -> impl Strategy<Value = Rank> {
    proptest::sample::select(Rank::ALL.to_vec())
}

/// Generate a single Card
pub fn card() -> impl Strategy<Value = Card> {
    (suit(), rank()).prop_map(|(suit, rank)| Card { suit, rank })
}

/// A seated table size: 2, 4 or 6.
pub fn player_count() -> impl Strategy<Value = usize> {
    prop_oneof![Just(2usize), Just(4usize), Just(6usize)]
}

/// Generate `count` distinct cards
pub fn unique_cards(count: usize) -> impl Strategy<Value = Vec<Card>> {
    Just(full_deck())
        .prop_shuffle()
        .prop_map(move |deck| deck.into_iter().take(count).collect())
}

/// A full round: a muestra plus one distinct card per seat.
pub fn complete_round() -> impl Strategy<Value = (Card, Vec<Card>)> {
    player_count().prop_flat_map(|n| {
        unique_cards(n + 1).prop_map(|mut cards| {
            let muestra = cards.remove(0);
            (muestra, cards)
        })
    })
}
