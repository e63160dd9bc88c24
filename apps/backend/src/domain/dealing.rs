//! Deterministic card dealing logic.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::cards_logic::{is_pieza, with_power};
use super::cards_types::{Card, DealtCard, Rank, Suit};
use super::rules::{cards_needed, CARDS_PER_HAND};
use crate::errors::domain::DomainError;

/// Generate the full 40-card Spanish deck in suit-then-rank order.
pub fn full_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(Suit::ALL.len() * Rank::ALL.len());
    for suit in Suit::ALL {
        for rank in Rank::ALL {
            deck.push(Card { suit, rank });
        }
    }
    deck
}

/// Fisher-Yates shuffle driven by a seeded ChaCha8 stream.
pub fn shuffle_with_seed(deck: &mut [Card], seed: u64) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    deck.shuffle(&mut rng);
}

pub fn shuffled_deck(seed: u64) -> Vec<Card> {
    let mut deck = full_deck();
    shuffle_with_seed(&mut deck, seed);
    deck
}

/// Knobs that alter how a deck is distributed.
#[derive(Debug, Clone, Default)]
pub struct DealOptions {
    /// A seated player whose name matches (case-insensitive) receives two
    /// piezas of the tentative muestra suit when the deck holds them.
    pub favored_name: Option<String>,
}

/// Result of dealing one hand: one 3-card hand per seat, in seat order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deal {
    pub hands: Vec<Vec<DealtCard>>,
    pub muestra: Card,
    pub stock: Vec<Card>,
}

/// Deal `deck` to the seats named by `seat_names`.
///
/// Seat i receives deck[i], deck[i+N], deck[i+2N]; deck[3N] is the muestra.
pub fn deal(
    mut deck: Vec<Card>,
    seat_names: &[&str],
    opts: &DealOptions,
) -> Result<Deal, DomainError> {
    let n = seat_names.len();
    let needed = cards_needed(n);
    if n == 0 || deck.len() < needed {
        return Err(DomainError::fatal_deal(format!(
            "deck has {} cards, {n} seats need {needed}",
            deck.len()
        )));
    }

    if let Some(favored) = opts.favored_name.as_deref() {
        if let Some(seat) = seat_names
            .iter()
            .position(|name| name.eq_ignore_ascii_case(favored))
        {
            favor_seat(&mut deck, seat, n);
        }
    }

    let muestra = deck[CARDS_PER_HAND * n];
    let hands = (0..n)
        .map(|seat| {
            (0..CARDS_PER_HAND)
                .map(|k| with_power(deck[seat + k * n], muestra))
                .collect()
        })
        .collect();
    let stock = deck.split_off(needed);

    Ok(Deal {
        hands,
        muestra,
        stock,
    })
}

/// Swap two piezas of the tentative muestra suit into the first two slots
/// `seat` is dealt. The muestra slot is never touched.
fn favor_seat(deck: &mut [Card], seat: usize, n: usize) {
    let muestra_pos = CARDS_PER_HAND * n;
    let tentative = deck[muestra_pos];
    let targets = [seat, seat + n];

    let available = deck
        .iter()
        .enumerate()
        .filter(|&(pos, &c)| pos != muestra_pos && is_pieza(c, tentative))
        .count();
    if available < 2 {
        return;
    }

    for target in targets {
        if is_pieza(deck[target], tentative) {
            continue;
        }
        let source = deck.iter().enumerate().position(|(pos, &c)| {
            pos != muestra_pos && !targets.contains(&pos) && is_pieza(c, tentative)
        });
        if let Some(pos) = source {
            deck.swap(target, pos);
        }
    }
}
