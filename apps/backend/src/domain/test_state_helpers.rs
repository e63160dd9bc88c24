//! Test-only builders for game states and rooms with hand-picked cards.

use uuid::Uuid;

use crate::domain::cards_logic::with_power;
use crate::domain::cards_parsing::try_parse_cards;
use crate::domain::cards_types::Card;
use crate::domain::dealing::{Deal, DealOptions};
use crate::domain::room::Room;
use crate::domain::state::{GameState, SeatedPlayer};

pub fn card(token: &str) -> Card {
    token.parse().expect("valid card token")
}

pub fn cards(tokens: &[&str]) -> Vec<Card> {
    try_parse_cards(tokens).expect("valid card tokens")
}

pub fn seats(n: usize) -> Vec<SeatedPlayer> {
    (0..n)
        .map(|i| SeatedPlayer {
            id: Uuid::new_v4(),
            name: format!("p{i}"),
        })
        .collect()
}

fn deal_of(hands: &[&[&str]], muestra: &str) -> Deal {
    let muestra = card(muestra);
    Deal {
        hands: hands
            .iter()
            .map(|h| cards(h).into_iter().map(|c| with_power(c, muestra)).collect())
            .collect(),
        muestra,
        stock: Vec::new(),
    }
}

/// First-hand game with the given per-seat hands.
pub fn game_with_hands(hands: &[&[&str]], muestra: &str) -> GameState {
    GameState::first_hand(seats(hands.len()), deal_of(hands, muestra))
}

/// A playing room whose current hand holds exactly the given cards.
pub fn room_with_hands(hands: &[&[&str]], muestra: &str) -> Room {
    let n = hands.len();
    let host = Uuid::new_v4();
    let mut room = Room::new(
        "TEST1".into(),
        host,
        "p0",
        n as u8,
        42,
        DealOptions::default(),
    )
    .expect("valid room");
    for i in 1..n {
        room.join(Uuid::new_v4(), &format!("p{i}"))
            .expect("seat available");
    }
    let seated = room
        .players
        .iter()
        .map(|p| SeatedPlayer {
            id: p.id,
            name: p.name.clone(),
        })
        .collect();
    room.set_game_for_test(GameState::first_hand(seated, deal_of(hands, muestra)));
    room
}

/// Player id seated at `seat`.
pub fn pid(room: &Room, seat: usize) -> Uuid {
    room.players[seat].id
}
