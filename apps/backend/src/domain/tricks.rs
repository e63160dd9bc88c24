use crate::domain::cards_types::Card;
use crate::domain::rules::{ROUNDS_PER_HAND, ROUND_WINS_FOR_HAND};
use crate::domain::scoring::end_hand;
use crate::domain::state::{GameState, HandOutcome, Phase, Play, Seat, Team};
use crate::errors::domain::{DomainError, IllegalStateKind, NotFoundKind};

/// What a single accepted play changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    /// Card placed, round still open.
    Played,
    /// The round closed; `seat` won it and leads the next one.
    RoundWon { seat: Seat, team: Team },
    /// The round closed and decided the hand.
    HandWon { seat: Seat, team: Team, points: u8 },
}

/// Play a card from `seat`'s hand onto the table.
///
/// Checks, in order: phase, pending challenge, turn, card ownership.
pub fn play_card(state: &mut GameState, seat: Seat, card: Card) -> Result<PlayOutcome, DomainError> {
    if state.phase != Phase::InPlay {
        return Err(DomainError::illegal(IllegalStateKind::HandOver, "Hand is over"));
    }
    if state.pending_challenge.is_some() {
        return Err(DomainError::illegal(
            IllegalStateKind::ChallengePending,
            "A call is waiting for an answer",
        ));
    }
    if state.turn_index != seat {
        return Err(DomainError::illegal(IllegalStateKind::OutOfTurn, "Out of turn"));
    }

    let Some(pos) = state
        .hands
        .get(seat)
        .and_then(|hand| hand.iter().position(|dc| dc.card == card))
    else {
        return Err(DomainError::not_found(
            NotFoundKind::Card,
            format!("{card} is not in hand"),
        ));
    };

    let dealt = state.hands[seat].remove(pos);
    let (player_id, player_name) = state
        .player_at(seat)
        .map(|p| (p.id, p.name.clone()))
        .ok_or_else(|| DomainError::not_found(NotFoundKind::Player, format!("seat {seat}")))?;
    state.table.push(Play {
        player_id,
        player_name,
        seat,
        card: dealt,
    });
    state.turn_index = state.next_seat(seat);

    if state.table.len() < state.player_count() {
        return Ok(PlayOutcome::Played);
    }

    let Some(winning_idx) = resolve_round(&state.table) else {
        return Ok(PlayOutcome::Played);
    };
    let winner_seat = state.table[winning_idx].seat;
    let team = Team::for_seat(winner_seat);

    state.round_wins.add(team, 1);
    if state.round_number == 1 {
        state.first_round_winner = Some(team);
    }
    state.turn_index = winner_seat;
    state.last_round = std::mem::take(&mut state.table);
    state.round_number = state.round_number.saturating_add(1);

    match hand_winner(state) {
        Some(hand_team) => {
            let points = state.points_at_stake;
            end_hand(
                state,
                HandOutcome::Rounds {
                    team: hand_team,
                    points,
                },
            );
            Ok(PlayOutcome::HandWon {
                seat: winner_seat,
                team: hand_team,
                points,
            })
        }
        None => Ok(PlayOutcome::RoundWon {
            seat: winner_seat,
            team,
        }),
    }
}

/// Index of the winning play: highest power, earliest play on ties.
pub fn resolve_round(table: &[Play]) -> Option<usize> {
    let mut best: Option<(usize, u8)> = None;
    for (idx, play) in table.iter().enumerate() {
        match best {
            Some((_, p)) if play.card.power <= p => {}
            _ => best = Some((idx, play.card.power)),
        }
    }
    best.map(|(idx, _)| idx)
}

/// Two round wins take the hand; after the last round the round-1 winner does.
fn hand_winner(state: &GameState) -> Option<Team> {
    [Team::One, Team::Two]
        .into_iter()
        .find(|&t| state.round_wins.get(t) >= ROUND_WINS_FOR_HAND)
        .or_else(|| {
            if state.round_number > ROUNDS_PER_HAND {
                state.first_round_winner
            } else {
                None
            }
        })
}
