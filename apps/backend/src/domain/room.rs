//! Room aggregate: roster, lifecycle and the running game.
//!
//! Every successful mutation bumps `version`. Status only moves forward:
//! waiting -> playing -> finished.

use serde::Serialize;

use crate::domain::calls::{self, Call, CallOutcome, Response};
use crate::domain::cards_types::Card;
use crate::domain::dealing::{deal, shuffled_deck, Deal, DealOptions};
use crate::domain::rules::{normalize_player_name, validate_player_count};
use crate::domain::scoring::{check_winner, end_hand};
use crate::domain::seed_derivation::derive_dealing_seed;
use crate::domain::state::{GameState, HandOutcome, Phase, PlayerId, Seat, SeatedPlayer, Team};
use crate::domain::tricks::{self, PlayOutcome};
use crate::errors::domain::{DomainError, IllegalStateKind, NotFoundKind};

pub type RoomId = String;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    Waiting,
    Playing,
    Finished,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub team: Team,
    pub seat: Seat,
}

/// What a departure did to the room.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Departure {
    pub seat: Seat,
    /// Set when leaving mid-game handed the win to this team.
    pub forfeit_to: Option<Team>,
    pub now_empty: bool,
}

#[derive(Debug, Clone)]
pub struct Room {
    pub id: RoomId,
    pub host: String,
    pub max_players: u8,
    pub status: RoomStatus,
    pub players: Vec<Player>,
    pub game: Option<GameState>,
    pub winner: Option<Team>,
    pub version: u64,
    host_id: PlayerId,
    seed: u64,
    deal_options: DealOptions,
}

impl Room {
    /// New waiting room with the host in seat 0.
    pub fn new(
        id: RoomId,
        host_id: PlayerId,
        host_name: &str,
        max_players: u8,
        seed: u64,
        deal_options: DealOptions,
    ) -> Result<Self, DomainError> {
        let max_players = validate_player_count(max_players)?;
        let host = normalize_player_name(host_name)?;
        Ok(Self {
            id,
            host: host.clone(),
            max_players,
            status: RoomStatus::Waiting,
            players: vec![Player {
                id: host_id,
                name: host,
                team: Team::One,
                seat: 0,
            }],
            game: None,
            winner: None,
            version: 1,
            host_id,
            seed,
            deal_options,
        })
    }

    fn bump(&mut self) {
        self.version += 1;
    }

    pub fn is_full(&self) -> bool {
        self.players.len() >= self.max_players as usize
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn is_member(&self, id: PlayerId) -> bool {
        self.player(id).is_some()
    }

    /// Seat a new player. Team follows seat parity.
    pub fn join(&mut self, id: PlayerId, name: &str) -> Result<Seat, DomainError> {
        if self.is_member(id) {
            return Err(DomainError::illegal(
                IllegalStateKind::AlreadyInRoom,
                "Already seated in this room",
            ));
        }
        if self.status != RoomStatus::Waiting || self.is_full() {
            return Err(DomainError::capacity(format!("Room {} is full", self.id)));
        }
        let name = normalize_player_name(name)?;
        let seat = self.players.len();
        self.players.push(Player {
            id,
            name,
            team: Team::for_seat(seat),
            seat,
        });
        self.bump();
        Ok(seat)
    }

    fn deal_for(&self, hand_no: u32) -> Result<Deal, DomainError> {
        let names: Vec<&str> = self.players.iter().map(|p| p.name.as_str()).collect();
        let deck = shuffled_deck(derive_dealing_seed(self.seed, hand_no));
        deal(deck, &names, &self.deal_options)
    }

    /// Deal the first hand once the roster is complete.
    pub fn start(&mut self) -> Result<(), DomainError> {
        match self.status {
            RoomStatus::Waiting => {}
            RoomStatus::Playing => {
                return Err(DomainError::illegal(
                    IllegalStateKind::RoomNotPlaying,
                    "Game already started",
                ))
            }
            RoomStatus::Finished => {
                return Err(DomainError::illegal(
                    IllegalStateKind::GameFinished,
                    "Game is finished",
                ))
            }
        }
        if !self.is_full() {
            return Err(DomainError::illegal(
                IllegalStateKind::RoomNotFull,
                format!("{}/{} players seated", self.players.len(), self.max_players),
            ));
        }
        let deal = self.deal_for(1)?;
        let seats = self
            .players
            .iter()
            .map(|p| SeatedPlayer {
                id: p.id,
                name: p.name.clone(),
            })
            .collect();
        self.game = Some(GameState::first_hand(seats, deal));
        self.status = RoomStatus::Playing;
        self.bump();
        Ok(())
    }

    /// Hand number waiting for its successor deal, if any.
    pub fn hand_awaiting_deal(&self) -> Option<u32> {
        match (&self.status, &self.game) {
            (RoomStatus::Playing, Some(g)) if g.phase == Phase::HandOver => Some(g.hand_no),
            _ => None,
        }
    }

    /// Deal the next hand, but only if `after_hand` is still the hand that ended.
    /// Returns false when the request is stale.
    pub fn deal_next_hand(&mut self, after_hand: u32) -> Result<bool, DomainError> {
        if self.hand_awaiting_deal() != Some(after_hand) {
            return Ok(false);
        }
        let deal = self.deal_for(after_hand + 1)?;
        let Some(game) = self.game.as_mut() else {
            return Ok(false);
        };
        *game = game.next_hand(deal);
        self.bump();
        Ok(true)
    }

    fn game_in_play(&mut self, player: PlayerId) -> Result<(&mut GameState, Seat), DomainError> {
        match self.status {
            RoomStatus::Playing => {}
            RoomStatus::Finished => {
                return Err(DomainError::illegal(
                    IllegalStateKind::GameFinished,
                    "Game is finished",
                ))
            }
            RoomStatus::Waiting => {
                return Err(DomainError::illegal(
                    IllegalStateKind::RoomNotPlaying,
                    "Game has not started",
                ))
            }
        }
        let game = self.game.as_mut().ok_or_else(|| {
            DomainError::illegal(IllegalStateKind::RoomNotPlaying, "No game in progress")
        })?;
        let seat = game.seat_of(player)?;
        Ok((game, seat))
    }

    /// Finish the game if a team crossed the threshold.
    fn settle(&mut self) -> Option<Team> {
        let winner = self
            .game
            .as_ref()
            .and_then(|g| check_winner(&g.team_scores))?;
        self.status = RoomStatus::Finished;
        self.winner = Some(winner);
        Some(winner)
    }

    pub fn play_card(&mut self, player: PlayerId, card: Card) -> Result<PlayOutcome, DomainError> {
        let (game, seat) = self.game_in_play(player)?;
        let outcome = tricks::play_card(game, seat, card)?;
        if matches!(outcome, PlayOutcome::HandWon { .. }) {
            self.settle();
        }
        self.bump();
        Ok(outcome)
    }

    pub fn make_call(&mut self, player: PlayerId, call: Call) -> Result<CallOutcome, DomainError> {
        let (game, seat) = self.game_in_play(player)?;
        let outcome = calls::make_call(game, seat, call)?;
        self.bump();
        Ok(outcome)
    }

    pub fn respond_call(
        &mut self,
        player: PlayerId,
        response: Response,
    ) -> Result<CallOutcome, DomainError> {
        let (game, seat) = self.game_in_play(player)?;
        let outcome = calls::respond_call(game, seat, response)?;
        if matches!(
            outcome,
            CallOutcome::Awarded { .. } | CallOutcome::HandEnded { .. }
        ) {
            self.settle();
        }
        self.bump();
        Ok(outcome)
    }

    /// Concede the current hand: the other team takes the stake.
    pub fn leave_hand(&mut self, player: PlayerId) -> Result<HandOutcome, DomainError> {
        let (game, seat) = self.game_in_play(player)?;
        if game.phase != Phase::InPlay {
            return Err(DomainError::illegal(IllegalStateKind::HandOver, "Hand is over"));
        }
        let outcome = HandOutcome::Abandoned {
            team: Team::for_seat(seat).opponent(),
            points: game.points_at_stake,
        };
        end_hand(game, outcome);
        self.settle();
        self.bump();
        Ok(outcome)
    }

    /// Remove a player. Mid-game departure forfeits to the other team.
    pub fn remove_player(&mut self, player: PlayerId) -> Result<Departure, DomainError> {
        let seat = self
            .players
            .iter()
            .position(|p| p.id == player)
            .ok_or_else(|| {
                DomainError::not_found(NotFoundKind::Player, format!("{player} is not in the room"))
            })?;
        let leaver = self.players.remove(seat);

        let mut forfeit_to = None;
        match self.status {
            RoomStatus::Waiting => {
                for (idx, p) in self.players.iter_mut().enumerate() {
                    p.seat = idx;
                    p.team = Team::for_seat(idx);
                }
            }
            RoomStatus::Playing => {
                let winner = leaver.team.opponent();
                self.status = RoomStatus::Finished;
                self.winner = Some(winner);
                forfeit_to = Some(winner);
            }
            RoomStatus::Finished => {}
        }
        if leaver.id == self.host_id {
            if let Some(first) = self.players.first() {
                self.host = first.name.clone();
                self.host_id = first.id;
            }
        }
        self.bump();
        Ok(Departure {
            seat,
            forfeit_to,
            now_empty: self.players.is_empty(),
        })
    }

    /// Current seat of a player on turn, if a hand is in play.
    pub fn turn_player(&self) -> Option<PlayerId> {
        let game = self.game.as_ref()?;
        if self.status != RoomStatus::Playing || game.phase != Phase::InPlay {
            return None;
        }
        game.player_at(game.turn_index).map(|p| p.id)
    }
}

#[cfg(test)]
impl Room {
    /// Replace the running game wholesale.
    pub(crate) fn set_game_for_test(&mut self, game: GameState) {
        self.game = Some(game);
        self.status = RoomStatus::Playing;
    }
}
