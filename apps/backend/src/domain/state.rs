use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::calls::Challenge;
use crate::domain::cards_types::{Card, DealtCard};
use crate::domain::dealing::Deal;
use crate::errors::domain::{DomainError, NotFoundKind};

/// Connection-scoped player identity.
pub type PlayerId = Uuid;
/// Position at the table, 0-based in join order.
pub type Seat = usize;

/// The two sides. Even seats play for team 1, odd seats for team 2.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Team {
    One,
    Two,
}

impl Team {
    pub const fn for_seat(seat: Seat) -> Self {
        if seat % 2 == 0 {
            Team::One
        } else {
            Team::Two
        }
    }

    pub const fn opponent(self) -> Self {
        match self {
            Team::One => Team::Two,
            Team::Two => Team::One,
        }
    }

    pub const fn number(self) -> u8 {
        match self {
            Team::One => 1,
            Team::Two => 2,
        }
    }

    /// Display label, e.g. "Equipo 1".
    pub fn label(self) -> String {
        format!("Equipo {}", self.number())
    }
}

impl From<Team> for u8 {
    fn from(team: Team) -> u8 {
        team.number()
    }
}

impl TryFrom<u8> for Team {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Team::One),
            2 => Ok(Team::Two),
            other => Err(format!("invalid team: {other}")),
        }
    }
}

/// Per-team counter (scores, round wins).
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct TeamTally {
    #[serde(rename = "1")]
    pub team1: u8,
    #[serde(rename = "2")]
    pub team2: u8,
}

impl TeamTally {
    pub fn get(&self, team: Team) -> u8 {
        match team {
            Team::One => self.team1,
            Team::Two => self.team2,
        }
    }

    pub fn add(&mut self, team: Team, points: u8) {
        let slot = match team {
            Team::One => &mut self.team1,
            Team::Two => &mut self.team2,
        };
        *slot = slot.saturating_add(points);
    }
}

/// Hand-scoped phase of the game.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Cards and calls are accepted.
    InPlay,
    /// Hand resolved; waiting for the next deal.
    HandOver,
}

/// Who sits where for the current game. Fixed once the game starts.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct SeatedPlayer {
    pub id: PlayerId,
    pub name: String,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Play {
    pub player_id: PlayerId,
    pub player_name: String,
    pub seat: Seat,
    pub card: DealtCard,
}

/// Why the last hand ended.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum HandOutcome {
    Rounds { team: Team, points: u8 },
    Declined { team: Team, points: u8 },
    Abandoned { team: Team, points: u8 },
}

impl HandOutcome {
    pub fn team(&self) -> Team {
        match *self {
            HandOutcome::Rounds { team, .. }
            | HandOutcome::Declined { team, .. }
            | HandOutcome::Abandoned { team, .. } => team,
        }
    }
}

pub type Hand = Vec<DealtCard>;

/// Canonical state of a running game. Replaced at every deal except for the
/// carried `team_scores`, `hand_no` and `dealer_index`.
#[derive(Debug, Clone)]
pub struct GameState {
    pub seats: Vec<SeatedPlayer>,
    pub hand_no: u32,
    /// 1-based round within the hand.
    pub round_number: u8,
    pub turn_index: Seat,
    pub dealer_index: Seat,
    /// Indexed by seat.
    pub hands: Vec<Hand>,
    pub muestra: Card,
    pub table: Vec<Play>,
    pub team_scores: TeamTally,
    pub round_wins: TeamTally,
    pub first_round_winner: Option<Team>,
    pub points_at_stake: u8,
    /// 0 none, 1 truco, 2 retruco, 3 vale4.
    pub truco_level: u8,
    pub envido_played: bool,
    pub flor_played: bool,
    /// Team that sent the last accepted truco-family rung.
    pub last_call_sender: Option<Team>,
    pub pending_challenge: Option<Challenge>,
    pub phase: Phase,
    pub last_round: Vec<Play>,
    pub last_hand: Option<HandOutcome>,
}

impl GameState {
    /// First hand of a game: dealer and first to act are seat 0.
    pub fn first_hand(seats: Vec<SeatedPlayer>, deal: Deal) -> Self {
        Self::from_deal(seats, deal, 1, 0, TeamTally::default())
    }

    /// Following hand: dealer rotates by one and acts first.
    pub fn next_hand(&self, deal: Deal) -> Self {
        let dealer = (self.dealer_index + 1) % self.seats.len().max(1);
        Self::from_deal(
            self.seats.clone(),
            deal,
            self.hand_no + 1,
            dealer,
            self.team_scores,
        )
    }

    fn from_deal(
        seats: Vec<SeatedPlayer>,
        deal: Deal,
        hand_no: u32,
        dealer_index: Seat,
        team_scores: TeamTally,
    ) -> Self {
        Self {
            seats,
            hand_no,
            round_number: 1,
            turn_index: dealer_index,
            dealer_index,
            hands: deal.hands,
            muestra: deal.muestra,
            table: Vec::new(),
            team_scores,
            round_wins: TeamTally::default(),
            first_round_winner: None,
            points_at_stake: 1,
            truco_level: 0,
            envido_played: false,
            flor_played: false,
            last_call_sender: None,
            pending_challenge: None,
            phase: Phase::InPlay,
            last_round: Vec::new(),
            last_hand: None,
        }
    }

    pub fn player_count(&self) -> usize {
        self.seats.len()
    }

    pub fn seat_of(&self, player_id: PlayerId) -> Result<Seat, DomainError> {
        self.seats
            .iter()
            .position(|p| p.id == player_id)
            .ok_or_else(|| {
                DomainError::not_found(NotFoundKind::Player, format!("{player_id} is not seated"))
            })
    }

    pub fn player_at(&self, seat: Seat) -> Option<&SeatedPlayer> {
        self.seats.get(seat)
    }

    pub fn hand_of(&self, seat: Seat) -> &[DealtCard] {
        self.hands.get(seat).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn next_seat(&self, seat: Seat) -> Seat {
        (seat + 1) % self.player_count().max(1)
    }

    pub fn is_on_turn(&self, seat: Seat) -> bool {
        self.phase == Phase::InPlay && self.turn_index == seat
    }
}
